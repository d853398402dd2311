use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::types::{EventId, EventStatus, FeePaymentType, LoanId, PeriodId};

/// economic payload of a ledger event, one variant per event type
///
/// each variant carries exactly the fields that type needs; free-form
/// metadata from raw records is narrowed into typed fields when the event
/// is validated (see [`LoanEvent::try_from_record`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum EventKind {
    PrincipalDraw {
        amount: Money,
    },
    PrincipalRepayment {
        amount: Money,
    },
    /// founding rate, set once at origination
    InterestRateSet {
        rate: Rate,
    },
    InterestRateChange {
        rate: Rate,
    },
    /// toggles PIK settlement going forward; no balance effect
    PikFlagSet {
        enabled: bool,
    },
    CommitmentSet {
        amount: Money,
    },
    CommitmentChange {
        amount: Money,
    },
    /// with an amount the commitment is reduced by it, without it the
    /// commitment is cancelled entirely
    CommitmentCancel {
        amount: Option<Money>,
    },
    /// accounting-only, excluded from state replay
    CashReceived {
        amount: Money,
    },
    FeeInvoice {
        amount: Money,
        fee_type: String,
        payment_type: FeePaymentType,
        period_id: Option<PeriodId>,
    },
    /// a period's accrued interest rolled into principal
    PikCapitalizationPosted {
        amount: Money,
        period_id: Option<PeriodId>,
    },
}

impl EventKind {
    /// wire name of the event type
    pub fn type_name(&self) -> &'static str {
        match self {
            EventKind::PrincipalDraw { .. } => "principal_draw",
            EventKind::PrincipalRepayment { .. } => "principal_repayment",
            EventKind::InterestRateSet { .. } => "interest_rate_set",
            EventKind::InterestRateChange { .. } => "interest_rate_change",
            EventKind::PikFlagSet { .. } => "pik_flag_set",
            EventKind::CommitmentSet { .. } => "commitment_set",
            EventKind::CommitmentChange { .. } => "commitment_change",
            EventKind::CommitmentCancel { .. } => "commitment_cancel",
            EventKind::CashReceived { .. } => "cash_received",
            EventKind::FeeInvoice { .. } => "fee_invoice",
            EventKind::PikCapitalizationPosted { .. } => "pik_capitalization_posted",
        }
    }

    /// whether replaying this event moves principal, rate or commitment
    ///
    /// the period segmenter splits on exactly this predicate; it must stay
    /// consistent with the replay fold in `replay::apply`.
    pub fn is_state_changing(&self) -> bool {
        match self {
            EventKind::PrincipalDraw { .. }
            | EventKind::PrincipalRepayment { .. }
            | EventKind::InterestRateSet { .. }
            | EventKind::InterestRateChange { .. }
            | EventKind::CommitmentSet { .. }
            | EventKind::CommitmentChange { .. }
            | EventKind::CommitmentCancel { .. }
            | EventKind::PikCapitalizationPosted { .. } => true,
            EventKind::FeeInvoice { payment_type, .. } => *payment_type == FeePaymentType::Pik,
            EventKind::CashReceived { .. } | EventKind::PikFlagSet { .. } => false,
        }
    }

    /// whether this event marks the period as requiring manual review
    ///
    /// state-changing events minus routine interest postings: a PIK
    /// capitalization moves principal but is part of normal period
    /// processing, so it does not by itself force manual handling.
    pub fn is_economic(&self) -> bool {
        self.is_state_changing() && !matches!(self, EventKind::PikCapitalizationPosted { .. })
    }
}

/// an immutable entry in a loan's event ledger
///
/// events are append-only: a draft may be approved, after which the entry
/// never changes again. corrections are modeled as new reversing events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanEvent {
    pub id: EventId,
    pub loan_id: LoanId,
    pub facility_id: Option<Uuid>,
    pub effective_date: NaiveDate,
    /// accounting value date; carried for display, never moves a segment
    /// boundary (segmentation partitions by effective date)
    pub value_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub kind: EventKind,
    pub status: EventStatus,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
}

impl LoanEvent {
    /// create a new draft event
    pub fn draft(
        loan_id: LoanId,
        effective_date: NaiveDate,
        kind: EventKind,
        created_by: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            loan_id,
            facility_id: None,
            effective_date,
            value_date: None,
            kind,
            status: EventStatus::Draft,
            created_by: created_by.into(),
            created_at,
            approved_by: None,
            approved_at: None,
        }
    }

    /// approve a draft event, freezing it into the replayable ledger
    ///
    /// the role check behind approval lives at the boundary; this only
    /// enforces the draft -> approved transition.
    pub fn approve(&mut self, by: impl Into<String>, at: DateTime<Utc>) -> Result<()> {
        if self.status != EventStatus::Draft {
            return Err(LedgerError::EventNotDraft { event_id: self.id });
        }
        self.status = EventStatus::Approved;
        self.approved_by = Some(by.into());
        self.approved_at = Some(at);
        Ok(())
    }

    pub fn is_approved(&self) -> bool {
        self.status == EventStatus::Approved
    }

    /// validate a raw event record into a typed ledger event
    ///
    /// fails fast with the offending event id when a required field is
    /// missing; a missing amount is never read as zero.
    pub fn try_from_record(record: EventRecord) -> Result<Self> {
        let event_id = record.id;

        let effective_date = record
            .effective_date
            .ok_or(LedgerError::MissingEffectiveDate { event_id })?;

        let amount = |r: &EventRecord| -> Result<Money> {
            r.amount
                .map(Money::from_decimal)
                .ok_or(LedgerError::MissingAmount { event_id })
        };
        let rate = |r: &EventRecord| -> Result<Rate> {
            r.rate
                .map(Rate::from_decimal)
                .ok_or(LedgerError::MissingRate { event_id })
        };

        let kind = match record.event_type.as_str() {
            "principal_draw" => EventKind::PrincipalDraw {
                amount: amount(&record)?,
            },
            "principal_repayment" => EventKind::PrincipalRepayment {
                amount: amount(&record)?,
            },
            "interest_rate_set" => EventKind::InterestRateSet {
                rate: rate(&record)?,
            },
            "interest_rate_change" => EventKind::InterestRateChange {
                rate: rate(&record)?,
            },
            "pik_flag_set" => EventKind::PikFlagSet {
                enabled: record.metadata_bool("enabled").unwrap_or(true),
            },
            "commitment_set" => EventKind::CommitmentSet {
                amount: amount(&record)?,
            },
            "commitment_change" => EventKind::CommitmentChange {
                amount: amount(&record)?,
            },
            "commitment_cancel" => EventKind::CommitmentCancel {
                amount: record.amount.map(Money::from_decimal),
            },
            "cash_received" => EventKind::CashReceived {
                amount: amount(&record)?,
            },
            "fee_invoice" => {
                let payment_type = match record.metadata_str("payment_type") {
                    None | Some("cash") => FeePaymentType::Cash,
                    Some("pik") => FeePaymentType::Pik,
                    Some(other) => {
                        return Err(LedgerError::InvalidPaymentType {
                            event_id,
                            value: other.to_string(),
                        })
                    }
                };
                EventKind::FeeInvoice {
                    amount: amount(&record)?,
                    fee_type: record
                        .metadata_str("fee_type")
                        .unwrap_or("other")
                        .to_string(),
                    payment_type,
                    period_id: record.metadata_uuid("period_id"),
                }
            }
            "pik_capitalization_posted" => EventKind::PikCapitalizationPosted {
                amount: amount(&record)?,
                period_id: record.metadata_uuid("period_id"),
            },
            other => {
                return Err(LedgerError::UnknownEventType {
                    event_id,
                    event_type: other.to_string(),
                })
            }
        };

        Ok(Self {
            id: record.id,
            loan_id: record.loan_id,
            facility_id: record.facility_id,
            effective_date,
            value_date: record.value_date,
            kind,
            status: record.status,
            created_by: record.created_by,
            created_at: record.created_at,
            approved_by: record.approved_by,
            approved_at: record.approved_at,
        })
    }
}

/// raw event record as stored or transported, before validation
///
/// this is the boundary shape: a string event type, optional amount/rate
/// and a free-form metadata map. [`LoanEvent::try_from_record`] narrows it
/// into the typed [`EventKind`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: EventId,
    pub loan_id: LoanId,
    #[serde(default)]
    pub facility_id: Option<Uuid>,
    pub event_type: String,
    pub effective_date: Option<NaiveDate>,
    #[serde(default)]
    pub value_date: Option<NaiveDate>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub rate: Option<Decimal>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    pub status: EventStatus,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub approved_by: Option<String>,
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
}

impl EventRecord {
    fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }

    fn metadata_bool(&self, key: &str) -> Option<bool> {
        self.metadata.get(key).and_then(|v| v.as_bool())
    }

    fn metadata_uuid(&self, key: &str) -> Option<Uuid> {
        self.metadata_str(key).and_then(|s| Uuid::parse_str(s).ok())
    }
}

/// append-only event ledger for a single loan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLedger {
    events: Vec<LoanEvent>,
}

impl EventLedger {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn from_events(events: Vec<LoanEvent>) -> Self {
        Self { events }
    }

    /// append an event; the ledger never removes or rewrites entries
    pub fn append(&mut self, event: LoanEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[LoanEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// approved events in replay order: ascending effective date, ties
    /// broken by creation time then id so replay stays deterministic
    pub fn approved_sorted(&self) -> Vec<&LoanEvent> {
        let mut approved: Vec<&LoanEvent> =
            self.events.iter().filter(|e| e.is_approved()).collect();
        approved.sort_by(|a, b| {
            a.effective_date
                .cmp(&b.effective_date)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        approved
    }

    /// existence check before posting an interest charge for a period
    ///
    /// the insert itself must be made atomic at the storage boundary (a
    /// unique constraint on loan + period); this check keeps the error a
    /// distinct "already exists" rather than a duplicated capitalization.
    pub fn ensure_no_capitalization(&self, loan_id: LoanId, period_id: PeriodId) -> Result<()> {
        let exists = self.events.iter().any(|e| {
            matches!(
                e.kind,
                EventKind::PikCapitalizationPosted { period_id: Some(p), .. } if p == period_id
            )
        });
        if exists {
            return Err(LedgerError::InterestChargeExists { loan_id, period_id });
        }
        Ok(())
    }
}
