use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{LedgerError, Result};
use crate::events::LoanEvent;
use crate::types::{LoanId, PeriodId, PeriodStatus, ProcessingMode};

/// a billing interval `[period_start, period_end]` for one loan
///
/// periods are generated ahead of time by the boundary layer and never
/// overlap for a given loan. the workflow is linear: open -> submitted ->
/// approved -> sent, with no back-transitions (re-opening a sent period is
/// out of scope).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub id: PeriodId,
    pub loan_id: LoanId,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub status: PeriodStatus,
    pub processing_mode: ProcessingMode,
    pub has_economic_events: bool,
}

impl Period {
    pub fn new(loan_id: LoanId, period_start: NaiveDate, period_end: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            loan_id,
            period_start,
            period_end,
            status: PeriodStatus::Open,
            processing_mode: ProcessingMode::Auto,
            has_economic_events: false,
        }
    }

    /// whether a date falls inside the period (both endpoints count)
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.period_start && date <= self.period_end
    }

    /// submit the period's figures for monthly approval
    pub fn submit(&mut self) -> Result<()> {
        self.transition(PeriodStatus::Open, PeriodStatus::Submitted)
    }

    /// approve the submitted figures
    pub fn approve(&mut self) -> Result<()> {
        self.transition(PeriodStatus::Submitted, PeriodStatus::Approved)
    }

    /// mark the borrower notice as sent; terminal
    pub fn send(&mut self) -> Result<()> {
        self.transition(PeriodStatus::Approved, PeriodStatus::Sent)
    }

    fn transition(&mut self, expected: PeriodStatus, next: PeriodStatus) -> Result<()> {
        if self.status != expected {
            return Err(LedgerError::InvalidStatusTransition {
                current: format!("{:?}", self.status),
                requested: format!("{:?}", next),
            });
        }
        self.status = next;
        Ok(())
    }

    /// classify the period from its approved in-period events
    ///
    /// a period with any economic event is flagged for manual review; this
    /// uses `EventKind::is_economic`, the same predicate the segmenter's
    /// filter is built on, so the two layers cannot disagree about which
    /// events count.
    pub fn classify(&mut self, events: &[&LoanEvent]) {
        self.has_economic_events = events
            .iter()
            .any(|e| self.contains(e.effective_date) && e.kind.is_economic());
        self.processing_mode = if self.has_economic_events {
            ProcessingMode::Manual
        } else {
            ProcessingMode::Auto
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;
    use crate::events::{EventKind, EventLedger};
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn approved(loan_id: LoanId, on: NaiveDate, kind: EventKind) -> LoanEvent {
        let mut event = LoanEvent::draft(loan_id, on, kind, "analyst", Utc::now());
        event.approve("reviewer", Utc::now()).unwrap();
        event
    }

    #[test]
    fn test_linear_workflow() {
        let mut period = Period::new(Uuid::new_v4(), date(2024, 1, 1), date(2024, 1, 31));
        assert_eq!(period.status, PeriodStatus::Open);

        period.submit().unwrap();
        period.approve().unwrap();
        period.send().unwrap();
        assert_eq!(period.status, PeriodStatus::Sent);
    }

    #[test]
    fn test_no_skipping_or_back_transitions() {
        let mut period = Period::new(Uuid::new_v4(), date(2024, 1, 1), date(2024, 1, 31));

        // cannot approve an open period
        assert!(matches!(
            period.approve(),
            Err(LedgerError::InvalidStatusTransition { .. })
        ));

        period.submit().unwrap();
        // cannot submit twice
        assert!(period.submit().is_err());

        period.approve().unwrap();
        period.send().unwrap();
        // sent is terminal
        assert!(period.send().is_err());
    }

    #[test]
    fn test_classification_flags_economic_events() {
        let loan_id = Uuid::new_v4();
        let mut period = Period::new(loan_id, date(2024, 1, 1), date(2024, 1, 31));

        let ledger = EventLedger::from_events(vec![approved(
            loan_id,
            date(2024, 1, 15),
            EventKind::PrincipalDraw {
                amount: Money::from_major(50_000),
            },
        )]);
        period.classify(&ledger.approved_sorted());
        assert!(period.has_economic_events);
        assert_eq!(period.processing_mode, ProcessingMode::Manual);
    }

    #[test]
    fn test_classification_ignores_cash_and_routine_postings() {
        let loan_id = Uuid::new_v4();
        let mut period = Period::new(loan_id, date(2024, 1, 1), date(2024, 1, 31));

        let ledger = EventLedger::from_events(vec![
            approved(
                loan_id,
                date(2024, 1, 10),
                EventKind::CashReceived {
                    amount: Money::from_major(1_000),
                },
            ),
            approved(
                loan_id,
                date(2024, 1, 31),
                EventKind::PikCapitalizationPosted {
                    amount: Money::from_major(2_500),
                    period_id: Some(period.id),
                },
            ),
        ]);
        period.classify(&ledger.approved_sorted());
        assert!(!period.has_economic_events);
        assert_eq!(period.processing_mode, ProcessingMode::Auto);
    }

    #[test]
    fn test_classification_ignores_out_of_period_events() {
        let loan_id = Uuid::new_v4();
        let mut period = Period::new(loan_id, date(2024, 2, 1), date(2024, 2, 29));

        let ledger = EventLedger::from_events(vec![approved(
            loan_id,
            date(2024, 1, 15),
            EventKind::PrincipalDraw {
                amount: Money::from_major(50_000),
            },
        )]);
        period.classify(&ledger.approved_sorted());
        assert!(!period.has_economic_events);
    }
}
