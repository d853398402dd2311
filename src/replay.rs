use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::LoanConfig;
use crate::decimal::{Money, Rate};
use crate::events::{EventKind, LoanEvent};
use crate::types::FeePaymentType;

/// point-in-time loan state, derived by replay and never persisted
///
/// `undrawn_commitment` always equals `total_commitment -
/// outstanding_principal`; it can go negative when PIK capitalization
/// pushes principal above the commitment, and fee calculations clamp it at
/// zero where needed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanState {
    pub outstanding_principal: Money,
    pub current_rate: Rate,
    pub total_commitment: Money,
    pub undrawn_commitment: Money,
    pub pik_enabled: bool,
}

impl LoanState {
    /// founding state before any event has been applied
    pub fn initial(config: &LoanConfig) -> Self {
        Self {
            outstanding_principal: Money::ZERO,
            current_rate: Rate::ZERO,
            total_commitment: config.total_commitment,
            undrawn_commitment: config.total_commitment,
            pik_enabled: false,
        }
    }

    /// apply a single approved event to the state
    ///
    /// this is the replay fold step; `EventKind::is_state_changing` must
    /// agree with which arms touch principal, rate or commitment.
    pub fn apply(&mut self, event: &LoanEvent) {
        match &event.kind {
            EventKind::PrincipalDraw { amount } => {
                self.outstanding_principal += *amount;
            }
            EventKind::PrincipalRepayment { amount } => {
                self.outstanding_principal =
                    (self.outstanding_principal - *amount).max(Money::ZERO);
            }
            EventKind::InterestRateSet { rate } | EventKind::InterestRateChange { rate } => {
                self.current_rate = *rate;
            }
            EventKind::CommitmentSet { amount } | EventKind::CommitmentChange { amount } => {
                self.total_commitment = *amount;
            }
            EventKind::CommitmentCancel { amount } => {
                self.total_commitment = match amount {
                    Some(reduction) => (self.total_commitment - *reduction).max(Money::ZERO),
                    None => Money::ZERO,
                };
            }
            EventKind::PikCapitalizationPosted { amount, .. } => {
                self.outstanding_principal += *amount;
            }
            EventKind::FeeInvoice {
                amount,
                payment_type,
                ..
            } => {
                if *payment_type == FeePaymentType::Pik {
                    self.outstanding_principal += *amount;
                }
            }
            EventKind::PikFlagSet { enabled } => {
                self.pik_enabled = *enabled;
            }
            EventKind::CashReceived { .. } => {}
        }
        self.undrawn_commitment = self.total_commitment - self.outstanding_principal;
    }
}

/// fold approved events with effective date <= `as_of` into a loan state
///
/// `events` must already be in replay order (see
/// `EventLedger::approved_sorted`). pure and deterministic: the same event
/// prefix always yields the same state, and every downstream figure must
/// agree with this replay rather than with any stored balance.
pub fn replay(config: &LoanConfig, events: &[&LoanEvent], as_of: NaiveDate) -> LoanState {
    replay_filtered(config, events, |e| e.effective_date <= as_of)
}

/// replay events strictly before `date`, the opening state of a period
pub fn replay_before(config: &LoanConfig, events: &[&LoanEvent], date: NaiveDate) -> LoanState {
    replay_filtered(config, events, |e| e.effective_date < date)
}

fn replay_filtered<F>(config: &LoanConfig, events: &[&LoanEvent], keep: F) -> LoanState
where
    F: Fn(&LoanEvent) -> bool,
{
    let mut state = LoanState::initial(config);
    for event in events.iter().filter(|e| keep(e)) {
        state.apply(event);
    }
    state
}
