use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accrual::PeriodAccrual;
use crate::config::LoanConfig;
use crate::decimal::{Money, Rate};
use crate::events::LoanEvent;
use crate::replay::replay;

/// loan-level rollup across all period accruals plus the replayed current
/// state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccrualsSummary {
    /// summed 30/360 period lengths
    pub total_days: i64,
    pub total_interest_accrued: Money,
    pub total_commitment_fees: Money,
    pub total_pik_capitalized: Money,
    pub total_fees_invoiced: Money,

    /// current figures come from a full replay to the as-of date, never
    /// from summing periods — they stay correct when periods have gaps or
    /// lag behind the most recent activity
    pub current_principal: Money,
    pub current_rate: Rate,
    pub total_commitment: Money,
    pub current_undrawn: Money,

    /// principal-and-days weighted mean rate over all interest segments
    pub average_rate: Rate,
}

/// reduce period accruals and the approved ledger into the summary
pub fn build_summary(
    config: &LoanConfig,
    events: &[&LoanEvent],
    accruals: &[PeriodAccrual],
    as_of: NaiveDate,
) -> AccrualsSummary {
    let current = replay(config, events, as_of);

    let mut total_days = 0;
    let mut total_interest_accrued = Money::ZERO;
    let mut total_commitment_fees = Money::ZERO;
    let mut total_pik_capitalized = Money::ZERO;
    let mut total_fees_invoiced = Money::ZERO;

    let mut weighted_rate = Decimal::ZERO;
    let mut weight = Decimal::ZERO;

    for accrual in accruals {
        total_days += accrual.days;
        total_interest_accrued += accrual.interest_accrued;
        total_commitment_fees += accrual.commitment_fee_accrued;
        total_pik_capitalized += accrual.pik_capitalized;
        total_fees_invoiced += accrual.fees_invoiced;

        for segment in &accrual.interest_segments {
            let exposure = segment.principal.as_decimal() * Decimal::from(segment.days);
            weighted_rate += exposure * segment.rate.as_decimal();
            weight += exposure;
        }
    }

    let average_rate = if weight.is_zero() {
        Rate::ZERO
    } else {
        Rate::from_decimal(weighted_rate / weight)
    };

    AccrualsSummary {
        total_days,
        total_interest_accrued,
        total_commitment_fees,
        total_pik_capitalized,
        total_fees_invoiced,
        current_principal: current.outstanding_principal,
        current_rate: current.current_rate,
        total_commitment: current.total_commitment,
        current_undrawn: current.undrawn_commitment,
        average_rate,
    }
}
