use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::LoanConfig;
use crate::daycount::{days_30_360, DayCountConvention};
use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::events::{EventKind, LoanEvent};
use crate::periods::Period;
use crate::segments::{segment_period, CommitmentFeeSegment, InterestSegment};
use crate::types::{InterestType, LoanId, PeriodId};

/// one calendar day of an interest segment, for display only
///
/// the daily expansion is presentation data derived from the segments; the
/// segment amounts remain the authoritative figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAccrual {
    pub date: NaiveDate,
    pub principal: Money,
    pub rate: Rate,
    pub interest: Money,
    pub cumulative_interest: Money,
}

/// per-period accrual result: the contract every presentation layer
/// (notices, accrual tables, approval dashboards) renders without
/// re-deriving numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodAccrual {
    pub period_id: PeriodId,
    pub loan_id: LoanId,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// 30/360 period length, both endpoints counted
    pub days: i64,
    /// convention behind `days` and the segment day counts
    pub day_count: DayCountConvention,

    pub opening_principal: Money,
    pub closing_principal: Money,
    pub opening_commitment: Money,
    pub closing_commitment: Money,
    pub opening_undrawn: Money,
    pub closing_undrawn: Money,

    pub interest_accrued: Money,
    pub commitment_fee_accrued: Money,

    pub principal_drawn: Money,
    pub principal_repaid: Money,
    pub pik_capitalized: Money,
    pub fees_invoiced: Money,

    pub interest_segments: Vec<InterestSegment>,
    pub fee_segments: Vec<CommitmentFeeSegment>,
    pub daily: Option<Vec<DailyAccrual>>,
}

impl PeriodAccrual {
    /// amount due from the borrower for a cash-pay period, or the amount
    /// to capitalize for a PIK period — the same figure either way
    pub fn total_due(&self) -> Money {
        self.interest_accrued + self.commitment_fee_accrued
    }

    /// fill in the per-day display rows (principal, rate, day's interest,
    /// running cumulative) from the interest segments
    pub fn with_daily_breakdown(mut self) -> Self {
        let mut rows = Vec::new();
        let mut cumulative = Money::ZERO;
        for segment in &self.interest_segments {
            let daily_interest = Money::from_decimal(
                segment.principal.as_decimal() * segment.rate.daily_360().as_decimal(),
            );
            let mut day = segment.start;
            while day <= segment.end {
                cumulative += daily_interest;
                rows.push(DailyAccrual {
                    date: day,
                    principal: segment.principal,
                    rate: segment.rate,
                    interest: daily_interest,
                    cumulative_interest: cumulative,
                });
                day = match day.succ_opt() {
                    Some(next) => next,
                    None => break,
                };
            }
        }
        self.daily = Some(rows);
        self
    }
}

/// derive the full accrual for one billing period
///
/// segments the period, sums segment amounts into the period totals, and
/// tabulates drawn/repaid/capitalized/invoiced figures from the same
/// in-period event slice by event type (independent of segmentation).
pub fn accrue_period(
    config: &LoanConfig,
    events: &[&LoanEvent],
    period: &Period,
) -> Result<PeriodAccrual> {
    let segmented = segment_period(config, events, period)?;

    let interest_accrued = segmented
        .interest_segments
        .iter()
        .fold(Money::ZERO, |sum, s| sum + s.interest);
    let commitment_fee_accrued = segmented
        .fee_segments
        .iter()
        .fold(Money::ZERO, |sum, s| sum + s.fee);

    let mut principal_drawn = Money::ZERO;
    let mut principal_repaid = Money::ZERO;
    let mut pik_capitalized = Money::ZERO;
    let mut fees_invoiced = Money::ZERO;
    for event in events.iter().filter(|e| period.contains(e.effective_date)) {
        match &event.kind {
            EventKind::PrincipalDraw { amount } => principal_drawn += *amount,
            EventKind::PrincipalRepayment { amount } => principal_repaid += *amount,
            EventKind::PikCapitalizationPosted { amount, .. } => pik_capitalized += *amount,
            EventKind::FeeInvoice { amount, .. } => fees_invoiced += *amount,
            _ => {}
        }
    }

    Ok(PeriodAccrual {
        period_id: period.id,
        loan_id: period.loan_id,
        period_start: period.period_start,
        period_end: period.period_end,
        days: days_30_360(period.period_start, period.period_end, true),
        day_count: DayCountConvention::Thirty360,
        opening_principal: segmented.opening.outstanding_principal,
        closing_principal: segmented.closing.outstanding_principal,
        opening_commitment: segmented.opening.total_commitment,
        closing_commitment: segmented.closing.total_commitment,
        opening_undrawn: segmented.opening.undrawn_commitment,
        closing_undrawn: segmented.closing.undrawn_commitment,
        interest_accrued,
        commitment_fee_accrued,
        principal_drawn,
        principal_repaid,
        pik_capitalized,
        fees_invoiced,
        interest_segments: segmented.interest_segments,
        fee_segments: segmented.fee_segments,
        daily: None,
    })
}

/// whether the period's due amount is capitalized rather than invoiced
pub fn is_capitalizing(config: &LoanConfig) -> bool {
    config.interest_type == InterestType::Pik
}
