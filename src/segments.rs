use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::LoanConfig;
use crate::daycount::{days_30_360, fraction_360};
use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::events::LoanEvent;
use crate::periods::Period;
use crate::replay::{replay_before, LoanState};
use crate::types::CommitmentFeeBasis;

/// sub-interval of a period with constant principal and rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestSegment {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// 30/360 days, both endpoints counted
    pub days: i64,
    pub principal: Money,
    pub rate: Rate,
    pub interest: Money,
}

/// sub-interval of a period with constant fee basis and fee rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitmentFeeSegment {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// 30/360 days, both endpoints counted
    pub days: i64,
    pub undrawn: Money,
    pub fee_rate: Rate,
    pub fee: Money,
}

/// result of segmenting one period: the sub-intervals plus the replayed
/// states at the period boundaries
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentedPeriod {
    pub opening: LoanState,
    pub closing: LoanState,
    pub interest_segments: Vec<InterestSegment>,
    pub fee_segments: Vec<CommitmentFeeSegment>,
}

/// split one billing period into constant-state segments
///
/// walks the approved in-period events in replay order; every
/// state-changing event closes the running segment the day before its
/// effective date and opens a new one with the post-event state. segments
/// partition by effective date — a distinct value date never moves a
/// boundary. zero-length segments (an event on the running boundary) are
/// dropped. the resulting segments tile `[period_start, period_end]`
/// exactly; a violation means the caller passed unsorted events and aborts
/// the period rather than producing a plausible-looking wrong number.
///
/// `events` is the full replay-ordered approved slice for the loan, not
/// pre-filtered to the period (the opening state needs everything before
/// `period_start`).
pub fn segment_period(
    config: &LoanConfig,
    events: &[&LoanEvent],
    period: &Period,
) -> Result<SegmentedPeriod> {
    let opening = replay_before(config, events, period.period_start);

    let mut state = opening;
    let mut cursor = period.period_start;
    let mut interest_segments = Vec::new();
    let mut fee_segments = Vec::new();

    let in_period = events
        .iter()
        .filter(|e| period.contains(e.effective_date) && e.kind.is_state_changing());

    for event in in_period {
        let boundary = event.effective_date;
        if boundary < cursor {
            return Err(LedgerError::SegmentOutOfPeriod {
                loan_id: period.loan_id,
                period_id: period.id,
                event_id: event.id,
            });
        }

        // close the running segment the day before the event takes effect
        if let Some(prev) = boundary.pred_opt() {
            if prev >= cursor {
                push_segments(
                    config,
                    &state,
                    cursor,
                    prev,
                    &mut interest_segments,
                    &mut fee_segments,
                );
            }
        }

        state.apply(event);
        cursor = boundary;
    }

    push_segments(
        config,
        &state,
        cursor,
        period.period_end,
        &mut interest_segments,
        &mut fee_segments,
    );

    check_tiling(period, &interest_segments)?;

    Ok(SegmentedPeriod {
        opening,
        closing: state,
        interest_segments,
        fee_segments,
    })
}

fn push_segments(
    config: &LoanConfig,
    state: &LoanState,
    start: NaiveDate,
    end: NaiveDate,
    interest_segments: &mut Vec<InterestSegment>,
    fee_segments: &mut Vec<CommitmentFeeSegment>,
) {
    let days = days_30_360(start, end, true);

    let interest = Money::from_decimal(
        state.outstanding_principal.as_decimal()
            * state.current_rate.as_decimal()
            * fraction_360(days),
    );
    interest_segments.push(InterestSegment {
        start,
        end,
        days,
        principal: state.outstanding_principal,
        rate: state.current_rate,
        interest,
    });

    if let Some(fee_rate) = config.commitment_fee_rate.filter(|r| !r.is_zero()) {
        // undrawn can go negative when PIK pushes principal past the
        // commitment; the fee basis floors at zero
        let undrawn = state.undrawn_commitment.max(Money::ZERO);
        let basis = match config.commitment_fee_basis {
            CommitmentFeeBasis::UndrawnOnly => undrawn,
            CommitmentFeeBasis::TotalCommitment => state.total_commitment,
        };
        let fee =
            Money::from_decimal(basis.as_decimal() * fee_rate.as_decimal() * fraction_360(days));
        fee_segments.push(CommitmentFeeSegment {
            start,
            end,
            days,
            undrawn: basis,
            fee_rate,
            fee,
        });
    }
}

/// segments must be contiguous, non-overlapping and union to the period
fn check_tiling(period: &Period, segments: &[InterestSegment]) -> Result<()> {
    let mut expected_start = period.period_start;
    for segment in segments {
        if segment.end < segment.start {
            return Err(LedgerError::NegativeSegment {
                loan_id: period.loan_id,
                period_id: period.id,
                start: segment.start,
                end: segment.end,
            });
        }
        // a start away from the expected boundary is a gap or an overlap
        if segment.start != expected_start {
            return Err(LedgerError::SegmentGap {
                loan_id: period.loan_id,
                period_id: period.id,
            });
        }
        expected_start = match segment.end.succ_opt() {
            Some(next) => next,
            None => {
                return Err(LedgerError::SegmentGap {
                    loan_id: period.loan_id,
                    period_id: period.id,
                })
            }
        };
    }
    match segments.last() {
        Some(last) if last.end == period.period_end => Ok(()),
        _ => Err(LedgerError::SegmentGap {
            loan_id: period.loan_id,
            period_id: period.id,
        }),
    }
}
