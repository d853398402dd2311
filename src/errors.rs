use chrono::NaiveDate;
use thiserror::Error;

use crate::types::{EventId, LoanId, PeriodId};

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("event {event_id} is missing a required amount")]
    MissingAmount { event_id: EventId },

    #[error("event {event_id} is missing a required rate")]
    MissingRate { event_id: EventId },

    #[error("event {event_id} is missing an effective date")]
    MissingEffectiveDate { event_id: EventId },

    #[error("event {event_id} has unknown event type '{event_type}'")]
    UnknownEventType {
        event_id: EventId,
        event_type: String,
    },

    #[error("event {event_id} has invalid payment type '{value}'")]
    InvalidPaymentType { event_id: EventId, value: String },

    #[error("event {event_id} is not a draft and cannot be approved again")]
    EventNotDraft { event_id: EventId },

    #[error(
        "loan {loan_id} period {period_id}: event {event_id} falls outside the period bounds"
    )]
    SegmentOutOfPeriod {
        loan_id: LoanId,
        period_id: PeriodId,
        event_id: EventId,
    },

    #[error("loan {loan_id} period {period_id}: segment [{start}, {end}] has negative length")]
    NegativeSegment {
        loan_id: LoanId,
        period_id: PeriodId,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("loan {loan_id} period {period_id}: segments do not tile the period")]
    SegmentGap {
        loan_id: LoanId,
        period_id: PeriodId,
    },

    #[error("loan {loan_id} period {period_id}: interest charge already exists")]
    InterestChargeExists {
        loan_id: LoanId,
        period_id: PeriodId,
    },

    #[error("invalid status transition: {current} -> {requested}")]
    InvalidStatusTransition {
        current: String,
        requested: String,
    },
}

pub type Result<T> = std::result::Result<T, LedgerError>;
