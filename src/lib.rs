pub mod accrual;
pub mod config;
pub mod daycount;
pub mod decimal;
pub mod engine;
pub mod errors;
pub mod events;
pub mod periods;
pub mod replay;
pub mod segments;
pub mod summary;
pub mod types;

// re-export key types
pub use accrual::{accrue_period, DailyAccrual, PeriodAccrual};
pub use config::LoanConfig;
pub use daycount::{act_days, days_30_360, fraction_360, fraction_365, DayCountConvention};
pub use decimal::{Money, Rate};
pub use engine::{AccrualEngine, LoanAccruals};
pub use errors::{LedgerError, Result};
pub use events::{EventKind, EventLedger, EventRecord, LoanEvent};
pub use periods::Period;
pub use replay::{replay, replay_before, LoanState};
pub use segments::{segment_period, CommitmentFeeSegment, InterestSegment, SegmentedPeriod};
pub use summary::{build_summary, AccrualsSummary};
pub use types::{
    CommitmentFeeBasis, EventId, EventStatus, FeePaymentType, InterestType, LoanId, PeriodId,
    PeriodStatus, ProcessingMode,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
