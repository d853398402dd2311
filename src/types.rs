use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// unique identifier for a ledger event
pub type EventId = Uuid;

/// unique identifier for a billing period
pub type PeriodId = Uuid;

/// lifecycle status of a ledger event
///
/// only approved events participate in state replay; draft events are
/// proposals. approval is terminal — corrections are new reversing events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Draft,
    Approved,
}

/// workflow status of a billing period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodStatus {
    /// accruing, figures not yet reviewed
    Open,
    /// submitted for monthly approval
    Submitted,
    /// approved, ready to send to the borrower
    Approved,
    /// notice sent; terminal
    Sent,
}

/// how a period is processed during monthly approval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMode {
    /// no economic events in the period, straight-through
    Auto,
    /// economic events present, requires manual review
    Manual,
}

/// how accrued interest is settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestType {
    /// interest is invoiced and paid in cash each period
    CashPay,
    /// interest is capitalized into principal (payment-in-kind)
    Pik,
}

/// basis on which the commitment fee accrues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitmentFeeBasis {
    /// fee on the undrawn portion of the commitment
    UndrawnOnly,
    /// fee on the full commitment regardless of utilization
    TotalCommitment,
}

/// settlement type of an invoiced fee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeePaymentType {
    /// invoiced and settled in cash, no balance effect
    Cash,
    /// capitalized into principal
    Pik,
}
