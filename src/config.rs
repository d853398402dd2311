use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::{CommitmentFeeBasis, InterestType};

/// loan-level parameters consumed by the accrual engine
///
/// the commitment here is the facility's founding size; `commitment_set`
/// and `commitment_change` events override it during replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanConfig {
    pub total_commitment: Money,
    pub commitment_fee_rate: Option<Rate>,
    pub commitment_fee_basis: CommitmentFeeBasis,
    pub interest_type: InterestType,
}

impl LoanConfig {
    /// plain cash-pay loan without a commitment fee
    pub fn cash_pay(total_commitment: Money) -> Self {
        Self {
            total_commitment,
            commitment_fee_rate: None,
            commitment_fee_basis: CommitmentFeeBasis::UndrawnOnly,
            interest_type: InterestType::CashPay,
        }
    }

    /// PIK loan: accrued interest is capitalized each period instead of
    /// being invoiced for cash
    pub fn pik(total_commitment: Money) -> Self {
        Self {
            total_commitment,
            commitment_fee_rate: None,
            commitment_fee_basis: CommitmentFeeBasis::UndrawnOnly,
            interest_type: InterestType::Pik,
        }
    }

    /// add a commitment fee on the given basis
    pub fn with_commitment_fee(mut self, rate: Rate, basis: CommitmentFeeBasis) -> Self {
        self.commitment_fee_rate = Some(rate);
        self.commitment_fee_basis = basis;
        self
    }

    /// whether commitment fees accrue at all for this loan
    pub fn charges_commitment_fee(&self) -> bool {
        self.commitment_fee_rate.is_some_and(|r| !r.is_zero())
    }
}
