use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};

use crate::accrual::{accrue_period, PeriodAccrual};
use crate::config::LoanConfig;
use crate::errors::Result;
use crate::events::EventLedger;
use crate::periods::Period;
use crate::summary::{build_summary, AccrualsSummary};

/// full derivation for one loan: per-period accruals plus the rollup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanAccruals {
    pub periods: Vec<PeriodAccrual>,
    pub summary: AccrualsSummary,
}

/// the accrual engine: a pure function from (events, periods, loan
/// parameters, as-of date) to (period accruals, summary)
///
/// no I/O, no clock, no hidden state — re-running with identical inputs
/// yields identical output, and the replayed figures are the source of
/// truth for every downstream view.
pub struct AccrualEngine {
    config: LoanConfig,
}

impl AccrualEngine {
    pub fn new(config: LoanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoanConfig {
        &self.config
    }

    /// derive accruals for every period and the summary as of `as_of`
    ///
    /// periods are processed in ascending start order regardless of input
    /// order. an empty ledger or empty period list is a valid "no data
    /// yet" state, not an error: the result degrades to a zero-valued
    /// summary over the replayed current state.
    pub fn compute(
        &self,
        ledger: &EventLedger,
        periods: &[Period],
        as_of: NaiveDate,
    ) -> Result<LoanAccruals> {
        let sorted_events = ledger.approved_sorted();

        let mut ordered: Vec<&Period> = periods.iter().collect();
        ordered.sort_by_key(|p| p.period_start);

        let mut accruals = Vec::with_capacity(ordered.len());
        for period in ordered {
            accruals.push(accrue_period(&self.config, &sorted_events, period)?);
        }

        let summary = build_summary(&self.config, &sorted_events, &accruals, as_of);
        Ok(LoanAccruals {
            periods: accruals,
            summary,
        })
    }

    /// boundary convenience: derive the as-of date from a time provider
    ///
    /// the core itself never reads a clock; this exists for callers that
    /// want "as of today" figures and remains testable through
    /// `TimeSource::Test`.
    pub fn compute_with_time(
        &self,
        ledger: &EventLedger,
        periods: &[Period],
        time_provider: &SafeTimeProvider,
    ) -> Result<LoanAccruals> {
        self.compute(ledger, periods, time_provider.now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::{Money, Rate};
    use crate::events::{EventKind, LoanEvent};
    use crate::types::LoanId;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::TimeSource;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn approved(loan_id: LoanId, on: NaiveDate, kind: EventKind) -> LoanEvent {
        let mut event = LoanEvent::draft(loan_id, on, kind, "analyst", Utc::now());
        event.approve("reviewer", Utc::now()).unwrap();
        event
    }

    fn originated_ledger(loan_id: LoanId) -> EventLedger {
        EventLedger::from_events(vec![
            approved(
                loan_id,
                date(2024, 1, 1),
                EventKind::CommitmentSet {
                    amount: Money::from_major(1_000_000),
                },
            ),
            approved(
                loan_id,
                date(2024, 1, 1),
                EventKind::InterestRateSet {
                    rate: Rate::from_percentage(8),
                },
            ),
            approved(
                loan_id,
                date(2024, 1, 1),
                EventKind::PrincipalDraw {
                    amount: Money::from_major(500_000),
                },
            ),
        ])
    }

    #[test]
    fn test_end_to_end_single_period() {
        let loan_id = Uuid::new_v4();
        let engine = AccrualEngine::new(LoanConfig::cash_pay(Money::from_major(1_000_000)));
        let ledger = originated_ledger(loan_id);
        let periods = vec![Period::new(loan_id, date(2024, 1, 1), date(2024, 1, 31))];

        let result = engine.compute(&ledger, &periods, date(2024, 2, 1)).unwrap();
        assert_eq!(result.periods.len(), 1);

        let january = &result.periods[0];
        assert_eq!(january.interest_segments.len(), 1);
        assert_eq!(january.days, 31);
        // 500_000 * 8% * 31/360 under the inclusive 30/360 count
        assert_eq!(
            january.interest_accrued.round_dp(2),
            Money::from_str_exact("3444.44").unwrap()
        );
        assert_eq!(january.total_due(), january.interest_accrued);

        assert_eq!(result.summary.current_principal, Money::from_major(500_000));
        assert_eq!(result.summary.current_undrawn, Money::from_major(500_000));
        assert_eq!(result.summary.average_rate, Rate::from_percentage(8));
    }

    #[test]
    fn test_end_to_end_mid_period_draw() {
        let loan_id = Uuid::new_v4();
        let engine = AccrualEngine::new(LoanConfig::cash_pay(Money::from_major(1_000_000)));
        let mut ledger = originated_ledger(loan_id);
        ledger.append(approved(
            loan_id,
            date(2024, 1, 16),
            EventKind::PrincipalDraw {
                amount: Money::from_major(200_000),
            },
        ));
        let periods = vec![Period::new(loan_id, date(2024, 1, 1), date(2024, 1, 31))];

        let result = engine.compute(&ledger, &periods, date(2024, 2, 1)).unwrap();
        let january = &result.periods[0];

        assert_eq!(january.interest_segments.len(), 2);
        let days: Vec<i64> = january.interest_segments.iter().map(|s| s.days).collect();
        assert_eq!(days, vec![15, 16]);
        assert_eq!(days.iter().sum::<i64>(), 31);

        // 500_000 * 8% * 15/360 + 700_000 * 8% * 16/360
        let expected = Money::from_str_exact("1666.666667").unwrap()
            + Money::from_str_exact("2488.888889").unwrap();
        assert_eq!(january.interest_accrued, expected);
        assert_eq!(january.principal_drawn, Money::from_major(700_000));
    }

    #[test]
    fn test_empty_inputs_yield_zero_summary() {
        let engine = AccrualEngine::new(LoanConfig::cash_pay(Money::from_major(1_000_000)));
        let result = engine
            .compute(&EventLedger::new(), &[], date(2024, 6, 1))
            .unwrap();

        assert!(result.periods.is_empty());
        assert_eq!(result.summary.current_principal, Money::ZERO);
        assert_eq!(result.summary.total_interest_accrued, Money::ZERO);
    }

    #[test]
    fn test_periods_processed_in_start_order() {
        let loan_id = Uuid::new_v4();
        let engine = AccrualEngine::new(LoanConfig::cash_pay(Money::from_major(1_000_000)));
        let ledger = originated_ledger(loan_id);

        let january = Period::new(loan_id, date(2024, 1, 1), date(2024, 1, 31));
        let february = Period::new(loan_id, date(2024, 2, 1), date(2024, 2, 29));
        // passed out of order
        let periods = vec![february.clone(), january.clone()];

        let result = engine.compute(&ledger, &periods, date(2024, 3, 1)).unwrap();
        assert_eq!(result.periods[0].period_id, january.id);
        assert_eq!(result.periods[1].period_id, february.id);
    }

    #[test]
    fn test_compute_is_idempotent() {
        let loan_id = Uuid::new_v4();
        let engine = AccrualEngine::new(LoanConfig::cash_pay(Money::from_major(1_000_000)));
        let mut ledger = originated_ledger(loan_id);
        ledger.append(approved(
            loan_id,
            date(2024, 1, 10),
            EventKind::InterestRateChange {
                rate: Rate::from_percentage(9),
            },
        ));
        let periods = vec![Period::new(loan_id, date(2024, 1, 1), date(2024, 1, 31))];

        let first = engine.compute(&ledger, &periods, date(2024, 2, 1)).unwrap();
        let second = engine.compute(&ledger, &periods, date(2024, 2, 1)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_compute_with_test_clock() {
        let loan_id = Uuid::new_v4();
        let engine = AccrualEngine::new(LoanConfig::cash_pay(Money::from_major(1_000_000)));
        let ledger = originated_ledger(loan_id);

        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap(),
        ));

        let clocked = engine.compute_with_time(&ledger, &[], &time).unwrap();
        let explicit = engine.compute(&ledger, &[], date(2024, 2, 1)).unwrap();
        assert_eq!(clocked, explicit);
    }

    #[test]
    fn test_pik_loan_capitalization_cycle() {
        // accrue january, post the capitalization, and check february
        // accrues on the grown principal
        let loan_id = Uuid::new_v4();
        let engine = AccrualEngine::new(LoanConfig::pik(Money::from_major(1_000_000)));
        let mut ledger = originated_ledger(loan_id);
        let january = Period::new(loan_id, date(2024, 1, 1), date(2024, 1, 31));
        let february = Period::new(loan_id, date(2024, 2, 1), date(2024, 2, 29));

        let first_pass = engine
            .compute(&ledger, &[january.clone()], date(2024, 2, 1))
            .unwrap();
        let to_capitalize = first_pass.periods[0].total_due();

        // boundary check guards against posting twice
        ledger
            .ensure_no_capitalization(loan_id, january.id)
            .unwrap();
        ledger.append(approved(
            loan_id,
            date(2024, 2, 1),
            EventKind::PikCapitalizationPosted {
                amount: to_capitalize,
                period_id: Some(january.id),
            },
        ));
        assert!(ledger.ensure_no_capitalization(loan_id, january.id).is_err());

        let second_pass = engine
            .compute(&ledger, &[january, february], date(2024, 3, 1))
            .unwrap();
        let feb = &second_pass.periods[1];
        assert_eq!(
            feb.interest_segments[0].principal,
            Money::from_major(500_000) + to_capitalize
        );
        assert_eq!(second_pass.summary.total_pik_capitalized, to_capitalize);
        assert_eq!(
            second_pass.summary.current_principal,
            Money::from_major(500_000) + to_capitalize
        );
    }
}
