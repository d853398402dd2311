/// quick start - one loan, one billing period, accrued figures printed
use loan_accrual::chrono::{NaiveDate, Utc};
use loan_accrual::{
    AccrualEngine, EventKind, EventLedger, LoanConfig, LoanEvent, Money, Period, Rate, Uuid,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let loan_id = Uuid::new_v4();

    // originate: 1m commitment, 8% rate, 500k drawn on day one
    let mut ledger = EventLedger::new();
    for kind in [
        EventKind::CommitmentSet {
            amount: Money::from_major(1_000_000),
        },
        EventKind::InterestRateSet {
            rate: Rate::from_percentage(8),
        },
        EventKind::PrincipalDraw {
            amount: Money::from_major(500_000),
        },
    ] {
        let mut event = LoanEvent::draft(loan_id, date(2024, 1, 1), kind, "demo", Utc::now());
        event.approve("reviewer", Utc::now())?;
        ledger.append(event);
    }

    let january = Period::new(loan_id, date(2024, 1, 1), date(2024, 1, 31));

    let engine = AccrualEngine::new(LoanConfig::cash_pay(Money::from_major(1_000_000)));
    let result = engine.compute(&ledger, &[january], date(2024, 2, 1))?;

    let period = &result.periods[0];
    println!(
        "january: {} days, interest {}",
        period.days,
        period.interest_accrued.round_dp(2)
    );
    println!(
        "current principal {}, undrawn {}",
        result.summary.current_principal, result.summary.current_undrawn
    );

    Ok(())
}
