/// mid-period draw - a second disbursement splits the period into two
/// accrual segments, printed with the daily breakdown
use loan_accrual::chrono::{NaiveDate, Utc};
use loan_accrual::{
    accrue_period, EventKind, EventLedger, LoanConfig, LoanEvent, Money, Period, Rate, Uuid,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let loan_id = Uuid::new_v4();
    let config = LoanConfig::cash_pay(Money::from_major(1_000_000));

    let mut ledger = EventLedger::new();
    let events = [
        (
            date(2024, 1, 1),
            EventKind::InterestRateSet {
                rate: Rate::from_percentage(8),
            },
        ),
        (
            date(2024, 1, 1),
            EventKind::PrincipalDraw {
                amount: Money::from_major(500_000),
            },
        ),
        (
            date(2024, 1, 16),
            EventKind::PrincipalDraw {
                amount: Money::from_major(200_000),
            },
        ),
    ];
    for (on, kind) in events {
        let mut event = LoanEvent::draft(loan_id, on, kind, "demo", Utc::now());
        event.approve("reviewer", Utc::now())?;
        ledger.append(event);
    }

    let january = Period::new(loan_id, date(2024, 1, 1), date(2024, 1, 31));
    let accrual = accrue_period(&config, &ledger.approved_sorted(), &january)?.with_daily_breakdown();

    for segment in &accrual.interest_segments {
        println!(
            "{} .. {}: {} days on {} at {} -> {}",
            segment.start,
            segment.end,
            segment.days,
            segment.principal,
            segment.rate,
            segment.interest.round_dp(2)
        );
    }
    println!("period interest: {}", accrual.interest_accrued.round_dp(2));

    if let Some(daily) = &accrual.daily {
        let last = daily.last().expect("period has days");
        println!(
            "daily rows: {}, cumulative on {}: {}",
            daily.len(),
            last.date,
            last.cumulative_interest.round_dp(2)
        );
    }

    Ok(())
}
