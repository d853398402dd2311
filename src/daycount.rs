use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// day count convention used for reporting on accrual lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayCountConvention {
    /// actual calendar days / 365
    Act365,
    /// 30 days per month / 360 days per year (US NASD)
    Thirty360,
}

/// raw calendar day difference between two dates
///
/// precondition: `end >= start` — callers segment dates in ascending order
/// before counting, so this is documented rather than checked.
pub fn act_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// 30/360 US (NASD) day count between two dates
///
/// adjustment rule: a start day of 31 counts as 30; an end day of 31 counts
/// as 30 only when the adjusted start day is 30 or more. with `inclusive`
/// both endpoints count, which is the convention for period-length
/// reporting on accrual segments.
///
/// precondition: `end >= start`.
pub fn days_30_360(start: NaiveDate, end: NaiveDate, inclusive: bool) -> i64 {
    let y1 = start.year() as i64;
    let y2 = end.year() as i64;
    let m1 = start.month() as i64;
    let m2 = end.month() as i64;

    let mut d1 = start.day() as i64;
    let mut d2 = end.day() as i64;

    if d1 == 31 {
        d1 = 30;
    }
    if d2 == 31 && d1 >= 30 {
        d2 = 30;
    }

    let days = (y2 - y1) * 360 + (m2 - m1) * 30 + (d2 - d1);
    if inclusive {
        days + 1
    } else {
        days
    }
}

/// year fraction on a 365-day basis
pub fn fraction_365(days: i64) -> Decimal {
    Decimal::from(days) / Decimal::from(365)
}

/// year fraction on a 360-day basis
pub fn fraction_360(days: i64) -> Decimal {
    Decimal::from(days) / Decimal::from(360)
}
