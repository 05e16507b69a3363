use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Schedule classes supported by recurring expense templates.
///
/// The serialized names match the stored wire format (`"bi-weekly"` etc.).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    Daily,
    Weekly,
    BiWeekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    /// Returns the occurrence that follows `from` on this schedule.
    ///
    /// Month-based steps use calendar arithmetic, not fixed day counts: the
    /// day-of-month is preserved and clamped to the last day of the target
    /// month when it is shorter (Jan 31 + 1 month = Feb 29 in a leap year).
    pub fn next_date(self, from: NaiveDate) -> NaiveDate {
        match self {
            Frequency::Daily => from + Duration::days(1),
            Frequency::Weekly => from + Duration::days(7),
            Frequency::BiWeekly => from + Duration::days(14),
            Frequency::Monthly => shift_months(from, 1),
            Frequency::Quarterly => shift_months(from, 3),
            Frequency::Yearly => shift_years(from, 1),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::BiWeekly => "Bi-weekly",
            Frequency::Monthly => "Monthly",
            Frequency::Quarterly => "Quarterly",
            Frequency::Yearly => "Yearly",
        }
    }
}

fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let mut year = date.year();
    let mut month = date.month() as i32 + months;
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    let day = date.day().min(days_in_month(year, month as u32));
    NaiveDate::from_ymd_opt(year, month as u32, day).unwrap_or(date)
}

fn shift_years(date: NaiveDate, years: i32) -> NaiveDate {
    let year = date.year() + years;
    let day = date.day().min(days_in_month(year, date.month()));
    NaiveDate::from_ymd_opt(year, date.month(), day).unwrap_or(date)
}

/// Number of days in the given calendar month.
pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first_of_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap_or_default());
    (first_of_next - Duration::days(1)).day()
}

/// Last calendar day of the given month, for inclusive date windows.
pub(crate) fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, days_in_month(year, month))
}
