use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use logsift_types::DateRangePreset;

/// Concrete time window resolved from a preset
///
/// `None` on a side means that side is unbounded and no constraint should
/// be emitted for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

/// Day of week with Monday as day zero
///
/// Weeks start on Monday; a source scheme that numbers Sunday as 0 maps to
/// index 6 here, never to a negative offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum IsoWeekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl IsoWeekday {
    fn of(date: NaiveDate) -> Self {
        match date.weekday() {
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
            chrono::Weekday::Sun => Self::Sunday,
        }
    }

    /// Days elapsed since the most recent Monday (0 on Monday, 6 on Sunday)
    fn days_from_monday(self) -> i64 {
        self as i64
    }
}

/// Resolve a date-range preset against a single reference instant
///
/// `now` is sampled once by the caller and used for every derived value, so
/// both sides of the window come from one consistent snapshot. `date_start`
/// and `date_end` are only consulted for [`DateRangePreset::Custom`]; a
/// bound that is present but unparseable yields no bound for that side.
pub fn resolve(
    preset: DateRangePreset,
    now: NaiveDateTime,
    date_start: Option<&str>,
    date_end: Option<&str>,
) -> ResolvedRange {
    let today = midnight(now.date());
    match preset {
        DateRangePreset::ThisWeek => {
            let days = IsoWeekday::of(now.date()).days_from_monday();
            ResolvedRange {
                start: Some(today - Duration::days(days)),
                end: Some(now),
            }
        }
        DateRangePreset::LastWeek => {
            let days = IsoWeekday::of(now.date()).days_from_monday();
            ResolvedRange {
                start: Some(today - Duration::days(days + 7)),
                end: Some(today - Duration::days(days)),
            }
        }
        DateRangePreset::Last7Days => ResolvedRange {
            start: Some(today - Duration::days(7)),
            end: Some(now),
        },
        DateRangePreset::ThisMonth => ResolvedRange {
            start: first_of_month(now.date()),
            end: Some(now),
        },
        DateRangePreset::LastMonth => ResolvedRange {
            start: first_of_previous_month(now.date()),
            end: first_of_month(now.date()),
        },
        DateRangePreset::Last31Days => ResolvedRange {
            start: Some(today - Duration::days(31)),
            end: Some(now),
        },
        DateRangePreset::Custom => ResolvedRange {
            start: date_start.and_then(parse_bound),
            end: match date_end {
                Some(raw) => parse_bound(raw),
                None => Some(now),
            },
        },
    }
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    NaiveDateTime::new(date, NaiveTime::MIN)
}

fn first_of_month(date: NaiveDate) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).map(midnight)
}

fn first_of_previous_month(date: NaiveDate) -> Option<NaiveDateTime> {
    let (year, month) = if date.month() == 1 {
        (date.year() - 1, 12)
    } else {
        (date.year(), date.month() - 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).map(midnight)
}

/// Permissive parsing of a user-supplied custom bound
///
/// Accepts `YYYY-MM-DD HH:MM:SS`, the `T`-separated variant, and a bare
/// date (taken as midnight). Anything else is treated as absent.
fn parse_bound(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().map(midnight))
}
