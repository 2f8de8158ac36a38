//! Anniversary and milestone dates for a couple.
//!
//! Produces day-count milestones since getting together, upcoming festivals
//! and yearly anniversaries of both meeting and getting together, each with a
//! signed day count relative to "today".
//!
//! "Today" is taken in a single reference timezone so the day count does not
//! depend on where the caller's clock runs. The reference instant is always
//! passed in; nothing here reads the system clock.
//!
//! Adding years to Feb 29 clamps to Feb 28 in non-leap years.

use chrono::{DateTime, Datelike, Days, NaiveDate, Months, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Timezone in which "today" is evaluated.
pub const REFERENCE_TZ: Tz = chrono_tz::Asia::Shanghai;

/// Entries further in the past than this are hidden (festivals, anniversaries).
const RECENT_PAST_DAYS: i64 = 7;

/// Number of yearly anniversaries generated per anchor date.
const ANNIVERSARY_YEARS: u32 = 5;

const MILESTONES: &[(u64, &str)] = &[
    (30, "1 month together"),
    (100, "100 days together"),
    (200, "200 days together"),
    (300, "300 days together"),
    (365, "1 year together"),
    (500, "500 days together"),
    (730, "2 years together"),
    (1000, "1000 days together"),
    (1095, "3 years together"),
];

const FESTIVALS: &[(u32, u32, &str)] = &[
    (1, 1, "New Year's Day"),
    (2, 14, "Valentine's Day"),
    (3, 14, "White Day"),
    (5, 20, "520 Love Day"),
    (12, 24, "Christmas Eve"),
    (12, 25, "Christmas"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnniversaryKind {
    Milestone,
    Festival,
    Anniversary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anniversary {
    /// Stable key, identical across recomputations.
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub kind: AnniversaryKind,
    /// Negative once the date has passed; zero means today.
    pub days_until: i64,
    pub is_past: bool,
}

impl Anniversary {
    fn new(
        id: String,
        title: String,
        date: NaiveDate,
        kind: AnniversaryKind,
        today: NaiveDate,
    ) -> Self {
        let days_until = (date - today).num_days();
        Self {
            id,
            title,
            date,
            kind,
            days_until,
            is_past: days_until < 0,
        }
    }

    fn is_recent_or_upcoming(&self) -> bool {
        self.days_until >= -RECENT_PAST_DAYS
    }
}

/// All significant dates as seen at `now`.
pub fn calculate_anniversaries(
    met: NaiveDate,
    together: NaiveDate,
    now: DateTime<Utc>,
) -> Vec<Anniversary> {
    let today = now.with_timezone(&REFERENCE_TZ).date_naive();
    anniversaries_on(met, together, today)
}

/// All significant dates relative to the calendar day `today`.
///
/// Upcoming entries come first, soonest first, followed by past entries,
/// most recent first.
pub fn anniversaries_on(met: NaiveDate, together: NaiveDate, today: NaiveDate) -> Vec<Anniversary> {
    let mut entries = Vec::new();

    for &(days, title) in MILESTONES {
        if let Some(date) = together.checked_add_days(Days::new(days)) {
            entries.push(Anniversary::new(
                format!("milestone-{}", days),
                title.to_string(),
                date,
                AnniversaryKind::Milestone,
                today,
            ));
        }
    }

    for year in [today.year(), today.year() + 1] {
        for &(month, day, title) in FESTIVALS {
            let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                continue;
            };
            let entry = Anniversary::new(
                format!("festival-{}-{:02}-{:02}", year, month, day),
                title.to_string(),
                date,
                AnniversaryKind::Festival,
                today,
            );
            if entry.is_recent_or_upcoming() {
                entries.push(entry);
            }
        }
    }

    for years in 1..=ANNIVERSARY_YEARS {
        let anchors = [
            ("met", met, "since we met"),
            ("together", together, "together"),
        ];
        for (key, anchor, suffix) in anchors {
            let Some(date) = add_years(anchor, years) else {
                continue;
            };
            let entry = Anniversary::new(
                format!("{}-{}y", key, years),
                format!("{} {}", ordinal_year(years), suffix),
                date,
                AnniversaryKind::Anniversary,
                today,
            );
            if entry.is_recent_or_upcoming() {
                entries.push(entry);
            }
        }
    }

    sort_entries(&mut entries);
    entries
}

/// Calendar year addition; Feb 29 lands on Feb 28 in non-leap years.
pub fn add_years(date: NaiveDate, years: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(years.checked_mul(12)?))
}

fn sort_entries(entries: &mut [Anniversary]) {
    entries.sort_by(|a, b| match (a.is_past, b.is_past) {
        (false, false) => a.days_until.cmp(&b.days_until),
        (true, true) => b.days_until.cmp(&a.days_until),
        (false, true) => std::cmp::Ordering::Less,
        (true, false) => std::cmp::Ordering::Greater,
    });
}

fn ordinal_year(years: u32) -> String {
    let suffix = match (years % 10, years % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{} anniversary", years, suffix)
}
