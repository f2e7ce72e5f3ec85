use chrono::{DateTime, Duration, Months, Utc};

use harambee_types::models::ContributionFrequency;

/// Near-term window a schedule entry lands in on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Today,
    ThisWeek,
    NextWeek,
}

/// Classifies a date against `now` by calendar-day distance: the same
/// calendar day is `Today`, 1 to 7 days out is `ThisWeek`, 8 to 14 days out
/// is `NextWeek`, and anything further is dropped. Past dates count as
/// `ThisWeek` so overdue items stay visible.
pub fn bucket(now: DateTime<Utc>, date: DateTime<Utc>) -> Option<Bucket> {
    let days = (date.date_naive() - now.date_naive()).num_days();
    if days == 0 {
        Some(Bucket::Today)
    } else if days <= 7 {
        Some(Bucket::ThisWeek)
    } else if days <= 14 {
        Some(Bucket::NextWeek)
    } else {
        None
    }
}

/// Projects the next due date from the most recent completed contribution.
/// Monthly steps clamp to the end of shorter months (Jan 31 -> Feb 28).
pub fn next_contribution_date(
    last: DateTime<Utc>,
    frequency: ContributionFrequency,
) -> DateTime<Utc> {
    match frequency {
        ContributionFrequency::Weekly => last + Duration::days(7),
        ContributionFrequency::Biweekly => last + Duration::days(14),
        ContributionFrequency::Monthly => last.checked_add_months(Months::new(1)).unwrap_or(last),
    }
}
