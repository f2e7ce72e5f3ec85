use chrono::{DateTime, Utc};
use serde_json::json;

use harambee_store::{Result, Store};
use harambee_types::api::{
    ActivityEntry, Dashboard, DashboardStats, InvestmentBreakdown, InvestmentSummary,
    ScheduleEntry, ScheduleEntryKind, UpcomingSchedule,
};
use harambee_types::models::{InvestmentStatus, TransactionKind, TransactionStatus};

use crate::membership;
use crate::schedule::{self, Bucket};

/// Aggregates everything the dashboard screen shows for one user: group
/// list, headline stats, recent activity, the near-term schedule, and the
/// investment roll-up. Read-only and deterministic for a fixed store state
/// and `now`.
pub fn build_dashboard(store: &dyn Store, user_id: i64, now: DateTime<Utc>) -> Result<Dashboard> {
    let groups = membership::active_groups(store, user_id)?;

    let transactions = store.get_transactions_by_user(user_id)?;
    let total_contributions: i64 = transactions
        .iter()
        .filter(|tx| {
            tx.kind == TransactionKind::Contribution && tx.status == TransactionStatus::Completed
        })
        .map(|tx| tx.amount)
        .sum();

    let mut active_investments_count = 0;
    let mut breakdown = InvestmentBreakdown::default();
    let mut upcoming_meetings = Vec::new();
    for group in &groups {
        for investment in store.get_investments_by_group(group.id)? {
            if investment.status != InvestmentStatus::Active {
                continue;
            }
            active_investments_count += 1;
            match investment.kind.as_str() {
                "real estate" => breakdown.real_estate += investment.current_value,
                "bonds" => breakdown.bonds += investment.current_value,
                "stocks" => breakdown.stocks += investment.current_value,
                "mutual funds" => breakdown.mutual_funds += investment.current_value,
                _ => breakdown.others += investment.current_value,
            }
        }
        for meeting in store.get_meetings_by_group(group.id)? {
            if meeting.date > now {
                upcoming_meetings.push((meeting, group));
            }
        }
    }

    let mut recent = transactions;
    recent.sort_by_key(|tx| std::cmp::Reverse(tx.date));
    recent.truncate(5);
    let recent_activities = recent
        .into_iter()
        .map(|tx| {
            let group_name = groups
                .iter()
                .find(|g| g.id == tx.group_id)
                .map(|g| g.name.clone());
            ActivityEntry {
                id: tx.id,
                kind: tx.kind,
                amount: tx.amount,
                status: tx.status,
                date: tx.date,
                payment_method: tx.payment_method,
                group_id: tx.group_id,
                group_name,
            }
        })
        .collect();

    // Meetings go in first so the later stable sort keeps them ahead of
    // contributions that fall on the same date.
    let mut upcoming_schedule = UpcomingSchedule::default();
    for (meeting, group) in &upcoming_meetings {
        let bucket = match schedule::bucket(now, meeting.date) {
            Some(bucket) => bucket,
            None => continue,
        };
        push_entry(
            &mut upcoming_schedule,
            bucket,
            ScheduleEntry {
                kind: ScheduleEntryKind::Meeting,
                group_id: group.id,
                group_name: Some(group.name.clone()),
                title: meeting.title.clone(),
                date: meeting.date,
                amount: None,
                details: json!({
                    "location": meeting.location,
                    "isVirtual": meeting.is_virtual,
                    "meetingLink": meeting.meeting_link,
                }),
            },
        );
    }
    let upcoming_meetings_count = upcoming_meetings.len();

    for group in &groups {
        let last_contribution = store
            .get_transactions_by_group(group.id)?
            .into_iter()
            .filter(|tx| {
                tx.user_id == user_id
                    && tx.kind == TransactionKind::Contribution
                    && tx.status == TransactionStatus::Completed
            })
            .max_by_key(|tx| tx.date);
        let due = match last_contribution {
            Some(tx) => schedule::next_contribution_date(tx.date, group.contribution_frequency),
            None => now,
        };
        let bucket = match schedule::bucket(now, due) {
            Some(bucket) => bucket,
            None => continue,
        };
        push_entry(
            &mut upcoming_schedule,
            bucket,
            ScheduleEntry {
                kind: ScheduleEntryKind::Contribution,
                group_id: group.id,
                group_name: Some(group.name.clone()),
                title: format!("Contribution Due: {}", group.name),
                date: due,
                amount: Some(group.regular_contribution_amount),
                details: json!({ "amount": group.regular_contribution_amount }),
            },
        );
    }

    upcoming_schedule.today.sort_by_key(|e| e.date);
    upcoming_schedule.this_week.sort_by_key(|e| e.date);
    upcoming_schedule.next_week.sort_by_key(|e| e.date);

    let total = breakdown.real_estate
        + breakdown.bonds
        + breakdown.stocks
        + breakdown.mutual_funds
        + breakdown.others;

    Ok(Dashboard {
        stats: DashboardStats {
            active_groups_count: groups.len(),
            total_contributions,
            active_investments_count,
            upcoming_meetings_count,
        },
        groups,
        recent_activities,
        upcoming_schedule,
        investment_summary: InvestmentSummary { total, breakdown },
    })
}

fn push_entry(schedule: &mut UpcomingSchedule, bucket: Bucket, entry: ScheduleEntry) {
    match bucket {
        Bucket::Today => schedule.today.push(entry),
        Bucket::ThisWeek => schedule.this_week.push(entry),
        Bucket::NextWeek => schedule.next_week.push(entry),
    }
}
