use tracing::warn;

use harambee_store::{Result, Store};
use harambee_types::models::{NewNotification, NotificationKind};

/// Creates one notification per member of the group, skipping
/// `exclude_user_id` (the actor who triggered the event). Best-effort: a
/// failure for one recipient is logged and the loop moves on, so the
/// triggering mutation never rolls back over a missed notification. Returns
/// how many notifications were created.
pub fn notify_group_members(
    store: &dyn Store,
    group_id: i64,
    exclude_user_id: i64,
    title: &str,
    message: &str,
    kind: NotificationKind,
    link_url: Option<&str>,
) -> Result<usize> {
    let members = store.get_memberships_by_group(group_id)?;
    let mut created = 0;
    for member in members {
        if member.user_id == exclude_user_id {
            continue;
        }
        let result = store.create_notification(NewNotification {
            user_id: member.user_id,
            title: title.to_string(),
            message: message.to_string(),
            kind,
            link_url: link_url.map(str::to_string),
        });
        match result {
            Ok(_) => created += 1,
            Err(e) => warn!("failed to notify user {}: {}", member.user_id, e),
        }
    }
    Ok(created)
}
