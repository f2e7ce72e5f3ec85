use harambee_store::{Result, Store};
use harambee_types::models::{Group, Membership};

/// Groups in which the user currently holds an active membership.
/// Memberships pointing at a group that no longer exists are skipped.
pub fn active_groups(store: &dyn Store, user_id: i64) -> Result<Vec<Group>> {
    let mut groups = Vec::new();
    for membership in store.get_memberships_by_user(user_id)? {
        if !membership.is_active {
            continue;
        }
        if let Some(group) = store.get_group(membership.group_id)? {
            groups.push(group);
        }
    }
    Ok(groups)
}

/// The user's active membership in the given group, or `None`. Should the
/// store hold more than one, the one with the lowest id wins.
pub fn active_membership(
    store: &dyn Store,
    user_id: i64,
    group_id: i64,
) -> Result<Option<Membership>> {
    Ok(store
        .get_memberships_by_user(user_id)?
        .into_iter()
        .find(|m| m.group_id == group_id && m.is_active))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use harambee_store::MemStore;
    use harambee_types::models::{ContributionFrequency, NewGroup, NewMembership, Role};

    fn group(store: &MemStore, name: &str) -> Group {
        store
            .create_group(NewGroup {
                name: name.into(),
                description: "test group".into(),
                founded_date: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
                total_value: 0,
                regular_contribution_amount: 1000,
                contribution_frequency: ContributionFrequency::Monthly,
                owner_id: 1,
            })
            .unwrap()
    }

    fn join(store: &MemStore, user_id: i64, group_id: i64, is_active: bool) -> Membership {
        store
            .create_membership(NewMembership {
                user_id,
                group_id,
                role: Role::Member,
                joined_date: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
                total_contributed: 0,
                is_active,
            })
            .unwrap()
    }

    #[test]
    fn inactive_memberships_do_not_surface_groups() {
        let store = MemStore::new();
        let active = group(&store, "Active Group");
        let left = group(&store, "Left Group");
        join(&store, 7, active.id, true);
        join(&store, 7, left.id, false);

        let groups = active_groups(&store, 7).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, active.id);
    }

    #[test]
    fn memberships_to_deleted_groups_are_dropped() {
        let store = MemStore::new();
        let gone = group(&store, "Gone Group");
        join(&store, 7, gone.id, true);
        assert!(store.delete_group(gone.id).unwrap());

        assert!(active_groups(&store, 7).unwrap().is_empty());
    }

    #[test]
    fn lowest_membership_id_wins_on_duplicates() {
        let store = MemStore::new();
        let g = group(&store, "Doubled Group");
        let first = join(&store, 7, g.id, true);
        join(&store, 7, g.id, true);

        let found = active_membership(&store, 7, g.id).unwrap().unwrap();
        assert_eq!(found.id, first.id);
    }

    #[test]
    fn inactive_membership_resolves_to_none() {
        let store = MemStore::new();
        let g = group(&store, "Former Group");
        join(&store, 7, g.id, false);

        assert!(active_membership(&store, 7, g.id).unwrap().is_none());
    }
}
