use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use harambee_types::models::{
    Group, GroupPatch, Investment, InvestmentPatch, Meeting, MeetingPatch, Membership,
    MembershipPatch, NewGroup, NewInvestment, NewMeeting, NewMembership, NewNotification,
    NewTransaction, NewUser, Notification, Transaction, TransactionKind, TransactionPatch,
    TransactionStatus, User, UserPatch,
};

use crate::{Result, Store, StoreError};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    groups: BTreeMap<i64, Group>,
    memberships: BTreeMap<i64, Membership>,
    transactions: BTreeMap<i64, Transaction>,
    meetings: BTreeMap<i64, Meeting>,
    investments: BTreeMap<i64, Investment>,
    notifications: BTreeMap<i64, Notification>,
    next_id: IdCounters,
}

struct IdCounters {
    users: i64,
    groups: i64,
    memberships: i64,
    transactions: i64,
    meetings: i64,
    investments: i64,
    notifications: i64,
}

impl Default for IdCounters {
    fn default() -> Self {
        Self {
            users: 1,
            groups: 1,
            memberships: 1,
            transactions: 1,
            meetings: 1,
            investments: 1,
            notifications: 1,
        }
    }
}

/// In-memory `Store` backend. All seven tables sit behind one `RwLock`, so
/// mutations are serialized and readers always observe a fully-applied state.
#[derive(Default)]
pub struct MemStore {
    tables: RwLock<Tables>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| StoreError::LockPoisoned)
    }
}

fn insert_transaction(t: &mut Tables, new: NewTransaction) -> Transaction {
    let id = t.next_id.transactions;
    t.next_id.transactions += 1;
    let tx = Transaction {
        id,
        group_id: new.group_id,
        user_id: new.user_id,
        amount: new.amount,
        kind: new.kind,
        status: new.status,
        date: new.date,
        payment_method: new.payment_method,
        description: new.description,
        reference_number: new.reference_number,
    };
    t.transactions.insert(id, tx.clone());
    tx
}

impl Store for MemStore {
    // -- Users --

    fn get_user(&self, id: i64) -> Result<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    fn create_user(&self, new: NewUser) -> Result<User> {
        let mut t = self.write()?;
        let id = t.next_id.users;
        t.next_id.users += 1;
        let user = User {
            id,
            username: new.username,
            password_hash: new.password_hash,
            email: new.email,
            first_name: new.first_name,
            last_name: new.last_name,
            phone_number: new.phone_number,
            profile_picture: new.profile_picture,
            preferred_language: new.preferred_language,
        };
        t.users.insert(id, user.clone());
        Ok(user)
    }

    fn update_user(&self, id: i64, patch: UserPatch) -> Result<Option<User>> {
        let mut t = self.write()?;
        let user = match t.users.get_mut(&id) {
            Some(user) => user,
            None => return Ok(None),
        };
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(first_name) = patch.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            user.last_name = last_name;
        }
        if let Some(phone_number) = patch.phone_number {
            user.phone_number = phone_number;
        }
        if let Some(profile_picture) = patch.profile_picture {
            user.profile_picture = Some(profile_picture);
        }
        if let Some(preferred_language) = patch.preferred_language {
            user.preferred_language = preferred_language;
        }
        Ok(Some(user.clone()))
    }

    // -- Groups --

    fn get_group(&self, id: i64) -> Result<Option<Group>> {
        Ok(self.read()?.groups.get(&id).cloned())
    }

    fn create_group(&self, new: NewGroup) -> Result<Group> {
        let mut t = self.write()?;
        let id = t.next_id.groups;
        t.next_id.groups += 1;
        let group = Group {
            id,
            name: new.name,
            description: new.description,
            founded_date: new.founded_date,
            total_value: new.total_value,
            regular_contribution_amount: new.regular_contribution_amount,
            contribution_frequency: new.contribution_frequency,
            owner_id: new.owner_id,
        };
        t.groups.insert(id, group.clone());
        Ok(group)
    }

    fn update_group(&self, id: i64, patch: GroupPatch) -> Result<Option<Group>> {
        let mut t = self.write()?;
        let group = match t.groups.get_mut(&id) {
            Some(group) => group,
            None => return Ok(None),
        };
        if let Some(name) = patch.name {
            group.name = name;
        }
        if let Some(description) = patch.description {
            group.description = description;
        }
        if let Some(founded_date) = patch.founded_date {
            group.founded_date = founded_date;
        }
        if let Some(total_value) = patch.total_value {
            group.total_value = total_value;
        }
        if let Some(amount) = patch.regular_contribution_amount {
            group.regular_contribution_amount = amount;
        }
        if let Some(frequency) = patch.contribution_frequency {
            group.contribution_frequency = frequency;
        }
        Ok(Some(group.clone()))
    }

    fn delete_group(&self, id: i64) -> Result<bool> {
        Ok(self.write()?.groups.remove(&id).is_some())
    }

    // -- Memberships --

    fn get_membership(&self, id: i64) -> Result<Option<Membership>> {
        Ok(self.read()?.memberships.get(&id).cloned())
    }

    fn get_memberships_by_user(&self, user_id: i64) -> Result<Vec<Membership>> {
        Ok(self
            .read()?
            .memberships
            .values()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    fn get_memberships_by_group(&self, group_id: i64) -> Result<Vec<Membership>> {
        Ok(self
            .read()?
            .memberships
            .values()
            .filter(|m| m.group_id == group_id)
            .cloned()
            .collect())
    }

    fn create_membership(&self, new: NewMembership) -> Result<Membership> {
        let mut t = self.write()?;
        let id = t.next_id.memberships;
        t.next_id.memberships += 1;
        let membership = Membership {
            id,
            user_id: new.user_id,
            group_id: new.group_id,
            role: new.role,
            joined_date: new.joined_date,
            total_contributed: new.total_contributed,
            is_active: new.is_active,
        };
        t.memberships.insert(id, membership.clone());
        Ok(membership)
    }

    fn update_membership(&self, id: i64, patch: MembershipPatch) -> Result<Option<Membership>> {
        let mut t = self.write()?;
        let membership = match t.memberships.get_mut(&id) {
            Some(membership) => membership,
            None => return Ok(None),
        };
        if let Some(role) = patch.role {
            membership.role = role;
        }
        if let Some(total_contributed) = patch.total_contributed {
            membership.total_contributed = total_contributed;
        }
        if let Some(is_active) = patch.is_active {
            membership.is_active = is_active;
        }
        Ok(Some(membership.clone()))
    }

    fn delete_membership(&self, id: i64) -> Result<bool> {
        Ok(self.write()?.memberships.remove(&id).is_some())
    }

    // -- Transactions --

    fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        Ok(self.read()?.transactions.get(&id).cloned())
    }

    fn get_transactions_by_user(&self, user_id: i64) -> Result<Vec<Transaction>> {
        Ok(self
            .read()?
            .transactions
            .values()
            .filter(|tx| tx.user_id == user_id)
            .cloned()
            .collect())
    }

    fn get_transactions_by_group(&self, group_id: i64) -> Result<Vec<Transaction>> {
        Ok(self
            .read()?
            .transactions
            .values()
            .filter(|tx| tx.group_id == group_id)
            .cloned()
            .collect())
    }

    fn create_transaction(&self, new: NewTransaction) -> Result<Transaction> {
        let mut t = self.write()?;
        Ok(insert_transaction(&mut t, new))
    }

    fn record_transaction(&self, new: NewTransaction) -> Result<Transaction> {
        let mut t = self.write()?;
        let tx = insert_transaction(&mut t, new);

        // Completed contributions accrue onto the contributor's first active
        // membership while the write lock is still held.
        if tx.kind == TransactionKind::Contribution && tx.status == TransactionStatus::Completed {
            let member_id = t
                .memberships
                .values()
                .find(|m| m.user_id == tx.user_id && m.group_id == tx.group_id && m.is_active)
                .map(|m| m.id);
            if let Some(member_id) = member_id {
                if let Some(member) = t.memberships.get_mut(&member_id) {
                    member.total_contributed += tx.amount;
                }
            }
        }

        Ok(tx)
    }

    fn update_transaction(&self, id: i64, patch: TransactionPatch) -> Result<Option<Transaction>> {
        let mut t = self.write()?;
        let tx = match t.transactions.get_mut(&id) {
            Some(tx) => tx,
            None => return Ok(None),
        };
        if let Some(status) = patch.status {
            tx.status = status;
        }
        if let Some(description) = patch.description {
            tx.description = Some(description);
        }
        if let Some(reference_number) = patch.reference_number {
            tx.reference_number = Some(reference_number);
        }
        Ok(Some(tx.clone()))
    }

    // -- Meetings --

    fn get_meeting(&self, id: i64) -> Result<Option<Meeting>> {
        Ok(self.read()?.meetings.get(&id).cloned())
    }

    fn get_meetings_by_group(&self, group_id: i64) -> Result<Vec<Meeting>> {
        Ok(self
            .read()?
            .meetings
            .values()
            .filter(|m| m.group_id == group_id)
            .cloned()
            .collect())
    }

    fn create_meeting(&self, new: NewMeeting) -> Result<Meeting> {
        let mut t = self.write()?;
        let id = t.next_id.meetings;
        t.next_id.meetings += 1;
        let meeting = Meeting {
            id,
            group_id: new.group_id,
            title: new.title,
            date: new.date,
            location: new.location,
            is_virtual: new.is_virtual,
            meeting_link: new.meeting_link,
            description: new.description,
            created_by: new.created_by,
        };
        t.meetings.insert(id, meeting.clone());
        Ok(meeting)
    }

    fn update_meeting(&self, id: i64, patch: MeetingPatch) -> Result<Option<Meeting>> {
        let mut t = self.write()?;
        let meeting = match t.meetings.get_mut(&id) {
            Some(meeting) => meeting,
            None => return Ok(None),
        };
        if let Some(title) = patch.title {
            meeting.title = title;
        }
        if let Some(date) = patch.date {
            meeting.date = date;
        }
        if let Some(location) = patch.location {
            meeting.location = Some(location);
        }
        if let Some(is_virtual) = patch.is_virtual {
            meeting.is_virtual = is_virtual;
        }
        if let Some(meeting_link) = patch.meeting_link {
            meeting.meeting_link = Some(meeting_link);
        }
        if let Some(description) = patch.description {
            meeting.description = Some(description);
        }
        Ok(Some(meeting.clone()))
    }

    fn delete_meeting(&self, id: i64) -> Result<bool> {
        Ok(self.write()?.meetings.remove(&id).is_some())
    }

    // -- Investments --

    fn get_investment(&self, id: i64) -> Result<Option<Investment>> {
        Ok(self.read()?.investments.get(&id).cloned())
    }

    fn get_investments_by_group(&self, group_id: i64) -> Result<Vec<Investment>> {
        Ok(self
            .read()?
            .investments
            .values()
            .filter(|i| i.group_id == group_id)
            .cloned()
            .collect())
    }

    fn create_investment(&self, new: NewInvestment) -> Result<Investment> {
        let mut t = self.write()?;
        let id = t.next_id.investments;
        t.next_id.investments += 1;
        let investment = Investment {
            id,
            group_id: new.group_id,
            name: new.name,
            kind: new.kind,
            amount: new.amount,
            description: new.description,
            start_date: new.start_date,
            expected_return_rate: new.expected_return_rate,
            status: new.status,
            current_value: new.current_value,
        };
        t.investments.insert(id, investment.clone());
        Ok(investment)
    }

    fn update_investment(&self, id: i64, patch: InvestmentPatch) -> Result<Option<Investment>> {
        let mut t = self.write()?;
        let investment = match t.investments.get_mut(&id) {
            Some(investment) => investment,
            None => return Ok(None),
        };
        if let Some(name) = patch.name {
            investment.name = name;
        }
        if let Some(kind) = patch.kind {
            investment.kind = kind;
        }
        if let Some(amount) = patch.amount {
            investment.amount = amount;
        }
        if let Some(description) = patch.description {
            investment.description = Some(description);
        }
        if let Some(rate) = patch.expected_return_rate {
            investment.expected_return_rate = Some(rate);
        }
        if let Some(status) = patch.status {
            investment.status = status;
        }
        if let Some(current_value) = patch.current_value {
            investment.current_value = current_value;
        }
        Ok(Some(investment.clone()))
    }

    fn delete_investment(&self, id: i64) -> Result<bool> {
        Ok(self.write()?.investments.remove(&id).is_some())
    }

    // -- Notifications --

    fn get_notification(&self, id: i64) -> Result<Option<Notification>> {
        Ok(self.read()?.notifications.get(&id).cloned())
    }

    fn get_notifications_by_user(&self, user_id: i64) -> Result<Vec<Notification>> {
        Ok(self
            .read()?
            .notifications
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect())
    }

    fn create_notification(&self, new: NewNotification) -> Result<Notification> {
        let mut t = self.write()?;
        let id = t.next_id.notifications;
        t.next_id.notifications += 1;
        let notification = Notification {
            id,
            user_id: new.user_id,
            title: new.title,
            message: new.message,
            kind: new.kind,
            is_read: false,
            created_at: Utc::now(),
            link_url: new.link_url,
        };
        t.notifications.insert(id, notification.clone());
        Ok(notification)
    }

    fn mark_notification_read(&self, id: i64) -> Result<bool> {
        let mut t = self.write()?;
        match t.notifications.get_mut(&id) {
            Some(n) => {
                n.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_notification(&self, id: i64) -> Result<bool> {
        Ok(self.write()?.notifications.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use harambee_types::models::{ContributionFrequency, NotificationKind, PaymentMethod, Role};

    fn sample_user(n: u32) -> NewUser {
        NewUser {
            username: format!("user{n}"),
            password_hash: "hash".into(),
            email: format!("user{n}@example.com"),
            first_name: "Test".into(),
            last_name: "User".into(),
            phone_number: "+254700000000".into(),
            profile_picture: None,
            preferred_language: "en".into(),
        }
    }

    fn sample_group(owner_id: i64) -> NewGroup {
        NewGroup {
            name: "Umoja Investment Group".into(),
            description: "Real estate investments".into(),
            founded_date: Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap(),
            total_value: 0,
            regular_contribution_amount: 5000,
            contribution_frequency: ContributionFrequency::Monthly,
            owner_id,
        }
    }

    fn sample_membership(user_id: i64, group_id: i64) -> NewMembership {
        NewMembership {
            user_id,
            group_id,
            role: Role::Admin,
            joined_date: Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap(),
            total_contributed: 0,
            is_active: true,
        }
    }

    fn contribution(
        user_id: i64,
        group_id: i64,
        amount: i64,
        status: TransactionStatus,
    ) -> NewTransaction {
        NewTransaction {
            group_id,
            user_id,
            amount,
            kind: TransactionKind::Contribution,
            status,
            date: Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap(),
            payment_method: PaymentMethod::Mpesa,
            description: None,
            reference_number: None,
        }
    }

    #[test]
    fn ids_are_sequential_from_one_and_never_reused() {
        let store = MemStore::new();
        let owner = store.create_user(sample_user(1)).unwrap();
        assert_eq!(owner.id, 1);

        let g1 = store.create_group(sample_group(owner.id)).unwrap();
        let g2 = store.create_group(sample_group(owner.id)).unwrap();
        assert_eq!((g1.id, g2.id), (1, 2));

        assert!(store.delete_group(g2.id).unwrap());
        let g3 = store.create_group(sample_group(owner.id)).unwrap();
        assert_eq!(g3.id, 3);
    }

    #[test]
    fn unknown_ids_yield_none_or_false() {
        let store = MemStore::new();
        assert!(store.get_group(42).unwrap().is_none());
        assert!(!store.delete_meeting(42).unwrap());
        assert!(!store.mark_notification_read(42).unwrap());
        assert!(
            store
                .update_membership(42, MembershipPatch::default())
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn update_is_a_shallow_merge() {
        let store = MemStore::new();
        let owner = store.create_user(sample_user(1)).unwrap();
        let group = store.create_group(sample_group(owner.id)).unwrap();

        let updated = store
            .update_group(
                group.id,
                GroupPatch {
                    total_value: Some(250_000),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.total_value, 250_000);
        assert_eq!(updated.name, group.name);
        assert_eq!(
            updated.regular_contribution_amount,
            group.regular_contribution_amount
        );
    }

    #[test]
    fn lookup_helpers_match_username_and_email() {
        let store = MemStore::new();
        store.create_user(sample_user(1)).unwrap();
        let u2 = store.create_user(sample_user(2)).unwrap();

        assert_eq!(
            store.get_user_by_username("user2").unwrap().unwrap().id,
            u2.id
        );
        assert_eq!(
            store
                .get_user_by_email("user2@example.com")
                .unwrap()
                .unwrap()
                .id,
            u2.id
        );
        assert!(store.get_user_by_username("nobody").unwrap().is_none());
    }

    #[test]
    fn record_transaction_accrues_completed_contributions_only() {
        let store = MemStore::new();
        let user = store.create_user(sample_user(1)).unwrap();
        let group = store.create_group(sample_group(user.id)).unwrap();
        let member = store
            .create_membership(sample_membership(user.id, group.id))
            .unwrap();

        store
            .record_transaction(contribution(user.id, group.id, 5000, TransactionStatus::Completed))
            .unwrap();
        store
            .record_transaction(contribution(user.id, group.id, 3000, TransactionStatus::Completed))
            .unwrap();
        store
            .record_transaction(contribution(user.id, group.id, 9999, TransactionStatus::Pending))
            .unwrap();

        let member = store.get_membership(member.id).unwrap().unwrap();
        assert_eq!(member.total_contributed, 8000);
    }

    #[test]
    fn accrual_targets_the_first_active_membership() {
        let store = MemStore::new();
        let user = store.create_user(sample_user(1)).unwrap();
        let group = store.create_group(sample_group(user.id)).unwrap();

        let mut first = sample_membership(user.id, group.id);
        first.is_active = false;
        let inactive = store.create_membership(first).unwrap();
        let active = store
            .create_membership(sample_membership(user.id, group.id))
            .unwrap();

        store
            .record_transaction(contribution(user.id, group.id, 4000, TransactionStatus::Completed))
            .unwrap();

        assert_eq!(
            store
                .get_membership(inactive.id)
                .unwrap()
                .unwrap()
                .total_contributed,
            0
        );
        assert_eq!(
            store
                .get_membership(active.id)
                .unwrap()
                .unwrap()
                .total_contributed,
            4000
        );
    }

    #[test]
    fn plain_create_transaction_skips_accrual() {
        let store = MemStore::new();
        let user = store.create_user(sample_user(1)).unwrap();
        let group = store.create_group(sample_group(user.id)).unwrap();
        let member = store
            .create_membership(sample_membership(user.id, group.id))
            .unwrap();

        store
            .create_transaction(contribution(user.id, group.id, 5000, TransactionStatus::Completed))
            .unwrap();

        let member = store.get_membership(member.id).unwrap().unwrap();
        assert_eq!(member.total_contributed, 0);
    }

    #[test]
    fn transaction_status_can_change_after_creation() {
        let store = MemStore::new();
        let user = store.create_user(sample_user(1)).unwrap();
        let group = store.create_group(sample_group(user.id)).unwrap();
        let tx = store
            .create_transaction(contribution(user.id, group.id, 5000, TransactionStatus::Pending))
            .unwrap();

        let updated = store
            .update_transaction(
                tx.id,
                TransactionPatch {
                    status: Some(TransactionStatus::Completed),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.status, TransactionStatus::Completed);
        assert_eq!(updated.amount, 5000);
    }

    #[test]
    fn notifications_start_unread_and_flip_once_marked() {
        let store = MemStore::new();
        let user = store.create_user(sample_user(1)).unwrap();

        let n = store
            .create_notification(NewNotification {
                user_id: user.id,
                title: "Payment Reminder".into(),
                message: "Your contribution is due today.".into(),
                kind: NotificationKind::Payment,
                link_url: Some("/groups/1".into()),
            })
            .unwrap();
        assert!(!n.is_read);

        assert!(store.mark_notification_read(n.id).unwrap());
        let n = store.get_notification(n.id).unwrap().unwrap();
        assert!(n.is_read);

        let for_user = store.get_notifications_by_user(user.id).unwrap();
        assert_eq!(for_user.len(), 1);
        assert!(store.get_notifications_by_user(user.id + 1).unwrap().is_empty());
    }
}
