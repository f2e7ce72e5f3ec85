pub mod mem;

use std::sync::Arc;

use thiserror::Error;

use harambee_types::models::{
    Group, GroupPatch, Investment, InvestmentPatch, Meeting, MeetingPatch, Membership,
    MembershipPatch, NewGroup, NewInvestment, NewMeeting, NewMembership, NewNotification,
    NewTransaction, NewUser, Notification, Transaction, TransactionPatch, User, UserPatch,
};

pub use mem::MemStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store lock poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// CRUD contract over the seven entity tables.
///
/// `create_*` assigns sequential ids per entity starting at 1, never reused
/// after a delete, and enforces no uniqueness (username/email checks belong
/// to the caller). `update_*` is a shallow merge: `None` fields on the patch
/// leave the record untouched. Lookups on unknown ids yield `None`/`false`
/// rather than an error; `Err` is reserved for backend failures. Foreign-key
/// scans return records in no guaranteed order.
pub trait Store: Send + Sync {
    // -- Users --
    fn get_user(&self, id: i64) -> Result<Option<User>>;
    fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    fn create_user(&self, new: NewUser) -> Result<User>;
    fn update_user(&self, id: i64, patch: UserPatch) -> Result<Option<User>>;

    // -- Groups --
    fn get_group(&self, id: i64) -> Result<Option<Group>>;
    fn create_group(&self, new: NewGroup) -> Result<Group>;
    fn update_group(&self, id: i64, patch: GroupPatch) -> Result<Option<Group>>;
    fn delete_group(&self, id: i64) -> Result<bool>;

    // -- Memberships --
    fn get_membership(&self, id: i64) -> Result<Option<Membership>>;
    fn get_memberships_by_user(&self, user_id: i64) -> Result<Vec<Membership>>;
    fn get_memberships_by_group(&self, group_id: i64) -> Result<Vec<Membership>>;
    fn create_membership(&self, new: NewMembership) -> Result<Membership>;
    fn update_membership(&self, id: i64, patch: MembershipPatch) -> Result<Option<Membership>>;
    fn delete_membership(&self, id: i64) -> Result<bool>;

    // -- Transactions --
    fn get_transaction(&self, id: i64) -> Result<Option<Transaction>>;
    fn get_transactions_by_user(&self, user_id: i64) -> Result<Vec<Transaction>>;
    fn get_transactions_by_group(&self, group_id: i64) -> Result<Vec<Transaction>>;
    fn create_transaction(&self, new: NewTransaction) -> Result<Transaction>;
    /// Creates the transaction and, when it is a completed contribution,
    /// increments `total_contributed` on the contributor's first active
    /// membership in the group within the same atomic step.
    fn record_transaction(&self, new: NewTransaction) -> Result<Transaction>;
    fn update_transaction(&self, id: i64, patch: TransactionPatch) -> Result<Option<Transaction>>;

    // -- Meetings --
    fn get_meeting(&self, id: i64) -> Result<Option<Meeting>>;
    fn get_meetings_by_group(&self, group_id: i64) -> Result<Vec<Meeting>>;
    fn create_meeting(&self, new: NewMeeting) -> Result<Meeting>;
    fn update_meeting(&self, id: i64, patch: MeetingPatch) -> Result<Option<Meeting>>;
    fn delete_meeting(&self, id: i64) -> Result<bool>;

    // -- Investments --
    fn get_investment(&self, id: i64) -> Result<Option<Investment>>;
    fn get_investments_by_group(&self, group_id: i64) -> Result<Vec<Investment>>;
    fn create_investment(&self, new: NewInvestment) -> Result<Investment>;
    fn update_investment(&self, id: i64, patch: InvestmentPatch) -> Result<Option<Investment>>;
    fn delete_investment(&self, id: i64) -> Result<bool>;

    // -- Notifications --
    fn get_notification(&self, id: i64) -> Result<Option<Notification>>;
    fn get_notifications_by_user(&self, user_id: i64) -> Result<Vec<Notification>>;
    fn create_notification(&self, new: NewNotification) -> Result<Notification>;
    fn mark_notification_read(&self, id: i64) -> Result<bool>;
    fn delete_notification(&self, id: i64) -> Result<bool>;
}

pub type SharedStore = Arc<dyn Store>;
