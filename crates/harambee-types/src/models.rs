use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// -- Enums --

/// Membership role within a group. Authorization works on explicit per-action
/// role sets (see harambee-core); roles carry no hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Treasurer,
    Secretary,
    Member,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContributionFrequency {
    Weekly,
    Biweekly,
    Monthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Contribution,
    Loan,
    Investment,
    Dividend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Mpesa,
    Bank,
    Cash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentStatus {
    Active,
    Matured,
    Sold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Payment,
    Meeting,
    System,
}

// -- Entities --

/// `password_hash` never leaves the server: `User` is deliberately not
/// serializable, the API layer goes through `api::UserResponse` instead.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub profile_picture: Option<String>,
    pub preferred_language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub founded_date: DateTime<Utc>,
    /// Ledger total for the whole group, updated by group admins rather than
    /// derived from transactions.
    pub total_value: i64,
    pub regular_contribution_amount: i64,
    pub contribution_frequency: ContributionFrequency,
    pub owner_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: i64,
    pub user_id: i64,
    pub group_id: i64,
    pub role: Role,
    pub joined_date: DateTime<Utc>,
    /// Running sum of the member's completed contributions in this group,
    /// maintained by `Store::record_transaction`.
    pub total_contributed: i64,
    /// Soft removal flag; inactive memberships are skipped by the resolver
    /// and by the access policy.
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub group_id: i64,
    pub user_id: i64,
    pub amount: i64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    pub date: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: i64,
    pub group_id: i64,
    pub title: String,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub is_virtual: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_by: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: i64,
    pub group_id: i64,
    pub name: String,
    /// Free-form category. The dashboard roll-up recognizes "real estate",
    /// "stocks", "bonds" and "mutual funds"; anything else counts as others.
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_return_rate: Option<String>,
    pub status: InvestmentStatus,
    pub current_value: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
}

// -- Insert payloads (the store assigns the id) --

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub profile_picture: Option<String>,
    pub preferred_language: String,
}

#[derive(Debug, Clone)]
pub struct NewGroup {
    pub name: String,
    pub description: String,
    pub founded_date: DateTime<Utc>,
    pub total_value: i64,
    pub regular_contribution_amount: i64,
    pub contribution_frequency: ContributionFrequency,
    pub owner_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewMembership {
    pub user_id: i64,
    pub group_id: i64,
    pub role: Role,
    pub joined_date: DateTime<Utc>,
    pub total_contributed: i64,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub group_id: i64,
    pub user_id: i64,
    pub amount: i64,
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    pub date: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub description: Option<String>,
    pub reference_number: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewMeeting {
    pub group_id: i64,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    pub is_virtual: bool,
    pub meeting_link: Option<String>,
    pub description: Option<String>,
    pub created_by: i64,
}

#[derive(Debug, Clone)]
pub struct NewInvestment {
    pub group_id: i64,
    pub name: String,
    pub kind: String,
    pub amount: i64,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub expected_return_rate: Option<String>,
    pub status: InvestmentStatus,
    pub current_value: i64,
}

/// `is_read` starts false and `created_at` is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: i64,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub link_url: Option<String>,
}

// -- Shallow update patches (None leaves the field untouched) --

#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub profile_picture: Option<String>,
    pub preferred_language: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct GroupPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub founded_date: Option<DateTime<Utc>>,
    pub total_value: Option<i64>,
    pub regular_contribution_amount: Option<i64>,
    pub contribution_frequency: Option<ContributionFrequency>,
}

#[derive(Debug, Clone, Default)]
pub struct MembershipPatch {
    pub role: Option<Role>,
    pub total_contributed: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub status: Option<TransactionStatus>,
    pub description: Option<String>,
    pub reference_number: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MeetingPatch {
    pub title: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub is_virtual: Option<bool>,
    pub meeting_link: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct InvestmentPatch {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub amount: Option<i64>,
    pub description: Option<String>,
    pub expected_return_rate: Option<String>,
    pub status: Option<InvestmentStatus>,
    pub current_value: Option<i64>,
}
