use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{
    ContributionFrequency, Group, InvestmentStatus, Meeting, PaymentMethod, Role, TransactionKind,
    TransactionStatus, User,
};

// -- JWT Claims --

/// JWT claims shared by the auth handlers and the bearer middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub profile_picture: Option<String>,
    pub preferred_language: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Public projection of a `User`; this is the only shape in which user
/// records cross the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    pub preferred_language: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            phone_number: u.phone_number,
            profile_picture: u.profile_picture,
            preferred_language: u.preferred_language,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

// -- Profile --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub profile_picture: Option<String>,
    pub preferred_language: Option<String>,
}

// -- Groups --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateGroupRequest {
    pub name: String,
    pub description: String,
    pub founded_date: DateTime<Utc>,
    pub regular_contribution_amount: i64,
    pub contribution_frequency: ContributionFrequency,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateGroupRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub founded_date: Option<DateTime<Utc>>,
    pub total_value: Option<i64>,
    pub regular_contribution_amount: Option<i64>,
    pub contribution_frequency: Option<ContributionFrequency>,
}

// -- Members --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddMemberRequest {
    pub user_id: i64,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateMemberRequest {
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

// -- Transactions --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateTransactionRequest {
    pub group_id: i64,
    pub amount: i64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    pub date: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub description: Option<String>,
    pub reference_number: Option<String>,
}

// -- Meetings --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateMeetingRequest {
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    #[serde(default)]
    pub is_virtual: bool,
    pub meeting_link: Option<String>,
    pub description: Option<String>,
}

/// Meeting annotated with its group's name for cross-group listings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingWithGroup {
    #[serde(flatten)]
    pub meeting: Meeting,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
}

// -- Investments --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateInvestmentRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: i64,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub expected_return_rate: Option<String>,
    #[serde(default = "default_investment_status")]
    pub status: InvestmentStatus,
    pub current_value: i64,
}

fn default_investment_status() -> InvestmentStatus {
    InvestmentStatus::Active
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentWithGroup {
    #[serde(flatten)]
    pub investment: crate::models::Investment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
}

// -- Dashboard --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub active_groups_count: usize,
    pub total_contributions: i64,
    pub active_investments_count: usize,
    pub upcoming_meetings_count: usize,
}

/// One of the user's five most recent transactions, annotated with the group
/// name when the group is among their active groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: i64,
    pub status: TransactionStatus,
    pub date: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub group_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleEntryKind {
    Meeting,
    Contribution,
}

/// One row of the three-bucket upcoming schedule. `amount` is set on
/// contribution entries only; `details` carries the kind-specific extras
/// (location/link for meetings, amount for contributions).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    #[serde(rename = "type")]
    pub kind: ScheduleEntryKind,
    pub group_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    pub title: String,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    pub details: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingSchedule {
    pub today: Vec<ScheduleEntry>,
    pub this_week: Vec<ScheduleEntry>,
    pub next_week: Vec<ScheduleEntry>,
}

/// Active investment value summed into the five fixed report categories.
/// The two multi-word keys are part of the wire contract.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct InvestmentBreakdown {
    #[serde(rename = "real estate")]
    pub real_estate: i64,
    pub bonds: i64,
    pub stocks: i64,
    #[serde(rename = "mutual funds")]
    pub mutual_funds: i64,
    pub others: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentSummary {
    pub total: i64,
    pub breakdown: InvestmentBreakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub groups: Vec<Group>,
    pub recent_activities: Vec<ActivityEntry>,
    pub upcoming_schedule: UpcomingSchedule,
    pub investment_summary: InvestmentSummary,
}
