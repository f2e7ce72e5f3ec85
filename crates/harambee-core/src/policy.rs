use harambee_types::models::{Membership, Role};

/// Roles allowed to edit a group's details.
pub const GROUP_UPDATE: &[Role] = &[Role::Admin];
/// Roles allowed to add members to a group.
pub const MEMBER_CREATE: &[Role] = &[Role::Admin];
/// Roles allowed to change a member's role or active flag.
pub const MEMBER_UPDATE: &[Role] = &[Role::Admin];
/// Roles allowed to schedule meetings.
pub const MEETING_CREATE: &[Role] = &[Role::Admin, Role::Secretary];
/// Roles allowed to create investments.
pub const INVESTMENT_CREATE: &[Role] = &[Role::Admin, Role::Treasurer];

/// True iff the membership exists, is active, and holds one of the required
/// roles. Roles carry no hierarchy; each action lists every role it accepts.
pub fn can_act(membership: Option<&Membership>, required: &[Role]) -> bool {
    match membership {
        Some(m) => m.is_active && required.contains(&m.role),
        None => false,
    }
}
