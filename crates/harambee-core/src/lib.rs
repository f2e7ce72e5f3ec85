//! Domain logic for the harambee backend: membership resolution, role
//! checks, schedule projection, dashboard aggregation, and notification
//! fan-out. Everything here is synchronous and side-effect free apart from
//! writes going through the [`harambee_store::Store`] handle it is given.

pub mod dashboard;
pub mod membership;
pub mod notify;
pub mod policy;
pub mod schedule;
