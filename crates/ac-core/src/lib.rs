pub mod error;
pub mod models;

pub use error::{CoreError, Result};
pub use models::membership::Membership;
pub use models::membership_requests::{
    MembershipArchiveRequest, MembershipCreateRequest, MembershipDeleteRequest,
    MembershipFindRequest, MembershipOrderBy, MembershipReadRequest, MembershipUpdateRequest,
};
pub use models::membership_status::MembershipStatus;
pub use models::role::Role;

#[cfg(test)]
mod tests;
