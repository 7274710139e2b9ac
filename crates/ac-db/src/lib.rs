pub mod acl;
pub mod connection;
pub mod error;
pub mod notify;
pub mod repositories;

pub use acl::apply_claims_filter;
pub use error::{DbError, Result};
pub use notify::InviteNotifier;
pub use repositories::invite_repository::{
    AcceptInviteRequest, DEFAULT_INVITE_TTL_SECS, InviteRepository, InviteUrlBuilder,
    SendInvitesRequest,
};
pub use repositories::membership_repository::MembershipRepository;
pub use repositories::user_repository::{User, UserCreateRequest, UserRepository};
