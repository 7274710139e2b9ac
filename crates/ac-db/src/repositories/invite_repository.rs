use crate::repositories::membership_repository::MembershipRepository;
use crate::repositories::user_repository::{UserCreateRequest, UserRepository};
use crate::{DbError, InviteNotifier, Result};

use std::net::IpAddr;
use std::sync::Arc;

use ac_auth::{Claims, new_invite_hash, parse_invite_hash};
use ac_core::{
    Membership, MembershipCreateRequest, MembershipReadRequest, MembershipStatus,
    MembershipUpdateRequest, Role,
};
use chrono::{DateTime, TimeDelta, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidateEmail;

/// Applied when a send request leaves the TTL unset.
pub const DEFAULT_INVITE_TTL_SECS: i64 = 24 * 60 * 60;

/// Builds the URL a recipient visits to accept an invite, from the
/// URL-safe encrypted hash.
pub type InviteUrlBuilder = Box<dyn Fn(&str) -> String + Send + Sync>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendInvitesRequest {
    /// The account the invitees are granted access to.
    pub account_id: Uuid,
    /// The inviting admin; embedded in each hash for audit context.
    pub user_id: Uuid,
    pub emails: Vec<String>,
    pub roles: Vec<Role>,
    /// Invite lifetime in seconds; defaults to 24 hours.
    #[serde(default)]
    pub ttl_secs: Option<i64>,
}

impl SendInvitesRequest {
    #[track_caller]
    pub fn validate(&self) -> Result<()> {
        if self.emails.is_empty() {
            return Err(DbError::validation("emails cannot be empty"));
        }
        for email in &self.emails {
            if !email.validate_email() {
                return Err(DbError::validation(format!("invalid email {:?}", email)));
            }
        }
        if self.roles.is_empty() {
            return Err(DbError::validation("roles cannot be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptInviteRequest {
    pub invite_hash: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl AcceptInviteRequest {
    #[track_caller]
    pub fn validate(&self) -> Result<()> {
        if self.invite_hash.is_empty() {
            return Err(DbError::validation("invite_hash cannot be empty"));
        }
        if !self.email.validate_email() {
            return Err(DbError::validation(format!("invalid email {:?}", self.email)));
        }
        Ok(())
    }
}

/// Out-of-band onboarding: the state an invite needs lives entirely inside
/// the encrypted hash, so sending requires no lookup table and acceptance
/// authenticates via the hash contents rather than a session.
pub struct InviteRepository {
    users: UserRepository,
    memberships: MembershipRepository,
    invite_url: InviteUrlBuilder,
    notifier: Arc<dyn InviteNotifier>,
    secret_key: String,
}

impl InviteRepository {
    pub fn new(
        users: UserRepository,
        memberships: MembershipRepository,
        invite_url: InviteUrlBuilder,
        notifier: Arc<dyn InviteNotifier>,
        secret_key: String,
    ) -> Self {
        Self {
            users,
            memberships,
            invite_url,
            notifier,
            secret_key,
        }
    }

    /// Invites each address into the account: writes a pending membership
    /// (reviving an archived one), mints the encrypted hash, and hands the
    /// accept URL to the notifier. Addresses already holding an active
    /// membership are skipped. Returns the addresses actually invited.
    pub async fn send_invites(
        &self,
        claims: &Claims,
        req: &SendInvitesRequest,
        request_ip: IpAddr,
        now: DateTime<Utc>,
    ) -> Result<Vec<String>> {
        req.validate()?;
        self.memberships
            .can_modify_account(claims, req.account_id)
            .await?;

        let ttl = TimeDelta::seconds(req.ttl_secs.unwrap_or(DEFAULT_INVITE_TTL_SECS));
        let mut invited = Vec::with_capacity(req.emails.len());

        for email in &req.emails {
            let user = match self.users.find_by_email(email).await? {
                Some(user) => user,
                None => {
                    self.users
                        .create(
                            &UserCreateRequest {
                                email: email.clone(),
                                first_name: String::new(),
                                last_name: String::new(),
                            },
                            now,
                        )
                        .await?
                }
            };

            let existing = match self
                .memberships
                .read(
                    claims,
                    &MembershipReadRequest {
                        user_id: user.id,
                        account_id: req.account_id,
                        include_archived: true,
                    },
                )
                .await
            {
                Ok(membership) => Some(membership),
                Err(DbError::NotFound { .. }) => None,
                Err(e) => return Err(e),
            };
            if let Some(membership) = &existing
                && membership.status == MembershipStatus::Active
                && !membership.is_archived()
            {
                info!(
                    "skipping invite for {}: already an active member of {}",
                    email, req.account_id
                );
                continue;
            }

            self.memberships
                .create(
                    claims,
                    &MembershipCreateRequest {
                        user_id: user.id,
                        account_id: req.account_id,
                        roles: req.roles.clone(),
                        status: Some(MembershipStatus::Pending),
                    },
                    now,
                )
                .await?;

            let hash = new_invite_hash(
                &self.secret_key,
                req.user_id,
                req.account_id,
                request_ip,
                ttl,
                now,
            )?;
            let url = (self.invite_url)(&hash);

            self.notifier.send_invite(email, &url).await?;
            info!("invite sent to {} for account {}", email, req.account_id);

            invited.push(email.clone());
        }

        Ok(invited)
    }

    /// Completes an invite: the decrypted hash authenticates the request,
    /// the email identifies (or creates) the accepting user, and the
    /// membership written at send time flips to active. An expired hash
    /// fails with the distinct expired kind before anything is touched.
    pub async fn accept_invite(
        &self,
        req: &AcceptInviteRequest,
        now: DateTime<Utc>,
    ) -> Result<Membership> {
        req.validate()?;

        let hash = parse_invite_hash(&self.secret_key, &req.invite_hash, now)?;

        let user = match self.users.find_by_email(&req.email).await? {
            Some(user) => user,
            None => {
                self.users
                    .create(
                        &UserCreateRequest {
                            email: req.email.clone(),
                            first_name: req.first_name.clone(),
                            last_name: req.last_name.clone(),
                        },
                        now,
                    )
                    .await?
            }
        };

        // System-initiated from here: the hash itself is the authorization.
        let claims = Claims::default();
        let read = MembershipReadRequest {
            user_id: user.id,
            account_id: hash.account_id,
            include_archived: true,
        };

        let membership = match self.memberships.read(&claims, &read).await {
            Ok(_) => {
                let update = MembershipUpdateRequest {
                    user_id: user.id,
                    account_id: hash.account_id,
                    roles: None,
                    status: Some(MembershipStatus::Active),
                    unarchive: true,
                };
                self.memberships.update(&claims, &update, now).await?;
                self.memberships
                    .read(
                        &claims,
                        &MembershipReadRequest {
                            include_archived: false,
                            ..read
                        },
                    )
                    .await?
            }
            Err(DbError::NotFound { .. }) => {
                self.memberships
                    .create(
                        &claims,
                        &MembershipCreateRequest {
                            user_id: user.id,
                            account_id: hash.account_id,
                            roles: vec![Role::User],
                            status: Some(MembershipStatus::Active),
                        },
                        now,
                    )
                    .await?
            }
            Err(e) => return Err(e),
        };

        info!(
            "invite accepted: user {} joined account {}",
            user.id, hash.account_id
        );

        Ok(membership)
    }
}
