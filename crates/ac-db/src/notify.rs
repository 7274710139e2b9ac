use crate::Result;

use async_trait::async_trait;

/// Capability for delivering invite links. Implementations belong to the
/// surrounding application (SMTP, SES, a queue); this core calls it once
/// per invited address and never retries — retry policy is the
/// implementation's concern.
#[async_trait]
pub trait InviteNotifier: Send + Sync {
    async fn send_invite(&self, email: &str, invite_url: &str) -> Result<()>;
}
