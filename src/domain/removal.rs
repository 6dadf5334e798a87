use std::time::Duration;

use tracing::info;

use super::{Decision, FollowerProfile};
use crate::client::ApiClient;
use crate::error::Result;
use crate::oauth::AccessToken;

/// Executes review decisions.
///
/// Removing a follower is a two-call protocol: block the account, wait, then
/// unblock it. The follow edge is gone once the block lands; the unblock
/// leaves no lasting block behind.
#[derive(Debug)]
pub struct RemovalEngine<'a> {
    client: &'a ApiClient,
    token: &'a AccessToken,
    removal_delay: Duration,
    dry_run: bool,
    kept: usize,
    removed: usize,
}

impl<'a> RemovalEngine<'a> {
    pub fn new(client: &'a ApiClient, token: &'a AccessToken, removal_delay: Duration) -> Self {
        Self {
            client,
            token,
            removal_delay,
            dry_run: false,
            kept: 0,
            removed: 0,
        }
    }

    pub fn set_dry_run(&mut self, dry_run: bool) {
        self.dry_run = dry_run;
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Apply a decision, performing the removal sequence for `Remove`.
    ///
    /// Only the tallies outlive the call. A failure in either request aborts
    /// immediately and the decision is not counted.
    pub async fn record_decision(
        &mut self,
        follower: &FollowerProfile,
        decision: Decision,
    ) -> Result<()> {
        match decision {
            Decision::Keep => self.kept += 1,
            Decision::Remove => {
                if !self.dry_run {
                    self.remove_follower(follower.id).await?;
                    info!(user_id = follower.id, screen_name = %follower.screen_name, "Removed follower");
                }
                self.removed += 1;
            }
        }
        Ok(())
    }

    async fn remove_follower(&self, user_id: u64) -> Result<()> {
        self.client.block_create(self.token, user_id).await?;
        tokio::time::sleep(self.removal_delay).await;
        self.client.block_destroy(self.token, user_id).await?;
        Ok(())
    }

    /// Returns (kept, removed) counts
    pub fn counts(&self) -> (usize, usize) {
        (self.kept, self.removed)
    }
}
