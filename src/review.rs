//! The interactive review: one follower at a time, each with a suggested
//! default, removals executed before moving on.

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::auth::AccessGrant;
use crate::client::ApiClient;
use crate::console::{ask_removal, Console, FollowerSummary};
use crate::domain::{classify, ReviewStatistics, RemovalEngine};
use crate::error::Result;

/// Pause between block and unblock of a removed follower
pub const DEFAULT_REMOVAL_DELAY: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewOptions {
    pub removal_delay: Duration,
    pub dry_run: bool,
}

impl Default for ReviewOptions {
    fn default() -> Self {
        Self {
            removal_delay: DEFAULT_REMOVAL_DELAY,
            dry_run: false,
        }
    }
}

#[derive(Debug)]
pub struct ReviewLoop<'a> {
    client: &'a ApiClient,
    grant: &'a AccessGrant,
    options: ReviewOptions,
}

impl<'a> ReviewLoop<'a> {
    pub fn new(client: &'a ApiClient, grant: &'a AccessGrant, options: ReviewOptions) -> Self {
        Self {
            client,
            grant,
            options,
        }
    }

    pub async fn run<C: Console + ?Sized>(&self, console: &mut C) -> Result<ReviewStatistics> {
        self.run_at(console, Utc::now()).await
    }

    /// Review every non-mutual follower of the fetched page, classifying
    /// against `now`.
    ///
    /// Followers and friend ids are fetched once up front and never
    /// refreshed. Any API failure ends the review.
    pub async fn run_at<C: Console + ?Sized>(
        &self,
        console: &mut C,
        now: DateTime<Utc>,
    ) -> Result<ReviewStatistics> {
        let token = &self.grant.token;
        let followers = self.client.followers_list(token, &self.grant.user_id).await?;
        let mutuals: HashSet<u64> = self
            .client
            .friend_ids(token, &self.grant.user_id)
            .await?
            .into_iter()
            .collect();
        info!(
            followers = followers.len(),
            friends = mutuals.len(),
            "Fetched follower snapshot"
        );

        let mut engine = RemovalEngine::new(self.client, token, self.options.removal_delay);
        engine.set_dry_run(self.options.dry_run);

        let mut mutuals_skipped = 0;
        let mut reviewed = 0;
        for follower in &followers {
            if mutuals.contains(&follower.id) {
                mutuals_skipped += 1;
                continue;
            }

            let signals = classify(follower, now);
            debug!(
                user_id = follower.id,
                score = signals.unwanted_score(),
                "Classified follower"
            );

            reviewed += 1;
            console.show_summary(&FollowerSummary::new(follower, signals))?;
            let decision = ask_removal(console, signals.is_likely_unwanted())?;
            engine.record_decision(follower, decision).await?;
        }

        let (kept, removed) = engine.counts();
        Ok(ReviewStatistics {
            fetched: followers.len(),
            mutuals_skipped,
            reviewed,
            kept,
            removed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::testing::ScriptedConsole;
    use crate::domain::Signal;
    use crate::error::SweepError;
    use crate::oauth::{Credentials, SignatureEngine};
    use chrono::TimeZone;
    use reqwest::Client;
    use serde_json::{json, Value};
    use std::time::Instant;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    const CREATE: &str = "/1.1/blocks/create.json";
    const DESTROY: &str = "/1.1/blocks/destroy.json";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn grant() -> AccessGrant {
        AccessGrant {
            token: Credentials::new("acc_key", "acc_secret"),
            user_id: "777".to_string(),
            screen_name: "me".to_string(),
        }
    }

    fn test_client(mock_server: &MockServer) -> ApiClient {
        ApiClient::new(
            Client::new(),
            &mock_server.uri(),
            SignatureEngine::new(Credentials::new("ck", "cs")),
        )
    }

    fn fast_options() -> ReviewOptions {
        ReviewOptions {
            removal_delay: Duration::from_millis(50),
            dry_run: false,
        }
    }

    fn user(id: u64, screen_name: &str, statuses: u64) -> Value {
        json!({
            "id": id,
            "name": format!("User {}", id),
            "screen_name": screen_name,
            "description": "",
            "protected": false,
            "verified": false,
            "friends_count": 100,
            "followers_count": 100,
            "statuses_count": statuses,
            "created_at": "Wed Oct 10 20:19:24 +0000 2012"
        })
    }

    async fn mount_snapshot(mock_server: &MockServer, users: Vec<Value>, friend_ids: Vec<u64>) {
        Mock::given(method("GET"))
            .and(path("/1.1/followers/list.json"))
            .and(query_param("user_id", "777"))
            .and(query_param("count", "200"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "users": users })))
            .expect(1)
            .mount(mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/1.1/friends/ids.json"))
            .and(query_param("user_id", "777"))
            .and(query_param("count", "5000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ids": friend_ids })))
            .expect(1)
            .mount(mock_server)
            .await;
    }

    async fn mount_blocks(mock_server: &MockServer) {
        for endpoint in [CREATE, DESTROY] {
            Mock::given(method("POST"))
                .and(path(endpoint))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
                .mount(mock_server)
                .await;
        }
    }

    async fn block_requests(mock_server: &MockServer) -> Vec<(String, String)> {
        mock_server
            .received_requests()
            .await
            .unwrap()
            .into_iter()
            .filter(|r| r.url.path().starts_with("/1.1/blocks/"))
            .map(|r| {
                let id = r
                    .url
                    .query_pairs()
                    .find(|(k, _)| k == "user_id")
                    .map(|(_, v)| v.into_owned())
                    .unwrap_or_default();
                (r.url.path().to_string(), id)
            })
            .collect()
    }

    #[tokio::test]
    async fn test_mutuals_are_never_presented() {
        let mock_server = MockServer::start().await;
        mount_snapshot(
            &mock_server,
            vec![
                user(1, "friend12345678", 0),
                user(2, "stranger", 500),
                user(3, "buddy", 500),
            ],
            vec![1, 3, 99],
        )
        .await;
        mount_blocks(&mock_server).await;

        let client = test_client(&mock_server);
        let grant = grant();
        let mut console = ScriptedConsole::with_inputs(&["n"]);
        let stats = ReviewLoop::new(&client, &grant, fast_options())
            .run_at(&mut console, now())
            .await
            .unwrap();

        let presented: Vec<&str> = console
            .summaries
            .iter()
            .map(|s| s.screen_name.as_str())
            .collect();
        assert_eq!(presented, vec!["stranger"]);
        assert_eq!(
            stats,
            ReviewStatistics {
                fetched: 3,
                mutuals_skipped: 2,
                reviewed: 1,
                kept: 1,
                removed: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_followers_reviewed_in_platform_order() {
        let mock_server = MockServer::start().await;
        mount_snapshot(
            &mock_server,
            vec![user(30, "zed", 500), user(10, "amy", 500), user(20, "max", 500)],
            vec![],
        )
        .await;

        let client = test_client(&mock_server);
        let grant = grant();
        let mut console = ScriptedConsole::with_inputs(&["n", "n", "n"]);
        ReviewLoop::new(&client, &grant, fast_options())
            .run_at(&mut console, now())
            .await
            .unwrap();

        let presented: Vec<&str> = console
            .summaries
            .iter()
            .map(|s| s.screen_name.as_str())
            .collect();
        assert_eq!(presented, vec!["zed", "amy", "max"]);
    }

    #[tokio::test]
    async fn test_blank_answer_follows_classification() {
        let mock_server = MockServer::start().await;
        mount_snapshot(
            &mock_server,
            vec![user(5, "spam12345678", 500), user(6, "human", 500)],
            vec![],
        )
        .await;
        mount_blocks(&mock_server).await;

        let client = test_client(&mock_server);
        let grant = grant();
        let mut console = ScriptedConsole::with_inputs(&["", ""]);
        let stats = ReviewLoop::new(&client, &grant, fast_options())
            .run_at(&mut console, now())
            .await
            .unwrap();

        assert_eq!(
            console.prompts,
            vec!["Remove follower? (Y/n): ", "Remove follower? (y/N): "]
        );
        assert_eq!(console.summaries[0].flagged, vec![Signal::GeneratedScreenName]);
        assert_eq!(console.summaries[0].score, 1);
        assert_eq!(console.summaries[1].score, 0);
        assert_eq!((stats.kept, stats.removed), (1, 1));
        assert_eq!(
            block_requests(&mock_server).await,
            vec![
                (CREATE.to_string(), "5".to_string()),
                (DESTROY.to_string(), "5".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_invalid_input_reprompts_with_initial_default() {
        let mock_server = MockServer::start().await;
        mount_snapshot(&mock_server, vec![user(5, "spam12345678", 1)], vec![]).await;
        mount_blocks(&mock_server).await;

        let client = test_client(&mock_server);
        let grant = grant();
        let mut console = ScriptedConsole::with_inputs(&["sure", "ok?", ""]);
        let stats = ReviewLoop::new(&client, &grant, fast_options())
            .run_at(&mut console, now())
            .await
            .unwrap();

        assert_eq!(console.summaries.len(), 1);
        assert_eq!(console.prompts, vec!["Remove follower? (Y/n): "; 3]);
        assert_eq!(stats.removed, 1);
    }

    #[tokio::test]
    async fn test_removal_waits_between_block_and_unblock() {
        let mock_server = MockServer::start().await;
        mount_snapshot(
            &mock_server,
            vec![user(5, "a", 500), user(6, "b", 500)],
            vec![],
        )
        .await;
        mount_blocks(&mock_server).await;

        let client = test_client(&mock_server);
        let grant = grant();
        let options = ReviewOptions {
            removal_delay: Duration::from_millis(150),
            dry_run: false,
        };
        let mut console = ScriptedConsole::with_inputs(&["y", "y"]);

        let started = Instant::now();
        let stats = ReviewLoop::new(&client, &grant, options)
            .run_at(&mut console, now())
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_millis(300));
        assert_eq!(stats.removed, 2);
        assert_eq!(
            block_requests(&mock_server).await,
            vec![
                (CREATE.to_string(), "5".to_string()),
                (DESTROY.to_string(), "5".to_string()),
                (CREATE.to_string(), "6".to_string()),
                (DESTROY.to_string(), "6".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_removal_aborts_the_run() {
        let mock_server = MockServer::start().await;
        mount_snapshot(
            &mock_server,
            vec![user(5, "a", 500), user(6, "b", 500)],
            vec![],
        )
        .await;
        Mock::given(method("POST"))
            .and(path(CREATE))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "errors": [{"code": 88, "message": "Rate limit exceeded"}]
            })))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        let grant = grant();
        let mut console = ScriptedConsole::with_inputs(&["y", "y"]);
        let err = ReviewLoop::new(&client, &grant, fast_options())
            .run_at(&mut console, now())
            .await
            .unwrap_err();

        assert!(matches!(err, SweepError::Api { status: 429, .. }));
        assert_eq!(err.api_error_codes(), vec![88]);
        assert_eq!(console.summaries.len(), 1);
        assert_eq!(block_requests(&mock_server).await.len(), 1);
    }

    #[tokio::test]
    async fn test_dry_run_never_blocks() {
        let mock_server = MockServer::start().await;
        mount_snapshot(&mock_server, vec![user(5, "spam12345678", 0)], vec![]).await;
        mount_blocks(&mock_server).await;

        let client = test_client(&mock_server);
        let grant = grant();
        let options = ReviewOptions {
            dry_run: true,
            ..fast_options()
        };
        let mut console = ScriptedConsole::with_inputs(&[""]);
        let stats = ReviewLoop::new(&client, &grant, options)
            .run_at(&mut console, now())
            .await
            .unwrap();

        assert_eq!(stats.removed, 1);
        assert!(block_requests(&mock_server).await.is_empty());
    }

    #[tokio::test]
    async fn test_followers_fetch_failure_shows_nothing() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/1.1/followers/list.json"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "errors": [{"code": 89, "message": "Invalid or expired token."}]
            })))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        let grant = grant();
        let mut console = ScriptedConsole::with_inputs(&[]);
        let result = ReviewLoop::new(&client, &grant, fast_options())
            .run_at(&mut console, now())
            .await;

        assert!(matches!(result, Err(SweepError::Api { status: 401, .. })));
        assert!(console.summaries.is_empty());
        assert!(console.prompts.is_empty());
    }

    #[test]
    fn test_default_options() {
        let options = ReviewOptions::default();
        assert_eq!(options.removal_delay, Duration::from_millis(3000));
        assert!(!options.dry_run);
    }
}
