//! Authenticated JSON calls against the platform's REST API.

use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::domain::{FollowerPage, FollowerProfile, FriendIdPage};
use crate::error::{Result, SweepError};
use crate::oauth::{AccessToken, SignatureEngine};

/// Single page sizes; pagination beyond these is out of scope
pub const FOLLOWERS_PAGE_SIZE: u32 = 200;
pub const FRIEND_IDS_PAGE_SIZE: u32 = 5000;

const JSON: &str = "application/json";

/// Method and optional JSON body of a call
#[derive(Debug, Clone)]
pub struct CallOptions {
    pub method: Method,
    pub json_body: Option<Value>,
}

impl CallOptions {
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            json_body: None,
        }
    }

    pub fn post() -> Self {
        Self {
            method: Method::POST,
            json_body: None,
        }
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.json_body = Some(body);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    signer: SignatureEngine,
}

impl ApiClient {
    pub fn new(http: Client, base_url: &str, signer: SignatureEngine) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            signer,
        }
    }

    /// Resolve an API path against the configured base URL and append query pairs
    pub fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        endpoint_url(&self.base_url, path, query)
    }

    /// Sign and send one request, returning the parsed JSON body.
    ///
    /// The body is parsed regardless of status; a failure status yields
    /// [`SweepError::Api`] carrying that parsed body.
    #[instrument(skip(self, token, options), fields(method = %options.method))]
    pub async fn call(&self, url: Url, token: &AccessToken, options: CallOptions) -> Result<Value> {
        let body = options
            .json_body
            .as_ref()
            .map(serde_json::to_vec)
            .transpose()?;

        let signed = self.signer.sign(options.method, url, Some(token), body)?;
        debug!(url = %signed.url, "Sending API request");

        let mut request = self
            .http
            .request(signed.method, signed.url)
            .headers(signed.headers)
            .header(ACCEPT, HeaderValue::from_static(JSON));
        if let Some(body) = signed.body {
            request = request
                .header(CONTENT_TYPE, HeaderValue::from_static(JSON))
                .body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(status = status.as_u16(), "Received API response");

        if !status.is_success() {
            let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
            warn!(status = status.as_u16(), %body, "API request failed");
            return Err(SweepError::Api {
                status: status.as_u16(),
                body,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// First page of the user's followers, in platform order
    pub async fn followers_list(
        &self,
        token: &AccessToken,
        user_id: &str,
    ) -> Result<Vec<FollowerProfile>> {
        let count = FOLLOWERS_PAGE_SIZE.to_string();
        let url = self.endpoint(
            "/1.1/followers/list.json",
            &[("user_id", user_id), ("count", count.as_str())],
        )?;
        let page: FollowerPage = decode(self.call(url, token, CallOptions::get()).await?, "users")?;
        Ok(page.users)
    }

    /// First page of ids the user follows
    pub async fn friend_ids(&self, token: &AccessToken, user_id: &str) -> Result<Vec<u64>> {
        let count = FRIEND_IDS_PAGE_SIZE.to_string();
        let url = self.endpoint(
            "/1.1/friends/ids.json",
            &[("user_id", user_id), ("count", count.as_str())],
        )?;
        let page: FriendIdPage = decode(self.call(url, token, CallOptions::get()).await?, "ids")?;
        Ok(page.ids)
    }

    pub async fn block_create(&self, token: &AccessToken, user_id: u64) -> Result<Value> {
        let url = self.block_url("/1.1/blocks/create.json", user_id)?;
        self.call(url, token, CallOptions::post()).await
    }

    pub async fn block_destroy(&self, token: &AccessToken, user_id: u64) -> Result<Value> {
        let url = self.block_url("/1.1/blocks/destroy.json", user_id)?;
        self.call(url, token, CallOptions::post()).await
    }

    fn block_url(&self, path: &str, user_id: u64) -> Result<Url> {
        let id = user_id.to_string();
        self.endpoint(path, &[("user_id", id.as_str()), ("skip_status", "1")])
    }
}

pub(crate) fn endpoint_url(base_url: &str, path: &str, query: &[(&str, &str)]) -> Result<Url> {
    let raw = format!("{}{}", base_url.trim_end_matches('/'), path);
    let mut url = Url::parse(&raw)
        .map_err(|e| SweepError::Config(format!("Invalid API URL '{}': {}", raw, e)))?;
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query.iter());
    }
    Ok(url)
}

fn decode<T: DeserializeOwned>(value: Value, expected: &str) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        SweepError::UnexpectedResponse(format!("expected '{}' in response: {}", expected, e))
    })
}
