//! Three-legged OAuth 1.0a handshake with out-of-band PIN verification.
//!
//! request token -> user authorizes in a browser and copies a PIN -> access
//! token. Each leg consumes the previous leg's output, so the states can only
//! be walked forward. Any failure aborts the handshake; nothing is retried.

use std::collections::HashMap;

use reqwest::{Client, Method};
use tracing::{debug, info};
use url::{form_urlencoded, Url};

use crate::client::endpoint_url;
use crate::console::Console;
use crate::error::{Result, SweepError};
use crate::oauth::{AccessToken, Credentials, RequestToken, SignatureEngine};

/// Outcome of a completed handshake, held for the rest of the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    pub token: AccessToken,
    pub user_id: String,
    pub screen_name: String,
}

#[derive(Debug, Clone)]
pub struct AuthFlow {
    http: Client,
    base_url: String,
    signer: SignatureEngine,
}

impl AuthFlow {
    pub fn new(http: Client, base_url: &str, signer: SignatureEngine) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            signer,
        }
    }

    /// Run the whole handshake, using the console to show the authorization
    /// URL and read back the PIN.
    pub async fn authenticate<C: Console + ?Sized>(&self, console: &mut C) -> Result<AccessGrant> {
        let request_token = self.request_token().await?;
        let authorize_url = self.authorize_url(&request_token)?;

        console.println("Open this URL in your browser and authorize the app:")?;
        console.println(authorize_url.as_str())?;
        let pin = console.read_line("Enter PIN: ")?;

        let grant = self.access_token(&request_token, pin.trim()).await?;
        info!(user_id = %grant.user_id, screen_name = %grant.screen_name, "Authenticated");
        Ok(grant)
    }

    /// First leg, signed with consumer credentials only
    pub async fn request_token(&self) -> Result<RequestToken> {
        let url = endpoint_url(
            &self.base_url,
            "/oauth/request_token",
            &[("oauth_callback", "oob")],
        )?;
        let fields = self.post_form(url, None).await?;

        Ok(Credentials::new(
            required(&fields, "oauth_token")?,
            required(&fields, "oauth_token_secret")?,
        ))
    }

    /// Browser URL where the user grants access and receives a PIN
    pub fn authorize_url(&self, request_token: &RequestToken) -> Result<Url> {
        endpoint_url(
            &self.base_url,
            "/oauth/authorize",
            &[("oauth_token", request_token.key.as_str())],
        )
    }

    /// Final leg, exchanging the request token and PIN for an access token
    pub async fn access_token(&self, request_token: &RequestToken, pin: &str) -> Result<AccessGrant> {
        let url = endpoint_url(
            &self.base_url,
            "/oauth/access_token",
            &[("oauth_token", request_token.key.as_str()), ("oauth_verifier", pin)],
        )?;
        let fields = self.post_form(url, Some(request_token)).await?;

        Ok(AccessGrant {
            token: Credentials::new(
                required(&fields, "oauth_token")?,
                required(&fields, "oauth_token_secret")?,
            ),
            user_id: required(&fields, "user_id")?,
            screen_name: fields.get("screen_name").cloned().unwrap_or_default(),
        })
    }

    async fn post_form(
        &self,
        url: Url,
        token: Option<&Credentials>,
    ) -> Result<HashMap<String, String>> {
        let signed = self.signer.sign(Method::POST, url, token, None)?;
        debug!(url = %signed.url.path(), "Sending OAuth request");

        let response = self
            .http
            .request(signed.method, signed.url)
            .headers(signed.headers)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "OAuth request rejected");
            return Err(SweepError::Auth(body));
        }
        Ok(parse_form(&body))
    }
}

/// Parse an `application/x-www-form-urlencoded` response body
pub fn parse_form(body: &str) -> HashMap<String, String> {
    form_urlencoded::parse(body.trim().as_bytes())
        .into_owned()
        .collect()
}

fn required(fields: &HashMap<String, String>, key: &str) -> Result<String> {
    fields
        .get(key)
        .cloned()
        .ok_or_else(|| SweepError::UnexpectedResponse(format!("missing '{}' in token response", key)))
}
