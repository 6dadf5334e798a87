//! OAuth 1.0a request signing.
//!
//! Every call to the platform carries an `Authorization` header computed with
//! HMAC-SHA1 over the signature base string: the upper-cased method, the
//! request URL without its query, and the sorted, percent-encoded union of the
//! `oauth_*` parameters, the URL query parameters and any form parameters.
//! Signing never touches the network.

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use sha1::Sha1;
use url::Url;

use crate::error::{Result, SweepError};

/// RFC 3986 unreserved characters stay literal: ALPHA / DIGIT / "-" / "." / "_" / "~"
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

/// A key/secret pair: consumer credentials, a request token or an access token
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub key: String,
    pub secret: String,
}

/// Short-lived token issued by the first leg of the handshake
pub type RequestToken = Credentials;

/// Token used unchanged for every authenticated call of a session
pub type AccessToken = Credentials;

impl Credentials {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// A request ready to hand to the transport. Each value carries its own
/// nonce and timestamp, so it must not be replayed as a different request.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

/// Computes OAuth 1.0a authorization headers for one set of consumer credentials
#[derive(Debug, Clone)]
pub struct SignatureEngine {
    consumer: Credentials,
}

impl SignatureEngine {
    pub fn new(consumer: Credentials) -> Self {
        Self { consumer }
    }

    /// Sign a request, optionally on behalf of a user token.
    ///
    /// The body is carried along untouched; JSON bodies are not part of the
    /// OAuth 1.0a signature.
    pub fn sign(
        &self,
        method: Method,
        url: Url,
        token: Option<&Credentials>,
        body: Option<Vec<u8>>,
    ) -> Result<SignedRequest> {
        let header = self.authorization_header(&method, &url, token, &[])?;
        let value = HeaderValue::from_str(&header)
            .map_err(|e| SweepError::Signing(format!("invalid header value: {}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);

        Ok(SignedRequest {
            method,
            url,
            headers,
            body,
        })
    }

    /// Build the `Authorization` header value with a fresh nonce and the current time
    pub fn authorization_header(
        &self,
        method: &Method,
        url: &Url,
        token: Option<&Credentials>,
        form_params: &[(String, String)],
    ) -> Result<String> {
        let nonce = generate_nonce();
        let timestamp = Utc::now().timestamp();
        self.authorization_header_with(method, url, token, form_params, &nonce, timestamp)
    }

    /// Build the `Authorization` header value from an explicit nonce and timestamp
    pub fn authorization_header_with(
        &self,
        method: &Method,
        url: &Url,
        token: Option<&Credentials>,
        form_params: &[(String, String)],
        nonce: &str,
        timestamp: i64,
    ) -> Result<String> {
        let mut oauth_params = vec![
            ("oauth_consumer_key".to_string(), self.consumer.key.clone()),
            ("oauth_nonce".to_string(), nonce.to_string()),
            (
                "oauth_signature_method".to_string(),
                SIGNATURE_METHOD.to_string(),
            ),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
        ];
        if let Some(token) = token {
            oauth_params.push(("oauth_token".to_string(), token.key.clone()));
        }
        oauth_params.push(("oauth_version".to_string(), OAUTH_VERSION.to_string()));

        let mut all_params = oauth_params.clone();
        all_params.extend(
            url.query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned())),
        );
        all_params.extend(form_params.iter().cloned());

        let base_string = signature_base_string(method, url, &all_params);
        let signing_key = format!(
            "{}&{}",
            percent_encode(&self.consumer.secret),
            percent_encode(token.map(|t| t.secret.as_str()).unwrap_or(""))
        );
        let signature = hmac_sha1(&signing_key, &base_string)?;

        oauth_params.push(("oauth_signature".to_string(), signature));

        let header = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("OAuth {}", header))
    }
}

/// `METHOD&encoded-base-url&encoded-parameter-string`
pub fn signature_base_string(method: &Method, url: &Url, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.as_str().to_uppercase(),
        percent_encode(&base_url(url)),
        percent_encode(&param_string)
    )
}

/// Scheme, host, non-default port and path; query and fragment dropped
fn base_url(url: &Url) -> String {
    let mut base = url.clone();
    base.set_query(None);
    base.set_fragment(None);
    base.to_string()
}

pub(crate) fn percent_encode(s: &str) -> String {
    utf8_percent_encode(s, OAUTH_ENCODE_SET).to_string()
}

fn generate_nonce() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn hmac_sha1(key: &str, data: &str) -> Result<String> {
    type HmacSha1 = Hmac<Sha1>;

    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| SweepError::Signing(e.to_string()))?;
    mac.update(data.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}
