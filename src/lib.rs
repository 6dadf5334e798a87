//! Followsweep - review followers and remove likely spam accounts
//!
//! This crate provides the OAuth 1.0a signing and handshake, the API client,
//! the follower classifier and the interactive review loop behind the
//! `followsweep` binary.

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod console;
pub mod domain;
pub mod error;
pub mod oauth;
pub mod review;

// Re-export primary types for convenience
pub use auth::{AccessGrant, AuthFlow};
pub use client::{ApiClient, CallOptions};
pub use config::UserConfig;
pub use domain::{
    classify, ClassificationSignals, Decision, FollowerProfile, RemovalEngine, ReviewStatistics,
    Signal,
};
pub use error::{Result, SweepError};
pub use oauth::{AccessToken, Credentials, RequestToken, SignatureEngine, SignedRequest};
pub use review::{ReviewLoop, ReviewOptions};
