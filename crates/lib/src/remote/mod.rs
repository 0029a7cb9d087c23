//! The backend boundary.
//!
//! Everything the engine knows about the remote side lives behind the
//! [`Gateway`] trait: code issuance and verification, profile fetch/update,
//! session checks, and the analytics counters. [`ScriptGateway`] is the
//! production implementation speaking the spreadsheet script's URL-encoded
//! dialect; tests substitute their own.
//!
//! The backend has shipped several revisions that disagree on payload field
//! names and on whether verification also returns the profile. All of that
//! tolerance is concentrated in [`wire`]; nothing outside this module ever
//! sees a raw payload.

mod errors;
mod http;
pub mod wire;

pub use errors::GatewayError;
pub use http::ScriptGateway;

use async_trait::async_trait;

use crate::profile::ProfileDraft;
use wire::RawAnalytics;

/// What a successful code verification yields.
///
/// Some backend revisions couple verification with profile retrieval; those
/// populate `profile` and save the client a round trip. Split revisions
/// leave it `None` and the profile is loaded separately.
#[derive(Debug, Clone)]
pub struct VerifyGrant {
    /// Opaque bearer credential for subsequent authenticated calls.
    pub token: String,
    /// Profile document, when the backend returned one alongside the token.
    pub profile: Option<ProfileDraft>,
}

/// Remote operations the engine depends on.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Ask the backend to email a verification code to `email`.
    async fn request_code(&self, email: &str) -> Result<(), GatewayError>;

    /// Present a verification code for `email`; a grant on success.
    async fn verify_code(&self, email: &str, code: &str) -> Result<VerifyGrant, GatewayError>;

    /// Fetch the stored profile for the session's identity.
    async fn get_profile(&self, email: &str, token: &str) -> Result<ProfileDraft, GatewayError>;

    /// Persist the given profile document.
    async fn update_profile(
        &self,
        email: &str,
        token: &str,
        profile: &ProfileDraft,
    ) -> Result<(), GatewayError>;

    /// Cheap preflight: is this token still accepted?
    async fn verify_session(&self, token: &str) -> Result<bool, GatewayError>;

    /// Fetch raw analytics counters for a public profile slug.
    async fn fetch_analytics(&self, link: &str) -> Result<RawAnalytics, GatewayError>;
}
