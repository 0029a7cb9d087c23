//! HTTP implementation of the backend gateway.
//!
//! The script backend is plain URL-encoded HTTP: every read is a GET with
//! an `action` query parameter, the single write is a form-encoded POST.
//! One reqwest client with the configured timeout serves all calls.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;
use url::Url;

use super::{Gateway, GatewayError, VerifyGrant, wire};
use crate::profile::ProfileDraft;
use crate::settings::Settings;

/// [`Gateway`] over the spreadsheet-script backend.
pub struct ScriptGateway {
    http: reqwest::Client,
    script_url: Url,
    analytics_url: Url,
    timeout: Duration,
}

impl ScriptGateway {
    /// Build a gateway from the configured endpoints and timeout.
    pub fn new(settings: &Settings) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| GatewayError::Network {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            script_url: settings.script_url.clone(),
            analytics_url: settings.analytics_url.clone(),
            timeout: settings.request_timeout,
        })
    }

    fn action_url(&self, action: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.script_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("action", action);
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }
        url
    }

    fn classify(&self, err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            GatewayError::Network {
                reason: err.to_string(),
            }
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, GatewayError> {
        let response = request.send().await.map_err(|e| self.classify(e))?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(GatewayError::Unauthorized);
        }
        if !response.status().is_success() {
            return Err(GatewayError::Network {
                reason: format!("backend returned HTTP {}", response.status()),
            });
        }
        Ok(response)
    }

    async fn get_envelope(&self, url: Url) -> Result<wire::Envelope, GatewayError> {
        let response = self.send(self.http.get(url)).await?;
        response
            .json::<wire::Envelope>()
            .await
            .map_err(|e| self.payload_error(e))
    }

    fn payload_error(&self, err: reqwest::Error) -> GatewayError {
        // A body read can also die of a timeout mid-stream.
        if err.is_timeout() {
            self.classify(err)
        } else {
            GatewayError::InvalidPayload {
                reason: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl Gateway for ScriptGateway {
    async fn request_code(&self, email: &str) -> Result<(), GatewayError> {
        let url = self.action_url("request_otp", &[("email", email)]);
        let envelope = self.get_envelope(url).await?;
        if envelope.is_success() {
            debug!(email, "verification code issued");
            Ok(())
        } else {
            Err(GatewayError::Rejected {
                message: envelope.failure_message(),
            })
        }
    }

    async fn verify_code(&self, email: &str, code: &str) -> Result<VerifyGrant, GatewayError> {
        let url = self.action_url("verify_otp", &[("email", email), ("otp", code)]);
        let envelope = self.get_envelope(url).await?;
        if !envelope.is_success() {
            return Err(GatewayError::Rejected {
                message: envelope.failure_message(),
            });
        }

        let token = envelope.token.ok_or_else(|| GatewayError::InvalidPayload {
            reason: "success reply without a session token".to_string(),
        })?;
        Ok(VerifyGrant {
            token,
            profile: envelope.profile.map(ProfileDraft::from),
        })
    }

    async fn get_profile(&self, email: &str, token: &str) -> Result<ProfileDraft, GatewayError> {
        let url = self.action_url("get_profile", &[("email", email), ("token", token)]);
        let response = self.send(self.http.get(url)).await?;
        let body = response.text().await.map_err(|e| self.payload_error(e))?;
        let raw = wire::parse_profile_body(&body)?;
        Ok(ProfileDraft::from(raw))
    }

    async fn update_profile(
        &self,
        email: &str,
        token: &str,
        profile: &ProfileDraft,
    ) -> Result<(), GatewayError> {
        let data = wire::update_payload(profile).to_string();
        let form = [
            ("action", "update_profile"),
            ("token", token),
            ("email", email),
            ("data", data.as_str()),
        ];
        let response = self.send(self.http.post(self.script_url.clone()).form(&form)).await?;
        let envelope = response
            .json::<wire::Envelope>()
            .await
            .map_err(|e| self.payload_error(e))?;

        if wire::is_unauthorized(&envelope) {
            return Err(GatewayError::Unauthorized);
        }
        if !envelope.is_success() {
            return Err(GatewayError::Rejected {
                message: envelope.failure_message(),
            });
        }
        Ok(())
    }

    async fn verify_session(&self, token: &str) -> Result<bool, GatewayError> {
        let url = self.action_url("verify_session", &[("token", token)]);
        let envelope = self.get_envelope(url).await?;
        if let Some(valid) = envelope.valid {
            return Ok(valid);
        }
        // Older revisions answer with a plain status envelope instead.
        if wire::is_unauthorized(&envelope) {
            return Ok(false);
        }
        Ok(envelope.is_success())
    }

    async fn fetch_analytics(&self, link: &str) -> Result<wire::RawAnalytics, GatewayError> {
        let mut url = self.analytics_url.clone();
        url.query_pairs_mut().append_pair("link", link);
        let response = self.send(self.http.get(url)).await?;
        response
            .json::<wire::RawAnalytics>()
            .await
            .map_err(|e| self.payload_error(e))
    }
}
