//! Wire-format types for the spreadsheet-script backend.
//!
//! The backend's payloads have drifted across revisions: sheet-column
//! casing (`Name`, `Social Links`) next to camelCase (`name`,
//! `socialLinks`), a token field spelled both `token` and `sessionToken`,
//! social links as a newline-delimited text cell or a JSON array, and
//! profile replies that are either wrapped in a status envelope or a bare
//! document. Every one of those translations happens here and only here;
//! the rest of the engine works with [`ProfileDraft`] exclusively.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Value, json};

use super::GatewayError;
use crate::profile::ProfileDraft;

/// Common `{status, message?, …}` reply shape.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Envelope {
    pub status: String,
    pub message: Option<String>,
    #[serde(alias = "sessionToken", alias = "session_token")]
    pub token: Option<String>,
    pub profile: Option<RawProfile>,
    /// `verify_session` replies carry this instead of a status.
    pub valid: Option<bool>,
}

impl Envelope {
    /// Whether the backend reported success.
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }

    /// Failure message, with a fallback when the backend omitted one.
    pub fn failure_message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| "unspecified backend failure".to_string())
    }
}

/// Check whether a reply means the session token was rejected.
///
/// Observed spellings: a dedicated status, or a free-text message. HTTP 401
/// is handled at the transport layer before payloads are parsed.
pub fn is_unauthorized(envelope: &Envelope) -> bool {
    matches!(
        envelope.status.as_str(),
        "session_expired" | "invalid_token" | "unauthorized"
    ) || envelope.message.as_deref().is_some_and(|m| {
        let m = m.to_ascii_lowercase();
        m.contains("session expired") || m.contains("invalid token") || m.contains("invalid session")
    })
}

/// Profile document as the backend stores it.
///
/// Field aliases absorb the sheet-column vs camelCase drift. Everything is
/// optional; missing fields become empty strings in the draft.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawProfile {
    #[serde(alias = "Name")]
    pub name: Option<String>,
    #[serde(alias = "Tagline")]
    pub tagline: Option<String>,
    #[serde(alias = "Phone")]
    pub phone: Option<String>,
    #[serde(alias = "Address")]
    pub address: Option<String>,
    #[serde(
        rename = "profilePic",
        alias = "ProfilePic",
        alias = "profilePicUrl",
        alias = "profile_pic"
    )]
    pub profile_pic: Option<String>,
    /// Public-profile slug, assigned server-side.
    #[serde(alias = "Link")]
    pub link: Option<String>,
    #[serde(rename = "socialLinks", alias = "Social Links", alias = "social_links")]
    pub social_links: Option<SocialLinksField>,
}

/// The social links sheet cell: newline-delimited text in older revisions,
/// a JSON array in newer ones.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SocialLinksField {
    Text(String),
    List(Vec<String>),
}

impl SocialLinksField {
    /// Flatten either representation into the canonical ordered list,
    /// dropping blank entries.
    pub fn into_links(self) -> Vec<String> {
        match self {
            SocialLinksField::Text(text) => text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            SocialLinksField::List(items) => items
                .into_iter()
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect(),
        }
    }
}

impl From<RawProfile> for ProfileDraft {
    fn from(raw: RawProfile) -> Self {
        ProfileDraft {
            name: raw.name.unwrap_or_default(),
            tagline: raw.tagline.unwrap_or_default(),
            phone: raw.phone.unwrap_or_default(),
            address: raw.address.unwrap_or_default(),
            profile_pic_url: raw.profile_pic.unwrap_or_default(),
            link: raw.link.unwrap_or_default(),
            social_links: raw
                .social_links
                .map(SocialLinksField::into_links)
                .unwrap_or_default(),
        }
    }
}

/// Build the `data=` JSON the backend expects from an update.
///
/// The sheet stores social links as one newline-delimited cell, so the
/// ordered list collapses back to text here. The `link` slug is
/// server-assigned and never sent back.
pub fn update_payload(draft: &ProfileDraft) -> Value {
    json!({
        "name": draft.name,
        "tagline": draft.tagline,
        "phone": draft.phone,
        "address": draft.address,
        "profilePic": draft.profile_pic_url,
        "socialLinks": draft.social_links.join("\n"),
    })
}

/// Parse a `get_profile` reply body.
///
/// Two shapes exist in the wild: `{status, profile: {…}}` and the bare
/// document (optionally flagged with `{error: true, message}`).
pub fn parse_profile_body(body: &str) -> Result<RawProfile, GatewayError> {
    let value: Value = serde_json::from_str(body).map_err(|e| GatewayError::InvalidPayload {
        reason: format!("profile reply is not JSON: {e}"),
    })?;

    let is_envelope = value
        .as_object()
        .is_some_and(|object| object.contains_key("status"));
    if is_envelope {
        let envelope: Envelope =
            serde_json::from_value(value).map_err(|e| GatewayError::InvalidPayload {
                reason: format!("malformed profile envelope: {e}"),
            })?;
        if is_unauthorized(&envelope) {
            return Err(GatewayError::Unauthorized);
        }
        if !envelope.is_success() {
            return Err(GatewayError::Rejected {
                message: envelope.failure_message(),
            });
        }
        return envelope.profile.ok_or_else(|| GatewayError::InvalidPayload {
            reason: "success reply without a profile document".to_string(),
        });
    }

    let error_flagged = value
        .as_object()
        .is_some_and(|object| object.get("error").and_then(Value::as_bool) == Some(true));
    if error_flagged {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unspecified backend failure")
            .to_string();
        return Err(GatewayError::Rejected { message });
    }

    serde_json::from_value(value).map_err(|e| GatewayError::InvalidPayload {
        reason: format!("malformed profile document: {e}"),
    })
}

/// Raw analytics counters.
///
/// The counter endpoint lowercases its keys; older captures camelCase them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawAnalytics {
    #[serde(rename = "totalvisits", alias = "totalVisits")]
    pub total_visits: u64,
    #[serde(rename = "totalclicks", alias = "totalClicks")]
    pub total_clicks: u64,
    pub shares: u64,
    #[serde(rename = "copieddetails", alias = "copiedDetails")]
    pub copied_details: u64,
    /// Clicks per link, keyed by 1-based position in the profile's list.
    pub links: HashMap<String, u64>,
}
