//! Engine configuration.
//!
//! All tunables live in one explicit [`Settings`] object handed to the
//! [`Client`](crate::Client) at construction. There is no module-level
//! configuration state.

use std::time::Duration;

use url::Url;

/// Subscription tier, which bounds how many social links a profile may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Plan {
    /// Free tier, capped at 6 links.
    #[default]
    Basic,
    Standard,
    Premium,
}

impl Plan {
    /// Maximum number of social links for this plan, `None` when unbounded.
    pub fn max_social_links(&self) -> Option<usize> {
        match self {
            Plan::Basic => Some(6),
            Plan::Standard | Plan::Premium => None,
        }
    }
}

/// Engine configuration.
///
/// [`Settings::new`] takes the three backend endpoints and fills in the
/// remaining tunables with their defaults; override fields directly when a
/// deployment needs different timings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Profile/auth backend endpoint (the spreadsheet script URL).
    pub script_url: Url,
    /// Analytics counter endpoint.
    pub analytics_url: Url,
    /// Image host upload endpoint.
    pub upload_url: Url,
    /// Upper bound on every backend round trip. A call that exceeds this is
    /// reported as a timeout instead of hanging.
    pub request_timeout: Duration,
    /// Session lifetime from the moment a code is verified.
    pub session_ttl: Duration,
    /// How long a requested verification code stays usable.
    pub code_ttl: Duration,
    /// Minimum wait before a code can be re-requested for the same login.
    pub resend_cooldown: Duration,
    /// Quiet period after the last edit before an auto-save fires.
    pub autosave_quiet: Duration,
    /// Subscription tier of the signed-in account.
    pub plan: Plan,
    /// When set, interactive front ends should log the session out when the
    /// user leaves. Off by default; kept as a policy switch because only
    /// some deployments want sessions scoped to a single visit.
    pub logout_on_close: bool,
}

impl Settings {
    /// Build settings for the given endpoints with default timings.
    pub fn new(script_url: Url, analytics_url: Url, upload_url: Url) -> Self {
        Self {
            script_url,
            analytics_url,
            upload_url,
            request_timeout: Duration::from_secs(10),
            session_ttl: Duration::from_secs(24 * 60 * 60),
            code_ttl: Duration::from_secs(10 * 60),
            resend_cooldown: Duration::from_secs(60),
            autosave_quiet: Duration::from_secs(8),
            plan: Plan::default(),
            logout_on_close: false,
        }
    }
}

impl Default for Settings {
    /// Placeholder endpoints; real deployments must point at their script.
    fn default() -> Self {
        let script = Url::parse("https://script.invalid/exec").expect("static URL parses");
        let analytics = Url::parse("https://analytics.invalid/query").expect("static URL parses");
        let upload = Url::parse("https://images.invalid/upload").expect("static URL parses");
        Self::new(script, analytics, upload)
    }
}
