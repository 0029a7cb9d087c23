//! The profile sync controller.

use std::sync::Arc;

use tracing::{debug, info, warn};
use url::Url;

use super::{ProfileDraft, ProfileError, SaveReport, Trigger};
use crate::remote::{Gateway, GatewayError};
use crate::session::{AuthError, SessionManager};
use crate::settings::Settings;
use crate::validation::TAGLINE_MAX_CHARS;
use crate::Result;

/// Reconciles the locally edited draft with the remote store.
///
/// Holds the draft, the last-synced snapshot, and the dirty flag. All
/// mutations are pure in-memory edits; only [`load`](Self::load) and
/// [`save`](Self::save) touch the network, and both take the session
/// manager so an expired token can force the logout transition.
///
/// Callers sharing one controller across tasks must serialize access (the
/// [`Client`](crate::Client) facade does this with a single lock); two
/// saves for the same draft must never be in flight at once.
pub struct ProfileSync {
    settings: Settings,
    gateway: Arc<dyn Gateway>,
    draft: Option<ProfileDraft>,
    last_synced: Option<ProfileDraft>,
    dirty: bool,
}

impl ProfileSync {
    /// Create an empty controller; nothing is loaded yet.
    pub fn new(settings: Settings, gateway: Arc<dyn Gateway>) -> Self {
        Self {
            settings,
            gateway,
            draft: None,
            last_synced: None,
            dirty: false,
        }
    }

    // === Draft state ===

    /// The current draft, if one is loaded.
    pub fn draft(&self) -> Option<&ProfileDraft> {
        self.draft.as_ref()
    }

    /// True while the draft differs from the last-synced state.
    ///
    /// This is the unsaved-changes signal a front end checks before
    /// navigating away; the controller itself never blocks navigation.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The last successfully synchronized document, if any.
    pub fn last_synced(&self) -> Option<&ProfileDraft> {
        self.last_synced.as_ref()
    }

    /// Adopt a freshly fetched document as both draft and snapshot.
    pub(crate) fn adopt(&mut self, draft: ProfileDraft) {
        self.last_synced = Some(draft.clone());
        self.draft = Some(draft);
        self.dirty = false;
    }

    /// Drop all local state (logout path).
    pub(crate) fn discard(&mut self) {
        self.draft = None;
        self.last_synced = None;
        self.dirty = false;
    }

    // === Network operations ===

    /// Fetch the stored profile for the active session.
    pub async fn load(&mut self, session: &mut SessionManager) -> Result<ProfileDraft> {
        let active = session.require_session()?;
        match self.gateway.get_profile(&active.email, &active.token).await {
            Ok(draft) => {
                debug!(email = %active.email, "profile loaded");
                self.adopt(draft.clone());
                Ok(draft)
            }
            Err(GatewayError::Unauthorized) => {
                session.expire_now()?;
                self.discard();
                Err(AuthError::SessionExpired.into())
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Push the draft to the remote store.
    ///
    /// Local validation runs first (nothing malformed reaches the
    /// network), then a cheap token preflight, then the write. On success
    /// the snapshot is replaced and the dirty flag clears; on a remote or
    /// network failure both draft and flag are left exactly as they were,
    /// so nothing the user typed is lost and a manual retry is safe. A
    /// token rejection at either step forces logout and surfaces as
    /// [`AuthError::SessionExpired`], distinct from a generic save failure.
    pub async fn save(
        &mut self,
        session: &mut SessionManager,
        trigger: Trigger,
    ) -> Result<SaveReport> {
        if trigger == Trigger::Auto && !self.dirty {
            return Ok(SaveReport::skipped());
        }

        let draft = self.draft.clone().ok_or(ProfileError::NotLoaded)?;
        if draft.name.trim().is_empty() {
            return Err(ProfileError::NameRequired.into());
        }

        let active = session.require_session()?;

        match self.gateway.verify_session(&active.token).await {
            Ok(true) => {}
            Ok(false) | Err(GatewayError::Unauthorized) => {
                session.expire_now()?;
                self.discard();
                return Err(AuthError::SessionExpired.into());
            }
            Err(other) => return Err(other.into()),
        }

        let (payload, dropped_links) = sanitize_links(&draft);
        if dropped_links > 0 {
            warn!(dropped_links, "dropping malformed social links from the save payload");
        }

        match self
            .gateway
            .update_profile(&active.email, &active.token, &payload)
            .await
        {
            Ok(()) => {
                self.last_synced = Some(draft);
                self.dirty = false;
                info!(?trigger, "profile saved");
                Ok(SaveReport {
                    skipped_clean: false,
                    dropped_links,
                })
            }
            Err(GatewayError::Unauthorized) => {
                session.expire_now()?;
                self.discard();
                Err(AuthError::SessionExpired.into())
            }
            Err(other) => Err(other.into()),
        }
    }

    // === Mutations (pure, in-memory) ===

    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.draft_mut()?.name = name.trim().to_string();
        self.dirty = true;
        Ok(())
    }

    pub fn set_tagline(&mut self, tagline: &str) -> Result<()> {
        let tagline = tagline.trim();
        if tagline.chars().count() > TAGLINE_MAX_CHARS {
            return Err(ProfileError::TaglineTooLong {
                max: TAGLINE_MAX_CHARS,
            }
            .into());
        }
        self.draft_mut()?.tagline = tagline.to_string();
        self.dirty = true;
        Ok(())
    }

    /// Phone numbers are stored in normalized digit grouping.
    pub fn set_phone(&mut self, phone: &str) -> Result<()> {
        self.draft_mut()?.phone = crate::validation::normalize_phone(phone);
        self.dirty = true;
        Ok(())
    }

    pub fn set_address(&mut self, address: &str) -> Result<()> {
        self.draft_mut()?.address = address.trim().to_string();
        self.dirty = true;
        Ok(())
    }

    pub fn set_profile_pic(&mut self, url: &str) -> Result<()> {
        self.draft_mut()?.profile_pic_url = url.trim().to_string();
        self.dirty = true;
        Ok(())
    }

    /// Append a social link, enforcing the plan's cap.
    ///
    /// A rejected addition leaves the list untouched; the error is a
    /// user-facing notice, not a fault.
    pub fn add_social_link(&mut self, url: &str) -> Result<()> {
        let cap = self.settings.plan.max_social_links();
        let draft = self.draft_mut()?;
        if let Some(max) = cap
            && draft.social_links.len() >= max
        {
            return Err(ProfileError::LinkLimitReached { max }.into());
        }
        draft.social_links.push(url.trim().to_string());
        self.dirty = true;
        Ok(())
    }

    /// Remove the link at `index`, returning it.
    pub fn remove_social_link(&mut self, index: usize) -> Result<String> {
        let draft = self.draft_mut()?;
        if index >= draft.social_links.len() {
            return Err(ProfileError::LinkIndexOutOfRange { index }.into());
        }
        let removed = draft.social_links.remove(index);
        self.dirty = true;
        Ok(removed)
    }

    /// Move the link at `from` so it sits at `to` (the drag-reorder
    /// primitive). A no-op move does not dirty the draft.
    pub fn move_social_link(&mut self, from: usize, to: usize) -> Result<()> {
        let draft = self.draft_mut()?;
        let len = draft.social_links.len();
        if from >= len {
            return Err(ProfileError::LinkIndexOutOfRange { index: from }.into());
        }
        if to >= len {
            return Err(ProfileError::LinkIndexOutOfRange { index: to }.into());
        }
        if from == to {
            return Ok(());
        }
        let link = draft.social_links.remove(from);
        draft.social_links.insert(to, link);
        self.dirty = true;
        Ok(())
    }

    fn draft_mut(&mut self) -> std::result::Result<&mut ProfileDraft, ProfileError> {
        self.draft.as_mut().ok_or(ProfileError::NotLoaded)
    }
}

/// Copy the draft for the wire, keeping only links that parse as URLs.
/// The backend tolerates missing entries but chokes on garbage, so
/// malformed ones are dropped rather than blocking the save.
fn sanitize_links(draft: &ProfileDraft) -> (ProfileDraft, usize) {
    let mut payload = draft.clone();
    let before = payload.social_links.len();
    payload.social_links.retain(|link| Url::parse(link).is_ok());
    let dropped = before - payload.social_links.len();
    (payload, dropped)
}
