//! The engine facade.
//!
//! [`Client`] wires the session manager, sync controller, gateway, store,
//! and clock together and is the type front ends hold. It is cheaply
//! cloneable; all shared state lives behind one async lock, which is what
//! guarantees the auto-save task and the caller can never run two saves
//! for the same draft concurrently: a late arrival queues on the lock,
//! and a queued auto-save then finds the draft clean and sends nothing.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::analytics::{self, AnalyticsReport};
use crate::clock::{Clock, SystemClock};
use crate::profile::autosave::AutoSaveHandle;
use crate::profile::{ProfileDraft, ProfileError, ProfileSync, SaveReport, Trigger};
use crate::remote::{Gateway, ScriptGateway};
use crate::session::{Session, SessionManager};
use crate::settings::Settings;
use crate::store::StateStore;
use crate::upload::{self, HttpImageHost, ImageHost};
use crate::Result;

struct ClientInner {
    session: SessionManager,
    profile: ProfileSync,
}

/// Handle to the profile-editing engine.
#[derive(Clone)]
pub struct Client {
    settings: Settings,
    gateway: Arc<dyn Gateway>,
    image_host: Arc<dyn ImageHost>,
    inner: Arc<Mutex<ClientInner>>,
    autosave: Arc<Mutex<Option<AutoSaveHandle>>>,
}

impl Client {
    /// Open a client with the production HTTP collaborators.
    pub fn open(settings: Settings, store: Arc<dyn StateStore>) -> Result<Self> {
        let gateway: Arc<dyn Gateway> = Arc::new(ScriptGateway::new(&settings)?);
        let image_host: Arc<dyn ImageHost> = Arc::new(HttpImageHost::new(&settings)?);
        Self::new(settings, store, gateway, image_host, Arc::new(SystemClock))
    }

    /// Build a client from explicit collaborators.
    ///
    /// Replays a persisted session during construction, so a front end can
    /// check [`session`](Self::session) right away and skip its login
    /// screen.
    pub fn new(
        settings: Settings,
        store: Arc<dyn StateStore>,
        gateway: Arc<dyn Gateway>,
        image_host: Arc<dyn ImageHost>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let mut session =
            SessionManager::new(settings.clone(), gateway.clone(), store, clock);
        session.restore_session()?;
        let profile = ProfileSync::new(settings.clone(), gateway.clone());

        Ok(Self {
            settings,
            gateway,
            image_host,
            inner: Arc::new(Mutex::new(ClientInner { session, profile })),
            autosave: Arc::new(Mutex::new(None)),
        })
    }

    /// The configuration this client runs with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // === Session lifecycle ===

    /// Ask the backend to email a verification code.
    pub async fn request_code(&self, email: &str) -> Result<()> {
        self.inner.lock().await.session.request_code(email).await
    }

    /// Present the received code; the session on success. When the backend
    /// returns the profile alongside the grant it is adopted immediately,
    /// saving the separate load.
    pub async fn verify_code(&self, code: &str) -> Result<Session> {
        let mut inner = self.inner.lock().await;
        let login = inner.session.verify_code(code).await?;
        if let Some(draft) = login.profile {
            debug!("profile arrived with the verification grant");
            inner.profile.adopt(draft);
        }
        Ok(login.session)
    }

    /// Abandon an in-progress login (the "back" action).
    pub async fn cancel_login(&self) -> Result<()> {
        self.inner.lock().await.session.cancel_login()
    }

    /// Replay the persisted session, if one is still live.
    pub async fn restore_session(&self) -> Result<Option<Session>> {
        self.inner.lock().await.session.restore_session()
    }

    /// The active session, if logged in.
    pub async fn session(&self) -> Option<Session> {
        self.inner.lock().await.session.session().cloned()
    }

    /// Countdown until a code may be re-requested.
    pub async fn resend_remaining(&self) -> Option<std::time::Duration> {
        self.inner.lock().await.session.resend_remaining()
    }

    /// Log out and discard the draft. Idempotent.
    pub async fn logout(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner.session.logout()?;
        inner.profile.discard();
        Ok(())
    }

    // === Profile ===

    /// Fetch the stored profile for the active session.
    pub async fn load_profile(&self) -> Result<ProfileDraft> {
        let mut inner = self.inner.lock().await;
        let ClientInner { session, profile } = &mut *inner;
        profile.load(session).await
    }

    /// Snapshot of the current draft.
    pub async fn draft(&self) -> Option<ProfileDraft> {
        self.inner.lock().await.profile.draft().cloned()
    }

    /// The unsaved-changes signal for navigation guards.
    pub async fn is_dirty(&self) -> bool {
        self.inner.lock().await.profile.is_dirty()
    }

    /// The last successfully synchronized document, if any.
    pub async fn last_synced(&self) -> Option<ProfileDraft> {
        self.inner.lock().await.profile.last_synced().cloned()
    }

    pub async fn set_name(&self, name: &str) -> Result<()> {
        self.inner.lock().await.profile.set_name(name)?;
        self.touch().await;
        Ok(())
    }

    pub async fn set_tagline(&self, tagline: &str) -> Result<()> {
        self.inner.lock().await.profile.set_tagline(tagline)?;
        self.touch().await;
        Ok(())
    }

    pub async fn set_phone(&self, phone: &str) -> Result<()> {
        self.inner.lock().await.profile.set_phone(phone)?;
        self.touch().await;
        Ok(())
    }

    pub async fn set_address(&self, address: &str) -> Result<()> {
        self.inner.lock().await.profile.set_address(address)?;
        self.touch().await;
        Ok(())
    }

    pub async fn set_profile_pic(&self, url: &str) -> Result<()> {
        self.inner.lock().await.profile.set_profile_pic(url)?;
        self.touch().await;
        Ok(())
    }

    pub async fn add_social_link(&self, url: &str) -> Result<()> {
        self.inner.lock().await.profile.add_social_link(url)?;
        self.touch().await;
        Ok(())
    }

    pub async fn remove_social_link(&self, index: usize) -> Result<String> {
        let removed = self.inner.lock().await.profile.remove_social_link(index)?;
        self.touch().await;
        Ok(removed)
    }

    pub async fn move_social_link(&self, from: usize, to: usize) -> Result<()> {
        self.inner.lock().await.profile.move_social_link(from, to)?;
        self.touch().await;
        Ok(())
    }

    /// Save the draft now.
    pub async fn save(&self) -> Result<SaveReport> {
        self.save_with(Trigger::Manual).await
    }

    pub(crate) async fn save_with(&self, trigger: Trigger) -> Result<SaveReport> {
        let mut inner = self.inner.lock().await;
        let ClientInner { session, profile } = &mut *inner;
        profile.save(session, trigger).await
    }

    // === Auto-save ===

    /// Start the debounced auto-save engine. No-op when already running.
    pub async fn start_autosave(&self) {
        let mut slot = self.autosave.lock().await;
        if slot.is_none() {
            *slot = Some(AutoSaveHandle::spawn(
                self.clone(),
                self.settings.autosave_quiet,
            ));
        }
    }

    /// Stop the engine and wait for it to wind down. No-op when stopped.
    pub async fn stop_autosave(&self) {
        let handle = self.autosave.lock().await.take();
        if let Some(handle) = handle {
            handle.shutdown().await;
        }
    }

    /// Pause or resume the engine without tearing it down. Pausing clears
    /// any pending debounce deadline.
    pub async fn set_autosave_enabled(&self, enabled: bool) {
        if let Some(handle) = self.autosave.lock().await.as_ref() {
            handle.set_enabled(enabled).await;
        }
    }

    /// Ask the engine to save now if the draft is dirty (fire-and-forget).
    pub async fn flush_autosave(&self) {
        if let Some(handle) = self.autosave.lock().await.as_ref() {
            handle.flush().await;
        }
    }

    async fn touch(&self) {
        if let Some(handle) = self.autosave.lock().await.as_ref() {
            handle.touched().await;
        }
    }

    // === Analytics ===

    /// Fetch the link dashboard for the loaded profile.
    ///
    /// Degrades to an all-zero report when the counters are unreachable;
    /// analytics never break the editor. A profile without a public slug
    /// has nothing to look up and reports empty without a network call.
    pub async fn analytics(&self) -> Result<AnalyticsReport> {
        let (link, links) = {
            let inner = self.inner.lock().await;
            let draft = inner.profile.draft().ok_or(ProfileError::NotLoaded)?;
            (draft.link.clone(), draft.social_links.clone())
        };

        if link.is_empty() {
            debug!("profile has no public slug; skipping analytics fetch");
            return Ok(AnalyticsReport::default());
        }

        match self.gateway.fetch_analytics(&link).await {
            Ok(raw) => Ok(analytics::build_report(raw, &links)),
            Err(err) => {
                warn!(error = %err, "analytics fetch failed, returning an empty report");
                Ok(AnalyticsReport::default())
            }
        }
    }

    // === Uploads ===

    /// Upload a profile picture and apply the returned URL to the draft.
    ///
    /// Constraints (format, size) are checked before any bytes leave the
    /// machine, regardless of the host implementation.
    pub async fn upload_profile_pic(&self, file_name: &str, bytes: Vec<u8>) -> Result<String> {
        upload::check_image(&bytes)?;
        let url = self.image_host.upload(file_name, bytes).await?;
        self.inner.lock().await.profile.set_profile_pic(&url)?;
        self.touch().await;
        Ok(url)
    }
}
