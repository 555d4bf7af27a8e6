// Site session
//
// Holds per-site session state and presents business-level operations
// that hide the login/cookie/version plumbing. No operation retries or
// re-logs-in internally: a failed call reaches the caller unmodified,
// and recovering from an expired session is the caller's decision.

use std::sync::RwLock;

use secrecy::SecretString;
use serde::Serialize;
use tracing::debug;

use sector_api::{ArmingAction, Error, LockAction, SessionClient, SessionCookie, TransportConfig};

use crate::config::Settings;
use crate::output;
use crate::transform::{
    self, ActionOutcome, HistoryEntry, InfoOutput, LockStatus, StatusOutput, TemperatureReading,
};

/// Working state produced by a successful login. Re-login replaces it.
#[derive(Debug, Clone)]
struct SessionState {
    version: String,
    cookie: SessionCookie,
}

/// An authenticated session against one monitored site.
///
/// Credentials and the site id are fixed at construction; the session
/// cookie and service version are written by [`login`](Self::login) and
/// read by every other operation.
pub struct Site {
    client: SessionClient,
    site_id: String,
    email: String,
    password: SecretString,
    settings: Settings,
    session: RwLock<Option<SessionState>>,
}

impl Site {
    /// Create a session for `site_id`. Does not talk to the service --
    /// call [`login`](Self::login) first.
    pub fn new(
        email: impl Into<String>,
        password: SecretString,
        site_id: impl Into<String>,
        settings: Settings,
    ) -> Result<Self, Error> {
        let transport = TransportConfig {
            timeout: settings.timeout,
        };
        let client = SessionClient::new(settings.base_url.clone(), &transport)?;
        Ok(Self {
            client,
            site_id: site_id.into(),
            email: email.into(),
            password,
            settings,
            session: RwLock::new(None),
        })
    }

    /// The site identifier this session operates on.
    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    /// The settings this session was built with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Render an output value for display, honoring the session's
    /// `json_output` setting.
    pub fn render<T: Serialize>(&self, value: &T) -> Result<String, Error> {
        output::render(value, self.settings.json_output)
    }

    /// Authenticate: fetch service metadata, then log in with the
    /// pre-auth token. Stores the resulting version and session cookie,
    /// replacing any earlier session.
    pub async fn login(&self) -> Result<(), Error> {
        let metadata = self.client.get_metadata().await?;
        let cookie = self
            .client
            .login(&self.email, &self.password, &metadata.cookie)
            .await?;

        debug!(site_id = %self.site_id, version = %metadata.version, "session established");
        *self.session.write().expect("session lock poisoned") = Some(SessionState {
            version: metadata.version,
            cookie,
        });
        Ok(())
    }

    /// Snapshot the stored session, or fail the way an authenticated call
    /// without a cookie would.
    fn session(&self) -> Result<SessionState, Error> {
        self.session
            .read()
            .expect("session lock poisoned")
            .clone()
            .ok_or(Error::InvalidSession)
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Current arming status for the main panel and annex.
    pub async fn status(&self) -> Result<StatusOutput, Error> {
        let session = self.session()?;
        let raw = self
            .client
            .get_status(&self.site_id, &session.cookie, &session.version)
            .await?;
        Ok(transform::status_output(&self.site_id, &raw))
    }

    /// Static site information (name, capabilities, device counts).
    pub async fn info(&self) -> Result<InfoOutput, Error> {
        let session = self.session()?;
        let raw = self
            .client
            .get_status(&self.site_id, &session.cookie, &session.version)
            .await?;
        Ok(transform::info_output(&self.site_id, &raw))
    }

    /// The most recent panel log entries, `top` defaulting to 10.
    pub async fn history(&self, top: Option<usize>) -> Result<Vec<HistoryEntry>, Error> {
        let session = self.session()?;
        let raw = self
            .client
            .get_history(&self.site_id, &session.cookie)
            .await?;
        Ok(transform::history_output(&raw, top.unwrap_or(10)))
    }

    /// Temperature readings, optionally for a single sensor.
    pub async fn temperatures(
        &self,
        sensor_id: Option<&str>,
    ) -> Result<Vec<TemperatureReading>, Error> {
        let session = self.session()?;
        let raw = self
            .client
            .get_temperatures(&self.site_id, &session.cookie, &session.version)
            .await?;
        Ok(transform::temperatures_output(&raw, sensor_id))
    }

    /// Lock states, optionally for a single lock.
    pub async fn locks(&self, lock_id: Option<&str>) -> Result<Vec<LockStatus>, Error> {
        let session = self.session()?;
        let raw = self.client.get_locks(&self.site_id, &session.cookie).await?;
        Ok(transform::locks_output(&raw, lock_id))
    }

    // ── Panel commands ───────────────────────────────────────────────

    /// Arm the full site.
    pub async fn arm(&self, code: &str) -> Result<ActionOutcome, Error> {
        self.act(ArmingAction::Total, code).await
    }

    /// Arm the perimeter only.
    pub async fn partial_arm(&self, code: &str) -> Result<ActionOutcome, Error> {
        self.act(ArmingAction::Partial, code).await
    }

    /// Arm the annex panel.
    pub async fn annex_arm(&self, code: &str) -> Result<ActionOutcome, Error> {
        self.act(ArmingAction::ArmAnnex, code).await
    }

    /// Disarm the full site.
    pub async fn disarm(&self, code: &str) -> Result<ActionOutcome, Error> {
        self.act(ArmingAction::Disarm, code).await
    }

    /// Disarm the annex panel.
    pub async fn annex_disarm(&self, code: &str) -> Result<ActionOutcome, Error> {
        self.act(ArmingAction::DisarmAnnex, code).await
    }

    async fn act(&self, action: ArmingAction, code: &str) -> Result<ActionOutcome, Error> {
        let session = self.session()?;
        let raw = self
            .client
            .act(&self.site_id, &session.cookie, code, action.as_str())
            .await?;
        Ok(transform::action_output(&raw))
    }

    // ── Lock commands ────────────────────────────────────────────────

    /// Lock a single connected lock.
    pub async fn lock(&self, lock_id: &str, code: &str) -> Result<ActionOutcome, Error> {
        self.act_on_lock(LockAction::Lock, lock_id, code).await
    }

    /// Unlock a single connected lock.
    pub async fn unlock(&self, lock_id: &str, code: &str) -> Result<ActionOutcome, Error> {
        self.act_on_lock(LockAction::Unlock, lock_id, code).await
    }

    async fn act_on_lock(
        &self,
        action: LockAction,
        lock_id: &str,
        code: &str,
    ) -> Result<ActionOutcome, Error> {
        let session = self.session()?;
        let raw = self
            .client
            .act_on_lock(
                &self.site_id,
                lock_id,
                &session.cookie,
                code,
                action.as_str(),
            )
            .await?;
        Ok(transform::lock_action_output(&raw))
    }
}
