// Lock endpoints
//
// Lock listing and the lock/unlock command. The command string doubles as
// the endpoint path segment, so validation happens before the URL exists.

use serde_json::{json, Value};
use tracing::debug;

use crate::action::LockAction;
use crate::client::{SessionClient, SessionCookie};
use crate::error::Error;

impl SessionClient {
    /// List the site's connected locks with their current state.
    ///
    /// `GET /Locks/GetLocks/?WithStatus=true&id={site_id}`
    pub async fn get_locks(&self, site_id: &str, session: &SessionCookie) -> Result<Value, Error> {
        let url = self.page_url(&format!("Locks/GetLocks/?WithStatus=true&id={site_id}"))?;
        debug!(site_id, "fetching locks");
        self.authed_get(url, session).await
    }

    /// Issue a lock or unlock command against a single lock.
    ///
    /// `POST /Locks/{Lock|Unlock}` with `{ id, panelId, code }`.
    /// The action string is validated against [`LockAction`] before any
    /// request is built.
    pub async fn act_on_lock(
        &self,
        site_id: &str,
        lock_id: &str,
        session: &SessionCookie,
        code: &str,
        action: &str,
    ) -> Result<Value, Error> {
        let action: LockAction = action.parse()?;

        let url = self.page_url(&format!("Locks/{}", action.as_str()))?;
        debug!(site_id, lock_id, %action, "sending lock command");
        self.authed_post(
            url,
            session,
            &json!({
                "id": lock_id,
                "panelId": site_id,
                "code": code,
            }),
        )
        .await
    }
}
