// Panel endpoints
//
// Status, history, temperatures, and the arm/disarm command. All return
// the raw JSON payload; shaping is the caller's concern.

use serde_json::{json, Value};
use tracing::debug;

use crate::action::ArmingAction;
use crate::client::{SessionClient, SessionCookie};
use crate::error::Error;

impl SessionClient {
    /// Fetch the site overview (arming status, annex status, devices).
    ///
    /// `POST /Panel/GetOverview/` with `{ PanelId, Version }`
    pub async fn get_status(
        &self,
        site_id: &str,
        session: &SessionCookie,
        version: &str,
    ) -> Result<Value, Error> {
        let url = self.page_url("Panel/GetOverview/")?;
        debug!(site_id, "fetching panel overview");
        self.authed_post(
            url,
            session,
            &json!({
                "PanelId": site_id,
                "Version": version,
            }),
        )
        .await
    }

    /// Fetch the panel event log.
    ///
    /// `GET /Panel/GetPanelHistory/{site_id}`
    pub async fn get_history(
        &self,
        site_id: &str,
        session: &SessionCookie,
    ) -> Result<Value, Error> {
        let url = self.page_url(&format!("Panel/GetPanelHistory/{site_id}"))?;
        debug!(site_id, "fetching panel history");
        self.authed_get(url, session).await
    }

    /// Fetch temperature readings for the site's sensors.
    ///
    /// `POST /Panel/GetTemperatures/` with `{ PanelId, Version }`
    pub async fn get_temperatures(
        &self,
        site_id: &str,
        session: &SessionCookie,
        version: &str,
    ) -> Result<Value, Error> {
        let url = self.page_url("Panel/GetTemperatures/")?;
        debug!(site_id, "fetching temperatures");
        self.authed_post(
            url,
            session,
            &json!({
                "PanelId": site_id,
                "Version": version,
            }),
        )
        .await
    }

    /// Issue an arming command against the panel.
    ///
    /// `POST /Panel/ArmPanel/` with `{ ArmCmd, PanelCode, HasLocks, id }`.
    /// The action string is validated against [`ArmingAction`] before any
    /// request is built.
    pub async fn act(
        &self,
        site_id: &str,
        session: &SessionCookie,
        code: &str,
        action: &str,
    ) -> Result<Value, Error> {
        let action: ArmingAction = action.parse()?;

        let url = self.page_url("Panel/ArmPanel/")?;
        debug!(site_id, %action, "sending panel command");
        self.authed_post(
            url,
            session,
            &json!({
                "ArmCmd": action.as_str(),
                "PanelCode": code,
                "HasLocks": false,
                "id": site_id,
            }),
        )
        .await
    }
}
