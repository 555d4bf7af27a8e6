use std::time::Duration;

use url::Url;

/// Settings for a [`Site`](crate::Site) session.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Service root. Only needs changing for tests.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Render outputs as compact JSON instead of pretty-printed.
    pub json_output: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: Url::parse("https://mypagesapi.sectoralarm.net")
                .expect("default service URL"),
            timeout: Duration::from_secs(30),
            json_output: false,
        }
    }
}
