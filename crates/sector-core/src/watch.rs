// Status change polling
//
// A background task polls `Site::status()` on a fixed period and fires
// edge-triggered callbacks when the main or annex arming status changes.
// The state machine lives in `StatusWatch`, separate from the timer, so
// tests drive ticks directly instead of waiting on wall-clock intervals.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::site::Site;
use crate::transform::StatusOutput;

/// Callback invoked with the freshly fetched status when a tracked
/// value changes.
pub type StatusCallback = Box<dyn Fn(&StatusOutput) + Send + Sync>;

/// Last observed value per axis. `None` until the first successful tick.
#[derive(Debug, Default)]
struct PollState {
    main: Option<String>,
    annex: Option<String>,
}

/// Edge-triggered change detector over the two arming-status axes.
///
/// The first observation seeds each axis without firing its callback;
/// after that, a callback fires exactly when its axis changes value.
/// The axes are independent: one status payload may fire both, either,
/// or neither.
pub struct StatusWatch {
    state: PollState,
    on_changed: StatusCallback,
    on_annex_changed: StatusCallback,
}

impl StatusWatch {
    pub fn new(
        on_changed: impl Fn(&StatusOutput) + Send + Sync + 'static,
        on_annex_changed: impl Fn(&StatusOutput) + Send + Sync + 'static,
    ) -> Self {
        Self {
            state: PollState::default(),
            on_changed: Box::new(on_changed),
            on_annex_changed: Box::new(on_annex_changed),
        }
    }

    /// Advance both axes with a freshly fetched status.
    pub fn apply(&mut self, status: &StatusOutput) {
        Self::advance(
            &mut self.state.main,
            &status.armed_status,
            status,
            &self.on_changed,
        );
        Self::advance(
            &mut self.state.annex,
            &status.annex_armed_status,
            status,
            &self.on_annex_changed,
        );
    }

    fn advance(
        axis: &mut Option<String>,
        observed: &str,
        status: &StatusOutput,
        callback: &StatusCallback,
    ) {
        match axis.as_deref() {
            // First observation seeds the axis; not a change.
            None => *axis = Some(observed.to_owned()),
            Some(previous) if previous != observed => {
                *axis = Some(observed.to_owned());
                callback(status);
            }
            Some(_) => {}
        }
    }
}

/// Handle to a running poll loop. Dropping it does not stop the loop;
/// call [`stop`](Self::stop).
pub struct WatchHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl WatchHandle {
    /// Stop scheduling further ticks. An in-flight status call completes
    /// or fails on its own; its result is discarded.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Stop the loop and wait for the task to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.task.await;
    }
}

impl Site {
    /// Poll `status()` every `period`, firing `on_changed` when the main
    /// arming status changes and `on_annex_changed` when the annex status
    /// changes.
    ///
    /// A failed tick is logged and leaves the last observed values
    /// unchanged, so the next successful tick diffs against the last
    /// known good state. Ticks run sequentially: a status call that
    /// outlasts the period delays the next tick, and delayed ticks then
    /// fire back-to-back until the schedule catches up.
    pub fn watch(
        self: &Arc<Self>,
        period: Duration,
        on_changed: impl Fn(&StatusOutput) + Send + Sync + 'static,
        on_annex_changed: impl Fn(&StatusOutput) + Send + Sync + 'static,
    ) -> WatchHandle {
        let site = Arc::clone(self);
        let cancel = CancellationToken::new();
        let watch = StatusWatch::new(on_changed, on_annex_changed);
        let task = tokio::spawn(watch_task(site, period, cancel.clone(), watch));
        WatchHandle { cancel, task }
    }
}

async fn watch_task(
    site: Arc<Site>,
    period: Duration,
    cancel: CancellationToken,
    mut watch: StatusWatch,
) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                match site.status().await {
                    Ok(status) => watch.apply(&status),
                    Err(e) => {
                        debug!(error = %e, site_id = %site.site_id(), "status poll failed");
                    }
                }
            }
        }
    }

    debug!(site_id = %site.site_id(), "watch stopped");
}
