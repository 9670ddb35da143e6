//! Platform service abstraction
//!
//! The actual download manager, retry policy and storage layer live inside
//! the host platform's delivery service. This module only defines the seam:
//! one trait with the operations the bridge forwards, plus the data shapes
//! that cross it. Everything behind [`DeliveryPlatform`] is host-owned and
//! opaque to this crate.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Snapshot of a pack's download state as reported by the platform.
///
/// Fields are the platform's raw integers; see [`crate::constants`] for the
/// meaning of `status` and `error_code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackState {
    pub status: i32,
    pub bytes_downloaded: i64,
    pub total_bytes_to_download: i64,
    pub transfer_progress_percentage: i32,
    pub error_code: i32,
}

impl Default for PackState {
    fn default() -> Self {
        Self {
            status: constants::STATUS_UNKNOWN,
            bytes_downloaded: 0,
            total_bytes_to_download: 0,
            transfer_progress_percentage: 0,
            error_code: constants::ERRORCODE_NO_ERROR,
        }
    }
}

/// Outcome of an asynchronous platform request.
#[derive(Debug, Clone)]
pub enum TaskOutcome<T> {
    Completed(T),
    Canceled,
    Failed(String),
}

/// User's answer to the download confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogChoice {
    Confirmed,
    Declined,
}

/// Completion callback for an asynchronous platform request.
///
/// May be invoked from any thread the platform runs its work on.
pub type Completion<T> = Box<dyn FnOnce(TaskOutcome<T>) + Send>;

/// Push channel for unsolicited pack-state updates from the platform.
pub type StateUpdateHook = Box<dyn Fn(&str, PackState) + Send + Sync>;

/// The host-owned asset pack delivery service.
///
/// Implementations forward each operation to the real platform API. Requests
/// that the platform runs asynchronously take a [`Completion`] and must call
/// it exactly once; they never block the calling thread on network or disk
/// work. The bridge layers no retries, timeouts or batching on top.
pub trait DeliveryPlatform: Send + Sync {
    /// Starts downloading the pack. Completion carries the resulting state.
    fn fetch(&self, pack_name: &str, done: Completion<PackState>);

    /// Requests a fresh state snapshot for the pack.
    fn query_pack_state(&self, pack_name: &str, done: Completion<PackState>);

    /// Cancels an in-flight download. Synchronous on the platform side; the
    /// returned state reflects the pack after cancellation.
    fn cancel(&self, pack_name: &str) -> PackState;

    /// Deletes the pack from local storage.
    fn remove_pack(&self, pack_name: &str, done: Completion<()>);

    /// Shows the platform's consent dialog for packs waiting on user
    /// confirmation or cellular data.
    fn show_confirmation_dialog(&self, pack_name: &str, done: Completion<DialogChoice>);

    /// Local filesystem location of a downloaded pack, `None` if the pack is
    /// not present on the device.
    fn pack_location(&self, pack_name: &str) -> Option<String>;

    /// Registers a hook invoked whenever the platform reports a state change
    /// on its own initiative (download progress, install completion, ...).
    fn subscribe(&self, hook: StateUpdateHook);
}

/// Inert platform for hosts without a delivery service (desktop builds,
/// editor runs). Every query answers "not present" and every asynchronous
/// request fails immediately with `ERRORCODE_API_NOT_AVAILABLE` semantics, so
/// scripts see the same fire-and-forget surface everywhere.
#[derive(Debug, Default)]
pub struct NullPlatform;

impl NullPlatform {
    pub fn new() -> Self {
        Self
    }

    fn unavailable() -> String {
        "asset pack delivery is not available on this platform".to_string()
    }
}

impl DeliveryPlatform for NullPlatform {
    fn fetch(&self, pack_name: &str, done: Completion<PackState>) {
        tracing::debug!(target: "asset_delivery", "NullPlatform fetch {pack_name}");
        done(TaskOutcome::Failed(Self::unavailable()));
    }

    fn query_pack_state(&self, pack_name: &str, done: Completion<PackState>) {
        tracing::debug!(target: "asset_delivery", "NullPlatform query_pack_state {pack_name}");
        done(TaskOutcome::Failed(Self::unavailable()));
    }

    fn cancel(&self, _pack_name: &str) -> PackState {
        PackState {
            error_code: constants::ERRORCODE_API_NOT_AVAILABLE,
            ..PackState::default()
        }
    }

    fn remove_pack(&self, pack_name: &str, done: Completion<()>) {
        tracing::debug!(target: "asset_delivery", "NullPlatform remove_pack {pack_name}");
        done(TaskOutcome::Failed(Self::unavailable()));
    }

    fn show_confirmation_dialog(&self, pack_name: &str, done: Completion<DialogChoice>) {
        tracing::debug!(target: "asset_delivery", "NullPlatform show_confirmation_dialog {pack_name}");
        done(TaskOutcome::Failed(Self::unavailable()));
    }

    fn pack_location(&self, _pack_name: &str) -> Option<String> {
        None
    }

    fn subscribe(&self, _hook: StateUpdateHook) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn null_platform_has_no_packs() {
        let platform = NullPlatform::new();
        assert_eq!(platform.pack_location("pack1"), None);

        let state = platform.cancel("pack1");
        assert_eq!(state.status, constants::STATUS_UNKNOWN);
        assert_eq!(state.error_code, constants::ERRORCODE_API_NOT_AVAILABLE);
    }

    #[test]
    fn null_platform_fails_async_requests_immediately() {
        let platform = NullPlatform::new();
        let failed = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&failed);
        platform.fetch(
            "pack1",
            Box::new(move |outcome| {
                assert!(matches!(outcome, TaskOutcome::Failed(_)));
                flag.store(true, Ordering::SeqCst);
            }),
        );
        assert!(failed.load(Ordering::SeqCst));
    }

    #[test]
    fn default_pack_state_is_unknown() {
        let state = PackState::default();
        assert_eq!(state.status, constants::STATUS_UNKNOWN);
        assert_eq!(state.bytes_downloaded, 0);
        assert_eq!(state.error_code, constants::ERRORCODE_NO_ERROR);
    }
}
