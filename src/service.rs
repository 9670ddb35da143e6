//! Delivery service bridge
//!
//! [`PackDeliveryService`] sits between the scripting surface and the
//! platform's delivery service. It owns the last-known-state cache and the
//! FIFO queue of pending events: platform completion callbacks (which may run
//! on any platform thread) push into the queue through cloned channel
//! senders, and the engine tick drains it through [`next_event`].
//!
//! [`next_event`]: PackDeliveryService::next_event

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::constants;
use crate::event::PackEvent;
use crate::platform::{DeliveryPlatform, PackState, TaskOutcome};

type StateCache = Arc<Mutex<HashMap<String, PackState>>>;

pub struct PackDeliveryService {
    platform: Arc<dyn DeliveryPlatform>,
    states: StateCache,
    event_tx: Sender<PackEvent>,
    event_rx: Receiver<PackEvent>,
}

impl PackDeliveryService {
    /// Wraps a platform service and subscribes to its push updates.
    pub fn new(platform: Arc<dyn DeliveryPlatform>) -> Self {
        let (event_tx, event_rx) = unbounded();
        let states: StateCache = Arc::new(Mutex::new(HashMap::new()));

        // Unsolicited platform updates (download progress, install
        // completion) land in the same cache and queue as request outcomes.
        let hook_states = Arc::clone(&states);
        let hook_tx = event_tx.clone();
        platform.subscribe(Box::new(move |pack_name, state| {
            tracing::debug!(target: "asset_delivery", "state update {pack_name}");
            cache_and_notify(&hook_states, &hook_tx, pack_name.to_string(), state);
        }));

        Self {
            platform,
            states,
            event_tx,
            event_rx,
        }
    }

    /// Requests to download the pack. Fire-and-forget; the outcome arrives as
    /// a `PACK_STATE_UPDATED` or `PACK_STATE_ERROR` event.
    pub fn fetch(&self, pack_name: &str) {
        tracing::debug!(target: "asset_delivery", "fetch {pack_name}");
        let states = Arc::clone(&self.states);
        let tx = self.event_tx.clone();
        let name = pack_name.to_string();
        self.platform.fetch(
            pack_name,
            Box::new(move |outcome| state_outcome(&states, &tx, name, outcome)),
        );
    }

    /// Requests a fresh state snapshot for the pack. Fire-and-forget; a
    /// `PACK_STATE_UPDATED` event signals that the getters are current.
    pub fn request_pack_state(&self, pack_name: &str) {
        tracing::debug!(target: "asset_delivery", "request_pack_state {pack_name}");
        let states = Arc::clone(&self.states);
        let tx = self.event_tx.clone();
        let name = pack_name.to_string();
        self.platform.query_pack_state(
            pack_name,
            Box::new(move |outcome| state_outcome(&states, &tx, name, outcome)),
        );
    }

    /// Requests to cancel the download of the pack.
    pub fn cancel(&self, pack_name: &str) {
        tracing::debug!(target: "asset_delivery", "cancel {pack_name}");
        let state = self.platform.cancel(pack_name);
        cache_and_notify(&self.states, &self.event_tx, pack_name.to_string(), state);
    }

    /// Deletes the pack from local storage. Outcome arrives as one of the
    /// `REMOVE_PACK_*` events.
    pub fn remove_pack(&self, pack_name: &str) {
        tracing::debug!(target: "asset_delivery", "remove_pack {pack_name}");
        let tx = self.event_tx.clone();
        let name = pack_name.to_string();
        self.platform.remove_pack(
            pack_name,
            Box::new(move |outcome| {
                let event = match outcome {
                    TaskOutcome::Completed(()) => PackEvent::remove_completed(name),
                    TaskOutcome::Canceled => PackEvent::remove_canceled(name),
                    TaskOutcome::Failed(msg) => PackEvent::remove_error(name, Some(msg)),
                };
                enqueue(&tx, event);
            }),
        );
    }

    /// Asks the user for consent to download packs waiting on confirmation or
    /// cellular data. Outcome arrives as one of the `DIALOG_*` events.
    pub fn show_confirmation_dialog(&self, pack_name: &str) {
        tracing::debug!(target: "asset_delivery", "show_confirmation_dialog {pack_name}");
        let tx = self.event_tx.clone();
        let name = pack_name.to_string();
        self.platform.show_confirmation_dialog(
            pack_name,
            Box::new(move |outcome| {
                let event = match outcome {
                    TaskOutcome::Completed(choice) => PackEvent::dialog_result(name, choice),
                    TaskOutcome::Canceled => PackEvent::dialog_canceled(name),
                    TaskOutcome::Failed(msg) => PackEvent::dialog_error(name, Some(msg)),
                };
                enqueue(&tx, event);
            }),
        );
    }

    /// Whether a state snapshot for the pack has been cached yet.
    pub fn has_pack_state(&self, pack_name: &str) -> bool {
        self.lock_states().contains_key(pack_name)
    }

    /// Location of the pack on the device, empty string if not downloaded.
    pub fn pack_location(&self, pack_name: &str) -> String {
        self.platform.pack_location(pack_name).unwrap_or_default()
    }

    pub fn bytes_downloaded(&self, pack_name: &str) -> i64 {
        self.cached(pack_name).map_or(0, |s| s.bytes_downloaded)
    }

    /// Error code of the last known state. A pack with no cached state
    /// reports `ERRORCODE_PACK_UNAVAILABLE`.
    pub fn error_code(&self, pack_name: &str) -> i32 {
        self.cached(pack_name)
            .map_or(constants::ERRORCODE_PACK_UNAVAILABLE, |s| s.error_code)
    }

    pub fn status(&self, pack_name: &str) -> i32 {
        self.cached(pack_name)
            .map_or(constants::STATUS_UNKNOWN, |s| s.status)
    }

    pub fn total_bytes_to_download(&self, pack_name: &str) -> i64 {
        self.cached(pack_name)
            .map_or(0, |s| s.total_bytes_to_download)
    }

    pub fn transfer_progress_percentage(&self, pack_name: &str) -> i32 {
        self.cached(pack_name)
            .map_or(0, |s| s.transfer_progress_percentage)
    }

    /// Forwards a host diagnostic line to the script listener as an
    /// `EVENT_LOG` event.
    pub fn push_log(&self, message: &str) {
        enqueue(&self.event_tx, PackEvent::log(message));
    }

    /// Pops the next pending event, serialized in the wire form the relay
    /// decodes. Returns `None` once the queue is empty.
    pub fn next_event(&self) -> Option<String> {
        while let Ok(event) = self.event_rx.try_recv() {
            match serde_json::to_string(&event) {
                Ok(json) => return Some(json),
                Err(err) => {
                    tracing::error!(target: "asset_delivery", "dropping unserializable event: {err}");
                }
            }
        }
        None
    }

    fn cached(&self, pack_name: &str) -> Option<PackState> {
        self.lock_states().get(pack_name).copied()
    }

    fn lock_states(&self) -> std::sync::MutexGuard<'_, HashMap<String, PackState>> {
        // A panic while holding this lock poisons it; the cache itself stays
        // consistent, so keep serving the inner map.
        self.states.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn enqueue(tx: &Sender<PackEvent>, event: PackEvent) {
    if tx.send(event).is_err() {
        tracing::error!(target: "asset_delivery", "event queue closed, event lost");
    }
}

fn cache_and_notify(states: &StateCache, tx: &Sender<PackEvent>, name: String, state: PackState) {
    states
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .insert(name.clone(), state);
    enqueue(tx, PackEvent::state_updated(name, state));
}

fn state_outcome(
    states: &StateCache,
    tx: &Sender<PackEvent>,
    name: String,
    outcome: TaskOutcome<PackState>,
) {
    match outcome {
        TaskOutcome::Completed(state) => cache_and_notify(states, tx, name, state),
        TaskOutcome::Canceled => enqueue(tx, PackEvent::state_error(name, None)),
        TaskOutcome::Failed(msg) => enqueue(tx, PackEvent::state_error(name, Some(msg))),
    }
}
