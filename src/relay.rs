//! Per-tick event relay
//!
//! The relay runs on the engine's main update thread. Each tick it pops
//! pending events from the delivery service until none remain, decodes each
//! record, and dispatches it synchronously to the single registered listener.
//! Every failure along the way degrades to a log line; the drain itself is
//! never aborted.

use thiserror::Error;

use crate::event::{decode_event, PackEvent};
use crate::service::PackDeliveryService;

#[derive(Error, Debug)]
pub enum ListenerError {
    /// The underlying script context is gone; the listener can never fire.
    #[error("listener is no longer valid")]
    Invalid,
    /// The callback itself raised.
    #[error("listener invocation failed: {0}")]
    Invocation(String),
}

/// A registered event callback.
///
/// At most one listener is held at a time; dropping the box releases whatever
/// the implementation holds (for script listeners, the persistent function
/// reference). `is_valid` is checked before every invocation so that a
/// destroyed script context is noticed before we call into it.
///
/// Listeners are registered and invoked only on the engine's main update
/// thread, so implementations need not be `Send`; script-context handles
/// aren't.
pub trait EventListener {
    fn is_valid(&self) -> bool;
    fn invoke(&self, event: &PackEvent) -> Result<(), ListenerError>;
}

/// Drain status after the last tick, observable for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayPhase {
    /// The last drain emptied the queue.
    Idle,
    /// The last drain hit the per-tick event budget and deferred a tail;
    /// draining resumes next tick.
    Draining,
}

pub struct EventRelay {
    listener: Option<Box<dyn EventListener>>,
    phase: RelayPhase,
    log_events: bool,
    max_events_per_tick: Option<usize>,
}

impl EventRelay {
    pub fn new() -> Self {
        Self {
            listener: None,
            phase: RelayPhase::Idle,
            log_events: false,
            max_events_per_tick: None,
        }
    }

    /// Logs each raw event record at debug level before dispatch.
    pub fn log_events(mut self, enabled: bool) -> Self {
        self.log_events = enabled;
        self
    }

    /// Caps how many events one tick may dispatch; `None` drains everything.
    pub fn max_events_per_tick(mut self, limit: Option<usize>) -> Self {
        self.max_events_per_tick = limit;
        self
    }

    pub fn phase(&self) -> RelayPhase {
        self.phase
    }

    pub fn has_listener(&self) -> bool {
        self.listener.is_some()
    }

    /// Replaces the registered listener. The previous one is dropped (and
    /// thereby released) before the new one takes its place.
    pub fn set_listener(&mut self, listener: Box<dyn EventListener>) {
        self.listener = Some(listener);
    }

    /// Releases the registered listener, if any.
    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    /// Drains the service's pending events, dispatching each to the listener
    /// in FIFO order. Called once per engine update tick.
    pub fn drain(&mut self, service: &PackDeliveryService) {
        self.phase = RelayPhase::Idle;
        let mut dispatched = 0usize;
        while let Some(raw) = service.next_event() {
            if self.log_events {
                tracing::debug!(target: "asset_delivery", "event {raw}");
            }
            match decode_event(&raw) {
                Ok(event) => self.dispatch(&event),
                Err(err) => {
                    tracing::error!(target: "asset_delivery", "undecodable event dropped: {err}");
                }
            }
            dispatched += 1;
            if self.max_events_per_tick == Some(dispatched) {
                // The queue may still hold events; report the deferral and
                // pick them up next tick.
                self.phase = RelayPhase::Draining;
                tracing::trace!(
                    target: "asset_delivery",
                    "per-tick event budget reached, deferring the rest"
                );
                break;
            }
        }
    }

    /// Dispatches one decoded event to the listener, synchronously.
    fn dispatch(&mut self, event: &PackEvent) {
        let Some(listener) = self.listener.as_ref() else {
            tracing::warn!(target: "asset_delivery", "event listener is not set, event dropped");
            return;
        };

        if !listener.is_valid() {
            tracing::error!(target: "asset_delivery", "event listener is not valid, releasing it");
            self.listener = None;
            return;
        }

        if let Err(err) = listener.invoke(event) {
            // The callback failing is the script's problem; keep draining.
            tracing::error!(target: "asset_delivery", "error invoking event listener: {err}");
        }
    }
}

impl Default for EventRelay {
    fn default() -> Self {
        Self::new()
    }
}
