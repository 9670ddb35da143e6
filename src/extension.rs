//! Engine extension lifecycle
//!
//! Ties the pieces together the way the engine drives extensions: app-level
//! init/shutdown, per-instance init (script registration), per-tick update
//! (event drain), per-instance finalize (listener release), and app-event
//! notifications.

use std::sync::{Arc, Mutex, MutexGuard};

use rquickjs::Context;

use crate::bindings::{self, BindError};
use crate::config::AssetDeliveryConfig;
use crate::platform::DeliveryPlatform;
use crate::relay::EventRelay;
use crate::service::PackDeliveryService;

/// App-level lifecycle notifications forwarded by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Activated,
    Deactivated,
    Iconified,
    Deiconified,
}

pub struct AssetDeliveryExtension {
    service: Arc<PackDeliveryService>,
    relay: Arc<Mutex<EventRelay>>,
    config: AssetDeliveryConfig,
}

impl AssetDeliveryExtension {
    pub fn new(platform: Arc<dyn DeliveryPlatform>) -> Self {
        Self::with_config(platform, AssetDeliveryConfig::default())
    }

    pub fn with_config(platform: Arc<dyn DeliveryPlatform>, config: AssetDeliveryConfig) -> Self {
        let relay = EventRelay::new()
            .log_events(config.log_events)
            .max_events_per_tick(config.max_events_per_tick);
        Self {
            service: Arc::new(PackDeliveryService::new(platform)),
            relay: Arc::new(Mutex::new(relay)),
            config,
        }
    }

    /// Direct access to the delivery service, for host-side use (e.g.
    /// forwarding diagnostics with `push_log`).
    pub fn service(&self) -> &Arc<PackDeliveryService> {
        &self.service
    }

    /// App-level initialization. Nothing to set up at this stage.
    pub fn app_initialize(&self) {
        tracing::info!(target: "asset_delivery", "app initialize");
    }

    /// Per-instance initialization: registers the scripting module into the
    /// given context.
    pub fn initialize(&self, context: &Context) -> Result<(), BindError> {
        bindings::register(
            context,
            Arc::clone(&self.service),
            Arc::clone(&self.relay),
            &self.config.module_name,
        )
    }

    /// Per-tick update: drains pending platform events to the listener.
    /// Runs on the engine's main update thread.
    pub fn update(&self) {
        self.lock_relay().drain(&self.service);
    }

    /// Per-instance shutdown: releases the script listener.
    pub fn finalize(&self) {
        tracing::info!(target: "asset_delivery", "finalize");
        self.lock_relay().clear_listener();
    }

    /// App-level shutdown. Nothing to tear down at this stage.
    pub fn app_finalize(&self) {
        tracing::info!(target: "asset_delivery", "app finalize");
    }

    /// Foreground/background notifications. Logged only; the platform service
    /// keeps downloading on its own threads regardless.
    pub fn on_app_event(&self, event: AppEvent) {
        tracing::info!(target: "asset_delivery", "app event {event:?}");
    }

    fn lock_relay(&self) -> MutexGuard<'_, EventRelay> {
        self.relay.lock().unwrap_or_else(|e| e.into_inner())
    }
}
