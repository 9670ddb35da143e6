//! # Asset Delivery Bridge
//!
//! A thin bridge exposing a platform's on-demand asset-pack delivery service
//! to the engine's JavaScript scripting runtime. Scripts request packs with
//! fire-and-forget calls; the platform downloads on its own threads and the
//! outcomes come back as queued events, drained once per engine tick to a
//! single listener callback.
//!
//! ## Architecture
//!
//! - **Scripting surface** ([`bindings`]): a `pad` namespace object of
//!   functions and integer constants registered into a QuickJS context.
//! - **Platform seam** ([`platform`]): one trait with the delivery
//!   operations, backed by the host's platform-specific implementation. The
//!   download manager, retry policy and storage layer all live behind it.
//! - **Service bridge** ([`service`]): last-known-state cache and the FIFO
//!   queue carrying events from platform threads to the engine tick.
//! - **Event relay** ([`relay`]): per-tick drain that decodes each queued
//!   record and invokes the listener synchronously.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use asset_delivery::{AssetDeliveryExtension, platform::NullPlatform};
//!
//! let extension = AssetDeliveryExtension::new(Arc::new(NullPlatform::new()));
//! extension.initialize(&js_context)?;          // instance init
//! // each engine tick:
//! extension.update();                          // drain events to the listener
//! ```
//!
//! Scripts then use the module directly:
//!
//! ```js
//! pad.set_listener(function (event) {
//!     if (event.event_type === pad.EVENT_PACK_STATE_UPDATED) {
//!         print(event.pack_name + " status " + event.status);
//!     }
//! });
//! pad.fetch("level2_textures");
//! ```

/// Platform ABI constants (event types, statuses, error codes)
pub mod constants;
/// Platform service abstraction
pub mod platform;
/// Delivery service bridge (state cache + event queue)
pub mod service;
/// Event wire format and decoding
pub mod event;
/// Per-tick event relay
pub mod relay;
/// Language bindings for the scripting surface
pub mod bindings;
/// Engine extension lifecycle
pub mod extension;
/// Extension configuration
pub mod config;

pub use config::AssetDeliveryConfig;
pub use event::{decode_event, EventDecodeError, PackEvent};
pub use extension::{AppEvent, AssetDeliveryExtension};
pub use platform::{DeliveryPlatform, DialogChoice, PackState, TaskOutcome};
pub use relay::{EventListener, EventRelay, ListenerError, RelayPhase};
pub use service::PackDeliveryService;
