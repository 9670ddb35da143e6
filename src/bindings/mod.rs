//! Language bindings for the scripting surface
//!
//! One adapter per host scripting language. Only the JavaScript (QuickJS)
//! adapter exists today; the service and relay layers are language-agnostic,
//! so another adapter only has to translate calls and implement
//! [`crate::relay::EventListener`].

pub mod js;

pub use js::{register, BindError, JsListener};
