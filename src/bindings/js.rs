//! JavaScript scripting surface using rquickjs
//!
//! Registers the delivery module (a namespace object, `pad` by default) into
//! a QuickJS context: one function per service operation plus the full
//! constant table. Scripts receive asynchronous outcomes through a single
//! listener callback registered with `set_listener`.
//!
//! Argument marshaling is left to rquickjs: a call with a wrong argument type
//! raises a standard JS type error at the boundary and aborts only that call.

use std::sync::{Arc, Mutex};

use rquickjs::{Context, Ctx, Function, Object, Persistent};
use thiserror::Error;

use crate::constants;
use crate::event::PackEvent;
use crate::relay::{EventListener, EventRelay, ListenerError};
use crate::service::PackDeliveryService;

#[derive(Error, Debug)]
pub enum BindError {
    #[error("failed to register scripting module: {0}")]
    Register(#[from] rquickjs::Error),
}

/// Script listener backed by a persistent reference to a JS function.
///
/// The persistent reference pins the callback across GC cycles; dropping the
/// listener releases it. Validity is re-checked before every invocation by
/// restoring the reference into the context.
pub struct JsListener {
    context: Context,
    callback: Persistent<Function<'static>>,
}

impl EventListener for JsListener {
    fn is_valid(&self) -> bool {
        self.context
            .with(|ctx| self.callback.clone().restore(&ctx).is_ok())
    }

    fn invoke(&self, event: &PackEvent) -> Result<(), ListenerError> {
        let json = serde_json::to_string(event)
            .map_err(|err| ListenerError::Invocation(err.to_string()))?;
        self.context.with(|ctx| {
            let callback = self
                .callback
                .clone()
                .restore(&ctx)
                .map_err(|_| ListenerError::Invalid)?;
            let payload = ctx
                .json_parse(json)
                .map_err(|err| ListenerError::Invocation(err.to_string()))?;
            callback.call::<_, ()>((payload,)).map_err(|err| {
                let detail = match err {
                    rquickjs::Error::Exception => format!("{:?}", ctx.catch()),
                    other => other.to_string(),
                };
                ListenerError::Invocation(detail)
            })
        })
    }
}

/// Registers the delivery module object under `module_name` in the context's
/// global scope.
pub fn register(
    context: &Context,
    service: Arc<PackDeliveryService>,
    relay: Arc<Mutex<EventRelay>>,
    module_name: &str,
) -> Result<(), BindError> {
    context.with(|ctx| -> rquickjs::Result<()> {
        let module = Object::new(ctx.clone())?;

        bind_fire_and_forget(&ctx, &module, &service)?;
        bind_state_getters(&ctx, &module, &service)?;
        bind_set_listener(&ctx, &module, context.clone(), relay)?;
        constants::register(&module)?;

        ctx.globals().set(module_name, module)
    })?;
    tracing::info!(target: "asset_delivery", "registered scripting module '{module_name}'");
    Ok(())
}

/// Void operations; effects surface later through listener events.
fn bind_fire_and_forget<'js>(
    ctx: &Ctx<'js>,
    module: &Object<'js>,
    service: &Arc<PackDeliveryService>,
) -> rquickjs::Result<()> {
    let svc = Arc::clone(service);
    module.set(
        "cancel",
        Function::new(ctx.clone(), move |pack_name: String| {
            svc.cancel(&pack_name)
        })?,
    )?;

    let svc = Arc::clone(service);
    module.set(
        "fetch",
        Function::new(ctx.clone(), move |pack_name: String| svc.fetch(&pack_name))?,
    )?;

    let svc = Arc::clone(service);
    module.set(
        "get_pack_state",
        Function::new(ctx.clone(), move |pack_name: String| {
            svc.request_pack_state(&pack_name)
        })?,
    )?;

    let svc = Arc::clone(service);
    module.set(
        "remove_pack",
        Function::new(ctx.clone(), move |pack_name: String| {
            svc.remove_pack(&pack_name)
        })?,
    )?;

    let svc = Arc::clone(service);
    module.set(
        "show_confirmation_dialog",
        Function::new(ctx.clone(), move |pack_name: String| {
            svc.show_confirmation_dialog(&pack_name)
        })?,
    )?;

    Ok(())
}

/// Synchronous reads of the last cached state. Scripts must request a state
/// with `get_pack_state` and wait for the state-updated event before these
/// return meaningful values.
fn bind_state_getters<'js>(
    ctx: &Ctx<'js>,
    module: &Object<'js>,
    service: &Arc<PackDeliveryService>,
) -> rquickjs::Result<()> {
    let svc = Arc::clone(service);
    module.set(
        "has_pack_state",
        Function::new(ctx.clone(), move |pack_name: String| -> bool {
            svc.has_pack_state(&pack_name)
        })?,
    )?;

    let svc = Arc::clone(service);
    module.set(
        "get_pack_location",
        Function::new(ctx.clone(), move |pack_name: String| -> String {
            svc.pack_location(&pack_name)
        })?,
    )?;

    let svc = Arc::clone(service);
    module.set(
        "get_pack_bytes_downloaded",
        Function::new(ctx.clone(), move |pack_name: String| -> i64 {
            svc.bytes_downloaded(&pack_name)
        })?,
    )?;

    let svc = Arc::clone(service);
    module.set(
        "get_pack_error_code",
        Function::new(ctx.clone(), move |pack_name: String| -> i32 {
            svc.error_code(&pack_name)
        })?,
    )?;

    let svc = Arc::clone(service);
    module.set(
        "get_pack_status",
        Function::new(ctx.clone(), move |pack_name: String| -> i32 {
            svc.status(&pack_name)
        })?,
    )?;

    let svc = Arc::clone(service);
    module.set(
        "get_pack_total_bytes_to_download",
        Function::new(ctx.clone(), move |pack_name: String| -> i64 {
            svc.total_bytes_to_download(&pack_name)
        })?,
    )?;

    let svc = Arc::clone(service);
    module.set(
        "get_pack_transfer_progress_percentage",
        Function::new(ctx.clone(), move |pack_name: String| -> i32 {
            svc.transfer_progress_percentage(&pack_name)
        })?,
    )?;

    Ok(())
}

fn bind_set_listener<'js>(
    ctx: &Ctx<'js>,
    module: &Object<'js>,
    context: Context,
    relay: Arc<Mutex<EventRelay>>,
) -> rquickjs::Result<()> {
    module.set(
        "set_listener",
        Function::new(ctx.clone(), move |callback: Function| {
            // The callback's own context pins the persistent reference.
            let listener = JsListener {
                context: context.clone(),
                callback: Persistent::save(callback.ctx(), callback.clone()),
            };
            relay
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .set_listener(Box::new(listener));
        })?,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::NullPlatform;
    use rquickjs::{CatchResultExt, Runtime};

    fn fixture() -> (Context, Arc<PackDeliveryService>, Arc<Mutex<EventRelay>>) {
        let runtime = Runtime::new().expect("runtime");
        let context = Context::full(&runtime).expect("context");
        let service = Arc::new(PackDeliveryService::new(Arc::new(NullPlatform::new())));
        let relay = Arc::new(Mutex::new(EventRelay::new()));
        register(&context, Arc::clone(&service), Arc::clone(&relay), "pad").expect("register");
        (context, service, relay)
    }

    #[test]
    fn constants_are_visible_from_scripts() {
        let (context, _, _) = fixture();
        context.with(|ctx| {
            let status: i32 = ctx.eval("pad.STATUS_DOWNLOADING").unwrap();
            assert_eq!(status, constants::STATUS_DOWNLOADING);
            let code: i32 = ctx.eval("pad.ERRORCODE_INTERNAL_ERROR").unwrap();
            assert_eq!(code, constants::ERRORCODE_INTERNAL_ERROR);
        });
    }

    #[test]
    fn location_of_missing_pack_is_empty_string() {
        let (context, _, _) = fixture();
        context.with(|ctx| {
            let location: String = ctx.eval(r#"pad.get_pack_location("pack1")"#).unwrap();
            assert_eq!(location, "");
        });
    }

    #[test]
    fn getters_return_numbers_for_unknown_packs() {
        let (context, _, _) = fixture();
        context.with(|ctx| {
            let status: i32 = ctx.eval(r#"pad.get_pack_status("nope")"#).unwrap();
            assert_eq!(status, constants::STATUS_UNKNOWN);
            let code: i32 = ctx.eval(r#"pad.get_pack_error_code("nope")"#).unwrap();
            assert_eq!(code, constants::ERRORCODE_PACK_UNAVAILABLE);
            let bytes: i64 = ctx.eval(r#"pad.get_pack_bytes_downloaded("nope")"#).unwrap();
            assert_eq!(bytes, 0);
        });
    }

    #[test]
    fn wrong_argument_type_raises_in_script() {
        let (context, _, _) = fixture();
        context.with(|ctx| {
            let result = ctx.eval::<(), _>("pad.fetch({})").catch(&ctx);
            assert!(result.is_err());
        });
    }

    #[test]
    fn set_listener_installs_listener_on_relay() {
        let (context, _, relay) = fixture();
        context.with(|ctx| {
            ctx.eval::<(), _>("pad.set_listener(function (e) {})")
                .unwrap();
        });
        assert!(relay.lock().unwrap().has_listener());
    }

    #[test]
    fn js_listener_receives_decoded_event() {
        let (context, service, relay) = fixture();
        context.with(|ctx| {
            ctx.eval::<(), _>("globalThis.seen = null; pad.set_listener(function (e) { seen = e; })")
                .unwrap();
        });

        // cancel() queues a state-updated event synchronously even on the
        // null platform.
        service.cancel("pack1");
        relay.lock().unwrap().drain(&service);

        context.with(|ctx| {
            let name: String = ctx.eval("seen.pack_name").unwrap();
            assert_eq!(name, "pack1");
            let event_type: i32 = ctx.eval("seen.event_type").unwrap();
            assert_eq!(event_type, constants::EVENT_PACK_STATE_UPDATED);
            let error_code: i32 = ctx.eval("seen.error_code").unwrap();
            assert_eq!(error_code, constants::ERRORCODE_API_NOT_AVAILABLE);
        });
    }

    #[test]
    fn throwing_listener_does_not_poison_the_relay() {
        let (context, service, relay) = fixture();
        context.with(|ctx| {
            ctx.eval::<(), _>("pad.set_listener(function (e) { throw new Error('boom'); })")
                .unwrap();
        });

        service.push_log("one");
        service.push_log("two");
        relay.lock().unwrap().drain(&service);

        assert!(relay.lock().unwrap().has_listener());
        assert!(service.next_event().is_none());
    }
}
