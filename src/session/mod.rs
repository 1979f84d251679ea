use std::collections::HashMap;
use std::rc::Rc;

use leptos::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Named events this layer sends toward the server process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub(crate) enum OutboundEvent {
    #[strum(serialize = "reorder")]
    Reorder,

    #[strum(serialize = "toggle_fullscreen")]
    ToggleFullscreen,
}

/// Wire shape for both directions: `{"event": "...", "payload": {...}}`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct Envelope {
    pub event: String,

    #[serde(default)]
    pub payload: Value,
}

/// Identifies one registered handler so a hook instance can remove its own
/// handler on cleanup without touching the others.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct HandlerId(u64);

/// Inbound command fan-out: command name -> registered handlers.
///
/// Handlers are registered by hook instances on mount, run in registration
/// order, and are removed again when the instance is destroyed. Kept DOM-free
/// so dispatch semantics are unit-testable.
#[derive(Default)]
pub(crate) struct CommandRegistry {
    handlers: HashMap<String, Vec<(HandlerId, Rc<dyn Fn(&Value)>)>>,
    next_id: u64,
}

impl CommandRegistry {
    pub fn register(&mut self, name: &str, handler: impl Fn(&Value) + 'static) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.handlers
            .entry(name.to_string())
            .or_default()
            .push((id, Rc::new(handler)));
        id
    }

    /// Removes one handler; unknown ids are ignored.
    pub fn unregister(&mut self, name: &str, id: HandlerId) {
        if let Some(handlers) = self.handlers.get_mut(name) {
            handlers.retain(|(hid, _)| *hid != id);
        }
    }

    fn handlers_for(&self, name: &str) -> Vec<Rc<dyn Fn(&Value)>> {
        self.handlers
            .get(name)
            .map(|hs| hs.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default()
    }

    /// Runs every handler registered for `name`; returns how many ran.
    /// Unknown commands are ignored (the server may be ahead of the client).
    pub fn dispatch(&self, name: &str, payload: &Value) -> usize {
        let handlers = self.handlers_for(name);
        for h in &handlers {
            h(payload);
        }
        handlers.len()
    }
}

/// Long-lived connection to the server process.
///
/// Copy handle backed by arena storage; the socket and registry live for the
/// page lifetime (no on_cleanup needed, same as other app-lifetime
/// controllers). Outbound pushes are fire-and-forget: there is no retry or
/// acknowledgment, and send errors are dropped.
#[derive(Clone, Copy)]
pub(crate) struct Session {
    socket: StoredValue<Option<web_sys::WebSocket>, LocalStorage>,
    registry: StoredValue<CommandRegistry, LocalStorage>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            socket: StoredValue::new_local(None),
            registry: StoredValue::new_local(CommandRegistry::default()),
        }
    }

    pub fn connect(&self, url: &str) {
        let Ok(ws) = web_sys::WebSocket::new(url) else {
            return;
        };

        let s = *self;
        let on_message = Closure::wrap(Box::new(move |ev: web_sys::MessageEvent| {
            let Some(text) = ev.data().as_string() else {
                return;
            };
            if let Ok(envelope) = serde_json::from_str::<Envelope>(&text) {
                s.dispatch(&envelope.event, &envelope.payload);
            }
        }) as Box<dyn FnMut(web_sys::MessageEvent)>);

        ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        // Socket lives for the page lifetime.
        on_message.forget();

        self.socket.set_value(Some(ws));
    }

    pub fn push(&self, event: OutboundEvent, payload: Value) {
        let envelope = Envelope {
            event: event.to_string(),
            payload,
        };
        let Ok(msg) = serde_json::to_string(&envelope) else {
            return;
        };

        self.socket.with_value(|socket| {
            if let Some(ws) = socket {
                let _ = ws.send_with_str(&msg);
            }
        });
    }

    /// Register a handler for an inbound named command (e.g. `clear-editor`).
    /// The returned id lets the caller remove the handler on cleanup.
    pub fn on_command(&self, name: &str, handler: impl Fn(&Value) + 'static) -> HandlerId {
        let name = name.to_string();
        let mut id = HandlerId(0);
        self.registry
            .update_value(|r| id = r.register(&name, handler));
        id
    }

    pub fn off_command(&self, name: &str, id: HandlerId) {
        let name = name.to_string();
        self.registry.update_value(move |r| r.unregister(&name, id));
    }

    pub fn dispatch(&self, name: &str, payload: &Value) {
        // Snapshot handlers first so one may register further commands.
        let handlers = self.registry.with_value(|r| r.handlers_for(name));
        for h in &handlers {
            h(payload);
        }
    }
}
