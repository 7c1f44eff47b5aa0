//! Browser services (wasm32): `window.localStorage`, the `storage` event and
//! the window `scroll` event.
use std::rc::Rc;

use anyhow::anyhow;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, DomException, Storage, StorageEvent, Window};

use veneer_core::*;

/// The browser never says which tab wrote; every `storage` event comes
/// from some other context.
pub const OTHER_CONTEXT: ContextId = ContextId(u64::MAX);

fn storage_error(key: &str, err: JsValue) -> StorageError {
    match err.dyn_ref::<DomException>().map(|e| e.name()) {
        Some(name) if name == "QuotaExceededError" => StorageError::QuotaExceeded {
            key: key.to_owned(),
        },
        Some(name) if name == "SecurityError" => StorageError::Unavailable,
        _ => StorageError::Backend(format!("{err:?}")),
    }
}

pub struct WebStorage {
    storage: Storage,
}

impl WebStorage {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }
}

impl KeyValueStore for WebStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(key).map_err(|e| storage_error(key, e))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| storage_error(key, e))
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|e| storage_error(key, e))
    }
}

pub struct WebStorageEvents {
    window: Window,
}

impl StorageEvents for WebStorageEvents {
    fn subscribe(&self, listener: Rc<dyn Fn(&StorageChange)>) -> Dispose {
        let closure = Closure::<dyn FnMut(StorageEvent)>::new(move |event: StorageEvent| {
            listener(&StorageChange {
                key: event.key(),
                old_value: event.old_value(),
                new_value: event.new_value(),
                origin: OTHER_CONTEXT,
            });
        });

        if let Err(e) = self
            .window
            .add_event_listener_with_callback("storage", closure.as_ref().unchecked_ref())
        {
            log::warn!("could not listen for storage events: {e:?}");
            return Dispose::noop();
        }

        let window = self.window.clone();
        Dispose::new(move || {
            let _ = window
                .remove_event_listener_with_callback("storage", closure.as_ref().unchecked_ref());
            drop(closure);
        })
    }
}

pub struct WindowScroll {
    window: Window,
}

impl ScrollSource for WindowScroll {
    fn offset(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn subscribe(&self, options: ListenerOptions, listener: Rc<dyn Fn(f64)>) -> Dispose {
        let reader = self.window.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            listener(reader.scroll_y().unwrap_or(0.0));
        });

        let opts = AddEventListenerOptions::new();
        opts.set_passive(options.passive);
        if let Err(e) = self
            .window
            .add_event_listener_with_callback_and_add_event_listener_options(
                "scroll",
                closure.as_ref().unchecked_ref(),
                &opts,
            )
        {
            log::warn!("could not listen for scroll events: {e:?}");
            return Dispose::noop();
        }

        let window = self.window.clone();
        Dispose::new(move || {
            let _ = window
                .remove_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref());
            drop(closure);
        })
    }
}

/// Services backed by the current browser window.
pub fn web_platform() -> anyhow::Result<Platform> {
    let window = web_sys::window().ok_or_else(|| anyhow!("no global window"))?;
    let storage = window
        .local_storage()
        .map_err(|e| anyhow!("localStorage access denied: {e:?}"))?
        .ok_or_else(|| anyhow!("localStorage is not available"))?;

    Ok(Platform {
        storage: Rc::new(WebStorage::new(storage)),
        storage_events: Rc::new(WebStorageEvents {
            window: window.clone(),
        }),
        scroll: Rc::new(WindowScroll { window }),
        diagnostics: Rc::new(LogSink),
    })
}

pub(crate) fn init_logging(level: log::Level) {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    let _ = console_log::init_with_level(level);
}
