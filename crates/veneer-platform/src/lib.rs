//! Platform services for Veneer hosts.
//!
//! On wasm32 the hooks talk to the browser (`localStorage`, `storage` events,
//! window scroll). Elsewhere there is no browser to talk to, so the in-memory
//! services from `veneer-core` stand in.
//!
//! ```rust,no_run
//! veneer_platform::init_logging(log::Level::Info);
//! veneer_platform::run(|| {
//!     // compose UI here; hooks see the host platform
//! });
//! ```

use veneer_core::{Platform, with_platform};

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Sets up logging for the host: `console_log` plus a panic hook in the
/// browser, `env_logger` (honouring `RUST_LOG`) natively. Safe to call twice.
pub fn init_logging(level: log::Level) {
    #[cfg(target_arch = "wasm32")]
    web::init_logging(level);

    #[cfg(not(target_arch = "wasm32"))]
    {
        let env = env_logger::Env::default().default_filter_or(level.as_str());
        if env_logger::Builder::from_env(env).try_init().is_err() {
            log::debug!("logger already installed");
        }
    }
}

/// The platform this build runs on. In the browser a missing or blocked
/// `localStorage` degrades to in-memory services with a warning.
pub fn host_platform() -> Platform {
    #[cfg(target_arch = "wasm32")]
    {
        match web::web_platform() {
            Ok(p) => p,
            Err(e) => {
                log::warn!("browser storage unavailable ({e:#}); using in-memory services");
                Platform::memory()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Platform::memory()
    }
}

/// Runs `f` with [`host_platform`] installed.
pub fn run<R>(f: impl FnOnce() -> R) -> R {
    with_platform(host_platform(), f)
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use veneer_core::platform;

    #[test]
    fn native_host_uses_memory_storage() {
        run(|| {
            let p = platform();
            p.storage.set_item("k", "1").unwrap();
            assert_eq!(p.storage.get_item("k").unwrap().as_deref(), Some("1"));
            assert_eq!(p.scroll.offset(), 0.0);
        });
    }

    #[test]
    fn init_logging_twice_is_harmless() {
        init_logging(log::Level::Debug);
        init_logging(log::Level::Info);
    }
}
