use serde::{Deserialize, Serialize};
use veneer_core::*;
use veneer_format::*;
use veneer_hooks::*;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
struct Preferences {
    theme: String,
    compact: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: "light".into(),
            compact: false,
        }
    }
}

fn formatting() -> anyhow::Result<()> {
    log::info!("{}", format_inr(1_234_567.891));
    log::info!(
        "{}",
        format_currency(-42.5, "EUR", &CurrencyOptions::locale("de-DE"))
    );
    log::info!("{}", format_percentage_default(0.1234));
    log::info!("{}", format_number_default(9_876_543.21));

    let launch = "2025-08-16T11:00:00Z";
    for tag in ["en-IN", "en-US", "en-GB", "de-DE"] {
        let opts = DateOptions::locale(tag).utc();
        log::info!("{tag}: {}", format_date_time_to_locale(launch, &opts)?);
    }
    log::info!("{}", construct_utc_format(launch, "readable".parse::<UtcMode>()?)?);
    log::info!("launch was {} ago", time_difference(now(), launch)?);

    log::info!(
        "{} / {} / {}",
        capitalize_first_letter("émile"),
        slug_to_string("order-history"),
        name_initials("Ada Lovelace")
    );
    Ok(())
}

/// Two "tabs" sharing one store: a write in one shows up in the other.
fn two_tabs() {
    let left_store = MemoryStorage::new();
    let right_store = left_store.context();
    let scroll = MemoryScroll::new();

    let left = Composition::new();
    let right = Composition::new();

    let left_prefs = with_platform(Platform::memory_with(left_store, scroll.clone()), || {
        left.compose(|| remember_persisted_state("prefs", Preferences::default()))
    });
    let right_prefs = with_platform(Platform::memory_with(right_store, scroll.clone()), || {
        right.compose(|| remember_persisted_state("prefs", Preferences::default()))
    });

    left_prefs.update(|p| Preferences {
        theme: "dark".into(),
        ..p.clone()
    });
    log::info!("left  sees {:?}", left_prefs.get());
    log::info!("right sees {:?}", right_prefs.get());

    right.dispose();
    left_prefs.set(Preferences {
        compact: true,
        ..left_prefs.get()
    });
    log::info!("right after unmount still {:?}", right_prefs.get());
}

fn header_shadow() {
    let scroll = MemoryScroll::new();
    let platform = Platform::memory_with(MemoryStorage::new(), scroll.clone());
    let comp = Composition::new();

    let header = with_platform(platform, || comp.compose(|| remember_scroll_threshold(80.0)));
    header.signal().subscribe(|past| log::info!("header shadow: {past}"));

    for y in [0.0, 40.0, 120.0, 300.0, 10.0] {
        scroll.scroll_to(y);
    }
}

fn main() -> anyhow::Result<()> {
    veneer_platform::init_logging(log::Level::Info);

    formatting()?;
    two_tabs();
    header_shadow();
    Ok(())
}
