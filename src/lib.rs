#![cfg(target_arch = "wasm32")]
pub mod chat;
pub mod constants;
pub mod contact;
pub mod dom;
pub mod events;
pub mod frame;
pub mod http;
pub mod input;
pub mod overlay;
pub mod render;
pub mod voice;

use constants::*;
use events::Listener;
use folio_core::effects::{EffectKind, PresetOptions};
use folio_core::relay::RelayConfig;
use frame::{MountOptions, Mounted};
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

thread_local! {
    static MOUNTS: RefCell<Vec<Mounted>> = const { RefCell::new(Vec::new()) };
    static PAGE_LISTENERS: RefCell<Vec<Listener>> = const { RefCell::new(Vec::new()) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("folio-web starting");

    if let Err(e) = init() {
        log::error!("init error: {:?}", e);
    }
    Ok(())
}

fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    mount_backgrounds(&document)?;

    let cfg = RelayConfig::with_base(dom::body_attr(&document, API_BASE_ATTR).as_deref());
    let mut page = chat::wire(&document, cfg.clone());
    page.extend(contact::wire(&document, cfg));

    // hidden tabs stop requesting frames
    let doc = document.clone();
    page.extend(Listener::listen_raw(&document, "visibilitychange", move |_| {
        let visible = doc.visibility_state() == web::VisibilityState::Visible;
        MOUNTS.with(|m| m.borrow().iter().for_each(|b| b.set_visible(visible)));
    }));
    page.extend(Listener::listen_raw(&window, "pagehide", |_| unmount_backgrounds()));

    PAGE_LISTENERS.with(|l| l.borrow_mut().extend(page));
    Ok(())
}

fn mount_options(canvas: &web::HtmlCanvasElement) -> anyhow::Result<MountOptions> {
    let kind: EffectKind = canvas
        .get_attribute(EFFECT_ATTR)
        .unwrap_or_default()
        .parse()?;
    let count = match canvas.get_attribute(COUNT_ATTR) {
        Some(c) => Some(c.trim().parse::<usize>()?),
        None => None,
    };
    let seed = match canvas.get_attribute(SEED_ATTR) {
        Some(s) => s.trim().parse::<u64>()?,
        None => rand::random(),
    };
    Ok(MountOptions {
        kind,
        preset: PresetOptions {
            initials: canvas.get_attribute(INITIALS_ATTR),
            count,
        },
        seed,
    })
}

/// Mounts every `canvas[data-effect]`. A canvas that fails to set up is
/// logged and left blank; the rest still mount.
fn mount_backgrounds(document: &web::Document) -> anyhow::Result<()> {
    let list = document
        .query_selector_all(EFFECT_SELECTOR)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    for i in 0..list.length() {
        let Some(canvas) = list
            .item(i)
            .and_then(|n| n.dyn_into::<web::HtmlCanvasElement>().ok())
        else {
            continue;
        };
        let mounted = mount_options(&canvas).and_then(|opts| frame::mount(&canvas, opts));
        match mounted {
            Ok(m) => {
                log::info!("[mount] {} on canvas #{}", m.name(), i);
                MOUNTS.with(|ms| ms.borrow_mut().push(m));
            }
            Err(e) => log::error!("[mount] canvas #{}: {:?}", i, e),
        }
    }
    Ok(())
}

/// Stops every background and releases its listeners and frame callback.
#[wasm_bindgen]
pub fn unmount_backgrounds() {
    let mounts = MOUNTS.with(|m| std::mem::take(&mut *m.borrow_mut()));
    for m in mounts {
        m.unmount();
    }
}
