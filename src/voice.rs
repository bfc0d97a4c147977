//! Browser speech: replies read aloud through `speechSynthesis`, and one-shot
//! dictation through `SpeechRecognition` where the browser has it.

use crate::constants::VOICE_LANG;
use js_sys::{Array, Function, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

pub const NO_DICTATION: &str = "Voice input isn't supported in this browser.";

pub fn speak(text: &str) {
    let Some(w) = web::window() else { return };
    let Ok(synth) = w.speech_synthesis() else {
        log::debug!("[voice] no speechSynthesis");
        return;
    };
    match web::SpeechSynthesisUtterance::new_with_text(text) {
        Ok(u) => {
            u.set_lang(VOICE_LANG);
            synth.cancel();
            synth.speak(&u);
        }
        Err(e) => log::warn!("[voice] utterance: {:?}", e),
    }
}

pub fn stop_speaking() {
    if let Some(synth) = web::window().and_then(|w| w.speech_synthesis().ok()) {
        synth.cancel();
    }
}

fn recognition_ctor(w: &web::Window) -> Option<Function> {
    ["SpeechRecognition", "webkitSpeechRecognition"]
        .iter()
        .filter_map(|name| Reflect::get(w, &JsValue::from_str(name)).ok())
        .find_map(|v| v.dyn_into::<Function>().ok())
}

pub fn dictation_available() -> bool {
    web::window()
        .map(|w| recognition_ctor(&w).is_some())
        .unwrap_or(false)
}

/// Listens for a single phrase and hands the transcript to `on_text`.
pub fn dictate<F>(on_text: F) -> Result<(), JsValue>
where
    F: FnOnce(String) + 'static,
{
    let w = web::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let ctor = recognition_ctor(&w).ok_or_else(|| JsValue::from_str(NO_DICTATION))?;
    let rec = Reflect::construct(&ctor, &Array::new())?;
    Reflect::set(&rec, &"lang".into(), &VOICE_LANG.into())?;
    Reflect::set(&rec, &"interimResults".into(), &false.into())?;
    Reflect::set(&rec, &"maxAlternatives".into(), &JsValue::from(1))?;

    let on_result = Closure::once_into_js(move |ev: JsValue| {
        // event.results[0][0].transcript
        let transcript = Reflect::get(&ev, &"results".into())
            .and_then(|r| Reflect::get_u32(&r, 0))
            .and_then(|alts| Reflect::get_u32(&alts, 0))
            .and_then(|best| Reflect::get(&best, &"transcript".into()))
            .ok()
            .and_then(|t| t.as_string());
        match transcript {
            Some(t) if !t.trim().is_empty() => on_text(t),
            _ => log::debug!("[voice] empty transcript"),
        }
    });
    Reflect::set(&rec, &"onresult".into(), &on_result)?;

    let on_error = Closure::once_into_js(move |ev: JsValue| {
        let code = Reflect::get(&ev, &"error".into())
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_default();
        log::warn!("[voice] recognition error: {}", code);
    });
    Reflect::set(&rec, &"onerror".into(), &on_error)?;

    let start: Function = Reflect::get(&rec, &"start".into())?.dyn_into()?;
    start.call0(&rec)?;
    log::info!("[voice] listening");
    Ok(())
}
