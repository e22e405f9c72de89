//! Internet-radio player widget: play/pause/volume control over a stream
//! `<audio>` element, stream-state badge, and a frequency-bar visualizer
//! rendered into the host page's SVG surface.

use wasm_bindgen::prelude::*;

mod analysis;
mod bars;
mod config;
mod frame_loop;
mod player;
mod state;
mod visualizer;

use config::WidgetConfig;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let document = web_sys::window()
        .ok_or_else(|| JsValue::from_str("no global window exists"))?
        .document()
        .ok_or_else(|| JsValue::from_str("no document on window"))?;

    // A page without the player markup is not an error worth panicking
    // over; log it and leave the page alone.
    if let Err(err) = player::Player::mount(&document, WidgetConfig::default()) {
        web_sys::console::error_2(&"radio widget not mounted:".into(), &err);
    }
    Ok(())
}
