use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{AnalyserNode, Document, Element};

use crate::bars::{bar_heights, BarLayout, Jitter};
use crate::frame_loop::FrameLoop;
use crate::state::PlaybackState;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// One frequency bin renders as two rects: a spike growing up from the
/// center line and its mirror growing down.
struct BarPair {
    up: Element,
    down: Element,
}

/// Builds the bar field once and drives it one frame per display refresh
/// while playback is live.
pub struct Visualizer {
    frame_loop: FrameLoop,
}

impl Visualizer {
    /// Clears the SVG's static fallback content, creates the fixed rect
    /// handles, and wraps the one per-frame closure around them. Positions
    /// never change after this; frames only write heights.
    pub fn mount(
        document: &Document,
        svg: &Element,
        analyser: AnalyserNode,
        playing: Rc<PlaybackState>,
    ) -> Result<Self, JsValue> {
        let bar_count = analyser.frequency_bin_count() as usize;
        let layout = BarLayout::new(bar_count);

        svg.set_inner_html("");
        let mut bars = Vec::with_capacity(bar_count);
        for i in 0..bar_count {
            let up = make_rect(document, &layout, i)?;
            let down = make_rect(document, &layout, i)?;
            svg.append_child(&up)?;
            svg.append_child(&down)?;
            bars.push(BarPair { up, down });
        }

        let mut jitter = Jitter::new(js_sys::Date::now() as u64);
        let mut magnitudes = vec![0u8; bar_count];

        let frame_loop = FrameLoop::new(move || {
            // The flag can flip false a frame before the controller calls
            // stop; such frames draw nothing and just reschedule.
            if !playing.is_playing() {
                return;
            }
            analyser.get_byte_frequency_data(&mut magnitudes);
            let heights = bar_heights(&magnitudes, layout.bar_count, &mut jitter);
            for (pair, height) in bars.iter().zip(&heights) {
                draw_pair(pair, layout.center_y, *height);
            }
        });

        Ok(Self { frame_loop })
    }

    /// Start the per-frame loop. No-op while already running.
    pub fn start(&self) {
        self.frame_loop.start();
    }

    pub fn stop(&self) {
        self.frame_loop.stop();
    }
}

fn make_rect(document: &Document, layout: &BarLayout, i: usize) -> Result<Element, JsValue> {
    let rect = document.create_element_ns(Some(SVG_NS), "rect")?;
    rect.set_attribute("x", &layout.x(i).to_string())?;
    rect.set_attribute("y", &layout.center_y.to_string())?;
    rect.set_attribute("width", &layout.bar_width.to_string())?;
    rect.set_attribute("height", "0")?;
    rect.set_attribute("fill", "white")?;
    Ok(rect)
}

fn draw_pair(pair: &BarPair, center_y: f32, height: f32) {
    let h = height.to_string();
    let _ = pair.up.set_attribute("height", &h);
    let _ = pair.up.set_attribute("y", &(center_y - height).to_string());
    let _ = pair.down.set_attribute("height", &h);
    let _ = pair.down.set_attribute("y", &center_y.to_string());
}
