use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{console, Document, Element, HtmlAudioElement, HtmlElement, HtmlInputElement};

use crate::analysis::AnalysisSession;
use crate::config::WidgetConfig;
use crate::state::{self, ClickAction, Icon, LoopCommand, PlaybackState, Status, StreamEvent};
use crate::visualizer::Visualizer;

/// The playback controller: translates clicks and media lifecycle events
/// into playback actions and UI reflection. Constructed once at startup
/// with its collaborators looked up from the host document.
pub struct Player {
    config: WidgetConfig,
    document: Document,
    audio: HtmlAudioElement,
    button: PlayButton,
    badge: Option<StatusBadge>,
    svg: Option<Element>,
    state: Rc<PlaybackState>,
    session: RefCell<Option<AnalysisSession>>,
    visualizer: RefCell<Option<Visualizer>>,
}

impl Player {
    /// Look up the required markup, wire every listener, and optionally
    /// auto-start playback. The audio element and button are required; the
    /// slider, badge and SVG surface are optional page furniture.
    pub fn mount(document: &Document, config: WidgetConfig) -> Result<Rc<Self>, JsValue> {
        let audio = require::<HtmlAudioElement>(document, config.audio_id)?;
        let button = PlayButton {
            element: require::<Element>(document, config.button_id)?,
        };
        let badge = StatusBadge::find(document, &config);
        let svg = document.get_element_by_id(config.svg_id);

        audio.set_volume(config.initial_volume);

        let player = Rc::new(Self {
            config,
            document: document.clone(),
            audio,
            button,
            badge,
            svg,
            state: Rc::new(PlaybackState::new()),
            session: RefCell::new(None),
            visualizer: RefCell::new(None),
        });

        hook_lifecycle(&player)?;
        hook_click(&player)?;
        hook_volume(&player)?;
        hook_gesture_unlock(&player)?;

        if player.config.auto_start {
            spawn_click(&player);
        }
        Ok(player)
    }

    /// One click, one action: unmute, pause, or play. The session must be
    /// running first; if the unlock fails the click aborts with the icon
    /// reverted and nothing else changes.
    async fn handle_click(&self) -> Result<(), JsValue> {
        if let Err(err) = self.ensure_session().await {
            console::error_2(&"failed to start audio session:".into(), &err);
            self.button.set_icon(Icon::Play);
            return Ok(());
        }

        match state::decide_click(
            self.audio.paused(),
            self.audio.muted(),
            self.state.is_playing(),
        ) {
            ClickAction::Unmute => {
                self.audio.set_muted(false);
                // The `playing` event may have fired while still muted, so
                // reflect the playing UI here without another play request.
                self.button.set_icon(Icon::Pause);
                self.state.mark_playing();
            }
            ClickAction::Pause => {
                self.audio.pause()?;
            }
            ClickAction::Play => {
                if self.audio.muted() {
                    self.audio.set_muted(false);
                }
                self.button.set_icon(Icon::Spinner);
                match JsFuture::from(self.audio.play()?).await {
                    // State is set by the `playing` lifecycle event, never
                    // here; the event/promise order is host-determined.
                    Ok(_) => console::log_1(&"playback started".into()),
                    Err(err) => {
                        console::error_2(&"playback failed:".into(), &err);
                        self.button.set_icon(Icon::Play);
                    }
                }
            }
        }
        Ok(())
    }

    /// Create the analysis chain and bar field on first use, then resume
    /// the context if the browser left it suspended.
    async fn ensure_session(&self) -> Result<(), JsValue> {
        if self.session.borrow().is_none() {
            let session = AnalysisSession::new(&self.audio, self.config.fft_size)?;
            if let Some(svg) = &self.svg {
                match Visualizer::mount(
                    &self.document,
                    svg,
                    session.analyser().clone(),
                    Rc::clone(&self.state),
                ) {
                    Ok(visualizer) => *self.visualizer.borrow_mut() = Some(visualizer),
                    // Visual-only failure; playback still works.
                    Err(err) => console::error_2(&"could not build visualizer:".into(), &err),
                }
            }
            *self.session.borrow_mut() = Some(session);
        }

        let session = self.session.borrow().clone();
        if let Some(session) = session {
            session.ensure_running().await?;
        }
        Ok(())
    }

    /// Pure reflection of one lifecycle event through the transition table.
    fn on_stream_event(&self, event: StreamEvent) {
        match event {
            StreamEvent::LoadStart => console::log_1(&"loading radio stream...".into()),
            StreamEvent::CanPlay => console::log_1(&"radio stream is ready to play".into()),
            StreamEvent::Playing => console::log_1(&"radio stream is playing".into()),
            StreamEvent::Paused => console::log_1(&"radio stream is paused".into()),
            StreamEvent::Ended => console::log_1(&"radio stream ended".into()),
            StreamEvent::Error => console::error_1(&"error loading radio stream".into()),
        }

        let transition = self.state.apply(event);
        if let Some(icon) = transition.icon {
            self.button.set_icon(icon);
        }
        if let Some(status) = transition.status {
            if let Some(badge) = &self.badge {
                badge.set_status(status);
            }
        }
        match transition.loop_cmd {
            Some(LoopCommand::Start) => {
                if let Some(visualizer) = &*self.visualizer.borrow() {
                    visualizer.start();
                }
            }
            Some(LoopCommand::Stop) => {
                if let Some(visualizer) = &*self.visualizer.borrow() {
                    visualizer.stop();
                }
            }
            None => {}
        }
    }
}

/// The play/pause/spinner button face.
struct PlayButton {
    element: Element,
}

impl PlayButton {
    fn set_icon(&self, icon: Icon) {
        self.element.set_inner_html(icon.html());
    }
}

/// The "LIVE" badge: status text on the inner element, background color and
/// pulse class on its parent.
struct StatusBadge {
    text: Element,
    panel: Option<HtmlElement>,
    pulse_class: &'static str,
}

impl StatusBadge {
    fn find(document: &Document, config: &WidgetConfig) -> Option<Self> {
        let selector = format!(".{}", config.live_text_class);
        let text = document.query_selector(&selector).ok().flatten()?;
        let panel = text
            .parent_element()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        Some(Self {
            text,
            panel,
            pulse_class: config.pulse_class,
        })
    }

    fn set_status(&self, status: Status) {
        self.text.set_text_content(Some(status.text()));
        if let Some(panel) = &self.panel {
            let _ = panel
                .style()
                .set_property("background-color", status.color());
            let class_list = panel.class_list();
            let _ = if status.pulse() {
                class_list.add_1(self.pulse_class)
            } else {
                class_list.remove_1(self.pulse_class)
            };
        }
    }
}

fn require<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{id}")))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("element #{id} has the wrong type")))
}

fn spawn_click(player: &Rc<Player>) {
    let player = Rc::clone(player);
    spawn_local(async move {
        if let Err(err) = player.handle_click().await {
            console::error_2(&"click handling failed:".into(), &err);
        }
    });
}

fn hook_click(player: &Rc<Player>) -> Result<(), JsValue> {
    let target = player.button.element.clone();
    let player = Rc::clone(player);
    let closure = Closure::wrap(Box::new(move || {
        spawn_click(&player);
    }) as Box<dyn FnMut()>);
    target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn hook_lifecycle(player: &Rc<Player>) -> Result<(), JsValue> {
    let events = [
        ("loadstart", StreamEvent::LoadStart),
        ("canplay", StreamEvent::CanPlay),
        ("playing", StreamEvent::Playing),
        ("pause", StreamEvent::Paused),
        ("error", StreamEvent::Error),
        ("ended", StreamEvent::Ended),
    ];
    for (name, event) in events {
        let handler = Rc::clone(player);
        let closure = Closure::wrap(Box::new(move || {
            handler.on_stream_event(event);
        }) as Box<dyn FnMut()>);
        player
            .audio
            .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn hook_volume(player: &Rc<Player>) -> Result<(), JsValue> {
    let Some(slider) = player
        .document
        .get_element_by_id(player.config.slider_id)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    else {
        return Ok(());
    };

    let audio = player.audio.clone();
    let input = slider.clone();
    let closure = Closure::wrap(Box::new(move || {
        // The slider's own [0, 1] range is trusted; no clamping.
        if let Some(volume) = parse_volume(&input.value()) {
            audio.set_volume(volume);
        }
    }) as Box<dyn FnMut()>);
    slider.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Resume the audio context on the first gesture anywhere on the page, for
/// browsers that create it suspended. Idempotent once running.
fn hook_gesture_unlock(player: &Rc<Player>) -> Result<(), JsValue> {
    for name in ["click", "touchstart"] {
        let handler = Rc::clone(player);
        let closure = Closure::wrap(Box::new(move || {
            let session = handler.session.borrow().clone();
            if let Some(session) = session {
                spawn_local(async move {
                    if let Err(err) = session.ensure_running().await {
                        console::error_2(&"audio context resume failed:".into(), &err);
                    }
                });
            }
        }) as Box<dyn FnMut()>);
        player
            .document
            .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn parse_volume(value: &str) -> Option<f64> {
    value.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::parse_volume;

    #[test]
    fn slider_value_passes_through_unclamped() {
        assert_eq!(parse_volume("0.35"), Some(0.35));
        assert_eq!(parse_volume("1"), Some(1.0));
        assert_eq!(parse_volume(" 0.0 "), Some(0.0));
        assert_eq!(parse_volume("loud"), None);
    }
}
