use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AnalyserNode, AudioContext, AudioContextState, HtmlAudioElement,
    MediaElementAudioSourceNode,
};

/// The Web Audio analysis chain: element source -> analyser -> destination.
///
/// Created at most once per page lifetime, lazily on the first user
/// interaction (browsers refuse to start audio processing without a
/// gesture). The analyser resolution is fixed at creation, so the bar count
/// never changes afterwards.
#[derive(Clone)]
pub struct AnalysisSession {
    context: AudioContext,
    analyser: AnalyserNode,
    // Keeps the element tap alive as long as the session.
    _source: MediaElementAudioSourceNode,
}

impl AnalysisSession {
    pub fn new(audio: &HtmlAudioElement, fft_size: u32) -> Result<Self, JsValue> {
        let context = AudioContext::new()?;
        let analyser = context.create_analyser()?;
        analyser.set_fft_size(fft_size);

        let source = context.create_media_element_source(audio)?;
        source.connect_with_audio_node(&analyser)?;
        analyser.connect_with_audio_node(&context.destination())?;

        Ok(Self {
            context,
            analyser,
            _source: source,
        })
    }

    pub fn analyser(&self) -> &AnalyserNode {
        &self.analyser
    }

    /// Resume a context the browser created suspended. Idempotent; awaits
    /// the resume promise so callers know the unlock actually happened.
    pub async fn ensure_running(&self) -> Result<(), JsValue> {
        if self.context.state() == AudioContextState::Suspended {
            JsFuture::from(self.context.resume()?).await?;
            web_sys::console::log_1(&"audio context resumed on user interaction".into());
        }
        Ok(())
    }
}
