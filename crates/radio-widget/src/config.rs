/// Widget wiring, configured by markup: the host page provides the elements,
/// the widget finds them by id.
#[derive(Clone, Copy, Debug)]
pub struct WidgetConfig {
    pub audio_id: &'static str,
    pub button_id: &'static str,
    pub slider_id: &'static str,
    pub svg_id: &'static str,
    /// Class of the element carrying the status text; its parent gets the
    /// background color and pulse class.
    pub live_text_class: &'static str,
    pub pulse_class: &'static str,
    pub initial_volume: f64,
    pub fft_size: u32,
    /// Click the play button once at load so the stream starts by itself.
    pub auto_start: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            audio_id: "radio-stream",
            button_id: "play-pause-btn",
            slider_id: "volume-slider",
            svg_id: "waveform-svg",
            live_text_class: "live-text",
            pulse_class: "live",
            initial_volume: 0.7,
            fft_size: 256,
            auto_start: true,
        }
    }
}
