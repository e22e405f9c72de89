use std::cell::Cell;

/// Lifecycle notification from the media element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamEvent {
    LoadStart,
    CanPlay,
    Playing,
    Paused,
    Error,
    Ended,
}

/// What the status badge shows for the current stream state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Live,
    Paused,
    Offline,
}

impl Status {
    pub fn text(self) -> &'static str {
        match self {
            Status::Live => "LIVE",
            Status::Paused => "Pausa",
            Status::Offline => "OFFLINE",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Status::Live => "#4CAF50",
            Status::Paused => "#FFC107",
            Status::Offline => "#9E9E9E",
        }
    }

    /// Only the live state carries the pulse animation class.
    pub fn pulse(self) -> bool {
        self == Status::Live
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Icon {
    Play,
    Pause,
    Spinner,
}

impl Icon {
    pub fn html(self) -> &'static str {
        match self {
            Icon::Play => r#"<i class="fas fa-play"></i>"#,
            Icon::Pause => r#"<i class="fas fa-pause"></i>"#,
            Icon::Spinner => r#"<i class="fas fa-spinner fa-spin"></i>"#,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopCommand {
    Start,
    Stop,
}

/// Deterministic UI effect of one lifecycle event. `None` fields mean
/// "leave as is".
#[derive(Debug, PartialEq, Eq, Default)]
pub struct Transition {
    pub status: Option<Status>,
    pub icon: Option<Icon>,
    pub loop_cmd: Option<LoopCommand>,
}

/// The single "is audibly playing" flag. Only lifecycle events (and the
/// unmute click case) ever change it; the play-promise success path does
/// not, so a racing `playing` event cannot double-update the UI.
#[derive(Debug, Default)]
pub struct PlaybackState {
    is_playing: Cell<bool>,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing.get()
    }

    /// Used by the playing-but-muted click case, where the `playing` event
    /// may have fired before the user ever clicked.
    pub fn mark_playing(&self) {
        self.is_playing.set(true);
    }

    /// Fixed reflection table: each event maps to at most one status, icon
    /// and visualizer command. `Error` reflects OFFLINE but leaves the loop
    /// registration alone; only pause/ended cancel it.
    pub fn apply(&self, event: StreamEvent) -> Transition {
        match event {
            StreamEvent::Playing => {
                self.is_playing.set(true);
                Transition {
                    status: Some(Status::Live),
                    icon: Some(Icon::Pause),
                    loop_cmd: Some(LoopCommand::Start),
                }
            }
            StreamEvent::Paused => {
                self.is_playing.set(false);
                Transition {
                    status: Some(Status::Paused),
                    icon: Some(Icon::Play),
                    loop_cmd: Some(LoopCommand::Stop),
                }
            }
            StreamEvent::Ended => {
                self.is_playing.set(false);
                Transition {
                    status: Some(Status::Offline),
                    icon: Some(Icon::Play),
                    loop_cmd: Some(LoopCommand::Stop),
                }
            }
            StreamEvent::Error => {
                self.is_playing.set(false);
                Transition {
                    status: Some(Status::Offline),
                    icon: Some(Icon::Play),
                    loop_cmd: None,
                }
            }
            StreamEvent::LoadStart | StreamEvent::CanPlay => Transition::default(),
        }
    }
}

/// The resolved playback action for a button click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickAction {
    Unmute,
    Pause,
    Play,
}

/// Three mutually exclusive click cases, tested in order: playing-but-muted
/// (autoplay policy left the element muted) only unmutes; audibly playing
/// pauses; anything else requests play. Exactly one action per click.
pub fn decide_click(paused: bool, muted: bool, is_playing: bool) -> ClickAction {
    if !paused && muted {
        ClickAction::Unmute
    } else if is_playing {
        ClickAction::Pause
    } else {
        ClickAction::Play
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playing_event_sets_flag_and_starts_loop() {
        let state = PlaybackState::new();
        let t = state.apply(StreamEvent::Playing);
        assert!(state.is_playing());
        assert_eq!(t.status, Some(Status::Live));
        assert_eq!(t.icon, Some(Icon::Pause));
        assert_eq!(t.loop_cmd, Some(LoopCommand::Start));
    }

    #[test]
    fn paused_and_ended_clear_flag_and_stop_loop() {
        let state = PlaybackState::new();
        state.apply(StreamEvent::Playing);
        let t = state.apply(StreamEvent::Paused);
        assert!(!state.is_playing());
        assert_eq!(t.status, Some(Status::Paused));
        assert_eq!(t.loop_cmd, Some(LoopCommand::Stop));

        state.apply(StreamEvent::Playing);
        let t = state.apply(StreamEvent::Ended);
        assert!(!state.is_playing());
        assert_eq!(t.status, Some(Status::Offline));
        assert_eq!(t.icon, Some(Icon::Play));
        assert_eq!(t.loop_cmd, Some(LoopCommand::Stop));
    }

    #[test]
    fn error_reflects_offline_without_touching_loop() {
        let state = PlaybackState::new();
        state.apply(StreamEvent::Playing);
        let t = state.apply(StreamEvent::Error);
        assert!(!state.is_playing());
        assert_eq!(t.status, Some(Status::Offline));
        assert_eq!(t.icon, Some(Icon::Play));
        assert_eq!(t.loop_cmd, None);
    }

    #[test]
    fn loading_events_change_nothing() {
        let state = PlaybackState::new();
        state.apply(StreamEvent::Playing);
        assert_eq!(state.apply(StreamEvent::LoadStart), Transition::default());
        assert_eq!(state.apply(StreamEvent::CanPlay), Transition::default());
        assert!(state.is_playing());
    }

    #[test]
    fn flag_tracks_most_recent_state_changing_event() {
        let state = PlaybackState::new();
        for (event, expected) in [
            (StreamEvent::Playing, true),
            (StreamEvent::Paused, false),
            (StreamEvent::Playing, true),
            (StreamEvent::Error, false),
            (StreamEvent::CanPlay, false),
            (StreamEvent::Playing, true),
            (StreamEvent::Ended, false),
        ] {
            state.apply(event);
            assert_eq!(state.is_playing(), expected, "after {event:?}");
        }
    }

    #[test]
    fn muted_playback_click_only_unmutes() {
        // Repeated clicks in this case never issue a play request.
        assert_eq!(decide_click(false, true, false), ClickAction::Unmute);
        assert_eq!(decide_click(false, true, true), ClickAction::Unmute);
    }

    #[test]
    fn audible_playback_click_pauses() {
        assert_eq!(decide_click(false, false, true), ClickAction::Pause);
    }

    #[test]
    fn paused_click_plays_even_when_muted() {
        assert_eq!(decide_click(true, false, false), ClickAction::Play);
        assert_eq!(decide_click(true, true, false), ClickAction::Play);
    }

    #[test]
    fn status_table_matches_badge_styling() {
        assert_eq!(Status::Live.text(), "LIVE");
        assert_eq!(Status::Live.color(), "#4CAF50");
        assert!(Status::Live.pulse());
        assert_eq!(Status::Paused.text(), "Pausa");
        assert_eq!(Status::Paused.color(), "#FFC107");
        assert!(!Status::Paused.pulse());
        assert_eq!(Status::Offline.text(), "OFFLINE");
        assert_eq!(Status::Offline.color(), "#9E9E9E");
        assert!(!Status::Offline.pulse());
    }
}
