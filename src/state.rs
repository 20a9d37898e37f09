use crate::error::SpeechError;
use std::fmt;

/// The controller's view of whether the speech engine may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReadinessState {
    #[default]
    Uninitialized,
    DataMissing,
    Initializing,
    Ready,
    Failed,
    /// Engine released. Nothing leaves this state.
    ShutDown,
}

impl ReadinessState {
    pub fn can_transition(self, to: ReadinessState) -> bool {
        use ReadinessState::*;
        matches!(
            (self, to),
            (Uninitialized, Initializing)
                | (Uninitialized, DataMissing)
                | (DataMissing, Uninitialized)
                | (Initializing, Ready)
                | (Initializing, Failed)
                | (Uninitialized | DataMissing | Initializing | Ready | Failed, ShutDown)
        )
    }

    pub fn transition(self, to: ReadinessState) -> Result<ReadinessState, SpeechError> {
        if self.can_transition(to) {
            Ok(to)
        } else {
            Err(SpeechError::InvalidTransition { from: self, to })
        }
    }

    /// Input controls are only enabled once speech can actually be produced.
    pub fn controls_enabled(self) -> bool {
        self == ReadinessState::Ready
    }

    pub fn is_terminal(self) -> bool {
        self == ReadinessState::ShutDown
    }
}

impl fmt::Display for ReadinessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReadinessState::Uninitialized => "uninitialized",
            ReadinessState::DataMissing => "data missing",
            ReadinessState::Initializing => "initializing",
            ReadinessState::Ready => "ready",
            ReadinessState::Failed => "failed",
            ReadinessState::ShutDown => "shut down",
        })
    }
}
