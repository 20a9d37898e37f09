pub mod config;
pub mod controller;
pub mod error;
pub mod locale;
pub mod platform;
pub mod state;
pub mod talker;

pub use config::{Settings, VoiceSettings};
pub use controller::Controller;
pub use error::SpeechError;
pub use locale::Locale;
pub use platform::{FlushPolicy, InitStatus, PlatformEvent, SpeechEngine, SpeechService, VoiceData};
pub use state::ReadinessState;
