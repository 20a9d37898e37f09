use crate::state::ReadinessState;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("voice data for the requested locale is not installed")]
    DataMissing,
    #[error("speech engine failed to initialize: {0}")]
    EngineInit(String),
    #[error("speech engine is not ready (state: {0})")]
    NotReady(ReadinessState),
    #[error("illegal readiness transition {from} -> {to}")]
    InvalidTransition {
        from: ReadinessState,
        to: ReadinessState,
    },
    #[error("{0} is not supported by this speech backend")]
    Unsupported(&'static str),
    #[error("speech engine handle is unavailable")]
    EngineUnavailable,
    #[error("speech backend error: {0}")]
    Backend(#[from] tts::Error),
    #[error("failed to launch voice data installer: {0}")]
    Install(#[source] std::io::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocaleError {
    #[error("empty locale tag")]
    Empty,
    #[error("invalid language subtag in {0:?}")]
    Language(String),
    #[error("invalid region subtag in {0:?}")]
    Region(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a finite positive number, got {value}")]
    OutOfRange { name: &'static str, value: f32 },
}
