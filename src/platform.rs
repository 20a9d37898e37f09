//! Seams between the lifecycle controller and whatever actually produces speech.
//!
//! The host speech service answers the availability check and engine
//! construction asynchronously by sending a [`PlatformEvent`] on the
//! [`EventSender`] it was handed. The controller drains those events on its
//! own thread, so implementations are free to do the work wherever they like.

use crate::error::SpeechError;
use crate::locale::Locale;
use crossbeam_channel::Sender;

/// Whether a new utterance replaces or queues behind pending ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushPolicy {
    Flush,
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceData {
    Pass,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitStatus {
    Success,
    Failure(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformEvent {
    VoiceDataChecked(VoiceData),
    EngineInitialized(InitStatus),
}

pub type EventSender = Sender<PlatformEvent>;

pub trait SpeechService {
    type Engine: SpeechEngine;

    /// Starts checking for installed voice data. The answer arrives as
    /// [`PlatformEvent::VoiceDataChecked`].
    fn check_voice_data(&mut self, locale: &Locale, events: EventSender);

    /// Kicks off an installation flow the controller has no control over.
    fn install_voice_data(&mut self, locale: &Locale) -> Result<(), SpeechError>;

    /// Constructs the engine handle. The handle is not usable until
    /// [`PlatformEvent::EngineInitialized`] reports success.
    fn create_engine(&mut self, events: EventSender) -> Result<Self::Engine, SpeechError>;

    fn available_locales(&self) -> Vec<Locale> {
        Vec::new()
    }
}

/// An initialized speech engine. Pitch and rate are multipliers, `1.0`
/// being the engine's normal value.
pub trait SpeechEngine {
    /// `None` when the engine cannot tell.
    fn is_language_available(&self, _locale: &Locale) -> Option<bool> {
        None
    }

    fn set_locale(&mut self, locale: &Locale) -> Result<(), SpeechError>;

    fn set_pitch(&mut self, pitch: f32) -> Result<(), SpeechError>;

    fn set_rate(&mut self, rate: f32) -> Result<(), SpeechError>;

    fn speak(&mut self, text: &str, policy: FlushPolicy) -> Result<(), SpeechError>;

    fn is_speaking(&self) -> bool {
        false
    }

    /// Releases the underlying resource. Must tolerate an engine that never
    /// finished initializing.
    fn shutdown(&mut self);
}
