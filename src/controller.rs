//! Lifecycle controller for a host speech engine.
//!
//! ```text
//! Uninitialized --check(Pass)----> Initializing --init(ok)---> Ready
//! Uninitialized --check(Missing)-> DataMissing --recheck-----> Uninitialized
//!                                  Initializing --init(fail)-> Failed
//! any --shutdown--> ShutDown
//! ```
//!
//! Everything runs on the thread that owns the controller. Platform answers
//! are queued on a channel and only acted upon in [`Controller::poll`].

use crate::config::VoiceSettings;
use crate::error::SpeechError;
use crate::platform::{
    EventSender, FlushPolicy, InitStatus, PlatformEvent, SpeechEngine, SpeechService, VoiceData,
};
use crate::state::ReadinessState;
use crossbeam_channel::{unbounded, Receiver};
use tracing::{debug, error, info, warn};

pub struct Controller<S: SpeechService> {
    service: S,
    voice: VoiceSettings,
    state: ReadinessState,
    engine: Option<S::Engine>,
    events_tx: EventSender,
    events_rx: Receiver<PlatformEvent>,
}

impl<S: SpeechService> Controller<S> {
    pub fn new(service: S, voice: VoiceSettings) -> Self {
        let (events_tx, events_rx) = unbounded();
        Self {
            service,
            voice,
            state: ReadinessState::Uninitialized,
            engine: None,
            events_tx,
            events_rx,
        }
    }

    pub fn state(&self) -> ReadinessState {
        self.state
    }

    pub fn voice(&self) -> &VoiceSettings {
        &self.voice
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    /// Asks the platform whether voice data for the configured locale exists.
    pub fn start(&mut self) -> Result<(), SpeechError> {
        if self.state != ReadinessState::Uninitialized {
            return Err(SpeechError::InvalidTransition {
                from: self.state,
                to: ReadinessState::Initializing,
            });
        }
        info!(locale = %self.voice.locale, "checking for installed voice data");
        self.service
            .check_voice_data(&self.voice.locale, self.events_tx.clone());
        Ok(())
    }

    /// Re-enters the check after voice data was installed out of band.
    pub fn recheck(&mut self) -> Result<(), SpeechError> {
        self.state = self.state.transition(ReadinessState::Uninitialized)?;
        self.start()
    }

    /// Handles every platform answer that has arrived so far.
    pub fn poll(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            handled += 1;
            if let Err(err) = self.handle_event(event) {
                warn!(%err, state = %self.state, "ignoring platform event");
            }
        }
        handled
    }

    pub fn handle_event(&mut self, event: PlatformEvent) -> Result<(), SpeechError> {
        if self.state.is_terminal() {
            debug!(?event, "dropping platform event after shutdown");
            return Ok(());
        }
        match event {
            PlatformEvent::VoiceDataChecked(data) => self.on_voice_data_checked(data),
            PlatformEvent::EngineInitialized(status) => self.on_init(status),
        }
    }

    pub fn on_voice_data_checked(&mut self, data: VoiceData) -> Result<(), SpeechError> {
        match data {
            VoiceData::Pass => {
                self.state = self.state.transition(ReadinessState::Initializing)?;
                info!("voice data present, creating speech engine");
                for (i, locale) in self.service.available_locales().iter().enumerate() {
                    debug!(
                        "locale {}: {} language={}",
                        i,
                        locale,
                        locale.display_language()
                    );
                }
                match self.service.create_engine(self.events_tx.clone()) {
                    Ok(engine) => self.engine = Some(engine),
                    Err(err) => {
                        error!(%err, "speech engine could not be constructed");
                        self.state = self.state.transition(ReadinessState::Failed)?;
                    }
                }
                Ok(())
            }
            VoiceData::Missing => {
                self.state = self.state.transition(ReadinessState::DataMissing)?;
                info!(locale = %self.voice.locale, "voice data missing, requesting install");
                if let Err(err) = self.service.install_voice_data(&self.voice.locale) {
                    warn!(%err, "voice data install could not be started");
                }
                Ok(())
            }
        }
    }

    pub fn on_init(&mut self, status: InitStatus) -> Result<(), SpeechError> {
        match status {
            InitStatus::Success => {
                if self.engine.is_none() {
                    self.state = self.state.transition(ReadinessState::Failed)?;
                    error!("engine reported ready but no handle is held");
                    return Err(SpeechError::EngineUnavailable);
                }
                self.state = self.state.transition(ReadinessState::Ready)?;
                let engine = self.engine.as_mut().ok_or(SpeechError::EngineUnavailable)?;
                info!("speech engine ready");

                let locale = &self.voice.locale;
                debug!(%locale, available = ?engine.is_language_available(locale));
                if let Err(err) = engine.set_locale(locale) {
                    warn!(%err, %locale, "could not switch engine locale");
                }
                if let Err(err) = engine.set_pitch(self.voice.pitch) {
                    warn!(%err, pitch = self.voice.pitch, "could not set pitch");
                }
                if let Err(err) = engine.set_rate(self.voice.rate) {
                    warn!(%err, rate = self.voice.rate, "could not set rate");
                }

                let greeting = greeting(self.voice.locale.display_language());
                self.speak(&greeting, FlushPolicy::Flush);
                Ok(())
            }
            InitStatus::Failure(reason) => {
                self.state = self.state.transition(ReadinessState::Failed)?;
                error!(%reason, "speech engine not properly initialized");
                Ok(())
            }
        }
    }

    /// Speaks `text`, or logs why it cannot. Never fails.
    pub fn speak(&mut self, text: &str, policy: FlushPolicy) {
        if let Err(err) = self.try_speak(text, policy) {
            warn!(%err, ?policy, "utterance dropped");
        }
    }

    pub fn try_speak(&mut self, text: &str, policy: FlushPolicy) -> Result<(), SpeechError> {
        if self.state != ReadinessState::Ready {
            return Err(SpeechError::NotReady(self.state));
        }
        let engine = self.engine.as_mut().ok_or(SpeechError::EngineUnavailable)?;
        debug!(?policy, len = text.len(), "speaking");
        engine.speak(text, policy)
    }

    pub fn is_speaking(&self) -> bool {
        match (&self.engine, self.state) {
            (Some(engine), ReadinessState::Ready) => engine.is_speaking(),
            _ => false,
        }
    }

    /// Releases the engine handle. Safe to call any number of times.
    pub fn shutdown(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        if let Some(mut engine) = self.engine.take() {
            info!(state = %self.state, "releasing speech engine");
            engine.shutdown();
        }
        self.state = ReadinessState::ShutDown;
    }
}

impl<S: SpeechService> Drop for Controller<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

pub fn greeting(language: &str) -> String {
    format!(
        "Let's test text to speech in {language}. Enter some {language} text and press the speak button."
    )
}
