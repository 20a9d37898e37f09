#![allow(dead_code)]

use speaktome::error::SpeechError;
use speaktome::platform::EventSender;
use speaktome::{FlushPolicy, InitStatus, Locale, PlatformEvent, SpeechEngine, SpeechService, VoiceData};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CheckVoiceData(String),
    InstallVoiceData(String),
    CreateEngine,
    SetLocale(String),
    SetPitch(f32),
    SetRate(f32),
    Speak(String, FlushPolicy),
    Shutdown,
}

#[derive(Clone, Default)]
pub struct Recorder {
    calls: Rc<RefCell<Vec<Call>>>,
    init_sender: Rc<RefCell<Option<EventSender>>>,
}

impl Recorder {
    fn push(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn spoken(&self) -> Vec<(String, FlushPolicy)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Speak(text, policy) => Some((text, policy)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &Call) -> usize {
        self.calls.borrow().iter().filter(|c| *c == wanted).count()
    }

    /// Plays the platform's init callback for an engine created earlier.
    pub fn finish_init(&self, status: InitStatus) {
        let sender = self.init_sender.borrow();
        let sender = sender.as_ref().expect("engine was never created");
        sender.send(PlatformEvent::EngineInitialized(status)).unwrap();
    }
}

/// Answers the voice data check immediately; engine init is driven by the test.
pub struct FakeService {
    pub voice_data: VoiceData,
    pub construct_fails: bool,
    pub locales: Vec<Locale>,
    recorder: Recorder,
}

impl FakeService {
    pub fn new(voice_data: VoiceData) -> (Self, Recorder) {
        let recorder = Recorder::default();
        let service = Self {
            voice_data,
            construct_fails: false,
            locales: vec!["en-GB".parse().unwrap(), "fr-FR".parse().unwrap()],
            recorder: recorder.clone(),
        };
        (service, recorder)
    }
}

impl SpeechService for FakeService {
    type Engine = FakeEngine;

    fn check_voice_data(&mut self, locale: &Locale, events: EventSender) {
        self.recorder.push(Call::CheckVoiceData(locale.to_string()));
        events.send(PlatformEvent::VoiceDataChecked(self.voice_data)).unwrap();
    }

    fn install_voice_data(&mut self, locale: &Locale) -> Result<(), SpeechError> {
        self.recorder.push(Call::InstallVoiceData(locale.to_string()));
        Ok(())
    }

    fn create_engine(&mut self, events: EventSender) -> Result<FakeEngine, SpeechError> {
        if self.construct_fails {
            return Err(SpeechError::EngineInit("no backend".into()));
        }
        self.recorder.push(Call::CreateEngine);
        *self.recorder.init_sender.borrow_mut() = Some(events);
        Ok(FakeEngine {
            recorder: self.recorder.clone(),
        })
    }

    fn available_locales(&self) -> Vec<Locale> {
        self.locales.clone()
    }
}

pub struct FakeEngine {
    recorder: Recorder,
}

impl SpeechEngine for FakeEngine {
    fn set_locale(&mut self, locale: &Locale) -> Result<(), SpeechError> {
        self.recorder.push(Call::SetLocale(locale.to_string()));
        Ok(())
    }

    fn set_pitch(&mut self, pitch: f32) -> Result<(), SpeechError> {
        self.recorder.push(Call::SetPitch(pitch));
        Ok(())
    }

    fn set_rate(&mut self, rate: f32) -> Result<(), SpeechError> {
        self.recorder.push(Call::SetRate(rate));
        Ok(())
    }

    fn speak(&mut self, text: &str, policy: FlushPolicy) -> Result<(), SpeechError> {
        self.recorder.push(Call::Speak(text.to_owned(), policy));
        Ok(())
    }

    fn shutdown(&mut self) {
        self.recorder.push(Call::Shutdown);
    }
}
