//! Desktop speech platform backed by the `tts` crate.

use crate::error::SpeechError;
use crate::locale::Locale;
use crate::platform::{
    EventSender, FlushPolicy, InitStatus, PlatformEvent, SpeechEngine, SpeechService, VoiceData,
};
use std::io;
use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};
use tts::Tts;

#[derive(Default)]
pub struct TtsService {
    install_command: Option<String>,
}

impl TtsService {
    pub fn new(install_command: Option<String>) -> Self {
        Self { install_command }
    }

    /// Runs the installer with the locale tag appended and reaps it on a
    /// worker thread.
    fn launch_installer(&self, cmd: &str, locale: &Locale) -> Result<JoinHandle<()>, SpeechError> {
        let mut parts = cmd.split_whitespace();
        let program = parts.next().ok_or_else(|| {
            SpeechError::Install(io::Error::new(io::ErrorKind::InvalidInput, "empty install command"))
        })?;
        let mut child = Command::new(program)
            .args(parts)
            .arg(locale.to_string())
            .spawn()
            .map_err(SpeechError::Install)?;
        let pid = child.id();
        info!(pid, %cmd, "launched voice data installer");

        thread::Builder::new()
            .name("tts-install".into())
            .spawn(move || match child.wait() {
                Ok(status) if status.success() => info!(pid, "voice data installer finished"),
                Ok(status) => warn!(pid, %status, "voice data installer failed"),
                Err(err) => warn!(pid, %err, "could not wait on voice data installer"),
            })
            .map_err(SpeechError::Install)
    }
}

impl SpeechService for TtsService {
    type Engine = Talker;

    fn check_voice_data(&mut self, _locale: &Locale, events: EventSender) {
        let reply = events.clone();
        let spawned = thread::Builder::new()
            .name("tts-check".into())
            .spawn(move || {
                let _ = reply.send(PlatformEvent::VoiceDataChecked(probe_voice_data()));
            });
        if let Err(err) = spawned {
            // Without the probe we cannot tell; let engine init surface real problems.
            warn!(%err, "could not spawn voice data check");
            let _ = events.send(PlatformEvent::VoiceDataChecked(VoiceData::Pass));
        }
    }

    fn install_voice_data(&mut self, locale: &Locale) -> Result<(), SpeechError> {
        match &self.install_command {
            Some(cmd) => self.launch_installer(cmd, locale).map(drop),
            None => {
                warn!(
                    %locale,
                    "no voice installed for {}; install one through your system's speech settings and check again",
                    locale.display_language()
                );
                Ok(())
            }
        }
    }

    fn create_engine(&mut self, events: EventSender) -> Result<Talker, SpeechError> {
        let talker = Talker::default();
        let inner = talker.0.clone();
        let speaking = talker.1.clone();
        thread::Builder::new()
            .name("tts-init".into())
            .spawn(move || {
                let status = match Tts::default() {
                    Ok(tts) => match install(&inner, tts, speaking) {
                        Ok(()) => InitStatus::Success,
                        Err(err) => InitStatus::Failure(err.to_string()),
                    },
                    Err(err) => InitStatus::Failure(err.to_string()),
                };
                let _ = events.send(PlatformEvent::EngineInitialized(status));
            })
            .map_err(|err| SpeechError::EngineInit(err.to_string()))?;
        Ok(talker)
    }
}

/// The backend cannot enumerate voices, so a backend that comes up at all
/// counts as having voice data.
fn probe_voice_data() -> VoiceData {
    match Tts::default() {
        Ok(_) => VoiceData::Pass,
        Err(err) => {
            info!(%err, "speech backend unavailable");
            VoiceData::Missing
        }
    }
}

fn install(inner: &Mutex<InnerTalker>, tts: Tts, speaking: Arc<AtomicBool>) -> Result<(), SpeechError> {
    let (c1, c2, c3) = (speaking.clone(), speaking.clone(), speaking);
    // Not every backend reports utterance progress; is_speaking then stays false.
    let tracked = tts
        .on_utterance_begin(Some(Box::new(move |_| c1.store(true, Ordering::Relaxed))))
        .and_then(|_| tts.on_utterance_stop(Some(Box::new(move |_| c2.store(false, Ordering::Relaxed)))))
        .and_then(|_| tts.on_utterance_end(Some(Box::new(move |_| c3.store(false, Ordering::Relaxed)))));
    if let Err(err) = tracked {
        debug!(%err, "utterance callbacks unavailable");
    }

    let mut guard = inner.lock().map_err(|_| SpeechError::EngineUnavailable)?;
    guard.normal_pitch = tts.normal_pitch();
    guard.normal_rate = tts.normal_rate();
    guard.tts = Some(tts);
    Ok(())
}

/// Shared handle to a `tts` backend that may still be loading.
#[derive(Clone, Default)]
pub struct Talker(Arc<Mutex<InnerTalker>>, Arc<AtomicBool>);

#[derive(Default)]
struct InnerTalker {
    tts: Option<Tts>,
    normal_pitch: f32,
    normal_rate: f32,
}

impl Talker {
    fn lock(&self) -> Result<MutexGuard<'_, InnerTalker>, SpeechError> {
        self.0.lock().map_err(|_| SpeechError::EngineUnavailable)
    }
}

impl SpeechEngine for Talker {
    fn set_locale(&mut self, locale: &Locale) -> Result<(), SpeechError> {
        debug!(%locale, "backend speaks in its configured default voice");
        Err(SpeechError::Unsupported("voice selection"))
    }

    fn set_pitch(&mut self, pitch: f32) -> Result<(), SpeechError> {
        let mut inner = self.lock()?;
        let normal = inner.normal_pitch;
        let tts = inner.tts.as_mut().ok_or(SpeechError::EngineUnavailable)?;
        let value = (normal * pitch).clamp(tts.min_pitch(), tts.max_pitch());
        tts.set_pitch(value)?;
        Ok(())
    }

    fn set_rate(&mut self, rate: f32) -> Result<(), SpeechError> {
        let mut inner = self.lock()?;
        let normal = inner.normal_rate;
        let tts = inner.tts.as_mut().ok_or(SpeechError::EngineUnavailable)?;
        let value = (normal * rate).clamp(tts.min_rate(), tts.max_rate());
        tts.set_rate(value)?;
        Ok(())
    }

    fn speak(&mut self, text: &str, policy: FlushPolicy) -> Result<(), SpeechError> {
        let mut inner = self.lock()?;
        let tts = inner.tts.as_mut().ok_or(SpeechError::EngineUnavailable)?;
        tts.speak(text, policy == FlushPolicy::Flush)?;
        Ok(())
    }

    fn is_speaking(&self) -> bool {
        self.1.load(Ordering::Relaxed)
    }

    fn shutdown(&mut self) {
        let Ok(mut inner) = self.lock() else { return };
        if let Some(mut tts) = inner.tts.take() {
            if let Err(err) = tts.stop() {
                debug!(%err, "stop on shutdown failed");
            }
        }
        self.1.store(false, Ordering::Relaxed);
    }
}
