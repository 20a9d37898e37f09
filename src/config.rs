use crate::error::ConfigError;
use crate::locale::Locale;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "speaktome", about = "Type some text and hear it spoken")]
pub struct Settings {
    /// Language the engine is switched to once it is ready
    #[arg(long, env = "SPEAKTOME_LOCALE", default_value = "en-GB")]
    pub locale: Locale,

    /// Pitch multiplier, 1.0 is the engine's normal pitch
    #[arg(long, env = "SPEAKTOME_PITCH", default_value_t = 1.0)]
    pub pitch: f32,

    /// Rate multiplier, 1.0 is the engine's normal rate
    #[arg(long, env = "SPEAKTOME_RATE", default_value_t = 1.0)]
    pub rate: f32,

    /// Command run when no voice data is installed for the locale
    #[arg(long, env = "SPEAKTOME_INSTALL_CMD")]
    pub install_command: Option<String>,
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_multiplier("pitch", self.pitch)?;
        check_multiplier("rate", self.rate)
    }

    pub fn voice(&self) -> VoiceSettings {
        VoiceSettings {
            locale: self.locale.clone(),
            pitch: self.pitch,
            rate: self.rate,
        }
    }
}

fn check_multiplier(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { name, value })
    }
}

/// What gets applied to the engine right after it reports ready.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceSettings {
    pub locale: Locale,
    pub pitch: f32,
    pub rate: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            pitch: 1.0,
            rate: 1.0,
        }
    }
}
