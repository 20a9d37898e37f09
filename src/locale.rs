use crate::error::LocaleError;
use std::fmt;
use std::str::FromStr;

/// A language tag of the form `ll` or `ll-RR`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    language: String,
    region: Option<String>,
}

impl Locale {
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn matches_language(&self, other: &Locale) -> bool {
        self.language == other.language
    }

    /// English name of the language, or the bare code when it is not known.
    pub fn display_language(&self) -> &str {
        match self.language.as_str() {
            "ar" => "Arabic",
            "cs" => "Czech",
            "da" => "Danish",
            "de" => "German",
            "el" => "Greek",
            "en" => "English",
            "es" => "Spanish",
            "fi" => "Finnish",
            "fr" => "French",
            "hi" => "Hindi",
            "hu" => "Hungarian",
            "it" => "Italian",
            "ja" => "Japanese",
            "ko" => "Korean",
            "nl" => "Dutch",
            "no" | "nb" => "Norwegian",
            "pl" => "Polish",
            "pt" => "Portuguese",
            "ru" => "Russian",
            "sv" => "Swedish",
            "tr" => "Turkish",
            "uk" => "Ukrainian",
            "zh" => "Chinese",
            other => other,
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            language: "en".to_owned(),
            region: Some("GB".to_owned()),
        }
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(LocaleError::Empty);
        }
        let mut parts = tag.split(|c| c == '-' || c == '_');

        let language = parts.next().unwrap_or_default();
        if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(LocaleError::Language(tag.to_owned()));
        }

        // Scripts and variants are irrelevant to voice matching.
        let mut next = parts.next();
        if next.map_or(false, |s| s.len() == 4 && s.chars().all(|c| c.is_ascii_alphabetic())) {
            next = parts.next();
        }
        let region = match next {
            Some(r) if r.len() == 2 && r.chars().all(|c| c.is_ascii_alphabetic()) => Some(r.to_ascii_uppercase()),
            Some(r) if r.len() == 3 && r.chars().all(|c| c.is_ascii_digit()) => Some(r.to_owned()),
            Some(_) => return Err(LocaleError::Region(tag.to_owned())),
            None => None,
        };

        Ok(Self {
            language: language.to_ascii_lowercase(),
            region,
        })
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}-{}", self.language, region),
            None => f.write_str(&self.language),
        }
    }
}
