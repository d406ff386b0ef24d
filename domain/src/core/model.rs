//! Model value object representing a Gemini model

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Available Gemini models (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    Gemini15Pro,
    /// Pinned version; context caching requires an explicit version suffix.
    Gemini15Pro001,
    Gemini15Pro002,
    Gemini15Flash,
    Gemini15Flash001,
    Gemini20Flash,
    Custom(String),
}

impl Model {
    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gemini15Pro => "gemini-1.5-pro",
            Model::Gemini15Pro001 => "gemini-1.5-pro-001",
            Model::Gemini15Pro002 => "gemini-1.5-pro-002",
            Model::Gemini15Flash => "gemini-1.5-flash",
            Model::Gemini15Flash001 => "gemini-1.5-flash-001",
            Model::Gemini20Flash => "gemini-2.0-flash",
            Model::Custom(s) => s,
        }
    }

    /// Default model for priming cached content
    pub fn default_cache_model() -> Model {
        Model::Gemini15Pro001
    }

    /// Whether the identifier carries an explicit version suffix (e.g. `-001`).
    pub fn is_pinned(&self) -> bool {
        self.as_str()
            .rsplit('-')
            .next()
            .is_some_and(|suffix| suffix.len() == 3 && suffix.chars().all(|c| c.is_ascii_digit()))
    }
}

impl Default for Model {
    /// Returns the default model (gemini-1.5-pro)
    fn default() -> Self {
        Model::Gemini15Pro
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim_start_matches("models/");
        Ok(match s {
            "gemini-1.5-pro" => Model::Gemini15Pro,
            "gemini-1.5-pro-001" => Model::Gemini15Pro001,
            "gemini-1.5-pro-002" => Model::Gemini15Pro002,
            "gemini-1.5-flash" => Model::Gemini15Flash,
            "gemini-1.5-flash-001" => Model::Gemini15Flash001,
            "gemini-2.0-flash" => Model::Gemini20Flash,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.parse() {
            Ok(model) => Ok(model),
            Err(never) => match never {},
        }
    }
}
