use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Represents a Gemini model identifier.
///
/// This can be one of the models offered in the selection menu or a custom
/// string value for anything else the API serves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    /// Known model versions
    Known(KnownModel),

    /// Custom model identifier (for models not in the menu)
    Custom(String),
}

/// Gemini models offered in the selection menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownModel {
    /// Gemini 2.5 Pro experimental (2025-03-25 version)
    Gemini25ProExp0325,

    /// Gemini 2.0 Flash
    Gemini20Flash,

    /// Gemini 1.5 Flash
    Gemini15Flash,
}

impl KnownModel {
    /// All menu entries in menu order.
    pub const ALL: [KnownModel; 3] = [
        KnownModel::Gemini25ProExp0325,
        KnownModel::Gemini20Flash,
        KnownModel::Gemini15Flash,
    ];

    /// The API identifier of this model.
    pub fn id(&self) -> &'static str {
        match self {
            KnownModel::Gemini25ProExp0325 => "gemini-2.5-pro-exp-03-25",
            KnownModel::Gemini20Flash => "gemini-2.0-flash",
            KnownModel::Gemini15Flash => "gemini-1.5-flash",
        }
    }

    /// The key that selects this model in the menu.
    pub fn menu_key(&self) -> &'static str {
        match self {
            KnownModel::Gemini25ProExp0325 => "1",
            KnownModel::Gemini20Flash => "2",
            KnownModel::Gemini15Flash => "3",
        }
    }

    /// Looks up a model by its menu key.
    pub fn from_menu_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|model| model.menu_key() == key)
    }

    /// Human-readable name derived from the identifier.
    ///
    /// `gemini-2.5-pro-exp-03-25` becomes `Gemini 2.5 Pro (Experimental)`.
    pub fn display_name(&self) -> String {
        let pieces: Vec<&str> = self.id().split('-').collect();
        let mut name = format!("Gemini {} {}", pieces[1], capitalize(pieces[2]));
        if pieces.get(3) == Some(&"exp") {
            name.push_str(" (Experimental)");
        }
        name
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Model {
    /// The API identifier, e.g. `gemini-2.0-flash`.
    pub fn id(&self) -> &str {
        match self {
            Model::Known(known) => known.id(),
            Model::Custom(custom) => custom,
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl fmt::Display for KnownModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("models/").unwrap_or(s);
        Ok(KnownModel::ALL
            .into_iter()
            .find(|known| known.id() == s)
            .map(Model::Known)
            .unwrap_or_else(|| Model::Custom(s.to_string())))
    }
}

impl Serialize for Model {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let Ok(model) = s.parse::<Model>();
        Ok(model)
    }
}

impl From<KnownModel> for Model {
    fn from(model: KnownModel) -> Self {
        Model::Known(model)
    }
}

impl From<String> for Model {
    fn from(model: String) -> Self {
        Model::Custom(model)
    }
}

impl From<&str> for Model {
    fn from(model: &str) -> Self {
        Model::Custom(model.to_string())
    }
}
