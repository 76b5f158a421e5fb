use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language models an assistant may be configured with.
///
/// Serialized as the model identifier the remote service expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LanguageModel {
    #[default]
    #[serde(rename = "gpt-3.5-turbo-0125")]
    Gpt35Turbo,
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,
    #[serde(rename = "gpt-4o")]
    Gpt4o,
    #[serde(rename = "gpt-4-turbo")]
    Gpt4Turbo,
}

impl LanguageModel {
    pub const ALL: &'static [LanguageModel] = &[
        LanguageModel::Gpt35Turbo,
        LanguageModel::Gpt4oMini,
        LanguageModel::Gpt4o,
        LanguageModel::Gpt4Turbo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageModel::Gpt35Turbo => "gpt-3.5-turbo-0125",
            LanguageModel::Gpt4oMini => "gpt-4o-mini",
            LanguageModel::Gpt4o => "gpt-4o",
            LanguageModel::Gpt4Turbo => "gpt-4-turbo",
        }
    }
}

impl fmt::Display for LanguageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a model identifier is not one of [`LanguageModel::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language model: {0}")]
pub struct UnknownModel(pub String);

impl FromStr for LanguageModel {
    type Err = UnknownModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LanguageModel::ALL
            .iter()
            .copied()
            .find(|model| model.as_str() == s)
            .ok_or_else(|| UnknownModel(s.to_string()))
    }
}
