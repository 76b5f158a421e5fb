//! Speech input/output configuration types.

use serde::{Deserialize, Serialize};

/// Voices accepted by the speech synthesis endpoint.
pub const SUPPORTED_VOICES: &[&str] = &["alloy", "echo", "fable", "onyx", "nova", "shimmer"];

/// Speech synthesis models.
pub const SUPPORTED_TTS_MODELS: &[&str] = &["tts-1", "tts-1-hd"];

/// Voice configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Synthesize every assistant reply to `output_path`.
    pub speak_responses: bool,
    pub tts_model: String,
    pub voice: String,
    pub transcription_model: String,
    /// ISO-639-1 hint for transcription.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub output_path: String,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            speak_responses: false,
            tts_model: "tts-1".into(),
            voice: "onyx".into(),
            transcription_model: "whisper-1".into(),
            language: None,
            output_path: "speech.mp3".into(),
        }
    }
}
