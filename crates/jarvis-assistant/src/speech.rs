//! OpenAI audio clients for the voice loop.
//!
//! Speech-to-text goes through the Whisper transcription endpoint and
//! text-to-speech through the speech endpoint. Neither keeps any state
//! beyond its configuration.

use tracing::debug;

use crate::openai::OpenAiConfig;
use crate::GatewayError;

/// Audio client configuration.
#[derive(Clone)]
pub struct SpeechConfig {
    pub api_key: String,
    pub base_url: String,
    pub transcription_model: String,
    pub language: Option<String>,
    pub tts_model: String,
    pub voice: String,
}

impl std::fmt::Debug for SpeechConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("transcription_model", &self.transcription_model)
            .field("language", &self.language)
            .field("tts_model", &self.tts_model)
            .field("voice", &self.voice)
            .finish()
    }
}

impl SpeechConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: crate::openai::DEFAULT_BASE_URL.to_string(),
            transcription_model: "whisper-1".to_string(),
            language: None,
            tts_model: "tts-1".to_string(),
            voice: "onyx".to_string(),
        }
    }

    /// Reuse the credentials and endpoint of an assistant gateway config.
    pub fn from_openai(config: &OpenAiConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            ..Self::new(config.api_key.clone())
        }
    }

    pub fn with_language(mut self, lang: impl Into<String>) -> Self {
        self.language = Some(lang.into());
        self
    }

    pub fn with_transcription_model(mut self, model: impl Into<String>) -> Self {
        self.transcription_model = model.into();
        self
    }

    pub fn with_tts_model(mut self, model: impl Into<String>) -> Self {
        self.tts_model = model.into();
        self
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }
}

/// Speech-to-text and text-to-speech client.
pub struct SpeechClient {
    config: SpeechConfig,
    http: reqwest::Client,
}

impl SpeechClient {
    pub fn new(config: SpeechConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(300))
            .build()
            .map_err(|e| GatewayError::NetworkError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &SpeechConfig {
        &self.config
    }

    /// Transcribe audio bytes to text.
    ///
    /// `filename` selects the upload's MIME type (e.g. "question.wav").
    pub async fn transcribe(
        &self,
        audio_data: Vec<u8>,
        filename: &str,
    ) -> Result<String, GatewayError> {
        debug!(
            model = %self.config.transcription_model,
            size = audio_data.len(),
            "Whisper transcription request"
        );

        let file_part = reqwest::multipart::Part::bytes(audio_data)
            .file_name(filename.to_string())
            .mime_str(audio_mime(filename))
            .map_err(|e| GatewayError::ApiError(e.to_string()))?;

        let mut form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", self.config.transcription_model.clone());

        if let Some(ref lang) = self.config.language {
            form = form.text("language", lang.clone());
        }

        let response = self
            .http
            .post(format!("{}/audio/transcriptions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?;
        let response = crate::openai::check_status(response).await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GatewayError::ParseError(e.to_string()))?;

        json["text"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| GatewayError::ParseError("no 'text' field in response".to_string()))
    }

    /// Synthesize `text` to MP3 audio.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>, GatewayError> {
        debug!(
            model = %self.config.tts_model,
            voice = %self.config.voice,
            chars = text.len(),
            "speech synthesis request"
        );

        let body = serde_json::json!({
            "model": self.config.tts_model,
            "voice": self.config.voice,
            "input": text,
            "response_format": "mp3",
        });

        let response = self
            .http
            .post(format!("{}/audio/speech", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;
        let response = crate::openai::check_status(response).await?;

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

fn audio_mime(filename: &str) -> &'static str {
    match filename.rsplit('.').next() {
        Some("mp3") => "audio/mpeg",
        Some("m4a") => "audio/mp4",
        Some("webm") => "audio/webm",
        Some("ogg") => "audio/ogg",
        _ => "audio/wav",
    }
}
