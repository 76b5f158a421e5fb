//! Per-section validation: assistant, vector store, runs and voice.

use crate::schema::{JarvisConfig, SUPPORTED_TTS_MODELS, SUPPORTED_VOICES};

use super::helpers::{validate_one_of, validate_range, validate_text};

/// Remote limit on assistant names.
const MAX_NAME_CHARS: usize = 256;
/// Remote limit on assistant instructions.
const MAX_INSTRUCTION_CHARS: usize = 256_000;

/// Validate assistant constraints.
pub(crate) fn validate_assistant(errors: &mut Vec<String>, config: &JarvisConfig) {
    validate_text(errors, "assistant.name", &config.assistant.name, MAX_NAME_CHARS);
    validate_text(
        errors,
        "assistant.instructions",
        &config.assistant.instructions,
        MAX_INSTRUCTION_CHARS,
    );
    validate_text(errors, "assistant.thread", &config.assistant.thread, MAX_NAME_CHARS);
    if let Some(ref id) = config.assistant.id {
        if id.trim().is_empty() {
            errors.push("assistant.id must not be empty when set".to_string());
        }
    }
}

/// Validate vector store constraints.
pub(crate) fn validate_vector_store(errors: &mut Vec<String>, config: &JarvisConfig) {
    validate_text(errors, "vector_store.name", &config.vector_store.name, MAX_NAME_CHARS);
    validate_range(
        errors,
        "vector_store.lifetime_days",
        u64::from(config.vector_store.lifetime_days),
        1,
        365,
    );
}

/// Validate run constraints.
pub(crate) fn validate_runs(errors: &mut Vec<String>, config: &JarvisConfig) {
    validate_range(
        errors,
        "runs.poll_interval_ms",
        config.runs.poll_interval_ms,
        0,
        60_000,
    );
    validate_range(
        errors,
        "runs.max_tool_rounds",
        u64::from(config.runs.max_tool_rounds),
        1,
        50,
    );
}

/// Validate voice constraints.
pub(crate) fn validate_voice(errors: &mut Vec<String>, config: &JarvisConfig) {
    validate_one_of(errors, "voice.voice", &config.voice.voice, SUPPORTED_VOICES);
    validate_one_of(
        errors,
        "voice.tts_model",
        &config.voice.tts_model,
        SUPPORTED_TTS_MODELS,
    );
    if config.voice.output_path.trim().is_empty() {
        errors.push("voice.output_path must not be empty".to_string());
    }
}
