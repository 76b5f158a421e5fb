//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Jarvis Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.
# Credentials are read from the environment (OPENAI_API_KEY, ASSISTANT_ID).

[assistant]
# id = "asst_..."        # reuse an existing assistant instead of creating one
# name = "Jarvis"
# instructions = "You are a simple chat bot."
# model = "gpt-3.5-turbo-0125"  # gpt-3.5-turbo-0125, gpt-4o-mini, gpt-4o, gpt-4-turbo
# thread = "MAIN_THREAD"
# enable_functions = true

[vector_store]
# name = "jarvis-documents"
# lifetime_days = 1      # 1-365
# delete_on_exit = true

[runs]
# mode = "stream"        # stream, poll
# poll_interval_ms = 1000  # 0-60000
# max_tool_rounds = 10   # 1-50

[voice]
# speak_responses = false
# tts_model = "tts-1"    # tts-1, tts-1-hd
# voice = "onyx"         # alloy, echo, fable, onyx, nova, shimmer
# transcription_model = "whisper-1"
# language = "en"
# output_path = "speech.mp3"

[logging]
# level = "INFO"         # DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
