//! Interactive conversation loop on stdin/stdout.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use jarvis_assistant::tools::builtin_functions;
use jarvis_assistant::{
    AssistantGateway, AssistantSession, BuiltinTools, ConsoleHandler, LinkScope, OpenAiConfig,
    OpenAiGateway, SpeechClient, SpeechConfig, VectorStore, VectorStoreSettings,
};
use jarvis_common::{new_correlation_id, JarvisError};
use jarvis_config::schema::ResponseMode;
use jarvis_config::JarvisConfig;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use crate::cli::Args;

/// One line typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Exit,
    Empty,
    /// `@path`: an audio file to transcribe and send.
    Audio(PathBuf),
    Text(String),
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    if line.eq_ignore_ascii_case("exit") {
        return Input::Exit;
    }
    match line.strip_prefix('@') {
        Some(path) if !path.trim().is_empty() => Input::Audio(PathBuf::from(path.trim())),
        _ => Input::Text(line.to_string()),
    }
}

/// Session configuration from the `[assistant]` section.
pub fn assistant_config(config: &JarvisConfig) -> jarvis_assistant::AssistantConfig {
    let tools = if config.assistant.enable_functions {
        builtin_functions()
    } else {
        Vec::new()
    };
    jarvis_assistant::AssistantConfig::default()
        .with_name(config.assistant.name.clone())
        .with_instructions(config.assistant.instructions.clone())
        .with_model(config.assistant.model)
        .with_tools(tools)
}

fn speech_config(openai: &OpenAiConfig, config: &JarvisConfig) -> SpeechConfig {
    let voice = &config.voice;
    let speech = SpeechConfig::from_openai(openai)
        .with_transcription_model(voice.transcription_model.clone())
        .with_tts_model(voice.tts_model.clone())
        .with_voice(voice.voice.clone());
    match &voice.language {
        Some(language) => speech.with_language(language.clone()),
        None => speech,
    }
}

fn file_alias(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn speech_error(e: impl std::fmt::Display) -> JarvisError {
    JarvisError::Speech(e.to_string())
}

pub struct ChatLoop {
    session: AssistantSession,
    thread: String,
    /// Temporary store holding the `--attach` documents.
    store: Option<VectorStore>,
    speech: SpeechClient,
    mode: ResponseMode,
    speak: bool,
    output_path: PathBuf,
    delete_store_on_exit: bool,
    enable_functions: bool,
    workdir: PathBuf,
}

impl ChatLoop {
    /// Connect the assistant, open the conversation thread and attach any
    /// documents.
    pub async fn start(args: &Args, config: JarvisConfig) -> Result<Self, JarvisError> {
        let openai = OpenAiConfig::from_env()?;
        let speech = SpeechClient::new(speech_config(&openai, &config)).map_err(speech_error)?;
        let gateway: Arc<dyn AssistantGateway> = Arc::new(
            OpenAiGateway::new(openai).map_err(|e| JarvisError::Assistant(e.to_string()))?,
        );

        let mut session = AssistantSession::connect(
            Arc::clone(&gateway),
            config.assistant.id.as_deref(),
            assistant_config(&config),
        )
        .await?
        .with_poll_interval(config.runs.poll_interval())
        .with_max_tool_rounds(config.runs.max_tool_rounds as usize);

        let thread = args
            .thread
            .clone()
            .unwrap_or_else(|| config.assistant.thread.clone());
        session.create_thread(&thread).await?;

        let mode = if args.static_mode {
            ResponseMode::Poll
        } else {
            config.runs.mode
        };
        let mut chat = Self {
            session,
            thread,
            store: None,
            speech,
            mode,
            speak: args.speak || config.voice.speak_responses,
            output_path: PathBuf::from(&config.voice.output_path),
            delete_store_on_exit: config.vector_store.delete_on_exit,
            enable_functions: config.assistant.enable_functions,
            workdir: std::env::current_dir()?,
        };

        if !args.attach.is_empty() {
            let settings = VectorStoreSettings {
                name: config.vector_store.name.clone(),
                lifetime_days: config.vector_store.lifetime_days,
            };
            if let Err(e) = chat.attach(gateway, settings, &args.attach, &config).await {
                chat.shutdown().await;
                return Err(e);
            }
        }

        Ok(chat)
    }

    async fn attach(
        &mut self,
        gateway: Arc<dyn AssistantGateway>,
        settings: VectorStoreSettings,
        paths: &[PathBuf],
        config: &JarvisConfig,
    ) -> Result<(), JarvisError> {
        let store = VectorStore::connect(gateway, None, settings)
            .await?
            .with_ingestion_poll_interval(config.runs.poll_interval());
        let store = self.store.insert(store);

        for path in paths {
            println!("Uploading {}...", path.display());
            store.add_file_by_path(&file_alias(path), path).await?;
        }
        self.session
            .link_vector_store(store, LinkScope::Thread(&self.thread))
            .await?;
        info!(files = paths.len(), thread = %self.thread, "documents attached");
        Ok(())
    }

    /// Read lines until `exit` or end of input. Turn failures are reported
    /// and the loop continues.
    pub async fn run(&mut self) -> Result<(), JarvisError> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        println!(
            "Talking to {} on thread '{}'. Type 'exit' to quit, '@file' to send audio.",
            self.session.name(),
            self.thread
        );

        loop {
            print!("\nYou > ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let text = match parse_input(&line) {
                Input::Exit => break,
                Input::Empty => continue,
                Input::Text(text) => text,
                Input::Audio(path) => match self.transcribe(&path).await {
                    Ok(text) => {
                        println!("You said: {text}");
                        text
                    }
                    Err(e) => {
                        error!(path = %path.display(), error = %e, "transcription failed");
                        eprintln!("error: {e}");
                        continue;
                    }
                },
            };

            if let Err(e) = self.turn(&text).await {
                error!(error = %e, "turn failed");
                eprintln!("error: {e}");
            }
        }
        Ok(())
    }

    async fn transcribe(&self, path: &Path) -> Result<String, JarvisError> {
        let audio = tokio::fs::read(path).await?;
        self.speech
            .transcribe(audio, &file_alias(path))
            .await
            .map_err(speech_error)
    }

    async fn turn(&mut self, text: &str) -> Result<(), JarvisError> {
        let turn_id = new_correlation_id();
        info!(turn_id = %turn_id, thread = %self.thread, chars = text.len(), "user turn");

        self.session.post_message(&self.thread, text).await?;
        let reply = match self.mode {
            ResponseMode::Stream => {
                let mut handler = ConsoleHandler::new(self.session.name().to_string());
                if self.enable_functions {
                    handler = handler
                        .with_executor(BuiltinTools::new(self.workdir.clone()).into_executor());
                }
                self.session
                    .stream_response(&self.thread, &mut handler)
                    .await?
                    .text()
            }
            ResponseMode::Poll => {
                let texts = self.session.run_to_completion(&self.thread).await?;
                for text in &texts {
                    println!("\n{} > {text}", self.session.name());
                }
                texts.join("\n")
            }
        };
        info!(
            turn_id = %turn_id,
            reply_chars = reply.len(),
            total_tokens = self.session.usage().total_tokens(),
            "turn complete"
        );

        if self.speak && !reply.trim().is_empty() {
            let audio = self.speech.synthesize(&reply).await.map_err(speech_error)?;
            tokio::fs::write(&self.output_path, audio).await?;
            info!(turn_id = %turn_id, path = %self.output_path.display(), "reply spoken");
        }
        Ok(())
    }

    /// Delete the conversation thread and, when configured, the temporary
    /// vector store with its files. Failures are logged.
    pub async fn shutdown(mut self) {
        if let Err(e) = self.session.delete_thread(&self.thread).await {
            warn!(thread = %self.thread, error = %e, "failed to delete thread");
        }

        if let Some(mut store) = self.store.take() {
            if self.delete_store_on_exit {
                if let Err(e) = store.delete_store(true).await {
                    warn!(store = %store.name(), error = %e, "failed to delete vector store");
                }
            } else {
                info!(
                    vector_store_id = store.id().unwrap_or(""),
                    "keeping vector store"
                );
            }
        }

        let usage = self.session.usage();
        info!(
            runs = usage.run_count(),
            total_tokens = usage.total_tokens(),
            "session closed"
        );
    }
}
