use std::path::PathBuf;

use clap::Parser;

/// Jarvis: a terminal chat client for a retrieval-augmented assistant.
#[derive(Parser, Debug)]
#[command(name = "jarvis", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Alias of the conversation thread (defaults to `assistant.thread`).
    #[arg(long)]
    pub thread: Option<String>,

    /// Documents to upload to a temporary vector store linked to the thread.
    #[arg(long, num_args = 1..)]
    pub attach: Vec<PathBuf>,

    /// Wait for each run to finish instead of streaming it.
    #[arg(long = "static")]
    pub static_mode: bool,

    /// Synthesize every reply to speech.
    #[arg(long)]
    pub speak: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
