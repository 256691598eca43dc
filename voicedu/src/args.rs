use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;

/// Voicedu gateway
#[derive(Debug, Parser)]
#[command(name = "voicedu", about = "Text-to-speech proxy with voice catalog and audio upload")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "voicedu.toml", env = "VOICEDU_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "VOICEDU_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Log filter directive, e.g. `info` or `tts=debug,info`
    #[arg(long, default_value = "info", env = "VOICEDU_LOG")]
    pub log_level: String,
}
