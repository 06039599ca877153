use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::config::Config;

use super::commands;

/// Entry point for the `studyplan` command-line interface.
#[derive(Debug, Parser)]
#[command(
    name = "studyplan",
    about = "AI study-plan relay and command-line client",
    version,
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP relay.
    Serve(ServeArgs),
    /// Generate one study plan and print it.
    Generate(GenerateArgs),
    /// Update and save settings in ~/.studyplan/config.
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to bind (defaults to config setting).
    #[arg(long)]
    pub bind: Option<String>,

    /// Port to listen on (defaults to config setting).
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Subjects, comma-separated (e.g. "Math, Physics").
    #[arg(long)]
    pub subjects: String,

    /// Exam date, e.g. 2024-06-01.
    #[arg(long)]
    pub exam_date: String,

    /// Daily study hours (1-24).
    #[arg(long)]
    pub hours: f64,

    /// What you want to achieve.
    #[arg(long)]
    pub goals: String,

    #[arg(long)]
    pub learning_style: Option<String>,

    #[arg(long)]
    pub strengths: Option<String>,

    #[arg(long)]
    pub weaknesses: Option<String>,

    /// API key; a leading "Bearer " is accepted. Falls back to config / GEMINI_API_KEY.
    #[arg(long)]
    pub api_key: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Set the fallback API key
    #[arg(long)]
    pub api_key: Option<String>,

    /// Set the generation model
    #[arg(long)]
    pub model: Option<String>,

    /// Set timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Set the provider base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// How the key is sent: "query" or "bearer"
    #[arg(long)]
    pub auth_mode: Option<String>,
}

impl Cli {
    pub async fn run(self, config: Config) -> Result<()> {
        commands::run(self, config).await
    }
}
