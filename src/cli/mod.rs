mod args;
mod commands;
mod config_cmd;
mod generate;
mod util;

pub use args::Cli;
