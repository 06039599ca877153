use anyhow::Result;

use crate::config::Config;
use crate::server;

use super::args::{Cli, Command, ServeArgs};
use super::config_cmd;
use super::generate;

pub(crate) async fn run(cli: Cli, mut config: Config) -> Result<()> {
    match cli.command {
        Command::Serve(args) => serve(args, config).await,
        Command::Generate(args) => generate::handle_generate(args, &config).await,
        Command::Config(args) => config_cmd::handle_config(&args, &mut config),
    }
}

async fn serve(args: ServeArgs, mut config: Config) -> Result<()> {
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    server::run_serve(&config).await
}
