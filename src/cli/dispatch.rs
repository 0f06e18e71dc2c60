use super::env::CliArgs;
use super::generate::cmd_generate;
use super::info::cmd_info;
use super::query::cmd_query;
use super::runtime::LoadedConfig;
use super::tree::cmd_tree;
use crate::cli::commands::Commands;
use anyhow::Result;

pub async fn dispatch(cli: &CliArgs, loaded: &LoadedConfig) -> Result<()> {
    match cli.command.clone() {
        Commands::Generate(args) => cmd_generate(args, &loaded.config, cli.output).await,
        Commands::Query(args) => cmd_query(args, cli.output).await,
        Commands::Tree(args) => cmd_tree(args, cli.output).await,
        Commands::Info => cmd_info(loaded, cli.output),
    }
}
