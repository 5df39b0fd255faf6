use clap::Parser;
use tubeshelf_lib::commands::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    tubeshelf_lib::run(cli)
}
