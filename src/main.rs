use std::{io, process::ExitCode, str::FromStr};

use anyhow::Context;
use clap::{CommandFactory, Parser};
use kubectl_count::{
    cli::{Cli, Command, CountPods, PodsArgs},
    clap_complete::CompleteEnv,
    config::load_kubeconfig,
    fetch::KubeFetcher,
    retry::RetryPolicy,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let env = std::env::var("KUBECTL_COUNT_LOG").unwrap_or_else(|_| "warn".to_string());
    let filter = EnvFilter::from_str(&env).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn count_pods(args: PodsArgs) -> anyhow::Result<()> {
    let kubeconfig =
        load_kubeconfig(args.kubeconfig.as_deref()).context("failed to load kubeconfig")?;

    let command = CountPods::complete(args, &kubeconfig)?;
    command.validate()?;

    let fetcher = KubeFetcher::connect(
        kubeconfig,
        &command.config,
        &command.overrides,
        &command.resolved,
        RetryPolicy::default(),
    )
    .await
    .with_context(|| format!("failed to connect with context {:?}", command.resolved.name))?;

    let mut stdout = io::stdout().lock();
    command.run(&fetcher, &mut stdout).await
}

#[tokio::main]
async fn main() -> ExitCode {
    CompleteEnv::with_factory(Cli::command).complete();
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Pods(args) => count_pods(args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
