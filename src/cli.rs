use std::{io::Write, path::PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use kube::config::Kubeconfig;
use tracing::info;

use crate::{
    Error, aggregate, claputil,
    config::Configuration,
    determine_namespace,
    fetch::ObjectFetcher,
    render::{Output, render},
    resolve::{Overrides, ResolvedContext, resolve},
};

pub const EXAMPLES: &str = "\
Examples:
  # Count the number of pods per status
  kubectl count pods -n NAMESPACE";

#[derive(Debug, Parser)]
#[command(name = "kubectl-count", version, about = "Count pods per status", after_help = EXAMPLES)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Count pods per status
    Pods(PodsArgs),
}

/// Flags of `kubectl count pods`.
#[derive(Debug, Clone, Default, Args)]
pub struct PodsArgs {
    /// Path to the kubeconfig file to use
    #[arg(long, value_name = "PATH")]
    pub kubeconfig: Option<PathBuf>,

    /// The name of the kubeconfig context to use
    #[arg(long, add = claputil::context_value_completer())]
    pub context: Option<String>,

    /// The name of the kubeconfig cluster to use
    #[arg(long)]
    pub cluster: Option<String>,

    /// The name of the kubeconfig user to use
    #[arg(long)]
    pub user: Option<String>,

    /// If present, the namespace scope for this request
    #[arg(short, long, add = claputil::namespace_value_completer())]
    pub namespace: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Output::Table)]
    pub output: Output,

    /// Pod name to count instead of the whole namespace
    #[arg(value_name = "NAME")]
    pub names: Vec<String>,
}

/// `kubectl count pods` after its flags were completed against the kubeconfig.
#[derive(Debug)]
pub struct CountPods {
    pub args: PodsArgs,
    pub config: Configuration,
    pub overrides: Overrides,
    pub resolved: ResolvedContext,
}

impl CountPods {
    /// Determine the namespace and resolve the target context.
    pub fn complete(args: PodsArgs, kubeconfig: &Kubeconfig) -> crate::Result<Self> {
        let config = Configuration::from(kubeconfig);
        let namespace =
            determine_namespace(&config, args.namespace.as_deref(), args.context.as_deref());

        let overrides = Overrides {
            context: args.context.clone(),
            cluster: args.cluster.clone(),
            auth_info: args.user.clone(),
            namespace,
        };
        let resolved = resolve(&config, &overrides)?;

        Ok(Self {
            args,
            config,
            overrides,
            resolved,
        })
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.args.names.len() > 1 {
            return Err(Error::InvalidArguments {
                count: self.args.names.len(),
            });
        }
        Ok(())
    }

    pub fn namespace(&self) -> &str {
        &self.resolved.context.namespace
    }

    /// Fetch the pods, count them and render the result to `out`.
    pub async fn run<F: ObjectFetcher>(&self, fetcher: &F, out: &mut impl Write) -> anyhow::Result<()> {
        let name = self.args.names.first().map(String::as_str);
        info!(context = %self.resolved.name, namespace = self.namespace(), "counting pods");

        let records = fetcher
            .fetch(self.namespace(), name)
            .await
            .context("failed to fetch pods")?;
        let tally = aggregate::aggregate(&records).context("failed to count pods")?;
        render(&tally, self.args.output, out).context("failed to write output")?;
        Ok(())
    }
}
