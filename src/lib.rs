#![cfg_attr(not(doctest), doc = include_str!("../README.md"))]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use clap_complete;
pub use k8s_openapi;
pub use kube;

pub mod aggregate;
pub mod cli;
pub mod claputil;
pub use claputil::{context_value_completer, namespace_value_completer};
pub mod config;
pub mod dynamic;
mod error;
pub use error::{Error, Result};
pub mod fetch;
pub mod render;
pub mod resolve;
pub mod retry;

use config::Configuration;

/// Namespace used when neither the flags nor the kubeconfig name one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Determines the Kubernetes namespace based on the provided `namespace` and `context`.
///
/// Namespace determination follows this priority:
/// 1. Uses the namespace if explicitly specified.
/// 2. Uses the namespace of `context` if it exists in the kubeconfig,
///    otherwise the namespace of the current context.
/// 3. Uses "default".
pub fn determine_namespace(
    config: &Configuration,
    namespace: Option<&str>,
    context: Option<&str>,
) -> String {
    if let Some(ns) = namespace.filter(|ns| !ns.is_empty()) {
        return ns.to_string();
    }

    context
        .filter(|name| !name.is_empty())
        .and_then(|name| config.context(name))
        .or_else(|| config.current())
        .map(|ctx| ctx.namespace.as_str())
        .filter(|ns| !ns.is_empty())
        .unwrap_or(DEFAULT_NAMESPACE)
        .to_string()
}
