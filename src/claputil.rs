use std::ffi::OsStr;

use clap::builder::StyledStr;
use clap_complete::engine::{ArgValueCompleter, CompletionCandidate};
use k8s_openapi::api::core::v1::Namespace;
use kube::{Api, Client};
use tokio::{runtime::Handle, task};

use crate::config::{Configuration, load_kubeconfig};

/// Create an `ArgValueCompleter` that lists contexts from the active kubeconfig.
///
/// The current context is listed first; each candidate shows its cluster and namespace.
pub fn context_value_completer() -> ArgValueCompleter {
    ArgValueCompleter::new(|input: &OsStr| -> Vec<CompletionCandidate> {
        match load_kubeconfig(None) {
            Ok(kubeconfig) => context_candidates(&Configuration::from(&kubeconfig), input),
            Err(_) => Vec::new(),
        }
    })
}

fn context_candidates(config: &Configuration, input: &OsStr) -> Vec<CompletionCandidate> {
    let input = input.to_string_lossy();
    let prefix = input.trim();

    let mut current = Vec::new();
    let mut others = Vec::new();
    for (name, context) in config.contexts.iter().filter(|(name, _)| name.starts_with(prefix)) {
        let is_current = config.current_context.as_deref() == Some(name.as_str());

        let mut details = Vec::new();
        if is_current {
            details.push(String::from("[current]"));
        }
        if !context.cluster.is_empty() {
            details.push(format!("cluster={}", context.cluster));
        }
        if !context.namespace.is_empty() {
            details.push(format!("namespace={}", context.namespace));
        }

        let mut candidate = CompletionCandidate::new(name);
        if !details.is_empty() {
            candidate = candidate.help(Some(StyledStr::from(details.join(" "))));
        }
        if is_current {
            current.push(candidate.display_order(Some(0)));
        } else {
            others.push(candidate);
        }
    }
    current.extend(others);
    current
}

/// Create an `ArgValueCompleter` that lists namespaces of the current context.
///
/// This makes a network call, so it may be slow, and it returns nothing on
/// connection, authentication or permission failures. The `--context` flag is
/// not visible to completers, so the current context is always used.
pub fn namespace_value_completer() -> ArgValueCompleter {
    ArgValueCompleter::new(|input: &OsStr| -> Vec<CompletionCandidate> {
        let prefix = input.to_string_lossy().trim().to_string();

        let namespaces = async move {
            let Ok(client) = Client::try_default().await else {
                return Vec::new();
            };
            let Ok(list) = Api::<Namespace>::all(client).list(&Default::default()).await else {
                return Vec::new();
            };
            list.items
                .into_iter()
                .filter_map(|ns| ns.metadata.name)
                .filter(|name| name.starts_with(&prefix))
                .map(CompletionCandidate::new)
                .collect()
        };

        // `Runtime::block_on` panics inside a runtime, so step out with `block_in_place` there.
        match Handle::try_current() {
            Ok(handle) => task::block_in_place(move || handle.block_on(namespaces)),
            Err(_) => tokio::runtime::Runtime::new()
                .map(|rt| rt.block_on(namespaces))
                .unwrap_or_default(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Context;

    fn config() -> Configuration {
        let mut config = Configuration {
            current_context: Some("prod".into()),
            ..Default::default()
        };
        for (name, namespace) in [("dev", "team-a"), ("prod", ""), ("staging", "")] {
            config.contexts.insert(
                name.into(),
                Context {
                    cluster: format!("{name}-cluster"),
                    auth_info: "admin".into(),
                    namespace: namespace.into(),
                },
            );
        }
        config
    }

    fn values(candidates: &[CompletionCandidate]) -> Vec<String> {
        candidates
            .iter()
            .map(|c| c.get_value().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn current_context_comes_first() {
        let candidates = context_candidates(&config(), OsStr::new(""));
        assert_eq!(values(&candidates), ["prod", "dev", "staging"]);
    }

    #[test]
    fn filters_by_prefix() {
        let candidates = context_candidates(&config(), OsStr::new(" d "));
        assert_eq!(values(&candidates), ["dev"]);
    }

    #[test]
    fn help_shows_cluster_and_namespace() {
        let candidates = context_candidates(&config(), OsStr::new("dev"));
        let help = candidates[0].get_help().map(ToString::to_string);
        assert_eq!(help.as_deref(), Some("cluster=dev-cluster namespace=team-a"));
    }
}
