use std::{collections::BTreeMap, path::Path};

use kube::config::Kubeconfig;

use crate::Result;

/// A named (cluster, auth identity, namespace) triple.
///
/// Empty strings stand for "unset", matching how kubeconfig omits fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    pub cluster: String,
    pub auth_info: String,
    pub namespace: String,
}

/// Read-only view of a kubeconfig: its named contexts and the current one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    pub current_context: Option<String>,
    pub contexts: BTreeMap<String, Context>,
}

impl Configuration {
    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts.get(name)
    }

    /// Returns the context designated as current, if it is set and exists.
    pub fn current(&self) -> Option<&Context> {
        self.current_context
            .as_deref()
            .filter(|name| !name.is_empty())
            .and_then(|name| self.context(name))
    }
}

impl From<&Kubeconfig> for Configuration {
    fn from(kubeconfig: &Kubeconfig) -> Self {
        let contexts = kubeconfig
            .contexts
            .iter()
            .map(|named| {
                let context = named
                    .context
                    .as_ref()
                    .map(|ctx| Context {
                        cluster: ctx.cluster.clone(),
                        auth_info: ctx.user.clone().unwrap_or_default(),
                        namespace: ctx.namespace.clone().unwrap_or_default(),
                    })
                    .unwrap_or_default();
                (named.name.clone(), context)
            })
            .collect();

        Self {
            current_context: kubeconfig.current_context.clone(),
            contexts,
        }
    }
}

/// Load the kubeconfig from `path`, or from the default locations
/// (`KUBECONFIG`, then `~/.kube/config`) when no path is given.
pub fn load_kubeconfig(path: Option<&Path>) -> Result<Kubeconfig> {
    let kubeconfig = match path {
        Some(path) => Kubeconfig::read_from(path)?,
        None => Kubeconfig::read()?,
    };
    Ok(kubeconfig)
}
