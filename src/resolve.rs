use tracing::{debug, warn};

use crate::{
    Error, Result,
    config::{Configuration, Context},
};

/// User supplied values that take precedence over the kubeconfig.
///
/// `namespace` is the final namespace already chosen by the caller
/// (see [`crate::determine_namespace`]); the other fields are optional names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub context: Option<String>,
    pub cluster: Option<String>,
    pub auth_info: Option<String>,
    pub namespace: String,
}

impl Overrides {
    pub fn context(&self) -> Option<&str> {
        non_empty(&self.context)
    }

    pub fn cluster(&self) -> Option<&str> {
        non_empty(&self.cluster)
    }

    pub fn auth_info(&self) -> Option<&str> {
        non_empty(&self.auth_info)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// The effective context after merging overrides into the kubeconfig,
/// together with the name it is displayed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContext {
    pub name: String,
    pub context: Context,
}

/// Merge `overrides` with `config` into a single target context.
///
/// Resolution follows this order:
/// 1. Seed cluster and auth info from the current context.
/// 2. Replace the seed with the explicitly named context, if it exists.
/// 3. Take the namespace from `overrides.namespace`.
/// 4. Apply the cluster and auth info overrides.
///
/// The name is the explicit context name when given, otherwise one generated
/// from the resulting fields by [`generate_context_name`].
///
/// # Errors
/// Returns [`Error::NoCurrentContext`] if the kubeconfig has no current context
/// or the current context does not exist.
pub fn resolve(config: &Configuration, overrides: &Overrides) -> Result<ResolvedContext> {
    let current = config.current().ok_or(Error::NoCurrentContext)?;

    let mut context = Context {
        cluster: current.cluster.clone(),
        auth_info: current.auth_info.clone(),
        namespace: String::new(),
    };

    if let Some(name) = overrides.context() {
        match config.context(name) {
            Some(named) => context = named.clone(),
            None => warn!(context = name, "context not found in kubeconfig, using current context"),
        }
    }

    context.namespace = overrides.namespace.clone();

    if let Some(cluster) = overrides.cluster() {
        context.cluster = cluster.to_string();
    }
    if let Some(auth_info) = overrides.auth_info() {
        context.auth_info = auth_info.to_string();
    }

    let name = match overrides.context() {
        Some(name) => name.to_string(),
        None => generate_context_name(&context),
    };

    debug!(
        name = %name,
        cluster = %context.cluster,
        user = %context.auth_info,
        namespace = %context.namespace,
        "resolved context"
    );

    Ok(ResolvedContext { name, context })
}

/// Build `namespace[/cluster][/user]` from a context.
///
/// Only the part of the auth info before its first `/` is used.
pub fn generate_context_name(context: &Context) -> String {
    let mut name = context.namespace.clone();
    if !context.cluster.is_empty() {
        name.push('/');
        name.push_str(&context.cluster);
    }
    if !context.auth_info.is_empty() {
        let clean_auth_info = context
            .auth_info
            .split('/')
            .next()
            .unwrap_or_default();
        name.push('/');
        name.push_str(clean_auth_info);
    }
    name
}
