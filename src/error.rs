use kube::config::KubeconfigError;

/// Errors produced while resolving the target context and counting pods.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The kubeconfig designates no current context, or designates one that does not exist.
    #[error(
        "no context is currently set, use \"kubectl config use-context <context>\" to select a new one"
    )]
    NoCurrentContext,

    /// More positional arguments were given than the command accepts.
    #[error("either one or no arguments are allowed (got {count})")]
    InvalidArguments { count: usize },

    /// A fetched object does not carry a string `status.phase`.
    #[error("malformed record {name:?}: {reason}")]
    MalformedRecord { name: String, reason: &'static str },

    #[error(transparent)]
    Kubeconfig(#[from] KubeconfigError),

    #[error(transparent)]
    Kube(#[from] kube::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
