use std::future::Future;

use k8s_openapi::api::core::v1::Pod;
use kube::{
    Api, Client, Config,
    api::{ApiResource, DynamicObject, ListParams},
    config::{KubeConfigOptions, Kubeconfig},
};
use tracing::debug;

use crate::{
    Result,
    config::Configuration,
    resolve::{Overrides, ResolvedContext},
    retry::{RetryPolicy, retry_with_policy},
};

/// Source of the objects to count.
pub trait ObjectFetcher {
    /// Fetch pods in `namespace`, or only the pod called `name` when given.
    fn fetch(
        &self,
        namespace: &str,
        name: Option<&str>,
    ) -> impl Future<Output = Result<Vec<DynamicObject>>>;
}

/// [`ObjectFetcher`] backed by the Kubernetes API.
pub struct KubeFetcher {
    client: Client,
    retry: RetryPolicy,
}

impl KubeFetcher {
    pub fn new(client: Client, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// Build a client that targets the resolved cluster and user.
    ///
    /// The explicitly requested context is only handed to the client when it
    /// exists in the kubeconfig; otherwise the current context is used as the base.
    pub async fn connect(
        kubeconfig: Kubeconfig,
        config: &Configuration,
        overrides: &Overrides,
        resolved: &ResolvedContext,
        retry: RetryPolicy,
    ) -> Result<Self> {
        let options = client_options(config, overrides, resolved);
        debug!(
            context = ?options.context,
            cluster = ?options.cluster,
            user = ?options.user,
            "building kube client"
        );
        let client_config = Config::from_custom_kubeconfig(kubeconfig, &options).await?;
        let client = Client::try_from(client_config)?;
        Ok(Self::new(client, retry))
    }
}

fn client_options(
    config: &Configuration,
    overrides: &Overrides,
    resolved: &ResolvedContext,
) -> KubeConfigOptions {
    let non_empty = |value: &str| (!value.is_empty()).then(|| value.to_string());
    KubeConfigOptions {
        context: overrides
            .context()
            .filter(|name| config.context(name).is_some())
            .map(str::to_string),
        cluster: non_empty(&resolved.context.cluster),
        user: non_empty(&resolved.context.auth_info),
        ..Default::default()
    }
}

impl ObjectFetcher for KubeFetcher {
    async fn fetch(&self, namespace: &str, name: Option<&str>) -> Result<Vec<DynamicObject>> {
        let api: Api<DynamicObject> =
            Api::namespaced_with(self.client.clone(), namespace, &ApiResource::erase::<Pod>(&()));

        let objects = match name {
            Some(name) => vec![retry_with_policy(&self.retry, || api.get(name)).await?],
            None => {
                let lp = ListParams::default();
                retry_with_policy(&self.retry, || api.list(&lp))
                    .await?
                    .items
            }
        };
        debug!(namespace, count = objects.len(), "fetched pods");
        Ok(objects)
    }
}
