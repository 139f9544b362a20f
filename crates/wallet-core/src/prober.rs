//! Version Prober.
//!
//! One background task per chain queries `<api_base_url>/node_info`, pulls
//! the Cosmos SDK version out of the build dependencies and records it in
//! the [`ChainStore`]. Probes are independent and best-effort: a failure is
//! logged and leaves that chain's `sdk_version` as it was. There is no retry
//! and no timeout here; callers that need one configure the HTTP client.
//!
//! Each successful probe writes a full registry snapshot. Snapshots from
//! concurrent probes may reach storage in any order, but every write holds
//! all updates applied so far, so the persisted registry converges to the
//! union of completed probes.

use std::borrow::Cow;
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use tokio::task::JoinHandle;

use crate::chains::ChainStore;
use crate::error::WalletError;
use crate::types::ChainDescriptor;

/// Dependency path identifying the Cosmos SDK in `build_deps`.
pub const COSMOS_SDK_MODULE: &str = "github.com/cosmos/cosmos-sdk";

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(\.\d+)*").expect("static version pattern"));

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeInfo {
    #[serde(default)]
    pub application_version: ApplicationVersion,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationVersion {
    #[serde(default)]
    pub build_deps: Vec<BuildDep>,
}

/// A build dependency as reported by the node: legacy REST returns
/// `"path@version"` lines, the gRPC gateway returns module objects.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BuildDep {
    Line(String),
    Module {
        path: String,
        #[serde(default)]
        version: String,
    },
}

impl BuildDep {
    fn render(&self) -> Cow<'_, str> {
        match self {
            BuildDep::Line(line) => Cow::Borrowed(line),
            BuildDep::Module { path, version } => Cow::Owned(format!("{path}@{version}")),
        }
    }
}

/// Extract the dotted-numeric Cosmos SDK version from a node-info reply.
pub fn parse_sdk_version(info: &NodeInfo) -> Result<String, WalletError> {
    let dep = info
        .application_version
        .build_deps
        .iter()
        .map(BuildDep::render)
        .find(|dep| dep.starts_with(COSMOS_SDK_MODULE))
        .ok_or_else(|| WalletError::ProbeFailure("no cosmos-sdk build dependency".into()))?;

    // Skip the module path itself so digits in a fork's path are not picked up.
    let tail = &dep[COSMOS_SDK_MODULE.len()..];
    VERSION_RE
        .find(tail)
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| WalletError::ProbeFailure(format!("no version in {dep:?}")))
}

#[async_trait]
pub trait NodeInfoSource: Send + Sync + 'static {
    async fn node_info(&self, api_base_url: &str) -> Result<NodeInfo, WalletError>;
}

/// Queries nodes over HTTP.
#[derive(Debug, Clone, Default)]
pub struct HttpNodeInfo {
    client: reqwest::Client,
}

impl HttpNodeInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn node_info_url(api_base_url: &str) -> String {
        format!("{}/node_info", api_base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl NodeInfoSource for HttpNodeInfo {
    async fn node_info(&self, api_base_url: &str) -> Result<NodeInfo, WalletError> {
        let info = self
            .client
            .get(Self::node_info_url(api_base_url))
            .send()
            .await?
            .error_for_status()?
            .json::<NodeInfo>()
            .await?;
        Ok(info)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Updated { chain_name: String, version: String },
    Failed { chain_name: String, reason: String },
}

impl ProbeOutcome {
    pub fn chain_name(&self) -> &str {
        match self {
            ProbeOutcome::Updated { chain_name, .. } | ProbeOutcome::Failed { chain_name, .. } => {
                chain_name
            }
        }
    }
}

#[derive(Clone)]
pub struct VersionProber {
    source: Arc<dyn NodeInfoSource>,
}

impl VersionProber {
    pub fn new(source: Arc<dyn NodeInfoSource>) -> Self {
        Self { source }
    }

    pub fn http() -> Self {
        Self::new(Arc::new(HttpNodeInfo::new()))
    }

    /// Start one probe per known chain and return without waiting.
    ///
    /// Must be called from within a Tokio runtime. Handles come back in
    /// chain-name order; completion order is arbitrary.
    pub fn spawn_all(&self, store: &ChainStore) -> Vec<JoinHandle<ProbeOutcome>> {
        let chains: Vec<ChainDescriptor> = store.snapshot().chains().cloned().collect();
        chains
            .into_iter()
            .map(|chain| {
                let source = Arc::clone(&self.source);
                let store = store.clone();
                tokio::spawn(async move { probe_one(source.as_ref(), &store, &chain).await })
            })
            .collect()
    }

    /// Probe every chain and wait for all of them.
    pub async fn probe_all(&self, store: &ChainStore) -> Vec<ProbeOutcome> {
        let names = store.chain_names();
        let handles = self.spawn_all(store);

        let mut outcomes = Vec::with_capacity(handles.len());
        for (chain_name, handle) in names.into_iter().zip(handles) {
            let outcome = handle.await.unwrap_or_else(|e| ProbeOutcome::Failed {
                chain_name,
                reason: format!("probe task aborted: {e}"),
            });
            outcomes.push(outcome);
        }
        outcomes
    }
}

async fn probe_one(
    source: &dyn NodeInfoSource,
    store: &ChainStore,
    chain: &ChainDescriptor,
) -> ProbeOutcome {
    let result = async {
        let info = source.node_info(&chain.api_base_url).await?;
        let version = parse_sdk_version(&info)?;
        // the registry write may hit the filesystem under the store lock
        let writer = store.clone();
        let (chain_name, recorded) = (chain.chain_name.clone(), version.clone());
        tokio::task::spawn_blocking(move || writer.record_sdk_version(&chain_name, &recorded))
            .await
            .map_err(|e| WalletError::Storage(format!("registry write aborted: {e}")))??;
        Ok::<_, WalletError>(version)
    }
    .await;

    match result {
        Ok(version) => {
            tracing::info!(chain = %chain.chain_name, %version, "sdk version detected");
            ProbeOutcome::Updated {
                chain_name: chain.chain_name.clone(),
                version,
            }
        }
        Err(e) => {
            tracing::warn!(chain = %chain.chain_name, error = %e, "sdk version probe failed");
            ProbeOutcome::Failed {
                chain_name: chain.chain_name.clone(),
                reason: e.to_string(),
            }
        }
    }
}
