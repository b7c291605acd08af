//! Cluster configuration resolution
//!
//! Projects a stored cluster and its credential map into the `ClusterConfig`
//! message. Every call reads the cluster again; nothing is cached here.

use std::sync::Arc;

use tracing::error;

use helmsman_common::{
    BEARER_TOKEN, CERT_DATA, CERTIFICATE_AUTHORITY_DATA, HelmsmanError, TLS_KEY,
};
use helmsman_persistence::ClusterPersistence;
use helmsman_persistence::model::ClusterInfo;

use crate::model::ClusterConfig;

pub struct ClusterConfigResolver<C> {
    cluster_persistence: Arc<C>,
}

impl<C: ClusterPersistence> ClusterConfigResolver<C> {
    pub fn new(cluster_persistence: Arc<C>) -> Self {
        Self {
            cluster_persistence,
        }
    }

    /// Resolve the connection settings of a cluster
    pub async fn get_cluster_config(&self, cluster_id: i32) -> anyhow::Result<ClusterConfig> {
        let cluster = self
            .cluster_persistence
            .cluster_find_by_id(cluster_id)
            .await
            .inspect_err(|e| error!(error = %e, cluster_id, "error in fetching cluster detail"))?
            .ok_or_else(|| {
                error!(cluster_id, "cluster not found");
                HelmsmanError::ClusterNotExist(cluster_id)
            })?;

        Ok(to_cluster_config(&cluster))
    }
}

fn credential(cluster: &ClusterInfo, key: &str) -> String {
    cluster.config.get(key).cloned().unwrap_or_default()
}

/// TLS key, certificate and CA are never copied when verification is skipped.
pub fn to_cluster_config(cluster: &ClusterInfo) -> ClusterConfig {
    let mut config = ClusterConfig {
        api_server_url: cluster.server_url.clone(),
        token: credential(cluster, BEARER_TOKEN),
        cluster_id: cluster.id,
        cluster_name: cluster.cluster_name.clone(),
        insecure_skip_tls_verify: cluster.insecure_skip_tls_verify,
        ..Default::default()
    };

    if !cluster.insecure_skip_tls_verify {
        config.key_data = credential(cluster, TLS_KEY);
        config.cert_data = credential(cluster, CERT_DATA);
        config.ca_data = credential(cluster, CERTIFICATE_AUTHORITY_DATA);
    }

    config
}
