//! Cluster and ephemeral container data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use helmsman_persistence::model::{ContainerAction, EphemeralContainerInfo};

/// Connection settings of a cluster as sent to the Helm RPC service.
///
/// TLS material is only filled in when certificate verification is enabled.
#[derive(Clone, PartialEq, ::prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfig {
    #[prost(string, tag = "1")]
    pub api_server_url: String,
    #[prost(string, tag = "2")]
    pub token: String,
    #[prost(int32, tag = "3")]
    pub cluster_id: i32,
    #[prost(string, tag = "4")]
    pub cluster_name: String,
    #[prost(bool, tag = "5")]
    pub insecure_skip_tls_verify: bool,
    #[prost(string, tag = "6")]
    pub key_data: String,
    #[prost(string, tag = "7")]
    pub cert_data: String,
    #[prost(string, tag = "8")]
    pub ca_data: String,
}

const REDACTED: &str = "******";

impl ClusterConfig {
    /// Copy with credentials masked, for printing.
    pub fn redacted(&self) -> ClusterConfig {
        let mask = |value: &str| {
            if value.is_empty() {
                String::new()
            } else {
                REDACTED.to_string()
            }
        };
        ClusterConfig {
            token: mask(&self.token),
            key_data: mask(&self.key_data),
            cert_data: mask(&self.cert_data),
            ca_data: mask(&self.ca_data),
            ..self.clone()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EphemeralContainerBasicData {
    pub container_name: String,
    pub target_container_name: String,
    pub image: String,
}

/// Raw pod manifest supplied instead of the basic form
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EphemeralContainerAdvancedData {
    pub manifest: String,
}

/// Ephemeral container action to be audited
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EphemeralContainerRequest {
    pub basic_data: EphemeralContainerBasicData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_data: Option<EphemeralContainerAdvancedData>,
    pub namespace: String,
    pub cluster_id: i32,
    pub pod_name: String,
    #[serde(default)]
    pub user_id: i32,
}

impl EphemeralContainerRequest {
    /// Build the container row recorded for this request.
    ///
    /// The stored config is the advanced manifest when one was given,
    /// otherwise the JSON of the basic data.
    pub fn to_container_info(&self) -> anyhow::Result<EphemeralContainerInfo> {
        let config = match &self.advanced_data {
            Some(advanced) => advanced.manifest.clone(),
            None => serde_json::to_string(&self.basic_data)?,
        };

        Ok(EphemeralContainerInfo {
            id: 0,
            name: self.basic_data.container_name.clone(),
            cluster_id: self.cluster_id,
            namespace: self.namespace.clone(),
            pod_name: self.pod_name.clone(),
            target_container: self.basic_data.target_container_name.clone(),
            config,
            is_externally_created: false,
        })
    }
}

/// Outcome of a successfully committed audit
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EphemeralContainerAuditRecord {
    pub ephemeral_container_id: i32,
    pub action_id: i32,
    pub action_type: ContainerAction,
    pub performed_by: i32,
    pub performed_at: DateTime<Utc>,
    /// A container row was inserted by this audit
    pub container_created: bool,
    pub externally_created: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    fn request() -> EphemeralContainerRequest {
        EphemeralContainerRequest {
            basic_data: EphemeralContainerBasicData {
                container_name: "debugger-x1".to_string(),
                target_container_name: "web".to_string(),
                image: "busybox:1.36".to_string(),
            },
            advanced_data: None,
            namespace: "default".to_string(),
            cluster_id: 4,
            pod_name: "web-0".to_string(),
            user_id: 9,
        }
    }

    #[test]
    fn test_container_info_from_basic_data() {
        let info = request().to_container_info().unwrap();
        assert_eq!(info.name, "debugger-x1");
        assert_eq!(info.target_container, "web");
        assert_eq!(info.cluster_id, 4);
        assert!(!info.is_externally_created);

        let stored: EphemeralContainerBasicData = serde_json::from_str(&info.config).unwrap();
        assert_eq!(stored.image, "busybox:1.36");
    }

    #[test]
    fn test_container_info_prefers_manifest() {
        let mut req = request();
        req.advanced_data = Some(EphemeralContainerAdvancedData {
            manifest: "{\"name\":\"debugger-x1\"}".to_string(),
        });
        let info = req.to_container_info().unwrap();
        assert_eq!(info.config, "{\"name\":\"debugger-x1\"}");
    }

    #[test]
    fn test_request_deserializes_camel_case() {
        let json = r#"{
            "basicData": {"containerName": "dbg", "targetContainerName": "app", "image": "alpine"},
            "namespace": "ns",
            "clusterId": 2,
            "podName": "app-1"
        }"#;
        let req: EphemeralContainerRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.basic_data.container_name, "dbg");
        assert_eq!(req.user_id, 0);
        assert!(req.advanced_data.is_none());
    }

    #[test]
    fn test_insecure_config_wire_format_has_no_tls_material() {
        let config = ClusterConfig {
            api_server_url: "https://k8s.local".to_string(),
            token: "t".to_string(),
            cluster_id: 1,
            cluster_name: "dev".to_string(),
            insecure_skip_tls_verify: true,
            ..Default::default()
        };
        let decoded = ClusterConfig::decode(config.encode_to_vec().as_slice()).unwrap();
        assert_eq!(decoded, config);
        assert!(decoded.key_data.is_empty() && decoded.cert_data.is_empty());
    }

    #[test]
    fn test_redacted_masks_only_present_secrets() {
        let config = ClusterConfig {
            token: "secret".to_string(),
            cert_data: "cert".to_string(),
            cluster_name: "dev".to_string(),
            ..Default::default()
        };
        let masked = config.redacted();
        assert_eq!(masked.token, "******");
        assert_eq!(masked.cert_data, "******");
        assert!(masked.key_data.is_empty());
        assert_eq!(masked.cluster_name, "dev");
    }
}
