//! Hass CRD
//!
//! Declares a Home Assistant instance: container image, fixed service
//! address, NFS-backed config storage, and the DNS name to publish.

use std::collections::BTreeMap;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Desired state of a Home Assistant instance.
///
/// Every field is optional; the controller passes absent values through
/// to the child objects without validating them. Field names are
/// snake_case on the wire.
#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "operators.silvertoken.github.io",
    version = "v1",
    kind = "Hass",
    plural = "hass",
    singular = "hass",
    shortname = "hass",
    namespaced,
    status = "HassStatus"
)]
pub struct HassSpec {
    /// Fixed address for the LoadBalancer service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    /// DNS name to publish for the instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<String>,

    /// Home Assistant container image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// NFS server exporting the config volume
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nfs_server: Option<String>,

    /// Export path on the NFS server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nfs_path: Option<String>,

    /// Timezone passed to the container as TZ
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// Free-form status sub-object.
///
/// The schema preserves unknown fields; this controller never writes it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct HassStatus {
    /// Arbitrary status fields left to other writers
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
}
