//! DNS CRD
//!
//! Address record request consumed by the external DNS controller. The
//! Hass operator only creates instances of this type; reconciling them
//! into actual records happens elsewhere.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Desired DNS record, copied from the parent Hass spec.
#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "operators.silvertoken.github.io",
    version = "v1",
    kind = "DNS",
    plural = "dns",
    singular = "dns",
    namespaced
)]
pub struct DNSSpec {
    /// Address the record should resolve to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    /// Fully qualified name of the record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<String>,
}
