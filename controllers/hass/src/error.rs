//! Controller-specific error types.
//!
//! This module defines error types specific to the Hass controller
//! that are not covered by upstream library errors.

use kube::Error as KubeError;
use thiserror::Error;

/// Errors that can occur in the Hass controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] KubeError),

    /// Child creation failed for a reason redelivery cannot fix
    #[error("Permanent reconciliation failure: {0}")]
    Permanent(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Resource watch failed
    #[error("Resource watch failed: {0}")]
    Watch(String),

    /// Peering lease could not be acquired or renewed
    #[error("Peering failure: {0}")]
    Peering(String),
}

impl ControllerError {
    /// Whether redelivery of the triggering event could succeed.
    ///
    /// Permanent failures are surfaced once and never retried; an
    /// operator has to intervene or re-apply the object.
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Permanent(_) | Self::InvalidConfig(_))
    }
}

/// True when the API rejected a create because the object already exists.
pub fn is_conflict(err: &KubeError) -> bool {
    matches!(err, KubeError::Api(resp) if resp.code == 409)
}
