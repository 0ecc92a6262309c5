//! Cluster credential resolution.
//!
//! Prefers a local kubeconfig; falls back to the service-account
//! credentials the cluster injects into the pod. No other fallback:
//! startup is fatal if neither yields a usable configuration.

use kube::config::KubeConfigOptions;
use kube::{Client, Config};
use tracing::{debug, info};

use crate::error::ControllerError;

/// Resolves cluster credentials and builds a client from them.
pub async fn connect() -> Result<Client, ControllerError> {
    let config = match Config::from_kubeconfig(&KubeConfigOptions::default()).await {
        Ok(config) => {
            info!("Using local kubeconfig credentials");
            config
        }
        Err(e) => {
            debug!("No usable kubeconfig ({}), trying in-cluster credentials", e);
            let config = Config::incluster().map_err(|e| {
                ControllerError::InvalidConfig(format!(
                    "neither kubeconfig nor in-cluster credentials are available: {}",
                    e
                ))
            })?;
            info!("Using in-cluster credentials");
            config
        }
    };

    Ok(Client::try_from(config)?)
}
