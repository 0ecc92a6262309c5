//! Hass Operator
//!
//! Reconciles `Hass` custom resources into a running Home Assistant
//! instance.
//!
//! On creation of a Hass object the controller ensures a Deployment, a
//! LoadBalancer Service, and a DNS record request exist for it, each
//! owned by the parent so the cluster garbage collector cascades
//! deletion.

mod controller;
mod credentials;
mod error;
mod peering;
mod reconciler;
mod registrar;
mod resources;
mod watcher;

#[cfg(test)]
mod test_utils;

#[cfg(test)]
mod error_test;
#[cfg(test)]
mod resources_test;

use std::env;

use tracing::{error, info};

use crate::controller::Controller;
use crate::error::ControllerError;

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    tracing_subscriber::fmt::init();

    info!("Starting Hass operator");

    // Load configuration from environment variables
    let watch_namespace = env::var("WATCH_NAMESPACE").ok();
    let pod_namespace = env::var("POD_NAMESPACE").unwrap_or_else(|_| "default".to_string());
    let identity = env::var("POD_NAME")
        .or_else(|_| env::var("HOSTNAME"))
        .unwrap_or_else(|_| format!("hass-controller-{}", std::process::id()));

    info!("Configuration:");
    info!(
        "  Watch namespace: {}",
        watch_namespace.as_deref().unwrap_or("default")
    );
    info!("  Peering namespace: {}", pod_namespace);
    info!("  Peering identity: {}", identity);

    // Resolve credentials and register the Hass CRD before serving events
    let client = credentials::connect().await?;
    registrar::install_hass_crd(&client).await?;

    // Peering is mandatory: no events are processed until the lease is held
    let peering = peering::Peering::acquire(client.clone(), &pod_namespace, identity).await?;

    let controller = Controller::new(client, watch_namespace);

    tokio::select! {
        result = controller.run() => result,
        err = peering.lost() => {
            error!("Peering lease lost: {}", err);
            Err(err)
        }
    }
}
