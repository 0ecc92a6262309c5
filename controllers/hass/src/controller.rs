//! Main controller implementation.
//!
//! This module contains the `Controller` struct that orchestrates
//! reconciliation and resource watching for the Hass operator.

use std::sync::Arc;

use kube::{Api, Client};
use tokio::task::JoinHandle;
use tracing::info;

use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use crate::watcher::Watcher;

use crds::Hass;

/// Main controller for Hass objects.
pub struct Controller {
    hass_watcher: JoinHandle<Result<(), ControllerError>>,
}

impl Controller {
    /// Creates a new controller instance and starts its watcher.
    pub fn new(client: Client, namespace: Option<String>) -> Self {
        info!("Initializing Hass controller");

        let ns = namespace.as_deref().unwrap_or("default");
        let hass_api: Api<Hass> = Api::namespaced(client.clone(), ns);

        let reconciler = Arc::new(Reconciler::new(client));
        let watcher_instance = Watcher::new(reconciler, hass_api);

        let hass_watcher = tokio::spawn(async move { watcher_instance.watch_hass().await });

        Self { hass_watcher }
    }

    /// Runs the controller until the watcher exits.
    pub async fn run(self) -> Result<(), ControllerError> {
        info!("Hass controller running");

        self.hass_watcher
            .await
            .map_err(|e| ControllerError::Watch(format!("Hass watcher panicked: {}", e)))?
    }
}
