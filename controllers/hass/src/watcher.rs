//! Kubernetes resource watcher.
//!
//! Drives a watch stream over Hass objects and routes each event to
//! its handler. Only creation is acted on; children of a deleted Hass
//! object are cleaned up by owner-reference garbage collection, not by
//! this controller.

use std::sync::Arc;

use futures::TryStreamExt;
use kube::Api;
use kube_runtime::watcher;
use tracing::{debug, error, info, warn};

use crate::error::ControllerError;
use crate::reconciler::Reconciler;

use crds::Hass;

/// Watches Hass objects and dispatches creation events.
pub struct Watcher {
    reconciler: Arc<Reconciler>,
    hass_api: Api<Hass>,
}

impl Watcher {
    /// Creates a new watcher instance.
    pub fn new(reconciler: Arc<Reconciler>, hass_api: Api<Hass>) -> Self {
        Self {
            reconciler,
            hass_api,
        }
    }

    /// Starts watching Hass objects.
    ///
    /// `Apply` and `InitApply` both route to the creation handler: the
    /// watch API has no distinct created event, and the reconciler's
    /// list-before-create gate turns redelivery and restart replays
    /// into no-ops.
    pub async fn watch_hass(&self) -> Result<(), ControllerError> {
        info!("Starting Hass watcher");

        let mut stream = Box::pin(watcher(self.hass_api.clone(), watcher::Config::default()));

        while let Some(event) = stream
            .try_next()
            .await
            .map_err(|e| ControllerError::Watch(format!("Watcher stream error: {}", e)))?
        {
            match event {
                watcher::Event::Apply(hass) => {
                    let name = hass.metadata.name.as_deref().unwrap_or("<unknown>");
                    info!("Hass applied: {}", name);

                    self.handle_create(&hass).await;
                }
                watcher::Event::Delete(hass) => {
                    let name = hass.metadata.name.as_deref().unwrap_or("<unknown>");
                    info!("Hass deleted: {}, children are garbage-collected", name);
                }
                watcher::Event::Init => {
                    info!("Hass watcher initialized");
                }
                watcher::Event::InitApply(hass) => {
                    let name = hass.metadata.name.as_deref().unwrap_or("<unknown>");
                    debug!("Hass init apply: {}", name);

                    self.handle_create(&hass).await;
                }
                watcher::Event::InitDone => {
                    info!("Hass watcher initialization complete");
                }
            }
        }

        Ok(())
    }

    /// Invokes the creation handler and applies the retry policy.
    ///
    /// Permanent failures are surfaced once at error level and never
    /// retried; anything else is left to the next delivery of the
    /// event.
    async fn handle_create(&self, hass: &Hass) {
        let name = hass.metadata.name.as_deref().unwrap_or("<unknown>");

        if let Err(e) = self.reconciler.reconcile_hass_create(hass).await {
            if e.is_permanent() {
                error!("Giving up on Hass {}: {}", name, e);
            } else {
                warn!(
                    "Failed to reconcile Hass {}, will retry on next delivery: {}",
                    name, e
                );
            }
        }
    }
}
