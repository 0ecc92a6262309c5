//! Reconciliation logic for Hass objects.
//!
//! Handles the creation of a Hass object by ensuring its children
//! exist: a Deployment, a Service, and a DNS record request. Each step
//! lists by the `app=<name>` label and creates only when nothing is
//! found, so redelivery of the same event is safe after partial
//! success. Nothing is ever updated or deleted here.

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use kube::Client;
use kube::api::{Api, ListParams, PostParams};
use tracing::{debug, info};

use crate::error::{ControllerError, is_conflict};
use crate::resources;

use crds::{DNS, Hass};

/// Reconciles Hass objects into their child resources.
pub struct Reconciler {
    client: Client,
}

impl Reconciler {
    /// Creates a new reconciler instance.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Handles the creation of a Hass object.
    ///
    /// Creation failures other than an already-exists conflict are
    /// permanent: redelivering the event cannot fix them. A conflict
    /// means a concurrent pass won the race to create the child, which
    /// leaves the cluster in the state we wanted anyway.
    ///
    /// There is no rollback: if the Deployment is created and the
    /// Service fails, the Deployment stays and redelivery finishes the
    /// job.
    pub async fn reconcile_hass_create(&self, hass: &Hass) -> Result<(), ControllerError> {
        let name = hass
            .metadata
            .name
            .as_ref()
            .ok_or_else(|| ControllerError::InvalidConfig("Hass object missing name".to_string()))?;
        let namespace = hass.metadata.namespace.as_deref().unwrap_or("default");

        info!("Reconciling Hass {}/{}", namespace, name);

        self.ensure_deployment(namespace, name, hass).await?;
        self.ensure_service(namespace, name, hass).await?;

        info!("Checking DNS record for Hass {}/{}", namespace, name);
        self.ensure_dns(namespace, name, hass).await?;

        Ok(())
    }

    async fn ensure_deployment(
        &self,
        namespace: &str,
        name: &str,
        hass: &Hass,
    ) -> Result<(), ControllerError> {
        let deployments: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        let lp = ListParams::default().labels(&resources::app_selector(name));

        let existing = deployments.list(&lp).await?;
        debug!(
            "Found {} deployments labeled app={}",
            existing.items.len(),
            name
        );
        if !existing.items.is_empty() {
            return Ok(());
        }

        info!(
            "Creating hass deployment in namespace '{}' with name: {}",
            namespace, name
        );
        let deployment = resources::build_deployment(
            namespace,
            name,
            &hass.spec,
            resources::owner_reference(hass),
        );
        match deployments
            .create(&PostParams::default(), &deployment)
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if is_conflict(&e) => {
                debug!(
                    "Deployment {}/{} already created by a concurrent pass",
                    namespace, name
                );
                Ok(())
            }
            Err(e) => Err(ControllerError::Permanent(format!(
                "failed to create deployment {}/{}: {}",
                namespace, name, e
            ))),
        }
    }

    async fn ensure_service(
        &self,
        namespace: &str,
        name: &str,
        hass: &Hass,
    ) -> Result<(), ControllerError> {
        let services: Api<Service> = Api::namespaced(self.client.clone(), namespace);
        let lp = ListParams::default().labels(&resources::app_selector(name));

        let existing = services.list(&lp).await?;
        debug!(
            "Found {} services labeled app={}",
            existing.items.len(),
            name
        );
        if !existing.items.is_empty() {
            return Ok(());
        }

        info!(
            "Creating hass service in namespace '{}' with name: {}",
            namespace, name
        );
        let service = resources::build_service(
            namespace,
            name,
            &hass.spec,
            resources::owner_reference(hass),
        );
        match services.create(&PostParams::default(), &service).await {
            Ok(_) => Ok(()),
            Err(e) if is_conflict(&e) => {
                debug!(
                    "Service {}/{} already created by a concurrent pass",
                    namespace, name
                );
                Ok(())
            }
            Err(e) => Err(ControllerError::Permanent(format!(
                "failed to create service {}/{}: {}",
                namespace, name, e
            ))),
        }
    }

    /// Ensures the DNS record request for a Hass object exists.
    ///
    /// The record carries only the address fields from the parent spec;
    /// the external DNS controller does the rest.
    pub async fn ensure_dns(
        &self,
        namespace: &str,
        name: &str,
        hass: &Hass,
    ) -> Result<(), ControllerError> {
        let records: Api<DNS> = Api::namespaced(self.client.clone(), namespace);
        let lp = ListParams::default().labels(&resources::app_selector(name));

        let existing = records.list(&lp).await?;
        debug!(
            "Found {} DNS records labeled app={}",
            existing.items.len(),
            name
        );
        if !existing.items.is_empty() {
            return Ok(());
        }

        info!(
            "Creating DNS record in namespace '{}' with name: {}",
            namespace, name
        );
        let record =
            resources::build_dns(namespace, name, &hass.spec, resources::owner_reference(hass));
        match records.create(&PostParams::default(), &record).await {
            Ok(_) => {
                info!("Created DNS record {}/{}", namespace, name);
                Ok(())
            }
            Err(e) if is_conflict(&e) => {
                debug!(
                    "DNS record {}/{} already created by a concurrent pass",
                    namespace, name
                );
                Ok(())
            }
            Err(e) => Err(ControllerError::Permanent(format!(
                "failed to create DNS record {}/{}: {}",
                namespace, name, e
            ))),
        }
    }
}
