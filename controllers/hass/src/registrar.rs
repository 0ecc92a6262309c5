//! CRD registration.
//!
//! Installs the Hass custom resource type at startup. The DNS type is
//! owned by the external DNS controller and is not installed here.

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::api::PostParams;
use kube::{Api, Client, CustomResourceExt};
use tracing::{error, info};

use crate::error::{ControllerError, is_conflict};

use crds::Hass;

/// Submits the Hass CRD, tolerating an already-registered type.
///
/// A conflict from the schema registry means a previous run (or another
/// replica) already installed the definition; anything else aborts
/// startup.
pub async fn install_hass_crd(client: &Client) -> Result<(), ControllerError> {
    let crds: Api<CustomResourceDefinition> = Api::all(client.clone());

    match crds.create(&PostParams::default(), &Hass::crd()).await {
        Ok(_) => {
            info!("Registered Hass CRD");
            Ok(())
        }
        Err(e) if is_conflict(&e) => {
            info!("Hass CRD already registered");
            Ok(())
        }
        Err(e) => {
            error!("Failed to register Hass CRD: {}", e);
            Err(ControllerError::Kube(e))
        }
    }
}
