//! Child resource builders.
//!
//! Pure construction of the Deployment, Service, and DNS objects that
//! realize a Hass spec. No I/O happens here; the reconciler decides
//! whether a built object is submitted.
//!
//! Builders tolerate absent optional spec fields by passing through an
//! absent or empty value. They never validate.

use std::collections::BTreeMap;

use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, EnvVar, NFSVolumeSource, PodSpec, PodTemplateSpec, Service,
    ServicePort, ServiceSpec, Volume, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta, OwnerReference};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::{Resource, ResourceExt};

use crds::{DNS, DNSSpec, Hass, HassSpec};

/// Port Home Assistant serves on, for both the container and the service.
pub const HASS_PORT: i32 = 8123;

/// Mount point of the NFS-backed config volume inside the container.
pub const CONFIG_MOUNT_PATH: &str = "/config";

const CONFIG_VOLUME_NAME: &str = "nfs-hass";

/// Standard `app=<name>` labels attached to every child object.
pub fn app_labels(name: &str) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();
    labels.insert("app".to_string(), name.to_string());
    labels
}

/// Label selector string for listing the children of a Hass object.
pub fn app_selector(name: &str) -> String {
    format!("app={name}")
}

/// OwnerReference marking a child for cascade deletion with its parent.
pub fn owner_reference(hass: &Hass) -> OwnerReference {
    OwnerReference {
        api_version: Hass::api_version(&()).to_string(),
        kind: Hass::kind(&()).to_string(),
        name: hass.name_any(),
        uid: hass.metadata.uid.clone().unwrap_or_default(),
        controller: Some(true),
        block_owner_deletion: Some(true),
    }
}

fn child_meta(namespace: &str, name: &str, owner: OwnerReference) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(namespace.to_string()),
        labels: Some(app_labels(name)),
        owner_references: Some(vec![owner]),
        ..Default::default()
    }
}

/// Builds the Deployment realizing a Hass spec.
///
/// One container exposing port 8123, `TZ` from the declared timezone,
/// config mounted at `/config` from the declared NFS export.
pub fn build_deployment(
    namespace: &str,
    name: &str,
    spec: &HassSpec,
    owner: OwnerReference,
) -> Deployment {
    Deployment {
        metadata: child_meta(namespace, name, owner),
        spec: Some(DeploymentSpec {
            selector: LabelSelector {
                match_labels: Some(app_labels(name)),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(app_labels(name)),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![Container {
                        name: "hass".to_string(),
                        image: spec.image.clone(),
                        ports: Some(vec![ContainerPort {
                            container_port: HASS_PORT,
                            name: Some("http".to_string()),
                            ..Default::default()
                        }]),
                        env: Some(vec![EnvVar {
                            name: "TZ".to_string(),
                            value: spec.timezone.clone(),
                            ..Default::default()
                        }]),
                        volume_mounts: Some(vec![VolumeMount {
                            name: CONFIG_VOLUME_NAME.to_string(),
                            mount_path: CONFIG_MOUNT_PATH.to_string(),
                            ..Default::default()
                        }]),
                        ..Default::default()
                    }],
                    volumes: Some(vec![Volume {
                        name: CONFIG_VOLUME_NAME.to_string(),
                        nfs: Some(NFSVolumeSource {
                            server: spec.nfs_server.clone().unwrap_or_default(),
                            path: spec.nfs_path.clone().unwrap_or_default(),
                            ..Default::default()
                        }),
                        ..Default::default()
                    }]),
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Builds the LoadBalancer Service realizing a Hass spec.
pub fn build_service(
    namespace: &str,
    name: &str,
    spec: &HassSpec,
    owner: OwnerReference,
) -> Service {
    Service {
        metadata: child_meta(namespace, name, owner),
        spec: Some(ServiceSpec {
            selector: Some(app_labels(name)),
            ports: Some(vec![ServicePort {
                name: Some("http".to_string()),
                port: HASS_PORT,
                target_port: Some(IntOrString::Int(HASS_PORT)),
                ..Default::default()
            }]),
            type_: Some("LoadBalancer".to_string()),
            load_balancer_ip: spec.ip_address.clone(),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Builds the DNS record request carrying the parent's address fields.
pub fn build_dns(namespace: &str, name: &str, spec: &HassSpec, owner: OwnerReference) -> DNS {
    DNS {
        metadata: child_meta(namespace, name, owner),
        spec: DNSSpec {
            ip_address: spec.ip_address.clone(),
            dns: spec.dns.clone(),
        },
    }
}
