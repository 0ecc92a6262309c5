//! Test utilities for unit testing the controller's pure surface.
//!
//! This module provides helpers for creating test data.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use crds::{Hass, HassSpec};

/// Helper to create a test Hass object with the full spec populated.
pub fn create_test_hass(name: &str, namespace: &str) -> Hass {
    Hass {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            uid: Some("9f2c7b1e-test-uid".to_string()),
            ..Default::default()
        },
        spec: HassSpec {
            ip_address: Some("192.168.1.50".to_string()),
            dns: Some("hass.example.com".to_string()),
            image: Some("homeassistant/home-assistant".to_string()),
            nfs_server: Some("10.0.0.5".to_string()),
            nfs_path: Some("/export/hass".to_string()),
            timezone: Some("UTC".to_string()),
        },
        status: None,
    }
}

/// Helper to create a test Hass object with nothing declared in its spec.
pub fn create_test_hass_empty(name: &str, namespace: &str) -> Hass {
    Hass {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        spec: HassSpec::default(),
        status: None,
    }
}
