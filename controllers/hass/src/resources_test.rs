//! Unit tests for the child resource builders

mod tests {
    use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

    use crate::resources::{
        CONFIG_MOUNT_PATH, HASS_PORT, app_labels, app_selector, build_deployment, build_dns,
        build_service, owner_reference,
    };
    use crate::test_utils::{create_test_hass, create_test_hass_empty};

    #[test]
    fn test_build_deployment_field_mapping() {
        let hass = create_test_hass("foo", "ns1");
        let deployment = build_deployment("ns1", "foo", &hass.spec, owner_reference(&hass));

        assert_eq!(deployment.metadata.name.as_deref(), Some("foo"));
        assert_eq!(deployment.metadata.namespace.as_deref(), Some("ns1"));
        assert_eq!(
            deployment.metadata.labels.as_ref().and_then(|l| l.get("app")),
            Some(&"foo".to_string()),
            "Deployment should carry the app label"
        );

        let spec = deployment.spec.expect("deployment spec");
        assert_eq!(
            spec.selector
                .match_labels
                .as_ref()
                .and_then(|l| l.get("app")),
            Some(&"foo".to_string()),
            "Selector should match the app label"
        );
        assert_eq!(
            spec.template.metadata.as_ref().and_then(|m| m.labels.clone()),
            Some(app_labels("foo")),
            "Pod template should carry the app label"
        );

        let pod_spec = spec.template.spec.expect("pod spec");
        assert_eq!(pod_spec.containers.len(), 1, "Exactly one container");

        let container = &pod_spec.containers[0];
        assert_eq!(container.name, "hass");
        assert_eq!(
            container.image.as_deref(),
            Some("homeassistant/home-assistant")
        );

        let ports = container.ports.as_ref().expect("container ports");
        assert_eq!(ports.len(), 1);
        assert_eq!(ports[0].container_port, HASS_PORT);

        let env = container.env.as_ref().expect("container env");
        assert!(
            env.iter()
                .any(|e| e.name == "TZ" && e.value.as_deref() == Some("UTC")),
            "TZ should be set from the declared timezone"
        );

        let mounts = container.volume_mounts.as_ref().expect("volume mounts");
        assert_eq!(mounts.len(), 1);
        assert_eq!(mounts[0].mount_path, CONFIG_MOUNT_PATH);

        let volumes = pod_spec.volumes.as_ref().expect("volumes");
        assert_eq!(volumes.len(), 1);
        assert_eq!(
            mounts[0].name, volumes[0].name,
            "Mount must reference the NFS volume"
        );

        let nfs = volumes[0].nfs.as_ref().expect("nfs volume source");
        assert_eq!(nfs.server, "10.0.0.5");
        assert_eq!(nfs.path, "/export/hass");
    }

    #[test]
    fn test_build_service_field_mapping() {
        let hass = create_test_hass("foo", "ns1");
        let service = build_service("ns1", "foo", &hass.spec, owner_reference(&hass));

        assert_eq!(service.metadata.name.as_deref(), Some("foo"));
        assert_eq!(
            service.metadata.labels.as_ref().and_then(|l| l.get("app")),
            Some(&"foo".to_string())
        );

        let spec = service.spec.expect("service spec");
        assert_eq!(spec.type_.as_deref(), Some("LoadBalancer"));
        assert_eq!(spec.load_balancer_ip.as_deref(), Some("192.168.1.50"));
        assert_eq!(
            spec.selector.as_ref().and_then(|s| s.get("app")),
            Some(&"foo".to_string()),
            "Service should select the app label"
        );

        let ports = spec.ports.expect("service ports");
        assert_eq!(ports.len(), 1);
        assert_eq!(ports[0].port, HASS_PORT);
        assert_eq!(ports[0].target_port, Some(IntOrString::Int(HASS_PORT)));
    }

    #[test]
    fn test_build_dns_carries_address_fields() {
        let hass = create_test_hass("foo", "ns1");
        let record = build_dns("ns1", "foo", &hass.spec, owner_reference(&hass));

        assert_eq!(record.metadata.name.as_deref(), Some("foo"));
        assert_eq!(record.metadata.namespace.as_deref(), Some("ns1"));
        assert_eq!(record.spec.ip_address.as_deref(), Some("192.168.1.50"));
        assert_eq!(record.spec.dns.as_deref(), Some("hass.example.com"));
        assert_eq!(
            record.metadata.labels.as_ref().and_then(|l| l.get("app")),
            Some(&"foo".to_string()),
            "DNS record should carry the app label"
        );

        let owners = record
            .metadata
            .owner_references
            .as_ref()
            .expect("owner references");
        assert_eq!(owners.len(), 1);
        assert_eq!(owners[0].kind, "Hass");
        assert_eq!(owners[0].name, "foo");
    }

    #[test]
    fn test_owner_reference_shape() {
        let hass = create_test_hass("foo", "ns1");
        let owner = owner_reference(&hass);

        assert_eq!(owner.api_version, "operators.silvertoken.github.io/v1");
        assert_eq!(owner.kind, "Hass");
        assert_eq!(owner.name, "foo");
        assert_eq!(owner.uid, "9f2c7b1e-test-uid");
        assert_eq!(owner.controller, Some(true));
        assert_eq!(owner.block_owner_deletion, Some(true));
    }

    #[test]
    fn test_builders_tolerate_empty_spec() {
        let hass = create_test_hass_empty("bare", "ns1");

        let deployment = build_deployment("ns1", "bare", &hass.spec, owner_reference(&hass));
        let dep_spec = deployment.spec.expect("deployment spec");
        let pod_spec = dep_spec.template.spec.expect("pod spec");
        let container = &pod_spec.containers[0];
        assert_eq!(container.image, None, "Absent image passes through");

        let env = container.env.as_ref().expect("container env");
        assert_eq!(env[0].value, None, "Absent timezone passes through");

        let volumes = pod_spec.volumes.as_ref().expect("volumes");
        let nfs = volumes[0].nfs.as_ref().expect("nfs volume source");
        assert_eq!(nfs.server, "", "Absent server becomes an empty value");
        assert_eq!(nfs.path, "", "Absent path becomes an empty value");

        let service = build_service("ns1", "bare", &hass.spec, owner_reference(&hass));
        assert_eq!(service.spec.expect("service spec").load_balancer_ip, None);

        let record = build_dns("ns1", "bare", &hass.spec, owner_reference(&hass));
        assert_eq!(record.spec.ip_address, None);
        assert_eq!(record.spec.dns, None);
    }

    #[test]
    fn test_app_selector_format() {
        assert_eq!(app_selector("foo"), "app=foo");
        assert_eq!(
            app_labels("foo").get("app"),
            Some(&"foo".to_string()),
            "Selector and labels must agree"
        );
    }
}
