//! Operator peering.
//!
//! Controller replicas coordinate through a single coordination.k8s.io
//! Lease named `hass`. The lease is mandatory: startup blocks until
//! this process holds it, so peers agree before any events are
//! processed. A background task renews the lease for the lifetime of
//! the process; losing it is fatal.

use std::time::Duration;

use chrono::Utc;
use k8s_openapi::api::coordination::v1::{Lease, LeaseSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{MicroTime, ObjectMeta};
use kube::Client;
use kube::api::{Api, PostParams};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{ControllerError, is_conflict};

/// Name of the peering group shared by all replicas.
pub const PEERING_NAME: &str = "hass";

const LEASE_DURATION_SECS: i32 = 30;
const RENEW_INTERVAL: Duration = Duration::from_secs(10);
const ACQUIRE_RETRY: Duration = Duration::from_secs(5);

/// Holds the peering lease for the lifetime of the process.
pub struct Peering {
    renewer: JoinHandle<Result<(), ControllerError>>,
}

impl Peering {
    /// Blocks until the peering lease is held, then keeps renewing it.
    pub async fn acquire(
        client: Client,
        namespace: &str,
        identity: String,
    ) -> Result<Self, ControllerError> {
        let leases: Api<Lease> = Api::namespaced(client, namespace);

        while !try_acquire(&leases, &identity).await? {
            info!(
                "Peering lease '{}' held by another replica, waiting",
                PEERING_NAME
            );
            tokio::time::sleep(ACQUIRE_RETRY).await;
        }
        info!("Acquired peering lease '{}' as {}", PEERING_NAME, identity);

        let renewer = tokio::spawn(async move {
            loop {
                tokio::time::sleep(RENEW_INTERVAL).await;
                renew(&leases, &identity).await?;
            }
        });

        Ok(Self { renewer })
    }

    /// Resolves when the renewal task stops, which is always fatal.
    pub async fn lost(self) -> ControllerError {
        match self.renewer.await {
            Ok(Err(e)) => e,
            Ok(Ok(())) => ControllerError::Peering("lease renewal stopped".to_string()),
            Err(e) => ControllerError::Peering(format!("lease renewal task panicked: {}", e)),
        }
    }
}

fn desired_lease(identity: &str) -> Lease {
    let now = MicroTime(Utc::now());
    Lease {
        metadata: ObjectMeta {
            name: Some(PEERING_NAME.to_string()),
            ..Default::default()
        },
        spec: Some(LeaseSpec {
            holder_identity: Some(identity.to_string()),
            lease_duration_seconds: Some(LEASE_DURATION_SECS),
            acquire_time: Some(now.clone()),
            renew_time: Some(now),
            ..Default::default()
        }),
    }
}

fn held_by(lease: &Lease, identity: &str) -> bool {
    lease
        .spec
        .as_ref()
        .and_then(|s| s.holder_identity.as_deref())
        == Some(identity)
}

fn expired(lease: &Lease) -> bool {
    let Some(spec) = lease.spec.as_ref() else {
        return true;
    };
    let duration = i64::from(spec.lease_duration_seconds.unwrap_or(LEASE_DURATION_SECS));
    match spec.renew_time.as_ref().or(spec.acquire_time.as_ref()) {
        Some(MicroTime(t)) => Utc::now() - *t > chrono::Duration::seconds(duration),
        None => true,
    }
}

/// One acquisition attempt. `Ok(false)` means a live peer holds the lease.
async fn try_acquire(leases: &Api<Lease>, identity: &str) -> Result<bool, ControllerError> {
    match leases.get_opt(PEERING_NAME).await? {
        None => match leases
            .create(&PostParams::default(), &desired_lease(identity))
            .await
        {
            Ok(_) => Ok(true),
            // Another replica created it between our get and create
            Err(e) if is_conflict(&e) => Ok(false),
            Err(e) => Err(ControllerError::Kube(e)),
        },
        Some(existing) => {
            if held_by(&existing, identity) {
                return Ok(true);
            }
            if !expired(&existing) {
                return Ok(false);
            }

            debug!(
                "Peering lease '{}' expired, taking over from {:?}",
                PEERING_NAME,
                existing
                    .spec
                    .as_ref()
                    .and_then(|s| s.holder_identity.as_deref())
            );
            // Keep the resourceVersion so a racing takeover loses cleanly
            let mut lease = desired_lease(identity);
            lease.metadata.resource_version = existing.metadata.resource_version.clone();
            if let Some(spec) = lease.spec.as_mut() {
                let transitions = existing
                    .spec
                    .as_ref()
                    .and_then(|s| s.lease_transitions)
                    .unwrap_or(0);
                spec.lease_transitions = Some(transitions + 1);
            }
            match leases
                .replace(PEERING_NAME, &PostParams::default(), &lease)
                .await
            {
                Ok(_) => Ok(true),
                Err(e) if is_conflict(&e) => Ok(false),
                Err(e) => Err(ControllerError::Kube(e)),
            }
        }
    }
}

async fn renew(leases: &Api<Lease>, identity: &str) -> Result<(), ControllerError> {
    let mut lease = leases.get(PEERING_NAME).await?;
    if !held_by(&lease, identity) {
        return Err(ControllerError::Peering(format!(
            "lease '{}' was taken over by another holder",
            PEERING_NAME
        )));
    }

    if let Some(spec) = lease.spec.as_mut() {
        spec.renew_time = Some(MicroTime(Utc::now()));
    }
    match leases
        .replace(PEERING_NAME, &PostParams::default(), &lease)
        .await
    {
        Ok(_) => {
            debug!("Renewed peering lease '{}'", PEERING_NAME);
            Ok(())
        }
        Err(e) if is_conflict(&e) => {
            // Someone touched the lease between get and replace; the
            // next renewal re-reads it and decides whether we lost it.
            warn!("Peering lease '{}' renewal conflicted, retrying", PEERING_NAME);
            Ok(())
        }
        Err(e) => Err(ControllerError::Kube(e)),
    }
}
