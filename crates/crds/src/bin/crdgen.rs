//! CRD generation binary for the Hass operator
//!
//! Prints the CustomResourceDefinition manifests for the operator-owned
//! types as YAML, suitable for `kubectl apply -f -`.

use anyhow::Result;
use crds::{DNS, Hass};
use kube::CustomResourceExt;

fn main() -> Result<()> {
    print!("{}", serde_yaml::to_string(&Hass::crd())?);
    println!("---");
    print!("{}", serde_yaml::to_string(&DNS::crd())?);
    Ok(())
}
