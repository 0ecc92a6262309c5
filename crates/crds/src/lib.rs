//! Hass Operator CRD Definitions
//!
//! Kubernetes Custom Resource Definitions for the Hass operator.

pub mod dns;
pub mod hass;

pub use dns::*;
pub use hass::*;
