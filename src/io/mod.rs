//! Instance input and JSON interchange.
//!
//! - [`parse_instance`] / [`load_instance`] — plain-text benchmark format
//! - [`instance_from_json`] / [`instance_to_json`] — serde JSON form
//!
//! Every loader goes through [`Instance::from_rows`], so a loaded instance
//! always satisfies the shape invariants.

mod text;

pub use text::{load_instance, parse_instance};

use crate::models::{Instance, InstanceError};

/// Parses an instance from JSON.
///
/// The JSON form has the fields `processing`, `setup` and `delay`, the two
/// matrices as arrays of rows.
///
/// # Examples
///
/// ```
/// use u_sequencing::io::{instance_from_json, instance_to_json};
///
/// let json = r#"{"processing":[1.0,2.0],"setup":[[0.0,1.0],[1.0,0.0]],"delay":[[-1.0,0.0],[-1.0,-1.0]]}"#;
/// let inst = instance_from_json(json).unwrap();
/// assert_eq!(inst.delay(0, 1), Some(0.0));
///
/// let back = instance_from_json(&instance_to_json(&inst).unwrap()).unwrap();
/// assert_eq!(back.processing_times(), inst.processing_times());
/// ```
pub fn instance_from_json(json: &str) -> Result<Instance, InstanceError> {
    serde_json::from_str(json).map_err(|e| InstanceError::Parse {
        line: e.line(),
        message: e.to_string(),
    })
}

/// Serializes an instance to pretty-printed JSON.
pub fn instance_to_json(instance: &Instance) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(instance)
}
