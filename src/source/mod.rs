//! Retrieval of raw dashboard documents.
//!
//! The comparison core only consumes JSON. This module is the seam to where
//! that JSON comes from: a dashboard service environment over HTTP
//! ([`HttpSource`]) or a saved `.dash`/`.json` export on disk
//! ([`load_from_file`]). Any [`DashboardSource`] works with
//! [`load_dashboard`], which applies the retrieval rules:
//!
//! 1. fetch the dashboard document; if found, replace its `widgets` with the
//!    widget list (empty when that call fails),
//! 2. otherwise fall back to the dashboard export document,
//! 3. otherwise the dashboard is reported as not found.

pub mod file;
pub mod http;
pub mod input;

pub use file::{load_from_bytes, load_from_file};
pub use http::{HttpSource, ServiceEndpoints};
pub use input::DashboardInput;

use crate::core::{Error, Result};
use serde_json::Value;

/// Access to one dashboard service environment.
pub trait DashboardSource {
    /// Environment name, used in error messages and column labels.
    fn environment(&self) -> &str;

    /// The dashboard document, or `None` when the service reports it missing.
    fn fetch_dashboard(&self, id: &str) -> Result<Option<Value>>;

    /// The dashboard's widget documents.
    fn fetch_widgets(&self, id: &str) -> Result<Vec<Value>>;

    /// The self-contained export document, or `None` when unavailable.
    fn fetch_export(&self, _id: &str) -> Result<Option<Value>> {
        Ok(None)
    }
}

/// Fetch a dashboard with its widgets attached, falling back to the export document.
///
/// The export is tried whenever the dashboard request does not yield a
/// document, whether it answered not-found or failed. When the export is
/// unavailable too, a failure of the dashboard request is reported as is.
pub fn load_dashboard<S: DashboardSource + ?Sized>(source: &S, id: &str) -> Result<Value> {
    let failure = match source.fetch_dashboard(id) {
        Ok(Some(mut dashboard)) => {
            let widgets = source.fetch_widgets(id).unwrap_or_else(|e| {
                log::warn!(
                    "Failed to fetch widgets of dashboard {id} from {}: {e}. Continuing without widgets",
                    source.environment()
                );
                Vec::new()
            });
            attach_widgets(&mut dashboard, widgets);
            return Ok(dashboard);
        }
        Ok(None) => {
            log::info!(
                "Dashboard {id} not found in {}; trying export",
                source.environment()
            );
            None
        }
        Err(e) => {
            log::warn!(
                "Failed to fetch dashboard {id} from {}: {e}; trying export",
                source.environment()
            );
            Some(e)
        }
    };

    match (source.fetch_export(id), failure) {
        (Ok(Some(export)), _) => Ok(export),
        (_, Some(e)) => Err(e),
        (Ok(None), None) => Err(Error::DashboardNotFound {
            dashboard: id.to_string(),
            environment: source.environment().to_string(),
        }),
        (Err(e), None) => Err(e),
    }
}

/// Replace the document's `widgets` field. Non-object documents are left untouched.
pub fn attach_widgets(dashboard: &mut Value, widgets: Vec<Value>) {
    if let Some(object) = dashboard.as_object_mut() {
        object.insert("widgets".to_string(), Value::Array(widgets));
    }
}

/// Normalize a widgets response: a bare array, or the array under `widgets`.
pub fn widgets_from_response(response: Value) -> Vec<Value> {
    match response {
        Value::Array(widgets) => widgets,
        Value::Object(mut object) => match object.remove("widgets") {
            Some(Value::Array(widgets)) => widgets,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}
