//! Owned message types exchanged with the polish worker thread.

use polish_core::{FieldType, PolishError};
use serde::{Deserialize, Serialize};

/// A request to polish one field, sent from the UI to the worker.
#[derive(Debug, Clone)]
pub struct PolishRequest {
    pub field: FieldType,
    /// Snapshot of the field text at the time the request was made.
    pub text: String,
}

/// The worker's reply to one [`PolishRequest`].
#[derive(Debug)]
pub struct PolishResponse {
    pub field: FieldType,
    /// The same snapshot that was sent; segments are built against it.
    pub original: String,
    pub result: Result<String, PolishError>,
}

/// JSON body of `POST /api/ai/polish`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolishBody<'a> {
    pub text: &'a str,
    pub field_type: &'static str,
}

/// JSON reply of `POST /api/ai/polish`.
#[derive(Debug, Deserialize)]
pub struct PolishReply {
    pub success: bool,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
