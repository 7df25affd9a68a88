use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::{failure_message, ApiError};
use crate::services::batch::{drive, BatchOptions};
use crate::services::http::{ApiRequest, RequestOptions, Transport};
use crate::services::outcome::{AssignmentFailure, AssignmentOutcome, AssignmentSuccess};
use crate::services::record::sanitize;

pub const ASSIGNMENT_PATH: &str = "/api/asignaciones/crear-asignacion/";

/// Key under which the recipient is merged into each fan-out payload.
pub const RECIPIENT_KEY: &str = "usuario";

/// Assigns a set of forms to one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRequest {
    pub usuario: String,
    pub formularios: Vec<String>,
    /// When true the backend drops the user's previous assignments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace: Option<bool>,
}

/// Shared part of a fan-out: everything but the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignmentTemplate {
    pub formularios: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace: Option<bool>,
}

pub async fn create_assignment(
    transport: &dyn Transport,
    request: &AssignmentRequest,
    options: RequestOptions,
) -> Result<Option<Value>, ApiError> {
    let body = sanitize(request)?;
    let response = transport
        .execute(ApiRequest::post(ASSIGNMENT_PATH, body).options(options))
        .await?;
    Ok(response.body)
}

fn template_object<P: Serialize + ?Sized>(template: &P) -> Result<Map<String, Value>, ApiError> {
    match sanitize(template)? {
        Value::Object(map) => Ok(map),
        other => Err(ApiError::validation(format!(
            "assignment template must be a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Issues one assignment request per recipient.
///
/// Each request carries the template's fields plus `usuario`. A failing
/// recipient does not stop the others; results come back keyed by recipient
/// in the order given.
pub async fn assign_to_many<P: Serialize + ?Sized>(
    transport: &dyn Transport,
    recipients: &[String],
    template: &P,
    options: &BatchOptions,
) -> Result<AssignmentOutcome, ApiError> {
    let base = template_object(template)?;

    let mut outcome = AssignmentOutcome::default();
    if recipients.is_empty() {
        return Ok(outcome);
    }

    debug!(count = recipients.len(), dispatch = ?options.dispatch, "fanning out assignments");

    let results = drive(recipients.iter(), options, |recipient, opts| {
        let mut body = base.clone();
        body.insert(RECIPIENT_KEY.to_string(), Value::String(recipient.clone()));
        let request = ApiRequest::post(ASSIGNMENT_PATH, Value::Object(body)).options(opts);
        async move { transport.execute(request).await.map(|r| r.body) }
    })
    .await?;

    for (recipient, result) in recipients.iter().zip(results) {
        match result {
            Ok(data) => outcome.ok.push(AssignmentSuccess {
                recipient: recipient.clone(),
                data,
            }),
            Err(e) => {
                let message = failure_message(&e);
                warn!(recipient = %recipient, error = %message, "assignment failed");
                outcome.errors.push(AssignmentFailure {
                    recipient: recipient.clone(),
                    message,
                });
            }
        }
    }

    info!(
        ok = outcome.ok.len(),
        failed = outcome.errors.len(),
        "assignment fan-out finished"
    );
    Ok(outcome)
}

/// Assigns the same forms to every user in `users`.
pub async fn assign_forms_to_users(
    transport: &dyn Transport,
    users: &[String],
    forms: &[String],
    options: &BatchOptions,
) -> Result<AssignmentOutcome, ApiError> {
    let template = AssignmentTemplate {
        formularios: forms.to_vec(),
        replace: None,
    };
    assign_to_many(transport, users, &template, options).await
}
