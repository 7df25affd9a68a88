use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::services::http::{ApiRequest, RequestOptions, Transport};
use crate::services::path::segment;
use crate::services::record::sanitize;

const FORMS_LITE_PATH: &str = "/api/formularios-lite/";
const FORMS_PATH: &str = "/api/formularios/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    pub id: Value,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub paginas: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewForm {
    pub nombre: String,
    pub descripcion: String,
}

pub const FORM_ID_REQUIRED: &str = "id de formulario es requerido";

pub(crate) fn form_path(id: &str) -> Result<String, ApiError> {
    Ok(format!("{}{}/", FORMS_PATH, segment(id, FORM_ID_REQUIRED)?))
}

pub(crate) fn decode<T: DeserializeOwned>(body: Option<Value>) -> Result<T, ApiError> {
    let body = body.ok_or(ApiError::EmptyResponse)?;
    Ok(serde_json::from_value(body)?)
}

pub async fn list_forms(transport: &dyn Transport, options: RequestOptions) -> Result<Vec<Form>, ApiError> {
    let response = transport
        .execute(ApiRequest::get(FORMS_LITE_PATH).options(options))
        .await?;
    decode(response.body)
}

pub async fn get_form(transport: &dyn Transport, id: &str, options: RequestOptions) -> Result<Form, ApiError> {
    let response = transport
        .execute(ApiRequest::get(form_path(id)?).options(options))
        .await?;
    decode(response.body)
}

pub async fn create_form(transport: &dyn Transport, form: &NewForm, options: RequestOptions) -> Result<Form, ApiError> {
    let response = transport
        .execute(ApiRequest::post(FORMS_PATH, sanitize(form)?).options(options))
        .await?;
    decode(response.body)
}

pub async fn delete_form(transport: &dyn Transport, id: &str, options: RequestOptions) -> Result<(), ApiError> {
    transport
        .execute(ApiRequest::delete(form_path(id)?).options(options))
        .await?;
    Ok(())
}

/// Copies a form with all its pages. The copy is returned.
pub async fn duplicate_form(transport: &dyn Transport, id: &str, options: RequestOptions) -> Result<Form, ApiError> {
    let path = format!("{}duplicar/", form_path(id)?);
    let response = transport
        .execute(ApiRequest::post(path, json!({})).options(options))
        .await?;
    decode(response.body)
}

