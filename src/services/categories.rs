use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;
use crate::services::forms::decode;
use crate::services::http::{ApiRequest, RequestOptions, Transport};
use crate::services::path::segment;
use crate::services::record::sanitize;

const CATEGORIES_PATH: &str = "/api/categorias/";
pub const CATEGORY_ID_REQUIRED: &str = "id de categoría es requerido";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Value,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    pub nombre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
}

/// Partial update. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
}

fn category_path(id: &str) -> Result<String, ApiError> {
    Ok(format!("{}{}/", CATEGORIES_PATH, segment(id, CATEGORY_ID_REQUIRED)?))
}

pub async fn list_categories(transport: &dyn Transport, options: RequestOptions) -> Result<Vec<Category>, ApiError> {
    let response = transport
        .execute(ApiRequest::get(CATEGORIES_PATH).options(options))
        .await?;
    decode(response.body)
}

/// Fetches one category. A 404 is `Ok(None)`, not an error.
pub async fn get_category(
    transport: &dyn Transport,
    id: &str,
    options: RequestOptions,
) -> Result<Option<Category>, ApiError> {
    match transport
        .execute(ApiRequest::get(category_path(id)?).options(options))
        .await
    {
        Ok(response) => decode(response.body).map(Some),
        Err(ApiError::Status { status: 404, .. }) => {
            debug!(id, "category not found");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

pub async fn create_category(
    transport: &dyn Transport,
    category: &NewCategory,
    options: RequestOptions,
) -> Result<Category, ApiError> {
    let response = transport
        .execute(ApiRequest::post(CATEGORIES_PATH, sanitize(category)?).options(options))
        .await?;
    decode(response.body)
}

pub async fn update_category(
    transport: &dyn Transport,
    id: &str,
    changes: &CategoryUpdate,
    options: RequestOptions,
) -> Result<Category, ApiError> {
    let response = transport
        .execute(ApiRequest::patch(category_path(id)?, sanitize(changes)?).options(options))
        .await?;
    decode(response.body)
}

pub async fn delete_category(transport: &dyn Transport, id: &str, options: RequestOptions) -> Result<(), ApiError> {
    transport
        .execute(ApiRequest::delete(category_path(id)?).options(options))
        .await?;
    Ok(())
}
