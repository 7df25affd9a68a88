//! Pages of a form.
//!
//! The backend names page attributes `id_pagina`, `index_version` and
//! `formulario`; [`Page`] accepts those and the normalized names alike and
//! always serializes the normalized ones.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::ApiError;
use crate::services::forms::{decode, form_path};
use crate::services::http::{ApiRequest, RequestOptions, Transport};
use crate::services::path::query_value;

const PAGES_PATH: &str = "/api/paginas/";
pub const UNEXPECTED_CREATE_REPLY: &str = "Respuesta inesperada de crear página";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(alias = "id_pagina")]
    pub id: String,
    #[serde(default)]
    pub secuencia: i64,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default, alias = "index_version")]
    pub index_version: Option<String>,
    #[serde(default, alias = "formulario")]
    pub formulario_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPage {
    pub title: String,
    pub description: String,
    /// Bump the form's index version. On unless set to `Some(false)`.
    pub bump: Option<bool>,
}

impl NewPage {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            bump: None,
        }
    }

    pub fn without_bump(mut self) -> Self {
        self.bump = Some(false);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddPageResponse {
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub version_bumpeada: bool,
    pub pagina: Page,
}

/// Lists pages, optionally only those of `form_id`.
///
/// The filter is sent to the backend and applied again to the reply, since
/// older backends ignore it. Pages that do not say which form they belong to
/// are kept.
pub async fn list_pages(
    transport: &dyn Transport,
    form_id: Option<&str>,
    options: RequestOptions,
) -> Result<Vec<Page>, ApiError> {
    let form_id = form_id.map(str::trim).filter(|id| !id.is_empty());
    let path = match form_id {
        Some(id) => format!("{}?formulario={}", PAGES_PATH, query_value(id)),
        None => PAGES_PATH.to_string(),
    };

    let response = transport.execute(ApiRequest::get(path).options(options)).await?;
    let mut pages: Vec<Page> = decode(response.body)?;

    if let Some(id) = form_id {
        let before = pages.len();
        pages.retain(|p| p.formulario_id.as_deref().map_or(true, |f| f == id));
        if pages.len() != before {
            debug!(form_id = id, dropped = before - pages.len(), "filtered pages of other forms");
        }
    }
    Ok(pages)
}

/// Appends a page to a form.
///
/// The backend answers either `{ detail, version, version_bumpeada, pagina }`
/// or the page fields at top level next to those keys. Both are returned in
/// the nested shape.
pub async fn create_page(
    transport: &dyn Transport,
    form_id: &str,
    page: &NewPage,
    options: RequestOptions,
) -> Result<AddPageResponse, ApiError> {
    let bump = if page.bump.unwrap_or(true) { 1 } else { 0 };
    let path = format!("{}agregar-pagina/?bump={}", form_path(form_id)?, bump);
    let body = json!({
        "nombre": page.title,
        "descripcion": page.description,
    });

    let response = transport
        .execute(ApiRequest::post(path, body).options(options))
        .await?;
    normalize_create_reply(response.body)
}

fn normalize_create_reply(body: Option<Value>) -> Result<AddPageResponse, ApiError> {
    let unexpected = || ApiError::UnexpectedResponse(UNEXPECTED_CREATE_REPLY.to_string());

    let Some(Value::Object(map)) = body else {
        return Err(unexpected());
    };

    if matches!(map.get("pagina"), Some(Value::Object(_))) {
        return serde_json::from_value(Value::Object(map)).map_err(|_| unexpected());
    }
    if !map.contains_key("id_pagina") && !map.contains_key("id") {
        return Err(unexpected());
    }

    let text = |m: &Map<String, Value>, key: &str| {
        m.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
    };
    let detail = text(&map, "detail");
    let version = text(&map, "version");
    let version_bumpeada = map.get("version_bumpeada").and_then(Value::as_bool).unwrap_or(false);
    let pagina = serde_json::from_value(Value::Object(map)).map_err(|_| unexpected())?;

    Ok(AddPageResponse {
        detail,
        version,
        version_bumpeada,
        pagina,
    })
}
