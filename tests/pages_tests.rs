mod common;

use common::{transport_error, ScriptedTransport, Step};
use formadmin::services::http::RequestOptions;
use formadmin::services::pages::{create_page, list_pages, NewPage, UNEXPECTED_CREATE_REPLY};
use formadmin::ApiError;
use reqwest::Method;
use serde_json::json;
use tokio_util::sync::CancellationToken;

fn backend_pages() -> serde_json::Value {
    json!([
        { "id_pagina": "page-1", "secuencia": 1, "nombre": "Datos", "descripcion": "",
          "index_version": "v2", "formulario": "form-123" },
        { "id_pagina": "page-2", "secuencia": 1, "nombre": "Otra", "descripcion": "",
          "index_version": "v1", "formulario": "form-999" },
        { "id_pagina": "page-3", "secuencia": 2, "nombre": "Sin formulario" }
    ])
}

#[tokio::test]
async fn test_list_renames_backend_attributes() {
    let transport = ScriptedTransport::new([Step::Reply(Some(backend_pages()))]);

    let pages = list_pages(&transport, None, RequestOptions::default()).await.unwrap();

    assert_eq!(pages.len(), 3);
    assert_eq!(pages[0].id, "page-1");
    assert_eq!(pages[0].index_version.as_deref(), Some("v2"));
    assert_eq!(pages[0].formulario_id.as_deref(), Some("form-123"));
    assert_eq!(pages[2].formulario_id, None);

    let calls = transport.calls();
    assert_eq!(calls[0].method, Method::GET);
    assert_eq!(calls[0].path, "/api/paginas/");

    let out = serde_json::to_value(&pages[0]).unwrap();
    assert_eq!(out["indexVersion"], "v2");
    assert_eq!(out["formularioId"], "form-123");
}

#[tokio::test]
async fn test_list_for_a_form_drops_other_forms_pages() {
    let transport = ScriptedTransport::new([Step::Reply(Some(backend_pages()))]);

    let pages = list_pages(&transport, Some("form-123"), RequestOptions::default())
        .await
        .unwrap();

    let ids: Vec<&str> = pages.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["page-1", "page-3"]);
    assert_eq!(transport.calls()[0].path, "/api/paginas/?formulario=form-123");
}

#[tokio::test]
async fn test_blank_form_filter_lists_everything() {
    let transport = ScriptedTransport::new([Step::Reply(Some(backend_pages()))]);
    let pages = list_pages(&transport, Some("  "), RequestOptions::default()).await.unwrap();
    assert_eq!(pages.len(), 3);
    assert_eq!(transport.calls()[0].path, "/api/paginas/");
}

#[tokio::test]
async fn test_create_bumps_version_by_default() {
    let transport = ScriptedTransport::new([Step::Reply(Some(json!({
        "detail": "Página creada",
        "version": "v3",
        "version_bumpeada": true,
        "pagina": { "id_pagina": "page-123", "secuencia": 3, "nombre": "Nueva", "descripcion": "Desc" }
    })))]);

    let reply = create_page(&transport, "form-123", &NewPage::new("Nueva", "Desc"), RequestOptions::default())
        .await
        .unwrap();

    assert!(reply.version_bumpeada);
    assert_eq!(reply.version, "v3");
    assert_eq!(reply.pagina.id, "page-123");
    assert_eq!(reply.pagina.secuencia, 3);

    let calls = transport.calls();
    assert_eq!(calls[0].method, Method::POST);
    assert_eq!(calls[0].path, "/api/formularios/form-123/agregar-pagina/?bump=1");
    assert_eq!(calls[0].body, Some(json!({ "nombre": "Nueva", "descripcion": "Desc" })));
}

#[tokio::test]
async fn test_create_without_bump_sends_zero() {
    let transport = ScriptedTransport::new([Step::Reply(Some(json!({
        "pagina": { "id_pagina": "page-9", "nombre": "Nueva" }
    })))]);

    let page = NewPage::new("Nueva", "").without_bump();
    let reply = create_page(&transport, "form-123", &page, RequestOptions::default())
        .await
        .unwrap();

    assert!(!reply.version_bumpeada);
    assert_eq!(transport.calls()[0].path, "/api/formularios/form-123/agregar-pagina/?bump=0");
}

#[tokio::test]
async fn test_flat_create_reply_is_nested() {
    let transport = ScriptedTransport::new([Step::Reply(Some(json!({
        "id_pagina": "page-123",
        "secuencia": 1,
        "nombre": "Nueva",
        "descripcion": "Desc",
        "detail": "ok",
        "version": "v4",
        "version_bumpeada": true
    })))]);

    let reply = create_page(&transport, "form-123", &NewPage::new("Nueva", "Desc"), RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(reply.pagina.id, "page-123");
    assert_eq!(reply.pagina.nombre, "Nueva");
    assert_eq!(reply.detail, "ok");
    assert_eq!(reply.version, "v4");
    assert!(reply.version_bumpeada);
}

#[tokio::test]
async fn test_unexpected_create_reply_is_rejected() {
    for body in [Some(json!({ "detail": "ok" })), Some(json!("creada")), None] {
        let transport = ScriptedTransport::new([Step::Reply(body)]);
        let err = create_page(&transport, "form-123", &NewPage::new("Nueva", ""), RequestOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(&err, ApiError::UnexpectedResponse(_)));
        assert_eq!(err.to_string(), UNEXPECTED_CREATE_REPLY);
    }
}

#[tokio::test]
async fn test_create_needs_a_form_id() {
    let transport = ScriptedTransport::default();
    let err = create_page(&transport, "", &NewPage::new("Nueva", ""), RequestOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_list_error_propagates() {
    let transport = ScriptedTransport::new([transport_error("Network Error")]);
    let err = list_pages(&transport, None, RequestOptions::default()).await.unwrap_err();
    assert_eq!(err.to_string(), "Network Error");
}

#[tokio::test]
async fn test_cancel_token_reaches_the_request() {
    let token = CancellationToken::new();
    let transport = ScriptedTransport::new([Step::Reply(Some(json!([])))]);

    list_pages(&transport, Some("form-123"), RequestOptions::with_cancel(token.clone()))
        .await
        .unwrap();

    token.cancel();
    assert!(transport.calls()[0].options.is_cancelled());
}
