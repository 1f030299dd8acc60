//! Audit recorder - Registrazione best-effort delle azioni che modificano lo stato
//!
//! Il recorder decora una singola route. Per ogni risposta 2xx accoda esattamente
//! un record nello [`AuditStore`]; la scrittura gira in un task tokio separato che
//! la risposta non attende mai. Il task è un dominio di errore isolato: se lo store
//! fallisce l'errore viene loggato e scartato, senza retry.

use crate::core::auth::Principal;
use crate::entities::NewAuditRecord;
use crate::repositories::AuditStore;
use axum::{
    body::{Body, to_bytes},
    extract::{FromRequestParts, OriginalUri, RawPathParams, Request, State},
    http::{Method, StatusCode, header, request::Parts, response},
    middleware::Next,
    response::Response,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

/// Nome del path parameter usato come resource id
pub const RESOURCE_ID_PARAM: &str = "id";

/// Audit recorder for one route, labelled with a fixed `(action, resource_type)`
#[derive(Clone)]
pub struct AuditRecorder {
    store: Arc<dyn AuditStore>,
    action: &'static str,
    resource_type: &'static str,
}

/// What the recorder needs from the request, captured before the handler runs
#[derive(Debug, Clone)]
pub struct RequestSnapshot {
    pub principal: Option<Principal>,
    pub path_id: Option<String>,
    pub method: Method,
    pub path: String,
}

impl RequestSnapshot {
    pub async fn capture(parts: &mut Parts) -> Self {
        let principal = parts.extensions.get::<Principal>().cloned();

        let path_id = RawPathParams::from_request_parts(parts, &())
            .await
            .ok()
            .and_then(|params| {
                params
                    .iter()
                    .find(|(key, _)| *key == RESOURCE_ID_PARAM)
                    .map(|(_, value)| value.to_string())
            });

        // dentro un router annidato uri() ha il prefisso rimosso
        let path = parts
            .extensions
            .get::<OriginalUri>()
            .map(|uri| uri.path().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());

        Self {
            principal,
            path_id,
            method: parts.method.clone(),
            path,
        }
    }
}

impl AuditRecorder {
    pub fn new(store: Arc<dyn AuditStore>, action: &'static str, resource_type: &'static str) -> Self {
        Self {
            store,
            action,
            resource_type,
        }
    }

    pub fn action(&self) -> &'static str {
        self.action
    }

    pub fn resource_type(&self) -> &'static str {
        self.resource_type
    }

    /// Osserva l'esito di una richiesta e, se 2xx, lancia la scrittura dell'audit.
    ///
    /// Ritorna l'handle del task lanciato, `None` se nulla è stato lanciato.
    /// Il chiamante non è tenuto ad attenderlo.
    pub fn record(
        &self,
        snapshot: RequestSnapshot,
        status: StatusCode,
        payload: Option<&Value>,
    ) -> Option<JoinHandle<()>> {
        if !status.is_success() {
            debug!("Status {} is not a success, skipping audit", status);
            return None;
        }

        let record = NewAuditRecord {
            user_id: snapshot.principal.map(|p| p.user_id),
            action: self.action.to_string(),
            resource_type: self.resource_type.to_string(),
            resource_id: resolve_resource_id(snapshot.path_id, payload),
            details: Some(json!({
                "method": snapshot.method.as_str(),
                "path": snapshot.path,
                "status": status.as_u16(),
            })),
        };

        Some(tokio::spawn(dispatch(Arc::clone(&self.store), record)))
    }
}

async fn dispatch(store: Arc<dyn AuditStore>, record: NewAuditRecord) {
    let (action, resource_type) = (record.action.clone(), record.resource_type.clone());
    match store.insert(record).await {
        Ok(stored) => {
            info!(
                audit_id = stored.id,
                action = %stored.action,
                resource_type = %stored.resource_type,
                "Audit record stored"
            );
        }
        Err(e) => {
            error!(
                error = %e,
                action = %action,
                resource_type = %resource_type,
                "Failed to store audit record"
            );
        }
    }
}

/// Path param `id`, poi campo `id` del payload, altrimenti `None`.
/// Gli id numerici del payload sono resi in decimale, altri tipi ignorati.
pub fn resolve_resource_id(path_id: Option<String>, payload: Option<&Value>) -> Option<String> {
    path_id.or_else(|| {
        match payload?.get(RESOURCE_ID_PARAM)? {
            Value::String(id) => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    })
}

/// Middleware di audit, da applicare alla singola route con
/// `middleware::from_fn_with_state(recorder, audit_middleware)`.
///
/// La risposta esce con status, header e body invariati.
#[instrument(skip_all)]
pub async fn audit_middleware(
    State(recorder): State<AuditRecorder>,
    req: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();
    let snapshot = RequestSnapshot::capture(&mut parts).await;

    let response = next.run(Request::from_parts(parts, body)).await;
    if !response.status().is_success() {
        debug!(
            "{} {} returned {}, no audit record",
            recorder.action(),
            recorder.resource_type(),
            response.status()
        );
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Failed to buffer response body for audit: {}", e);
            return without_body(parts);
        }
    };

    let payload = serde_json::from_slice::<Value>(&bytes).ok();
    recorder.record(snapshot, parts.status, payload.as_ref());

    Response::from_parts(parts, Body::from(bytes))
}

/// Risposta con body vuoto: il Content-Length originale non varrebbe più
fn without_body(mut parts: response::Parts) -> Response {
    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::AuditRecord;
    use crate::repositories::MemoryAuditStore;
    use async_trait::async_trait;

    struct FailingStore;

    #[async_trait]
    impl AuditStore for FailingStore {
        async fn insert(&self, _record: NewAuditRecord) -> Result<AuditRecord, sqlx::Error> {
            Err(sqlx::Error::PoolTimedOut)
        }
    }

    fn snapshot(principal: Option<&str>, path_id: Option<&str>) -> RequestSnapshot {
        RequestSnapshot {
            principal: principal.map(|id| Principal {
                user_id: id.to_string(),
                role: "user".to_string(),
            }),
            path_id: path_id.map(str::to_string),
            method: Method::PUT,
            path: "/documents/42".to_string(),
        }
    }

    #[test]
    fn test_resolve_prefers_path_param() {
        let payload = json!({ "id": 7 });
        assert_eq!(
            resolve_resource_id(Some("42".to_string()), Some(&payload)),
            Some("42".to_string())
        );
    }

    #[test]
    fn test_resolve_falls_back_to_payload_id() {
        assert_eq!(
            resolve_resource_id(None, Some(&json!({ "id": 42, "title": "x" }))),
            Some("42".to_string())
        );
        assert_eq!(
            resolve_resource_id(None, Some(&json!({ "id": "abc" }))),
            Some("abc".to_string())
        );
    }

    #[test]
    fn test_resolve_without_any_id_is_none() {
        assert_eq!(resolve_resource_id(None, None), None);
        assert_eq!(resolve_resource_id(None, Some(&json!({ "title": "x" }))), None);
        assert_eq!(resolve_resource_id(None, Some(&json!([1, 2, 3]))), None);
        assert_eq!(resolve_resource_id(None, Some(&json!({ "id": null }))), None);
        assert_eq!(resolve_resource_id(None, Some(&json!({ "id": { "n": 1 } }))), None);
    }

    #[tokio::test]
    async fn test_record_success_appends_one_record() {
        let store = MemoryAuditStore::new();
        let recorder = AuditRecorder::new(Arc::new(store.clone()), "update", "document");

        let handle = recorder
            .record(
                snapshot(Some("5"), Some("42")),
                StatusCode::OK,
                Some(&json!({ "id": 42, "title": "x" })),
            )
            .expect("a 200 must dispatch an audit write");
        handle.await.unwrap();

        let records = store.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_id.as_deref(), Some("5"));
        assert_eq!(records[0].action, "update");
        assert_eq!(records[0].resource_type, "document");
        assert_eq!(records[0].resource_id.as_deref(), Some("42"));
        assert_eq!(
            records[0].details,
            Some(json!({ "method": "PUT", "path": "/documents/42", "status": 200 }))
        );
    }

    #[tokio::test]
    async fn test_record_outside_success_range_dispatches_nothing() {
        let store = MemoryAuditStore::new();
        let recorder = AuditRecorder::new(Arc::new(store.clone()), "update", "document");

        for status in [
            StatusCode::CONTINUE,
            StatusCode::MULTIPLE_CHOICES,
            StatusCode::NOT_FOUND,
            StatusCode::INTERNAL_SERVER_ERROR,
        ] {
            assert!(recorder.record(snapshot(Some("5"), None), status, None).is_none());
        }
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_record_success_range_bounds() {
        let store = MemoryAuditStore::new();
        let recorder = AuditRecorder::new(Arc::new(store.clone()), "create", "document");

        for code in [200u16, 204, 299] {
            let status = StatusCode::from_u16(code).unwrap();
            recorder
                .record(snapshot(None, None), status, None)
                .unwrap()
                .await
                .unwrap();
        }
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn test_store_failure_is_swallowed() {
        let recorder = AuditRecorder::new(Arc::new(FailingStore), "delete", "document");

        let handle = recorder
            .record(snapshot(Some("5"), Some("1")), StatusCode::OK, None)
            .unwrap();

        // il task termina normalmente: nessun panic, nessun errore propagato
        assert!(handle.await.is_ok());
    }

    #[tokio::test]
    async fn test_anonymous_request_records_null_user() {
        let store = MemoryAuditStore::new();
        let recorder = AuditRecorder::new(Arc::new(store.clone()), "create", "feedback");

        recorder
            .record(snapshot(None, None), StatusCode::CREATED, Some(&json!({ "id": "abc" })))
            .unwrap()
            .await
            .unwrap();

        let records = store.records().await;
        assert_eq!(records[0].user_id, None);
        assert_eq!(records[0].resource_id.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_without_body_drops_stale_content_length() {
        let (parts, ()) = axum::http::Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_LENGTH, "42")
            .header("x-document-version", "3")
            .body(())
            .unwrap()
            .into_parts();

        let response = without_body(parts);

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::CONTENT_LENGTH).is_none());
        assert_eq!(response.headers()["x-document-version"], "3");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }
}
