use crate::core::AppError;
use crate::core::token::{TokenAuthority, TokenError};
use axum::extract::State;
use axum::{body::Body, extract::Request, http, http::Response, middleware::Next};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Identità autenticata allegata alla richiesta dal middleware di autenticazione.
/// Vive solo per la durata della richiesta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub user_id: String,
    pub role: String,
}

/// Estrae il token da un header `<scheme> <token>`.
/// Un header senza seconda parte equivale a nessun token.
pub fn extract_token(header_value: &str) -> Option<&str> {
    let mut parts = header_value.split_whitespace();
    let (_scheme, token) = (parts.next(), parts.next());
    token
}

/// Middleware "no principal, no access".
///
/// - header assente o senza token -> 401 `Access token required`
/// - token non valido o scaduto -> 403 `Invalid or expired token`
/// - token valido -> `Principal` inserito nelle extensions, la pipeline prosegue
#[instrument(skip(authority, req, next), fields(path = %req.uri().path()))]
pub async fn authentication_middleware(
    State(authority): State<TokenAuthority>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running authentication middleware");
    let token = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(extract_token);

    let Some(token) = token else {
        warn!("Missing or empty authorization header");
        return Err(AppError::unauthorized("Access token required"));
    };

    let principal = match authority.verify(token) {
        Ok(principal) => principal,
        Err(TokenError::Expired) => {
            warn!("Rejected expired token");
            return Err(AppError::forbidden("Invalid or expired token"));
        }
        Err(e) => {
            warn!("Rejected invalid token: {}", e);
            return Err(AppError::forbidden("Invalid or expired token"));
        }
    };

    info!("User authenticated: {}", principal.user_id);
    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}
