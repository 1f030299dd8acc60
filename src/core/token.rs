//! Token authority - Emissione e verifica dei token di sessione firmati (HS256)

use crate::core::auth::Principal;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, error, instrument};

/// Durata di validità di un token, fissata al momento dell'emissione
pub const TOKEN_VALIDITY_DAYS: i64 = 7;

/// Claims embedded in every session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: String,
    pub role: String,
    pub iat: i64, // Issued at
    pub exp: i64, // Expiry
}

#[derive(Debug, Error)]
pub enum TokenError {
    /// Firma non valida oppure token malformato
    #[error("invalid token")]
    Invalid,

    /// Firma valida ma token scaduto
    #[error("token expired")]
    Expired,

    #[error("failed to encode token: {0}")]
    Encoding(String),
}

/// Signs and verifies session tokens with a symmetric secret.
///
/// The secret is handed in at construction; nothing here reads the
/// environment.
#[derive(Clone)]
pub struct TokenAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    validity: Duration,
}

impl TokenAuthority {
    pub fn new(secret: &str) -> Self {
        Self::with_validity(secret, Duration::days(TOKEN_VALIDITY_DAYS))
    }

    pub fn with_validity(secret: &str, validity: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            validity,
        }
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Emette un token per `(user_id, role)` valido da adesso
    pub fn issue(&self, user_id: &str, role: &str) -> Result<String, TokenError> {
        self.issue_at(user_id, role, Utc::now())
    }

    /// Emette un token con istante di emissione esplicito.
    ///
    /// A parità di input, istante e segreto il risultato è identico bit per bit.
    #[instrument(skip(self), fields(user_id = %user_id, role = %role))]
    pub fn issue_at(
        &self,
        user_id: &str,
        role: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        debug!("Encoding session token");
        let claims = Claims {
            user_id: user_id.to_string(),
            role: role.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.validity).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            error!("Failed to encode session token: {:?}", e);
            TokenError::Encoding(e.to_string())
        })
    }

    /// Verifica firma e scadenza, restituendo il principal contenuto nel token
    #[instrument(skip_all)]
    pub fn verify(&self, token: &str) -> Result<Principal, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| {
                debug!("Session token verified for user {}", data.claims.user_id);
                Principal {
                    user_id: data.claims.user_id,
                    role: data.claims.role,
                }
            })
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

impl fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("secret", &"***")
            .field("validity", &self.validity)
            .finish()
    }
}
