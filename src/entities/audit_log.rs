//! Audit log entity - Record append-only delle azioni che modificano lo stato

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record persistito. `id` e `created_at` sono assegnati dallo store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub id: i64,
    /// `None` solo se la richiesta è arrivata all'handler senza principal
    pub user_id: Option<String>,
    pub action: String,
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub details: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Record da inserire (senza id e timestamp)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewAuditRecord {
    pub user_id: Option<String>,
    pub action: String,
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub details: Option<serde_json::Value>,
}

impl NewAuditRecord {
    pub fn into_record(self, id: i64, created_at: DateTime<Utc>) -> AuditRecord {
        AuditRecord {
            id,
            user_id: self.user_id,
            action: self.action,
            resource_type: self.resource_type,
            resource_id: self.resource_id,
            details: self.details,
            created_at,
        }
    }
}
