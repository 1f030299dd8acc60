//! AuditRepository - Append-only store per gli audit log

use super::AuditStore;
use crate::entities::{AuditRecord, NewAuditRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Error, MySqlPool};
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct AuditRepository {
    connection_pool: MySqlPool,
}

impl AuditRepository {
    pub fn new(connection_pool: MySqlPool) -> AuditRepository {
        Self { connection_pool }
    }
}

#[async_trait]
impl AuditStore for AuditRepository {
    async fn insert(&self, record: NewAuditRecord) -> Result<AuditRecord, Error> {
        // details salvato come testo JSON
        let details = record
            .details
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| Error::Encode(Box::new(e)))?;

        let result = sqlx::query(
            "INSERT INTO audit_logs (user_id, action, resource_type, resource_id, details) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&record.user_id)
        .bind(&record.action)
        .bind(&record.resource_type)
        .bind(&record.resource_id)
        .bind(details)
        .execute(&self.connection_pool)
        .await?;

        let id = result.last_insert_id() as i64;

        let created_at: DateTime<Utc> =
            sqlx::query_scalar("SELECT created_at FROM audit_logs WHERE id = ?")
                .bind(id)
                .fetch_one(&self.connection_pool)
                .await?;

        Ok(record.into_record(id, created_at))
    }
}

/// Audit store in memoria. I cloni condividono gli stessi record.
#[derive(Default, Clone)]
pub struct MemoryAuditStore {
    records: Arc<Mutex<Vec<AuditRecord>>>,
}

impl MemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot dei record in ordine di inserimento
    pub async fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn insert(&self, record: NewAuditRecord) -> Result<AuditRecord, Error> {
        let mut records = self.records.lock().await;
        let stored = record.into_record(records.len() as i64 + 1, Utc::now());
        records.push(stored.clone());
        Ok(stored)
    }
}
