//! UserRepository - Repository per la gestione degli utenti

use super::UserStore;
use crate::dtos::CreateUserDTO;
use crate::entities::User;
use async_trait::async_trait;
use sqlx::{Error, MySqlPool};
use tokio::sync::Mutex;

pub struct UserRepository {
    connection_pool: MySqlPool,
}

impl UserRepository {
    pub fn new(connection_pool: MySqlPool) -> UserRepository {
        Self { connection_pool }
    }

    pub async fn read(&self, id: i64) -> Result<Option<User>, Error> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, email, password, role FROM users WHERE user_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl UserStore for UserRepository {
    /// considero l'email univoca
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, email, password, role FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(user)
    }

    async fn create(&self, data: &CreateUserDTO) -> Result<User, Error> {
        let result = sqlx::query("INSERT INTO users (email, password, role) VALUES (?, ?, ?)")
            .bind(&data.email)
            .bind(&data.password)
            .bind(&data.role)
            .execute(&self.connection_pool)
            .await?;

        let new_id = result.last_insert_id() as i64;

        Ok(User {
            user_id: new_id,
            email: data.email.clone(),
            password: data.password.clone(),
            role: data.role.clone(),
        })
    }

    async fn update_password(&self, user_id: i64, password_hash: &str) -> Result<(), Error> {
        let result = sqlx::query("UPDATE users SET password = ? WHERE user_id = ?")
            .bind(password_hash)
            .bind(user_id)
            .execute(&self.connection_pool)
            .await?;

        if result.rows_affected() == 0 {
            // MySQL non conta le righe invariate: ricontrolla l'esistenza
            if self.read(user_id).await?.is_none() {
                return Err(Error::RowNotFound);
            }
        }

        Ok(())
    }
}

/// User store in memoria, per test e sviluppo locale senza MySQL
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn users(&self) -> Vec<User> {
        self.users.lock().await.clone()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        let users = self.users.lock().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, data: &CreateUserDTO) -> Result<User, Error> {
        let mut users = self.users.lock().await;
        let user = User {
            user_id: users.len() as i64 + 1,
            email: data.email.clone(),
            password: data.password.clone(),
            role: data.role.clone(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn update_password(&self, user_id: i64, password_hash: &str) -> Result<(), Error> {
        let mut users = self.users.lock().await;
        let user = users
            .iter_mut()
            .find(|u| u.user_id == user_id)
            .ok_or(Error::RowNotFound)?;
        user.password = password_hash.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> CreateUserDTO {
        CreateUserDTO {
            email: email.to_string(),
            password: "hash".to_string(),
            role: "user".to_string(),
        }
    }

    #[tokio::test]
    async fn test_memory_store_assigns_sequential_ids() {
        let store = MemoryUserStore::new();
        let alice = store.create(&new_user("alice@example.com")).await.unwrap();
        let bob = store.create(&new_user("bob@example.com")).await.unwrap();

        assert_eq!(alice.user_id, 1);
        assert_eq!(bob.user_id, 2);
        assert_eq!(
            store.find_by_email("bob@example.com").await.unwrap().unwrap().user_id,
            2
        );
        assert!(store.find_by_email("carol@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_store_update_password() {
        let store = MemoryUserStore::new();
        let alice = store.create(&new_user("alice@example.com")).await.unwrap();

        store.update_password(alice.user_id, "new-hash").await.unwrap();
        assert_eq!(store.users().await[0].password, "new-hash");

        let missing = store.update_password(99, "x").await;
        assert!(matches!(missing, Err(Error::RowNotFound)));
    }
}
