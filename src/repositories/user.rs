//! UserRepository - Repository MySQL per la gestione degli utenti

use super::{Create, Delete, Read, StoreError, UserStore};
use crate::dtos::CreateUserDTO;
use crate::entities::{Role, User};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::mysql::MySqlRow;
use sqlx::{Error, MySqlPool, Row};

const USER_COLUMNS: &str = "id, name, email, password, role, created_at";

// USER REPO
pub struct UserRepository {
    connection_pool: MySqlPool,
}

impl UserRepository {
    pub fn new(connection_pool: MySqlPool) -> UserRepository {
        Self { connection_pool }
    }
}

pub(super) fn user_from_row(row: &MySqlRow) -> Result<User, Error> {
    let role: String = row.try_get("role")?;
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password: row.try_get("password")?,
        role: Role::try_from(role).map_err(|e| Error::Decode(e.into()))?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl Create<User, CreateUserDTO> for UserRepository {
    /// Inserts the user and, for the COMPANY role, its blank profile in one transaction
    async fn create(&self, data: &CreateUserDTO) -> Result<User, StoreError> {
        let now = Utc::now();
        let mut tx = self.connection_pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO users (name, email, password, role, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.password)
        .bind(data.role.as_str())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let new_id = result.last_insert_id() as i32;

        if data.role == Role::Company {
            sqlx::query("INSERT INTO companies (user_id, name, created_at) VALUES (?, ?, ?)")
                .bind(new_id)
                .bind(&data.name)
                .bind(now)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(User {
            id: new_id,
            name: data.name.clone(),
            email: data.email.clone(),
            password: data.password.clone(),
            role: data.role,
            created_at: now,
        })
    }
}

#[async_trait]
impl Read<User, i32> for UserRepository {
    async fn read(&self, id: &i32) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await?;

        Ok(row.as_ref().map(user_from_row).transpose()?)
    }
}

#[async_trait]
impl Delete<User, i32> for UserRepository {
    /// Hard delete; ON DELETE CASCADE removes profile, offers and applications
    async fn delete(&self, id: &i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserStore for UserRepository {
    /// considero l'email univoca
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.connection_pool)
            .await?;

        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
            .fetch_all(&self.connection_pool)
            .await?;

        Ok(rows.iter().map(user_from_row).collect::<Result<_, _>>()?)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.connection_pool)
            .await?;

        Ok(count)
    }
}
