//! CompanyRepository - Repository MySQL per i profili aziendali

use super::{CompanyStore, Read, StoreError, Update};
use crate::dtos::UpdateCompanyDTO;
use crate::entities::Company;
use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::{Error, MySqlPool, Row};

const COMPANY_COLUMNS: &str = "id, user_id, name, description, website, created_at";

pub struct CompanyRepository {
    connection_pool: MySqlPool,
}

impl CompanyRepository {
    pub fn new(connection_pool: MySqlPool) -> Self {
        Self { connection_pool }
    }
}

fn company_from_row(row: &MySqlRow) -> Result<Company, Error> {
    Ok(Company {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        website: row.try_get("website")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl Read<Company, i32> for CompanyRepository {
    async fn read(&self, id: &i32) -> Result<Option<Company>, StoreError> {
        let row = sqlx::query(&format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await?;

        Ok(row.as_ref().map(company_from_row).transpose()?)
    }
}

#[async_trait]
impl Update<Company, UpdateCompanyDTO, i32> for CompanyRepository {
    async fn update(
        &self,
        id: &i32,
        data: &UpdateCompanyDTO,
    ) -> Result<Option<Company>, StoreError> {
        // First, get the current profile to ensure it exists
        let Some(current) = self.read(id).await? else {
            return Ok(None);
        };

        if data.name.is_none() && data.description.is_none() && data.website.is_none() {
            return Ok(Some(current));
        }

        // Build dynamic UPDATE query using QueryBuilder (idiomatic SQLx way)
        let mut query_builder = sqlx::QueryBuilder::new("UPDATE companies SET ");
        let mut separated = query_builder.separated(", ");
        if let Some(ref name) = data.name {
            separated.push("name = ");
            separated.push_bind_unseparated(name);
        }
        if let Some(ref description) = data.description {
            separated.push("description = ");
            separated.push_bind_unseparated(description);
        }
        if let Some(ref website) = data.website {
            separated.push("website = ");
            separated.push_bind_unseparated(website);
        }
        query_builder.push(" WHERE id = ");
        query_builder.push_bind(id);

        query_builder.build().execute(&self.connection_pool).await?;

        self.read(id).await
    }
}

#[async_trait]
impl CompanyStore for CompanyRepository {
    async fn find_by_owner(&self, user_id: &i32) -> Result<Option<Company>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE user_id = ?"
        ))
        .bind(user_id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(row.as_ref().map(company_from_row).transpose()?)
    }

    async fn list(&self) -> Result<Vec<Company>, StoreError> {
        let rows = sqlx::query(&format!("SELECT {COMPANY_COLUMNS} FROM companies ORDER BY id"))
            .fetch_all(&self.connection_pool)
            .await?;

        Ok(rows.iter().map(company_from_row).collect::<Result<_, _>>()?)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM companies")
            .fetch_one(&self.connection_pool)
            .await?;

        Ok(count)
    }
}
