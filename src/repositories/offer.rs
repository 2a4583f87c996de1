//! OfferRepository - Repository MySQL per le offerte di tirocinio

use super::{Create, Delete, OfferStore, Read, StoreError, Update};
use crate::dtos::{CreateOfferDTO, OfferQuery, UpdateOfferDTO};
use crate::entities::Offer;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::mysql::MySqlRow;
use sqlx::types::Json;
use sqlx::{Error, MySqlPool, Row};

const OFFER_COLUMNS: &str =
    "id, company_id, title, description, category, duration, location, price, features, created_at";

pub struct OfferRepository {
    connection_pool: MySqlPool,
}

impl OfferRepository {
    pub fn new(connection_pool: MySqlPool) -> Self {
        Self { connection_pool }
    }
}

fn offer_from_row(row: &MySqlRow) -> Result<Offer, Error> {
    let features: Option<Json<Vec<String>>> = row.try_get("features")?;
    Ok(Offer {
        id: row.try_get("id")?,
        company_id: row.try_get("company_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        category: row.try_get("category")?,
        duration: row.try_get("duration")?,
        location: row.try_get("location")?,
        price: row.try_get("price")?,
        features: features.map(|json| json.0).unwrap_or_default(),
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl Create<Offer, CreateOfferDTO> for OfferRepository {
    async fn create(&self, data: &CreateOfferDTO) -> Result<Offer, StoreError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO offers (company_id, title, description, category, duration, location, price, features, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(data.company_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.category)
        .bind(&data.duration)
        .bind(&data.location)
        .bind(&data.price)
        .bind(Json(&data.features))
        .bind(now)
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_id() as i32;

        Ok(Offer {
            id: new_id,
            company_id: data.company_id,
            title: data.title.clone(),
            description: data.description.clone(),
            category: data.category.clone(),
            duration: data.duration.clone(),
            location: data.location.clone(),
            price: data.price.clone(),
            features: data.features.clone(),
            created_at: now,
        })
    }
}

#[async_trait]
impl Read<Offer, i32> for OfferRepository {
    async fn read(&self, id: &i32) -> Result<Option<Offer>, StoreError> {
        let row = sqlx::query(&format!("SELECT {OFFER_COLUMNS} FROM offers WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await?;

        Ok(row.as_ref().map(offer_from_row).transpose()?)
    }
}

#[async_trait]
impl Update<Offer, UpdateOfferDTO, i32> for OfferRepository {
    async fn update(&self, id: &i32, data: &UpdateOfferDTO) -> Result<Option<Offer>, StoreError> {
        let Some(current) = self.read(id).await? else {
            return Ok(None);
        };

        let text_fields = [
            ("title", &data.title),
            ("description", &data.description),
            ("category", &data.category),
            ("duration", &data.duration),
            ("location", &data.location),
            ("price", &data.price),
        ];

        if text_fields.iter().all(|(_, value)| value.is_none()) && data.features.is_none() {
            return Ok(Some(current));
        }

        let mut query_builder = sqlx::QueryBuilder::new("UPDATE offers SET ");
        let mut separated = query_builder.separated(", ");
        for (column, value) in text_fields {
            if let Some(value) = value {
                separated.push(format!("{column} = "));
                separated.push_bind_unseparated(value);
            }
        }
        if let Some(ref features) = data.features {
            separated.push("features = ");
            separated.push_bind_unseparated(Json(features));
        }
        query_builder.push(" WHERE id = ");
        query_builder.push_bind(id);

        query_builder.build().execute(&self.connection_pool).await?;

        self.read(id).await
    }
}

#[async_trait]
impl Delete<Offer, i32> for OfferRepository {
    /// ON DELETE CASCADE removes the offer's applications
    async fn delete(&self, id: &i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM offers WHERE id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl OfferStore for OfferRepository {
    async fn list(&self, query: &OfferQuery) -> Result<Vec<Offer>, StoreError> {
        let mut query_builder =
            sqlx::QueryBuilder::new(format!("SELECT {OFFER_COLUMNS} FROM offers"));
        if let Some(ref category) = query.category {
            query_builder.push(" WHERE category = ");
            query_builder.push_bind(category);
        }
        query_builder.push(" ORDER BY id LIMIT ");
        query_builder.push_bind(query.limit());
        query_builder.push(" OFFSET ");
        query_builder.push_bind(query.skip());

        let rows = query_builder.build().fetch_all(&self.connection_pool).await?;

        Ok(rows.iter().map(offer_from_row).collect::<Result<_, _>>()?)
    }

    async fn find_many_by_company_id(&self, company_id: &i32) -> Result<Vec<Offer>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {OFFER_COLUMNS} FROM offers WHERE company_id = ? ORDER BY id"
        ))
        .bind(company_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(rows.iter().map(offer_from_row).collect::<Result<_, _>>()?)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM offers")
            .fetch_one(&self.connection_pool)
            .await?;

        Ok(count)
    }
}
