//! ApplicationRepository - Repository MySQL per le candidature

use super::{ApplicationStore, Create, Read, StoreError};
use crate::dtos::CreateApplicationDTO;
use crate::entities::{Application, ApplicationStatus};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::mysql::MySqlRow;
use sqlx::{Error, MySqlPool, Row};

const APPLICATION_COLUMNS: &str = "id, student_id, offer_id, status, applied_at";

pub struct ApplicationRepository {
    connection_pool: MySqlPool,
}

impl ApplicationRepository {
    pub fn new(connection_pool: MySqlPool) -> Self {
        Self { connection_pool }
    }
}

fn application_from_row(row: &MySqlRow) -> Result<Application, Error> {
    let status: String = row.try_get("status")?;
    Ok(Application {
        id: row.try_get("id")?,
        student_id: row.try_get("student_id")?,
        offer_id: row.try_get("offer_id")?,
        status: ApplicationStatus::try_from(status).map_err(|e| Error::Decode(e.into()))?,
        applied_at: row.try_get("applied_at")?,
    })
}

#[async_trait]
impl Create<Application, CreateApplicationDTO> for ApplicationRepository {
    /// The `uq_applications_student_offer` key rejects a second row for the same pair
    async fn create(&self, data: &CreateApplicationDTO) -> Result<Application, StoreError> {
        let now = Utc::now();
        let status = ApplicationStatus::Pending;

        let result = sqlx::query(
            "INSERT INTO applications (student_id, offer_id, status, applied_at) VALUES (?, ?, ?, ?)",
        )
        .bind(data.student_id)
        .bind(data.offer_id)
        .bind(status.as_str())
        .bind(now)
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_id() as i32;

        Ok(Application {
            id: new_id,
            student_id: data.student_id,
            offer_id: data.offer_id,
            status,
            applied_at: now,
        })
    }
}

#[async_trait]
impl Read<Application, i32> for ApplicationRepository {
    async fn read(&self, id: &i32) -> Result<Option<Application>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(row.as_ref().map(application_from_row).transpose()?)
    }
}

#[async_trait]
impl ApplicationStore for ApplicationRepository {
    async fn find_by_student_and_offer(
        &self,
        student_id: &i32,
        offer_id: &i32,
    ) -> Result<Option<Application>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE student_id = ? AND offer_id = ?"
        ))
        .bind(student_id)
        .bind(offer_id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(row.as_ref().map(application_from_row).transpose()?)
    }

    async fn find_many_by_student_id(
        &self,
        student_id: &i32,
    ) -> Result<Vec<Application>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE student_id = ? ORDER BY id"
        ))
        .bind(student_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(rows.iter().map(application_from_row).collect::<Result<_, _>>()?)
    }

    async fn find_many_by_company_id(
        &self,
        company_id: &i32,
    ) -> Result<Vec<Application>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT a.id, a.student_id, a.offer_id, a.status, a.applied_at
            FROM applications a
            JOIN offers o ON o.id = a.offer_id
            WHERE o.company_id = ?
            ORDER BY a.id
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(rows.iter().map(application_from_row).collect::<Result<_, _>>()?)
    }

    async fn list(&self) -> Result<Vec<Application>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications ORDER BY id"
        ))
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(rows.iter().map(application_from_row).collect::<Result<_, _>>()?)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM applications")
            .fetch_one(&self.connection_pool)
            .await?;

        Ok(count)
    }

    async fn transition_status(
        &self,
        id: &i32,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> Result<Option<Application>, StoreError> {
        // Il WHERE sullo stato corrente rende il read-modify-write atomico
        let result = sqlx::query("UPDATE applications SET status = ? WHERE id = ? AND status = ?")
            .bind(to.as_str())
            .bind(id)
            .bind(from.as_str())
            .execute(&self.connection_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.read(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::MySqlPool;

    /*------------------------------------------- */
    /* Unit tests: transition_status              */
    /*------------------------------------------- */

    /// Test: il cambio di stato avviene solo dallo stato atteso
    #[sqlx::test(fixtures(
        path = "../../fixtures",
        scripts("users", "companies", "offers", "applications")
    ))]
    #[ignore = "requires a MySQL DATABASE_URL"]
    async fn test_transition_status_is_compare_and_set(pool: MySqlPool) {
        let repo = ApplicationRepository::new(pool);

        let accepted = repo
            .transition_status(&1, ApplicationStatus::Pending, ApplicationStatus::Accepted)
            .await
            .unwrap();
        assert_eq!(accepted.map(|a| a.status), Some(ApplicationStatus::Accepted));

        // lo snapshot PENDING è ormai vecchio
        let stale = repo
            .transition_status(&1, ApplicationStatus::Pending, ApplicationStatus::Rejected)
            .await
            .unwrap();
        assert!(stale.is_none());

        let stored = repo.read(&1).await.unwrap().unwrap();
        assert_eq!(stored.status, ApplicationStatus::Accepted);
    }

    /// Test: nessuna riga per un id inesistente
    #[sqlx::test(fixtures(
        path = "../../fixtures",
        scripts("users", "companies", "offers", "applications")
    ))]
    #[ignore = "requires a MySQL DATABASE_URL"]
    async fn test_transition_status_missing_row(pool: MySqlPool) {
        let repo = ApplicationRepository::new(pool);

        let result = repo
            .transition_status(&99, ApplicationStatus::Pending, ApplicationStatus::Accepted)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    /*------------------------------------------- */
    /* Unit tests: create                         */
    /*------------------------------------------- */

    /// Test: la seconda candidatura della stessa coppia viola `uq_applications_student_offer`
    #[sqlx::test(fixtures(
        path = "../../fixtures",
        scripts("users", "companies", "offers", "applications")
    ))]
    #[ignore = "requires a MySQL DATABASE_URL"]
    async fn test_create_duplicate_is_unique_violation(pool: MySqlPool) {
        let repo = ApplicationRepository::new(pool);

        let result = repo
            .create(&CreateApplicationDTO {
                student_id: 2,
                offer_id: 1,
            })
            .await;
        assert!(matches!(result, Err(StoreError::UniqueViolation)));

        // un altro studente può candidarsi
        let created = repo
            .create(&CreateApplicationDTO {
                student_id: 3,
                offer_id: 1,
            })
            .await
            .unwrap();
        assert_eq!(created.status, ApplicationStatus::Pending);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    /// Test: studente o offerta inesistenti violano le foreign key
    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "companies", "offers")))]
    #[ignore = "requires a MySQL DATABASE_URL"]
    async fn test_create_with_missing_rows_is_foreign_key_violation(pool: MySqlPool) {
        let repo = ApplicationRepository::new(pool);

        for (student_id, offer_id) in [(99, 1), (2, 99)] {
            let result = repo
                .create(&CreateApplicationDTO {
                    student_id,
                    offer_id,
                })
                .await;
            assert!(matches!(result, Err(StoreError::ForeignKeyViolation)));
        }
    }

    /// Test: le candidature di un'azienda passano per le sue offerte
    #[sqlx::test(fixtures(
        path = "../../fixtures",
        scripts("users", "companies", "offers", "applications")
    ))]
    #[ignore = "requires a MySQL DATABASE_URL"]
    async fn test_find_many_by_company_id(pool: MySqlPool) {
        let repo = ApplicationRepository::new(pool);

        let applications = repo.find_many_by_company_id(&1).await.unwrap();
        assert_eq!(applications.len(), 1);
        assert_eq!(applications[0].student_id, 2);

        assert!(repo.find_many_by_company_id(&42).await.unwrap().is_empty());
    }
}
