//! Repositories module - Coordinatore per tutti i repository del progetto
//!
//! Questo modulo organizza i repository in sotto-moduli separati per una migliore manutenibilità.
//! Ogni repository gestisce le operazioni di persistenza per una specifica entità.
//!
//! I trait `*Store` sono le porte viste dai services e dal core: la logica di
//! autorizzazione lavora solo su entità e id, mai su query.
//! Le implementazioni MySQL usano query runtime (`sqlx::query`) con mapping
//! manuale delle righe, quella in-memory serve ai test e alle esecuzioni senza database.

// Dichiarazione dei sotto-moduli
pub mod application;
pub mod company;
pub mod memory;
pub mod offer;
pub mod traits;
pub mod user;

// Re-esportazione dei trait per facilitare l'import
pub use traits::{Create, Delete, Read, Update};

// Re-esportazione delle struct dei repository per facilitare l'import
pub use application::ApplicationRepository;
pub use company::CompanyRepository;
pub use memory::MemoryStore;
pub use offer::OfferRepository;
pub use user::UserRepository;

use crate::dtos::{
    CreateApplicationDTO, CreateOfferDTO, CreateUserDTO, OfferQuery, UpdateCompanyDTO,
    UpdateOfferDTO,
};
use crate::entities::{Application, ApplicationStatus, Company, Offer, User};
use async_trait::async_trait;
use thiserror::Error;

/// Errori del livello di persistenza
#[derive(Debug, Error)]
pub enum StoreError {
    /// Un vincolo di unicità ha rifiutato la scrittura (email, coppia studente/offerta)
    #[error("unique constraint violated")]
    UniqueViolation,

    /// Una foreign key punta a una riga inesistente
    #[error("foreign key constraint violated")]
    ForeignKeyViolation,

    /// Lo store non è raggiungibile (pool esaurito, lock avvelenato)
    #[error("store unavailable")]
    Unavailable,

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                StoreError::UniqueViolation
            }
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                StoreError::ForeignKeyViolation
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => StoreError::Unavailable,
            other => StoreError::Database(other),
        }
    }
}

/// Porta per gli utenti.
///
/// `create` con ruolo `Company` crea nella stessa transazione il profilo aziendale.
#[async_trait]
pub trait UserStore:
    Create<User, CreateUserDTO> + Read<User, i32> + Delete<User, i32> + Send + Sync
{
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn list(&self) -> Result<Vec<User>, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;
}

/// Porta per i profili aziendali
#[async_trait]
pub trait CompanyStore:
    Read<Company, i32> + Update<Company, UpdateCompanyDTO, i32> + Send + Sync
{
    /// Profilo il cui `user_id` coincide con `user_id` (al più uno)
    async fn find_by_owner(&self, user_id: &i32) -> Result<Option<Company>, StoreError>;

    async fn list(&self) -> Result<Vec<Company>, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;
}

/// Porta per le offerte
#[async_trait]
pub trait OfferStore:
    Create<Offer, CreateOfferDTO>
    + Read<Offer, i32>
    + Update<Offer, UpdateOfferDTO, i32>
    + Delete<Offer, i32>
    + Send
    + Sync
{
    async fn list(&self, query: &OfferQuery) -> Result<Vec<Offer>, StoreError>;

    async fn find_many_by_company_id(&self, company_id: &i32) -> Result<Vec<Offer>, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;
}

/// Porta per le candidature
///
/// Non esiste `Update` generico: lo stato cambia solo tramite `transition_status`.
#[async_trait]
pub trait ApplicationStore:
    Create<Application, CreateApplicationDTO> + Read<Application, i32> + Send + Sync
{
    async fn find_by_student_and_offer(
        &self,
        student_id: &i32,
        offer_id: &i32,
    ) -> Result<Option<Application>, StoreError>;

    async fn find_many_by_student_id(&self, student_id: &i32)
    -> Result<Vec<Application>, StoreError>;

    /// Candidature alle offerte di un'azienda
    async fn find_many_by_company_id(&self, company_id: &i32)
    -> Result<Vec<Application>, StoreError>;

    async fn list(&self) -> Result<Vec<Application>, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;

    /// Compare-and-set atomico sullo stato persistito.
    ///
    /// # Returns
    /// * `Ok(Some(Application))` - lo stato era `from` ed è ora `to`
    /// * `Ok(None)` - lo stato corrente non è più `from` (o la riga non esiste)
    async fn transition_status(
        &self,
        id: &i32,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> Result<Option<Application>, StoreError>;
}
