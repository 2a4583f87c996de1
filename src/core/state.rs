//! Application State - Stato globale dell'applicazione
//!
//! Contiene gli store, il codec delle credenziali e le opzioni
//! necessarie per gestire le richieste.

use crate::core::credentials::CredentialCodec;
use crate::core::lifecycle::ApplicationLifecycle;
use crate::core::ownership::OwnershipResolver;
use crate::repositories::{
    ApplicationRepository, ApplicationStore, CompanyRepository, CompanyStore, MemoryStore,
    OfferRepository, OfferStore, UserRepository, UserStore,
};
use sqlx::MySqlPool;
use std::sync::Arc;

/// Stato globale dell'applicazione condiviso tra tutte le route e middleware
pub struct AppState {
    /// Store degli utenti
    pub user: Arc<dyn UserStore>,

    /// Store dei profili aziendali
    pub company: Arc<dyn CompanyStore>,

    /// Store delle offerte
    pub offer: Arc<dyn OfferStore>,

    /// Store delle candidature
    pub application: Arc<dyn ApplicationStore>,

    /// Hash delle password e token firmati
    pub codec: CredentialCodec,

    /// Se falso la registrazione con ruolo admin è rifiutata
    pub allow_admin_registration: bool,
}

impl AppState {
    /// Crea una nuova istanza di AppState inizializzando tutti i repository
    /// con il pool di connessioni fornito.
    ///
    /// # Arguments
    /// * `pool` - Pool di connessioni MySQL condiviso
    /// * `codec` - Codec per password e token
    /// * `allow_admin_registration` - Abilita `role: admin` in registrazione
    pub fn new(pool: MySqlPool, codec: CredentialCodec, allow_admin_registration: bool) -> Self {
        Self {
            user: Arc::new(UserRepository::new(pool.clone())),
            company: Arc::new(CompanyRepository::new(pool.clone())),
            offer: Arc::new(OfferRepository::new(pool.clone())),
            application: Arc::new(ApplicationRepository::new(pool)),
            codec,
            allow_admin_registration,
        }
    }

    /// Stato con tutti gli store serviti dallo stesso `MemoryStore`
    pub fn in_memory(codec: CredentialCodec, allow_admin_registration: bool) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            user: store.clone(),
            company: store.clone(),
            offer: store.clone(),
            application: store,
            codec,
            allow_admin_registration,
        }
    }

    pub fn ownership(&self) -> OwnershipResolver<'_> {
        OwnershipResolver::new(self.company.as_ref(), self.offer.as_ref())
    }

    pub fn lifecycle(&self) -> ApplicationLifecycle<'_> {
        ApplicationLifecycle::new(self.application.as_ref(), self.offer.as_ref(), self.ownership())
    }
}
