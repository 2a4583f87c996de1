//! Ownership - Catena di proprietà delle risorse
//!
//! `User -> CompanyProfile -> Offer -> Application <- User(studente)`.
//! È l'unica base dei predicati "possiede": non esiste una tabella di ACL.

use crate::core::error::{DomainError, Resource};
use crate::core::identity::Principal;
use crate::entities::{Application, Company, Offer};
use crate::repositories::{CompanyStore, OfferStore};
use tracing::{debug, instrument};

pub fn owns_offer(profile: &Company, offer: &Offer) -> bool {
    offer.company_id == profile.id
}

pub fn owns_application(principal: &Principal, application: &Application) -> bool {
    application.student_id == principal.id
}

pub fn owns_profile(principal: &Principal, profile: &Company) -> bool {
    profile.user_id == principal.id
}

/// Risolve i collegamenti della catena interrogando gli store
pub struct OwnershipResolver<'a> {
    companies: &'a dyn CompanyStore,
    offers: &'a dyn OfferStore,
}

impl<'a> OwnershipResolver<'a> {
    pub fn new(companies: &'a dyn CompanyStore, offers: &'a dyn OfferStore) -> Self {
        Self { companies, offers }
    }

    /// Profilo aziendale del principal
    #[instrument(skip(self), fields(principal_id = %principal.id))]
    pub async fn company_of(&self, principal: &Principal) -> Result<Company, DomainError> {
        self.companies
            .find_by_owner(&principal.id)
            .await?
            .ok_or(DomainError::NotFound(Resource::CompanyProfile))
    }

    /// Profilo proprietario dell'offerta a cui punta la candidatura
    #[instrument(skip(self), fields(application_id = %application.id))]
    pub async fn offer_owner_of_application(
        &self,
        application: &Application,
    ) -> Result<Company, DomainError> {
        let offer = self
            .offers
            .read(&application.offer_id)
            .await?
            .ok_or(DomainError::NotFound(Resource::Offer))?;

        self.companies
            .read(&offer.company_id)
            .await?
            .ok_or(DomainError::NotFound(Resource::CompanyProfile))
    }

    /// Un principal senza profilo non possiede nessuna offerta
    pub async fn principal_owns_offer(
        &self,
        principal: &Principal,
        offer: &Offer,
    ) -> Result<bool, DomainError> {
        match self.company_of(principal).await {
            Ok(profile) => Ok(owns_offer(&profile, offer)),
            Err(DomainError::NotFound(Resource::CompanyProfile)) => {
                debug!("Principal {} has no company profile", principal.id);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Il principal possiede il profilo proprietario dell'offerta della candidatura
    pub async fn principal_owns_application_offer(
        &self,
        principal: &Principal,
        application: &Application,
    ) -> Result<bool, DomainError> {
        let owner = self.offer_owner_of_application(application).await?;
        Ok(owns_profile(principal, &owner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtos::{CreateApplicationDTO, CreateOfferDTO, CreateUserDTO};
    use crate::entities::{Role, User};
    use crate::repositories::{Create, MemoryStore};

    async fn user(store: &MemoryStore, email: &str, role: Role) -> User {
        store
            .create(&CreateUserDTO {
                name: email.to_string(),
                email: email.to_string(),
                password: "hash".to_string(),
                role,
            })
            .await
            .unwrap()
    }

    async fn offer(store: &MemoryStore, company_id: i32) -> Offer {
        store
            .create(&CreateOfferDTO {
                company_id,
                title: "Data intern".to_string(),
                description: "ETL pipelines".to_string(),
                category: "data".to_string(),
                duration: "3 months".to_string(),
                location: "Sfax".to_string(),
                price: "600".to_string(),
                features: vec![],
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn chain_resolves_from_application_to_owning_profile() {
        let store = MemoryStore::new();
        let x = user(&store, "x@corp.tn", Role::Company).await;
        let y = user(&store, "y@corp.tn", Role::Company).await;
        let a = user(&store, "a@uni.tn", Role::Student).await;
        let resolver = OwnershipResolver::new(&store, &store);

        let x_profile = resolver.company_of(&Principal::from(&x)).await.unwrap();
        let offer = offer(&store, x_profile.id).await;
        let application: Application = store
            .create(&CreateApplicationDTO { student_id: a.id, offer_id: offer.id })
            .await
            .unwrap();

        let owner = resolver.offer_owner_of_application(&application).await.unwrap();
        assert_eq!(owner.id, x_profile.id);
        assert!(owns_application(&Principal::from(&a), &application));
        assert!(!owns_application(&Principal::from(&x), &application));

        assert!(resolver.principal_owns_offer(&Principal::from(&x), &offer).await.unwrap());
        assert!(!resolver.principal_owns_offer(&Principal::from(&y), &offer).await.unwrap());
    }

    #[tokio::test]
    async fn principal_without_profile_owns_nothing() {
        let store = MemoryStore::new();
        let x = user(&store, "x@corp.tn", Role::Company).await;
        let a = user(&store, "a@uni.tn", Role::Student).await;
        let resolver = OwnershipResolver::new(&store, &store);
        let profile = resolver.company_of(&Principal::from(&x)).await.unwrap();
        let offer = offer(&store, profile.id).await;

        let student = Principal::from(&a);
        assert!(matches!(
            resolver.company_of(&student).await,
            Err(DomainError::NotFound(Resource::CompanyProfile))
        ));
        assert!(!resolver.principal_owns_offer(&student, &offer).await.unwrap());
    }
}
