//! Application lifecycle - Macchina a stati delle candidature
//!
//! ```text
//! PENDING --accept--> ACCEPTED
//!    \----reject----> REJECTED
//! ```
//! Gli stati decisi sono terminali. Il cambio di stato è un compare-and-set
//! sullo stato persistito, quindi due decisioni concorrenti non possono
//! riuscire entrambe.

use crate::core::error::{AuthFailure, ConflictKind, DomainError, Resource};
use crate::core::identity::Principal;
use crate::core::ownership::OwnershipResolver;
use crate::core::policy::{Policy, STUDENT_ONLY};
use crate::dtos::CreateApplicationDTO;
use crate::entities::{Application, ApplicationStatus};
use crate::repositories::{ApplicationStore, OfferStore, StoreError};
use tracing::{info, instrument, warn};

/// Solo PENDING si decide, e solo verso uno stato terminale
pub fn validate_transition(
    from: ApplicationStatus,
    to: ApplicationStatus,
) -> Result<(), DomainError> {
    if from.is_terminal() || !to.is_terminal() {
        return Err(DomainError::IllegalTransition { from, to });
    }
    Ok(())
}

pub struct ApplicationLifecycle<'a> {
    applications: &'a dyn ApplicationStore,
    offers: &'a dyn OfferStore,
    ownership: OwnershipResolver<'a>,
}

impl<'a> ApplicationLifecycle<'a> {
    pub fn new(
        applications: &'a dyn ApplicationStore,
        offers: &'a dyn OfferStore,
        ownership: OwnershipResolver<'a>,
    ) -> Self {
        Self {
            applications,
            offers,
            ownership,
        }
    }

    /// Crea una candidatura PENDING dello studente all'offerta
    #[instrument(skip(self), fields(principal_id = %principal.id))]
    pub async fn apply(
        &self,
        principal: &Principal,
        offer_id: i32,
    ) -> Result<Application, DomainError> {
        // 1. Solo gli studenti si candidano
        Policy::role_gated("apply_to_offer", STUDENT_ONLY).evaluate(principal)?;

        // 2. L'offerta deve esistere
        if self.offers.read(&offer_id).await?.is_none() {
            warn!("Offer {} not found", offer_id);
            return Err(DomainError::NotFound(Resource::Offer));
        }

        // 3. Controllo rapido del duplicato, il vincolo dello store resta l'autorità
        if self
            .applications
            .find_by_student_and_offer(&principal.id, &offer_id)
            .await?
            .is_some()
        {
            warn!("Student {} already applied to offer {}", principal.id, offer_id);
            return Err(DomainError::Conflict(ConflictKind::AlreadyApplied));
        }

        // 4. Inserimento
        let application = match self
            .applications
            .create(&CreateApplicationDTO {
                student_id: principal.id,
                offer_id,
            })
            .await
        {
            Ok(application) => application,
            Err(StoreError::UniqueViolation) => {
                warn!("Concurrent duplicate application for offer {}", offer_id);
                return Err(DomainError::Conflict(ConflictKind::AlreadyApplied));
            }
            // una delle due righe referenziate è sparita nel frattempo
            Err(StoreError::ForeignKeyViolation) => {
                if self.offers.read(&offer_id).await?.is_none() {
                    warn!("Offer {} deleted while applying", offer_id);
                    return Err(DomainError::NotFound(Resource::Offer));
                }
                warn!("Student {} deleted while applying", principal.id);
                return Err(DomainError::Unauthenticated(AuthFailure::UnknownSubject));
            }
            Err(other) => return Err(DomainError::Store(other)),
        };

        info!("Application {} created", application.id);
        Ok(application)
    }

    /// Porta la candidatura nello stato `next`
    #[instrument(skip(self), fields(principal_id = %principal.id))]
    pub async fn transition(
        &self,
        principal: &Principal,
        application_id: i32,
        next: ApplicationStatus,
    ) -> Result<Application, DomainError> {
        // 1. Lettura della candidatura
        let current = self
            .applications
            .read(&application_id)
            .await?
            .ok_or(DomainError::NotFound(Resource::Application))?;

        // 2. Autorizzazione prima della validazione della transizione
        let owns = self
            .ownership
            .principal_owns_application_offer(principal, &current)
            .await?;
        Policy::owner_or_admin("transition_application", owns).evaluate(principal)?;

        // 3. Validazione sullo snapshot letto
        validate_transition(current.status, next).inspect_err(|_| {
            warn!(
                "Illegal transition {} -> {} on application {}",
                current.status, next, application_id
            );
        })?;

        // 4. Compare-and-set; se lo snapshot è vecchio si rilegge lo stato corrente
        match self
            .applications
            .transition_status(&application_id, current.status, next)
            .await?
        {
            Some(updated) => {
                info!("Application {} moved to {}", application_id, updated.status);
                Ok(updated)
            }
            None => {
                let latest = self
                    .applications
                    .read(&application_id)
                    .await?
                    .ok_or(DomainError::NotFound(Resource::Application))?;
                warn!(
                    "Application {} changed concurrently, now {}",
                    application_id, latest.status
                );
                Err(DomainError::IllegalTransition {
                    from: latest.status,
                    to: next,
                })
            }
        }
    }
}
