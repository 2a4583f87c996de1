//! Authorization gate - Politiche per operazione
//!
//! Una policy è una disgiunzione di predicati valutata da sinistra a destra
//! con short-circuit. Se tutti i predicati sono falsi la richiesta è
//! proibita. Senza principal non si arriva mai qui (401 dal middleware).

use crate::core::error::DomainError;
use crate::core::identity::Principal;
use crate::entities::Role;
use tracing::{debug, warn};

pub const COMPANY_OR_ADMIN: &[Role] = &[Role::Company, Role::Admin];
pub const STUDENT_ONLY: &[Role] = &[Role::Student];
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Predicato valutato su principal e fatti di proprietà già risolti
#[derive(Debug, Clone, Copy)]
pub enum Predicate {
    /// L'id del principal coincide con il subject della risorsa
    SelfOnly { subject_id: i32 },
    RoleIn(&'static [Role]),
    IsAdmin,
    /// Esito già calcolato dall'`OwnershipResolver`
    Owns(bool),
}

impl Predicate {
    fn holds(&self, principal: &Principal) -> bool {
        match self {
            Predicate::SelfOnly { subject_id } => principal.id == *subject_id,
            Predicate::RoleIn(roles) => roles.contains(&principal.role),
            Predicate::IsAdmin => principal.role.is_admin(),
            Predicate::Owns(owned) => *owned,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Policy {
    name: &'static str,
    predicates: Vec<Predicate>,
}

impl Policy {
    pub fn new(name: &'static str, predicates: Vec<Predicate>) -> Self {
        Self { name, predicates }
    }

    pub fn self_only(name: &'static str, subject_id: i32) -> Self {
        Self::new(name, vec![Predicate::SelfOnly { subject_id }])
    }

    pub fn role_gated(name: &'static str, roles: &'static [Role]) -> Self {
        Self::new(name, vec![Predicate::RoleIn(roles)])
    }

    pub fn owner_or_admin(name: &'static str, owns: bool) -> Self {
        Self::new(name, vec![Predicate::Owns(owns), Predicate::IsAdmin])
    }

    /// Aggiunge un predicato alternativo in coda
    pub fn or(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn evaluate(&self, principal: &Principal) -> Result<(), DomainError> {
        if self.predicates.iter().any(|p| p.holds(principal)) {
            debug!("Policy '{}' allowed principal {}", self.name, principal.id);
            return Ok(());
        }

        warn!(
            "Policy '{}' denied principal {} with role {}",
            self.name, principal.id, principal.role
        );
        Err(DomainError::Forbidden { policy: self.name })
    }
}

/// Un amministratore non può cancellare il proprio account
pub fn guard_self_delete(principal: &Principal, target_user_id: i32) -> Result<(), DomainError> {
    if principal.id == target_user_id {
        warn!("Admin {} attempted to delete their own account", principal.id);
        return Err(DomainError::SelfActionForbidden);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const STUDENT: Principal = Principal { id: 1, role: Role::Student };
    const COMPANY: Principal = Principal { id: 2, role: Role::Company };
    const ADMIN: Principal = Principal { id: 3, role: Role::Admin };

    #[test]
    fn owner_or_admin_denies_non_owner_non_admin() {
        assert!(Policy::owner_or_admin("update_offer", true).evaluate(&COMPANY).is_ok());
        assert!(Policy::owner_or_admin("update_offer", false).evaluate(&ADMIN).is_ok());

        let err = Policy::owner_or_admin("update_offer", false)
            .evaluate(&COMPANY)
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden { policy: "update_offer" }));
    }

    #[test]
    fn role_gate_matches_the_allowed_set() {
        let create = Policy::role_gated("create_offer", COMPANY_OR_ADMIN);
        assert!(create.evaluate(&COMPANY).is_ok());
        assert!(create.evaluate(&ADMIN).is_ok());
        assert!(create.evaluate(&STUDENT).is_err());

        let apply = Policy::role_gated("apply", STUDENT_ONLY);
        assert!(apply.evaluate(&STUDENT).is_ok());
        assert!(apply.evaluate(&ADMIN).is_err());
    }

    #[test]
    fn or_appends_an_alternative() {
        let policy = Policy::self_only("update_company", 1).or(Predicate::IsAdmin);
        assert!(policy.evaluate(&STUDENT).is_ok());
        assert!(policy.evaluate(&ADMIN).is_ok());
        assert!(matches!(
            policy.evaluate(&COMPANY),
            Err(DomainError::Forbidden { policy: "update_company" })
        ));
    }

    #[test]
    fn self_only_compares_ids() {
        assert!(Policy::self_only("me", 1).evaluate(&STUDENT).is_ok());
        assert!(Policy::self_only("me", 1).evaluate(&ADMIN).is_err());
    }

    #[test]
    fn empty_policy_denies() {
        assert!(Policy::new("nothing", vec![]).evaluate(&ADMIN).is_err());
    }

    #[test]
    fn admin_self_delete_is_its_own_error() {
        assert!(matches!(
            guard_self_delete(&ADMIN, ADMIN.id),
            Err(DomainError::SelfActionForbidden)
        ));
        assert!(guard_self_delete(&ADMIN, STUDENT.id).is_ok());
    }
}
