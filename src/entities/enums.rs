//! Enumerazioni - Tipi enumerati utilizzati nelle entità

use serde::{Deserialize, Serialize};
use std::fmt;

// ********************* ENUMERAZIONI UTILI **********************//

/// Ruolo di un utente della piattaforma, fissato alla registrazione.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Company,
    Admin,
}

impl Role {
    /// Rappresentazione salvata nella colonna `users.role`
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "STUDENT",
            Role::Company => "COMPANY",
            Role::Admin => "ADMIN",
        }
    }

    pub fn is_admin(&self) -> bool {
        match self {
            Role::Admin => true,
            Role::Student | Role::Company => false,
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "STUDENT" => Ok(Role::Student),
            "COMPANY" => Ok(Role::Company),
            "ADMIN" => Ok(Role::Admin),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stato di una candidatura.
///
/// `Pending` è l'unico stato iniziale, `Accepted` e `Rejected` sono terminali.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "PENDING",
            ApplicationStatus::Accepted => "ACCEPTED",
            ApplicationStatus::Rejected => "REJECTED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        match self {
            ApplicationStatus::Pending => false,
            ApplicationStatus::Accepted | ApplicationStatus::Rejected => true,
        }
    }
}

impl TryFrom<String> for ApplicationStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "PENDING" => Ok(ApplicationStatus::Pending),
            "ACCEPTED" => Ok(ApplicationStatus::Accepted),
            "REJECTED" => Ok(ApplicationStatus::Rejected),
            other => Err(format!("unknown application status '{other}'")),
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
