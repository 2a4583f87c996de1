//! Entities module - Entità del dominio applicativo
//!
//! Questo modulo contiene tutte le entità (models) che rappresentano i dati persistiti nel database.
//! Ogni entity corrisponde a una tabella nel database.

pub mod application;
pub mod company;
pub mod enums;
pub mod offer;
pub mod user;

// Re-exports per facilitare l'import
pub use application::Application;
pub use company::Company;
pub use enums::{ApplicationStatus, Role};
pub use offer::Offer;
pub use user::User;
