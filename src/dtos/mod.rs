//! DTOs module - Data Transfer Objects
//!
//! Questo modulo contiene tutti i DTOs usati per la comunicazione client-server.
//! I DTOs separano la rappresentazione esterna (API) dalla rappresentazione interna (entities).

pub mod admin;
pub mod application;
pub mod company;
pub mod offer;
pub mod query;
pub mod user;

// Re-exports per facilitare l'import
pub use admin::StatsDTO;
pub use application::{
    ApplicationDTO, ApplyDTO, CreateApplicationDTO, EnrichedApplicationDTO, UpdateApplicationDTO,
};
pub use company::{CompanyDTO, UpdateCompanyDTO};
pub use offer::{CreateOfferDTO, OfferBodyDTO, OfferDTO, UpdateOfferDTO};
pub use query::OfferQuery;
pub use user::{CreateUserDTO, LoginDTO, RegisterUserDTO, TokenDTO, UserDTO};
