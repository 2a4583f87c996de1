//! In-memory store.
//!
//! Implements every store trait over a single lock, so the unique constraints
//! and ON DELETE CASCADE rules of the MySQL schema hold atomically here too.
//! Used by the test suites and when the server runs without `DATABASE_URL`.

use super::{
    ApplicationStore, CompanyStore, Create, Delete, OfferStore, Read, StoreError, Update,
    UserStore,
};
use crate::dtos::{
    CreateApplicationDTO, CreateOfferDTO, CreateUserDTO, OfferQuery, UpdateCompanyDTO,
    UpdateOfferDTO,
};
use crate::entities::{Application, ApplicationStatus, Company, Offer, Role, User};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    companies: BTreeMap<i32, Company>,
    offers: BTreeMap<i32, Offer>,
    applications: BTreeMap<i32, Application>,
    last_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    fn delete_offer_cascade(&mut self, offer_id: i32) -> bool {
        let existed = self.offers.remove(&offer_id).is_some();
        self.applications.retain(|_, a| a.offer_id != offer_id);
        existed
    }

    fn delete_user_cascade(&mut self, user_id: i32) -> bool {
        if self.users.remove(&user_id).is_none() {
            return false;
        }

        let owned_companies: Vec<i32> = self
            .companies
            .values()
            .filter(|c| c.user_id == user_id)
            .map(|c| c.id)
            .collect();
        for company_id in owned_companies {
            self.companies.remove(&company_id);
            let offer_ids: Vec<i32> = self
                .offers
                .values()
                .filter(|o| o.company_id == company_id)
                .map(|o| o.id)
                .collect();
            for offer_id in offer_ids {
                self.delete_offer_cascade(offer_id);
            }
        }

        self.applications.retain(|_, a| a.student_id != user_id);
        true
    }
}

/// Store in memoria condiviso da tutti i repository di un `AppState`
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_tables(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables.read().map_err(|_| StoreError::Unavailable)
    }

    fn write_tables(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables.write().map_err(|_| StoreError::Unavailable)
    }
}

// ************************* USERS ************************* //

#[async_trait]
impl Create<User, CreateUserDTO> for MemoryStore {
    async fn create(&self, data: &CreateUserDTO) -> Result<User, StoreError> {
        let mut tables = self.write_tables()?;
        if tables.users.values().any(|u| u.email == data.email) {
            return Err(StoreError::UniqueViolation);
        }

        let now = Utc::now();
        let user = User {
            id: tables.next_id(),
            name: data.name.clone(),
            email: data.email.clone(),
            password: data.password.clone(),
            role: data.role,
            created_at: now,
        };
        tables.users.insert(user.id, user.clone());

        if user.role == Role::Company {
            let company = Company {
                id: tables.next_id(),
                user_id: user.id,
                name: user.name.clone(),
                description: None,
                website: None,
                created_at: now,
            };
            tables.companies.insert(company.id, company);
        }

        Ok(user)
    }
}

#[async_trait]
impl Read<User, i32> for MemoryStore {
    async fn read(&self, id: &i32) -> Result<Option<User>, StoreError> {
        Ok(self.read_tables()?.users.get(id).cloned())
    }
}

#[async_trait]
impl Delete<User, i32> for MemoryStore {
    async fn delete(&self, id: &i32) -> Result<bool, StoreError> {
        Ok(self.write_tables()?.delete_user_cascade(*id))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .read_tables()?
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.read_tables()?.users.values().cloned().collect())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.read_tables()?.users.len() as i64)
    }
}

// ************************* COMPANIES ************************* //

#[async_trait]
impl Read<Company, i32> for MemoryStore {
    async fn read(&self, id: &i32) -> Result<Option<Company>, StoreError> {
        Ok(self.read_tables()?.companies.get(id).cloned())
    }
}

#[async_trait]
impl Update<Company, UpdateCompanyDTO, i32> for MemoryStore {
    async fn update(
        &self,
        id: &i32,
        data: &UpdateCompanyDTO,
    ) -> Result<Option<Company>, StoreError> {
        let mut tables = self.write_tables()?;
        let Some(company) = tables.companies.get_mut(id) else {
            return Ok(None);
        };
        if let Some(ref name) = data.name {
            company.name = name.clone();
        }
        if let Some(ref description) = data.description {
            company.description = Some(description.clone());
        }
        if let Some(ref website) = data.website {
            company.website = Some(website.clone());
        }
        Ok(Some(company.clone()))
    }
}

#[async_trait]
impl CompanyStore for MemoryStore {
    async fn find_by_owner(&self, user_id: &i32) -> Result<Option<Company>, StoreError> {
        Ok(self
            .read_tables()?
            .companies
            .values()
            .find(|c| c.user_id == *user_id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Company>, StoreError> {
        Ok(self.read_tables()?.companies.values().cloned().collect())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.read_tables()?.companies.len() as i64)
    }
}

// ************************* OFFERS ************************* //

#[async_trait]
impl Create<Offer, CreateOfferDTO> for MemoryStore {
    async fn create(&self, data: &CreateOfferDTO) -> Result<Offer, StoreError> {
        let mut tables = self.write_tables()?;
        // vincolo di foreign key verso companies
        if !tables.companies.contains_key(&data.company_id) {
            return Err(StoreError::ForeignKeyViolation);
        }

        let offer = Offer {
            id: tables.next_id(),
            company_id: data.company_id,
            title: data.title.clone(),
            description: data.description.clone(),
            category: data.category.clone(),
            duration: data.duration.clone(),
            location: data.location.clone(),
            price: data.price.clone(),
            features: data.features.clone(),
            created_at: Utc::now(),
        };
        tables.offers.insert(offer.id, offer.clone());
        Ok(offer)
    }
}

#[async_trait]
impl Read<Offer, i32> for MemoryStore {
    async fn read(&self, id: &i32) -> Result<Option<Offer>, StoreError> {
        Ok(self.read_tables()?.offers.get(id).cloned())
    }
}

#[async_trait]
impl Update<Offer, UpdateOfferDTO, i32> for MemoryStore {
    async fn update(&self, id: &i32, data: &UpdateOfferDTO) -> Result<Option<Offer>, StoreError> {
        let mut tables = self.write_tables()?;
        let Some(offer) = tables.offers.get_mut(id) else {
            return Ok(None);
        };

        let fields = [
            (&mut offer.title, &data.title),
            (&mut offer.description, &data.description),
            (&mut offer.category, &data.category),
            (&mut offer.duration, &data.duration),
            (&mut offer.location, &data.location),
            (&mut offer.price, &data.price),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                *field = value.clone();
            }
        }
        if let Some(ref features) = data.features {
            offer.features = features.clone();
        }
        Ok(Some(offer.clone()))
    }
}

#[async_trait]
impl Delete<Offer, i32> for MemoryStore {
    async fn delete(&self, id: &i32) -> Result<bool, StoreError> {
        Ok(self.write_tables()?.delete_offer_cascade(*id))
    }
}

#[async_trait]
impl OfferStore for MemoryStore {
    async fn list(&self, query: &OfferQuery) -> Result<Vec<Offer>, StoreError> {
        Ok(self
            .read_tables()?
            .offers
            .values()
            .filter(|o| query.category.as_ref().is_none_or(|c| &o.category == c))
            .skip(query.skip() as usize)
            .take(query.limit() as usize)
            .cloned()
            .collect())
    }

    async fn find_many_by_company_id(&self, company_id: &i32) -> Result<Vec<Offer>, StoreError> {
        Ok(self
            .read_tables()?
            .offers
            .values()
            .filter(|o| o.company_id == *company_id)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.read_tables()?.offers.len() as i64)
    }
}

// ************************* APPLICATIONS ************************* //

#[async_trait]
impl Create<Application, CreateApplicationDTO> for MemoryStore {
    async fn create(&self, data: &CreateApplicationDTO) -> Result<Application, StoreError> {
        let mut tables = self.write_tables()?;
        if !tables.offers.contains_key(&data.offer_id) || !tables.users.contains_key(&data.student_id)
        {
            return Err(StoreError::ForeignKeyViolation);
        }
        if tables
            .applications
            .values()
            .any(|a| a.student_id == data.student_id && a.offer_id == data.offer_id)
        {
            return Err(StoreError::UniqueViolation);
        }

        let application = Application {
            id: tables.next_id(),
            student_id: data.student_id,
            offer_id: data.offer_id,
            status: ApplicationStatus::Pending,
            applied_at: Utc::now(),
        };
        tables.applications.insert(application.id, application.clone());
        Ok(application)
    }
}

#[async_trait]
impl Read<Application, i32> for MemoryStore {
    async fn read(&self, id: &i32) -> Result<Option<Application>, StoreError> {
        Ok(self.read_tables()?.applications.get(id).cloned())
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn find_by_student_and_offer(
        &self,
        student_id: &i32,
        offer_id: &i32,
    ) -> Result<Option<Application>, StoreError> {
        Ok(self
            .read_tables()?
            .applications
            .values()
            .find(|a| a.student_id == *student_id && a.offer_id == *offer_id)
            .cloned())
    }

    async fn find_many_by_student_id(
        &self,
        student_id: &i32,
    ) -> Result<Vec<Application>, StoreError> {
        Ok(self
            .read_tables()?
            .applications
            .values()
            .filter(|a| a.student_id == *student_id)
            .cloned()
            .collect())
    }

    async fn find_many_by_company_id(
        &self,
        company_id: &i32,
    ) -> Result<Vec<Application>, StoreError> {
        let tables = self.read_tables()?;
        Ok(tables
            .applications
            .values()
            .filter(|a| {
                tables
                    .offers
                    .get(&a.offer_id)
                    .is_some_and(|o| o.company_id == *company_id)
            })
            .cloned()
            .collect())
    }

    async fn list(&self) -> Result<Vec<Application>, StoreError> {
        Ok(self.read_tables()?.applications.values().cloned().collect())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.read_tables()?.applications.len() as i64)
    }

    async fn transition_status(
        &self,
        id: &i32,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> Result<Option<Application>, StoreError> {
        let mut tables = self.write_tables()?;
        match tables.applications.get_mut(id) {
            Some(application) if application.status == from => {
                application.status = to;
                Ok(Some(application.clone()))
            }
            _ => Ok(None),
        }
    }
}
