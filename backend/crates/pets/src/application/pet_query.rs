//! Pet Query Use Case
//!
//! Listing and single-record reads, filtered by the caller's roles.

use std::sync::Arc;

use auth::Principal;
use kernel::id::PetId;

use crate::domain::entities::Pet;
use crate::domain::policy::{self, ListingScope};
use crate::domain::repository::PetRepository;
use crate::error::{PetsError, PetsResult};

pub struct PetQueryUseCase<P>
where
    P: PetRepository,
{
    pets: Arc<P>,
}

impl<P> PetQueryUseCase<P>
where
    P: PetRepository,
{
    pub fn new(pets: Arc<P>) -> Self {
        Self { pets }
    }

    /// All pets for admins, complete ones for everyone else
    pub async fn list(&self, principal: &Principal) -> PetsResult<Vec<Pet>> {
        match policy::listing_scope(principal) {
            ListingScope::All => self.pets.find_all().await,
            ListingScope::CompleteOnly => self.pets.find_complete().await,
        }
    }

    pub async fn get(&self, principal: &Principal, id: PetId) -> PetsResult<Pet> {
        let pet = self
            .pets
            .find_by_id(&id)
            .await?
            .ok_or(PetsError::PetNotFound(id))?;

        policy::authorize_view(principal, &pet)?;

        Ok(pet)
    }
}
