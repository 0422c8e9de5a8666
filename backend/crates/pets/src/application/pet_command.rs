//! Pet Command Use Case
//!
//! Create, update and delete. The caller's roles are checked first, then
//! the submitted fields, then whether the target exists.

use std::sync::Arc;

use auth::Principal;
use kernel::id::PetId;

use crate::domain::entities::{Pet, PetDraft};
use crate::domain::policy;
use crate::domain::repository::{PetRepository, PetStatusRepository};
use crate::error::{PetsError, PetsResult};

pub struct PetCommandUseCase<P>
where
    P: PetRepository + PetStatusRepository,
{
    pets: Arc<P>,
}

impl<P> PetCommandUseCase<P>
where
    P: PetRepository + PetStatusRepository,
{
    pub fn new(pets: Arc<P>) -> Self {
        Self { pets }
    }

    pub async fn create(&self, principal: &Principal, draft: PetDraft) -> PetsResult<Pet> {
        policy::authorize_mutation(principal)?;
        self.validate(&draft).await?;

        let pet = Pet::new(draft);
        self.pets.create(&pet).await?;

        tracing::info!(pet_id = %pet.id, complete = pet.is_complete(), "Pet created");
        Ok(pet)
    }

    pub async fn update(
        &self,
        principal: &Principal,
        id: PetId,
        draft: PetDraft,
    ) -> PetsResult<Pet> {
        policy::authorize_mutation(principal)?;
        self.validate(&draft).await?;

        let mut pet = self
            .pets
            .find_by_id(&id)
            .await?
            .ok_or(PetsError::PetNotFound(id))?;

        pet.apply(draft);
        if !self.pets.update(&pet).await? {
            return Err(PetsError::PetNotFound(id));
        }

        tracing::info!(pet_id = %id, "Pet updated");
        Ok(pet)
    }

    /// Removes the pet and its gallery references; stored files are kept
    pub async fn delete(&self, principal: &Principal, id: PetId) -> PetsResult<()> {
        policy::authorize_mutation(principal)?;

        if !self.pets.delete(&id).await? {
            return Err(PetsError::PetNotFound(id));
        }

        tracing::info!(pet_id = %id, "Pet deleted");
        Ok(())
    }

    async fn validate(&self, draft: &PetDraft) -> PetsResult<()> {
        let mut violations = draft.violations();

        if let Some(status) = draft.pet_status {
            if self.pets.find_status(&status.id).await?.is_none() {
                violations.push(PetDraft::unknown_status_violation());
            }
        }

        violations.into_result().map_err(PetsError::Validation)
    }
}
