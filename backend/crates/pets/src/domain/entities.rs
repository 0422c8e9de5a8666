//! Domain Entities

use chrono::{DateTime, Utc};
use kernel::error::violation::{FieldViolation, Violations};
use kernel::id::{PetId, PetStatusId, UploadedFileId};

use crate::domain::value_objects::{PetType, Sex};

pub const NAME_MAX_CHARS: usize = 35;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;
pub const ADDRESS_MAX_CHARS: usize = 100;

/// Reference to a [`PetStatus`] by id only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PetStatusRef {
    pub id: PetStatusId,
}

/// Adoption status shown next to a pet (e.g. "looking for a home")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetStatus {
    pub id: PetStatusId,
    pub name: String,
    pub rgb: String,
    pub public: bool,
}

/// Stored binary file; `path` is relative to the storage root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub id: UploadedFileId,
    pub path: String,
    pub file_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pet {
    pub id: PetId,
    pub name: Option<String>,
    pub pet_type: Option<PetType>,
    pub sex: Option<Sex>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub pet_status: Option<PetStatusRef>,
    pub image_url: Option<String>,
    /// Ordered by upload
    pub gallery: Vec<UploadedFile>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Pet {
    pub fn new(draft: PetDraft) -> Self {
        let now = Utc::now();
        Self {
            id: PetId::new(),
            name: draft.name,
            pet_type: draft.pet_type,
            sex: draft.sex,
            description: draft.description,
            address: draft.address,
            pet_status: draft.pet_status,
            image_url: None,
            gallery: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Name, type and sex are all present
    pub fn is_complete(&self) -> bool {
        self.name.is_some() && self.pet_type.is_some() && self.sex.is_some()
    }

    /// Replace the editable fields; image and gallery are kept
    pub fn apply(&mut self, draft: PetDraft) {
        self.name = draft.name;
        self.pet_type = draft.pet_type;
        self.sex = draft.sex;
        self.description = draft.description;
        self.address = draft.address;
        self.pet_status = draft.pet_status;
        self.updated_at = Utc::now();
    }

    pub fn has_in_gallery(&self, file_id: &UploadedFileId) -> bool {
        self.gallery.iter().any(|file| file.id == *file_id)
    }
}

/// Editable fields of a pet, as submitted by a client
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PetDraft {
    pub name: Option<String>,
    pub pet_type: Option<PetType>,
    pub sex: Option<Sex>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub pet_status: Option<PetStatusRef>,
}

impl PetDraft {
    /// Field-level checks that need no lookups
    pub fn violations(&self) -> Violations {
        let mut violations = Violations::new();

        if let Some(name) = &self.name {
            violations.check(!name.trim().is_empty(), "name", "must not be blank");
            violations.check(
                name.chars().count() <= NAME_MAX_CHARS,
                "name",
                format!("must be at most {NAME_MAX_CHARS} characters"),
            );
        }
        if let Some(description) = &self.description {
            violations.check(
                description.chars().count() <= DESCRIPTION_MAX_CHARS,
                "description",
                format!("must be at most {DESCRIPTION_MAX_CHARS} characters"),
            );
        }
        if let Some(address) = &self.address {
            violations.check(
                address.chars().count() <= ADDRESS_MAX_CHARS,
                "address",
                format!("must be at most {ADDRESS_MAX_CHARS} characters"),
            );
        }

        violations
    }

    pub fn unknown_status_violation() -> FieldViolation {
        FieldViolation::new("petStatus", "must reference an existing pet status")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_draft() -> PetDraft {
        PetDraft {
            name: Some("Burek".into()),
            pet_type: Some(PetType::Dog),
            sex: Some(Sex::Male),
            ..Default::default()
        }
    }

    #[test]
    fn test_completeness_needs_name_type_and_sex() {
        assert!(Pet::new(complete_draft()).is_complete());

        for strip in 0..3 {
            let mut draft = complete_draft();
            match strip {
                0 => draft.name = None,
                1 => draft.pet_type = None,
                _ => draft.sex = None,
            }
            assert!(!Pet::new(draft).is_complete());
        }
    }

    #[test]
    fn test_apply_keeps_images() {
        let mut pet = Pet::new(complete_draft());
        pet.image_url = Some("/storage/a.png".into());
        let id = pet.id;

        pet.apply(PetDraft {
            name: Some("Reksio".into()),
            ..Default::default()
        });

        assert_eq!(pet.id, id);
        assert_eq!(pet.name.as_deref(), Some("Reksio"));
        assert!(pet.pet_type.is_none());
        assert_eq!(pet.image_url.as_deref(), Some("/storage/a.png"));
    }

    #[test]
    fn test_draft_violations() {
        assert!(complete_draft().violations().is_empty());
        assert!(PetDraft::default().violations().is_empty());

        let draft = PetDraft {
            name: Some("   ".into()),
            address: Some("x".repeat(ADDRESS_MAX_CHARS + 1)),
            ..Default::default()
        };
        let violations = draft.violations().into_result().unwrap_err();
        let fields: Vec<_> = violations.iter().map(|v| v.field.as_ref()).collect();
        assert_eq!(fields, vec!["name", "address"]);
    }
}
