//! PostgreSQL Repository Implementations

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use kernel::id::{PetId, PetStatusId, UploadedFileId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{Pet, PetStatus, PetStatusRef, UploadedFile};
use crate::domain::repository::{PetRepository, PetStatusRepository};
use crate::domain::value_objects::{PetType, Sex};
use crate::error::{PetsError, PetsResult};

const PET_COLUMNS: &str = r#"
    id,
    name,
    pet_type,
    sex,
    description,
    address,
    pet_status_id,
    image_url,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed pet and pet-status repository
#[derive(Clone)]
pub struct PgPetRepository {
    pool: PgPool,
}

impl PgPetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach galleries to freshly loaded rows, preserving row order
    async fn with_galleries(&self, rows: Vec<PetRow>) -> PetsResult<Vec<Pet>> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

        let entries = sqlx::query_as::<_, GalleryRow>(
            r#"
            SELECT
                g.pet_id,
                f.id,
                f.path,
                f.file_url,
                f.created_at
            FROM pet_gallery g
            JOIN uploaded_files f ON f.id = g.file_id
            WHERE g.pet_id = ANY($1)
            ORDER BY g.pet_id, g.position
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut galleries: HashMap<Uuid, Vec<UploadedFile>> = HashMap::new();
        for entry in entries {
            galleries
                .entry(entry.pet_id)
                .or_default()
                .push(entry.into_file());
        }

        rows.into_iter()
            .map(|row| {
                let gallery = galleries.remove(&row.id).unwrap_or_default();
                row.into_pet(gallery)
            })
            .collect()
    }
}

// ============================================================================
// Pet Repository Implementation
// ============================================================================

impl PetRepository for PgPetRepository {
    async fn find_all(&self) -> PetsResult<Vec<Pet>> {
        let rows = sqlx::query_as::<_, PetRow>(&format!(
            "SELECT {PET_COLUMNS} FROM pets ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        self.with_galleries(rows).await
    }

    async fn find_complete(&self) -> PetsResult<Vec<Pet>> {
        let rows = sqlx::query_as::<_, PetRow>(&format!(
            r#"
            SELECT {PET_COLUMNS} FROM pets
            WHERE name IS NOT NULL AND pet_type IS NOT NULL AND sex IS NOT NULL
            ORDER BY created_at
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        self.with_galleries(rows).await
    }

    async fn find_by_id(&self, id: &PetId) -> PetsResult<Option<Pet>> {
        let row = sqlx::query_as::<_, PetRow>(&format!(
            "SELECT {PET_COLUMNS} FROM pets WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(self.with_galleries(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn create(&self, pet: &Pet) -> PetsResult<()> {
        sqlx::query(
            r#"
            INSERT INTO pets (
                id,
                name,
                pet_type,
                sex,
                description,
                address,
                pet_status_id,
                image_url,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(pet.id.as_uuid())
        .bind(&pet.name)
        .bind(pet.pet_type.map(|t| t.to_string()))
        .bind(pet.sex.map(|s| s.to_string()))
        .bind(&pet.description)
        .bind(&pet.address)
        .bind(pet.pet_status.map(|s| s.id.into_uuid()))
        .bind(&pet.image_url)
        .bind(pet.created_at)
        .bind(pet.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, pet: &Pet) -> PetsResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE pets SET
                name = $2,
                pet_type = $3,
                sex = $4,
                description = $5,
                address = $6,
                pet_status_id = $7,
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(pet.id.as_uuid())
        .bind(&pet.name)
        .bind(pet.pet_type.map(|t| t.to_string()))
        .bind(pet.sex.map(|s| s.to_string()))
        .bind(&pet.description)
        .bind(&pet.address)
        .bind(pet.pet_status.map(|s| s.id.into_uuid()))
        .bind(pet.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, id: &PetId) -> PetsResult<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM pet_gallery WHERE pet_id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM pets WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        Ok(deleted == 1)
    }

    async fn update_image_url(&self, id: &PetId, url: &str) -> PetsResult<bool> {
        let result =
            sqlx::query("UPDATE pets SET image_url = $2, updated_at = NOW() WHERE id = $1")
                .bind(id.as_uuid())
                .bind(url)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn add_to_gallery(&self, id: &PetId, file: &UploadedFile) -> PetsResult<bool> {
        let mut tx = self.pool.begin().await?;

        // Lock the pet row so concurrent appends get distinct positions
        let locked = sqlx::query("SELECT id FROM pets WHERE id = $1 FOR UPDATE")
            .bind(id.as_uuid())
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Ok(false);
        }

        sqlx::query("UPDATE uploaded_files SET file_url = $2 WHERE id = $1")
            .bind(file.id.as_uuid())
            .bind(&file.file_url)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO pet_gallery (pet_id, file_id, position)
            SELECT $1, $2, COALESCE(MAX(position) + 1, 0)
            FROM pet_gallery
            WHERE pet_id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(file.id.as_uuid())
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE pets SET updated_at = NOW() WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(true)
    }

    async fn remove_from_gallery(
        &self,
        id: &PetId,
        file_id: &UploadedFileId,
    ) -> PetsResult<bool> {
        let result = sqlx::query("DELETE FROM pet_gallery WHERE pet_id = $1 AND file_id = $2")
            .bind(id.as_uuid())
            .bind(file_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}

// ============================================================================
// Pet Status Repository Implementation
// ============================================================================

impl PetStatusRepository for PgPetRepository {
    async fn find_status(&self, id: &PetStatusId) -> PetsResult<Option<PetStatus>> {
        let row = sqlx::query_as::<_, PetStatusRow>(
            "SELECT id, name, rgb, public FROM pet_statuses WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PetStatusRow::into_status))
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct PetRow {
    id: Uuid,
    name: Option<String>,
    pet_type: Option<String>,
    sex: Option<String>,
    description: Option<String>,
    address: Option<String>,
    pet_status_id: Option<Uuid>,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PetRow {
    fn into_pet(self, gallery: Vec<UploadedFile>) -> PetsResult<Pet> {
        let pet_type = self
            .pet_type
            .map(|code| {
                PetType::from_code(&code)
                    .ok_or_else(|| PetsError::Internal(format!("Unknown pet type: {code}")))
            })
            .transpose()?;
        let sex = self
            .sex
            .map(|code| {
                Sex::from_code(&code)
                    .ok_or_else(|| PetsError::Internal(format!("Unknown sex: {code}")))
            })
            .transpose()?;

        Ok(Pet {
            id: PetId::from_uuid(self.id),
            name: self.name,
            pet_type,
            sex,
            description: self.description,
            address: self.address,
            pet_status: self.pet_status_id.map(|id| PetStatusRef {
                id: PetStatusId::from_uuid(id),
            }),
            image_url: self.image_url,
            gallery,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct GalleryRow {
    pet_id: Uuid,
    id: Uuid,
    path: String,
    file_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl GalleryRow {
    fn into_file(self) -> UploadedFile {
        UploadedFile {
            id: UploadedFileId::from_uuid(self.id),
            path: self.path,
            file_url: self.file_url,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct UploadedFileRow {
    pub id: Uuid,
    pub path: String,
    pub file_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UploadedFileRow {
    pub(crate) fn into_file(self) -> UploadedFile {
        UploadedFile {
            id: UploadedFileId::from_uuid(self.id),
            path: self.path,
            file_url: self.file_url,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PetStatusRow {
    id: Uuid,
    name: String,
    rgb: String,
    public: bool,
}

impl PetStatusRow {
    fn into_status(self) -> PetStatus {
        PetStatus {
            id: PetStatusId::from_uuid(self.id),
            name: self.name,
            rgb: self.rgb,
            public: self.public,
        }
    }
}
