//! Unit tests for Pets crate
//!
//! Use cases and the HTTP surface run against in-memory doubles.

#[cfg(test)]
pub(crate) mod support {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use auth::{Principal, Role};
    use chrono::Utc;
    use kernel::id::{PetId, PetStatusId, UploadedFileId, UserId};

    use crate::domain::entities::{Pet, PetDraft, PetStatus, UploadedFile};
    use crate::domain::repository::{FileStorage, PetRepository, PetStatusRepository};
    use crate::domain::value_objects::{PetType, Sex};
    use crate::error::{PetsError, PetsResult};

    /// Smallest byte string the image sniffer accepts as PNG
    pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    pub fn principal(role: Role) -> Principal {
        match role {
            Role::Anonymous => Principal::anonymous(),
            other => Principal::authenticated(UserId::new(), [other]),
        }
    }

    pub fn complete_draft(name: &str) -> PetDraft {
        PetDraft {
            name: Some(name.to_string()),
            pet_type: Some(PetType::Dog),
            sex: Some(Sex::Female),
            ..Default::default()
        }
    }

    pub fn incomplete_draft(name: &str) -> PetDraft {
        PetDraft {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[derive(Clone, Default)]
    pub struct InMemoryPetRepo {
        pub pets: Arc<Mutex<Vec<Pet>>>,
        pub statuses: Arc<Mutex<Vec<PetStatus>>>,
        pub fail_gallery_add: Arc<AtomicBool>,
        pub fail_gallery_remove: Arc<AtomicBool>,
    }

    impl InMemoryPetRepo {
        pub fn with_pet(&self, draft: PetDraft) -> PetId {
            let pet = Pet::new(draft);
            let id = pet.id;
            self.pets.lock().unwrap().push(pet);
            id
        }

        pub fn with_status(&self, name: &str) -> PetStatusId {
            let status = PetStatus {
                id: PetStatusId::new(),
                name: name.to_string(),
                rgb: "#00ff00".to_string(),
                public: true,
            };
            let id = status.id;
            self.statuses.lock().unwrap().push(status);
            id
        }

        pub fn pet(&self, id: PetId) -> Option<Pet> {
            self.pets.lock().unwrap().iter().find(|p| p.id == id).cloned()
        }
    }

    impl PetRepository for InMemoryPetRepo {
        async fn find_all(&self) -> PetsResult<Vec<Pet>> {
            Ok(self.pets.lock().unwrap().clone())
        }

        async fn find_complete(&self) -> PetsResult<Vec<Pet>> {
            Ok(self
                .pets
                .lock()
                .unwrap()
                .iter()
                .filter(|p| p.is_complete())
                .cloned()
                .collect())
        }

        async fn find_by_id(&self, id: &PetId) -> PetsResult<Option<Pet>> {
            Ok(self.pet(*id))
        }

        async fn create(&self, pet: &Pet) -> PetsResult<()> {
            self.pets.lock().unwrap().push(pet.clone());
            Ok(())
        }

        async fn update(&self, pet: &Pet) -> PetsResult<bool> {
            let mut pets = self.pets.lock().unwrap();
            match pets.iter_mut().find(|p| p.id == pet.id) {
                Some(stored) => {
                    *stored = pet.clone();
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn delete(&self, id: &PetId) -> PetsResult<bool> {
            let mut pets = self.pets.lock().unwrap();
            let before = pets.len();
            pets.retain(|p| p.id != *id);
            Ok(pets.len() < before)
        }

        async fn update_image_url(&self, id: &PetId, url: &str) -> PetsResult<bool> {
            let mut pets = self.pets.lock().unwrap();
            match pets.iter_mut().find(|p| p.id == *id) {
                Some(pet) => {
                    pet.image_url = Some(url.to_string());
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn add_to_gallery(&self, id: &PetId, file: &UploadedFile) -> PetsResult<bool> {
            if self.fail_gallery_add.load(Ordering::SeqCst) {
                return Err(PetsError::Internal("gallery append failed".into()));
            }
            let mut pets = self.pets.lock().unwrap();
            match pets.iter_mut().find(|p| p.id == *id) {
                Some(pet) => {
                    pet.gallery.push(file.clone());
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn remove_from_gallery(
            &self,
            id: &PetId,
            file_id: &UploadedFileId,
        ) -> PetsResult<bool> {
            if self.fail_gallery_remove.load(Ordering::SeqCst) {
                return Err(PetsError::Internal("gallery detach failed".into()));
            }
            let mut pets = self.pets.lock().unwrap();
            let Some(pet) = pets.iter_mut().find(|p| p.id == *id) else {
                return Ok(false);
            };
            let before = pet.gallery.len();
            pet.gallery.retain(|f| f.id != *file_id);
            Ok(pet.gallery.len() < before)
        }
    }

    impl PetStatusRepository for InMemoryPetRepo {
        async fn find_status(&self, id: &PetStatusId) -> PetsResult<Option<PetStatus>> {
            Ok(self
                .statuses
                .lock()
                .unwrap()
                .iter()
                .find(|s| s.id == *id)
                .cloned())
        }
    }

    #[derive(Clone, Default)]
    pub struct InMemoryStorage {
        pub files: Arc<Mutex<HashMap<UploadedFileId, (UploadedFile, Vec<u8>)>>>,
        pub fail_delete: Arc<AtomicBool>,
        pub delete_calls: Arc<AtomicUsize>,
    }

    impl InMemoryStorage {
        pub fn file_count(&self) -> usize {
            self.files.lock().unwrap().len()
        }
    }

    impl FileStorage for InMemoryStorage {
        async fn store(&self, bytes: &[u8], extension: &str) -> PetsResult<UploadedFile> {
            let id = UploadedFileId::new();
            let file = UploadedFile {
                id,
                path: format!("{id}.{extension}"),
                file_url: None,
                created_at: Utc::now(),
            };
            self.files
                .lock()
                .unwrap()
                .insert(id, (file.clone(), bytes.to_vec()));
            Ok(file)
        }

        async fn get(&self, id: &UploadedFileId) -> PetsResult<Option<UploadedFile>> {
            Ok(self.files.lock().unwrap().get(id).map(|(f, _)| f.clone()))
        }

        async fn delete(&self, id: &UploadedFileId) -> PetsResult<()> {
            self.delete_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_delete.load(Ordering::SeqCst) {
                return Err(PetsError::Storage(std::io::Error::other("disk unavailable")));
            }
            self.files.lock().unwrap().remove(id);
            Ok(())
        }
    }
}

#[cfg(test)]
mod query_tests {
    use std::sync::Arc;

    use auth::Role;
    use kernel::id::PetId;

    use super::support::*;
    use crate::application::PetQueryUseCase;
    use crate::error::PetsError;

    fn seeded() -> (InMemoryPetRepo, PetId, PetId) {
        let repo = InMemoryPetRepo::default();
        let complete = repo.with_pet(complete_draft("Azor"));
        let incomplete = repo.with_pet(incomplete_draft("Bez imienia"));
        (repo, complete, incomplete)
    }

    #[tokio::test]
    async fn test_listing_hides_incomplete_pets_from_non_admins() {
        let (repo, complete, _) = seeded();
        let use_case = PetQueryUseCase::new(Arc::new(repo));

        for role in [Role::Volunteer, Role::Anonymous] {
            let pets = use_case.list(&principal(role)).await.unwrap();
            let ids: Vec<_> = pets.iter().map(|p| p.id).collect();
            assert_eq!(ids, vec![complete]);
        }

        for role in [Role::SuperAdmin, Role::Toz] {
            let pets = use_case.list(&principal(role)).await.unwrap();
            assert_eq!(pets.len(), 2);
        }
    }

    #[tokio::test]
    async fn test_single_fetch_of_incomplete_pet() {
        let (repo, _, incomplete) = seeded();
        let use_case = PetQueryUseCase::new(Arc::new(repo));

        let result = use_case.get(&principal(Role::Volunteer), incomplete).await;
        assert!(matches!(result, Err(PetsError::PermissionDenied(_))));

        let result = use_case.get(&principal(Role::Anonymous), incomplete).await;
        assert!(matches!(result, Err(PetsError::PermissionDenied(_))));

        let pet = use_case.get(&principal(Role::Toz), incomplete).await.unwrap();
        assert_eq!(pet.id, incomplete);
    }

    #[tokio::test]
    async fn test_missing_pet_is_not_found_for_everyone() {
        let (repo, _, _) = seeded();
        let use_case = PetQueryUseCase::new(Arc::new(repo));

        let result = use_case.get(&principal(Role::Anonymous), PetId::new()).await;
        assert!(matches!(result, Err(PetsError::PetNotFound(_))));
    }
}

#[cfg(test)]
mod command_tests {
    use std::sync::Arc;

    use auth::Role;
    use kernel::id::{PetId, PetStatusId};

    use super::support::*;
    use crate::application::PetCommandUseCase;
    use crate::domain::entities::{PetDraft, PetStatusRef};
    use crate::error::PetsError;

    #[tokio::test]
    async fn test_create_requires_admin() {
        let repo = Arc::new(InMemoryPetRepo::default());
        let use_case = PetCommandUseCase::new(repo.clone());

        for role in [Role::Volunteer, Role::Anonymous] {
            let result = use_case.create(&principal(role), complete_draft("Azor")).await;
            assert!(matches!(result, Err(PetsError::PermissionDenied(_))));
        }
        assert!(repo.pets.lock().unwrap().is_empty());

        let pet = use_case
            .create(&principal(Role::SuperAdmin), complete_draft("Azor"))
            .await
            .unwrap();
        assert!(repo.pet(pet.id).is_some());
    }

    #[tokio::test]
    async fn test_incomplete_pet_can_be_saved() {
        let repo = Arc::new(InMemoryPetRepo::default());
        let use_case = PetCommandUseCase::new(repo.clone());

        let pet = use_case
            .create(&principal(Role::Toz), PetDraft::default())
            .await
            .unwrap();
        assert!(!pet.is_complete());
    }

    #[tokio::test]
    async fn test_create_validates_fields_and_status() {
        let repo = Arc::new(InMemoryPetRepo::default());
        let status = repo.with_status("Szuka domu");
        let use_case = PetCommandUseCase::new(repo.clone());

        let draft = PetDraft {
            name: Some("".into()),
            pet_status: Some(PetStatusRef {
                id: PetStatusId::new(),
            }),
            ..Default::default()
        };
        let Err(PetsError::Validation(violations)) =
            use_case.create(&principal(Role::Toz), draft).await
        else {
            panic!("expected validation failure");
        };
        let fields: Vec<_> = violations.iter().map(|v| v.field.as_ref()).collect();
        assert_eq!(fields, vec!["name", "petStatus"]);

        let draft = PetDraft {
            pet_status: Some(PetStatusRef { id: status }),
            ..complete_draft("Azor")
        };
        let pet = use_case.create(&principal(Role::Toz), draft).await.unwrap();
        assert_eq!(pet.pet_status, Some(PetStatusRef { id: status }));
    }

    #[tokio::test]
    async fn test_update_checks_roles_before_body_and_existence() {
        let repo = Arc::new(InMemoryPetRepo::default());
        let use_case = PetCommandUseCase::new(repo.clone());
        let invalid = PetDraft {
            name: Some("x".repeat(36)),
            ..Default::default()
        };

        let result = use_case
            .update(&principal(Role::Volunteer), PetId::new(), invalid.clone())
            .await;
        assert!(matches!(result, Err(PetsError::PermissionDenied(_))));

        let result = use_case
            .update(&principal(Role::Toz), PetId::new(), invalid)
            .await;
        assert!(matches!(result, Err(PetsError::Validation(_))));

        let result = use_case
            .update(&principal(Role::Toz), PetId::new(), complete_draft("Azor"))
            .await;
        assert!(matches!(result, Err(PetsError::PetNotFound(_))));
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let repo = Arc::new(InMemoryPetRepo::default());
        let id = repo.with_pet(complete_draft("Azor"));
        let use_case = PetCommandUseCase::new(repo.clone());

        let pet = use_case
            .update(&principal(Role::SuperAdmin), id, incomplete_draft("Reksio"))
            .await
            .unwrap();
        assert_eq!(pet.name.as_deref(), Some("Reksio"));
        assert!(!repo.pet(id).unwrap().is_complete());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = Arc::new(InMemoryPetRepo::default());
        let id = repo.with_pet(complete_draft("Azor"));
        let use_case = PetCommandUseCase::new(repo.clone());

        let result = use_case.delete(&principal(Role::Volunteer), id).await;
        assert!(matches!(result, Err(PetsError::PermissionDenied(_))));

        use_case.delete(&principal(Role::Toz), id).await.unwrap();
        assert!(repo.pet(id).is_none());

        let result = use_case.delete(&principal(Role::Toz), id).await;
        assert!(matches!(result, Err(PetsError::PetNotFound(_))));
    }
}

#[cfg(test)]
mod image_tests {
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    use auth::Role;
    use kernel::id::{PetId, UploadedFileId};

    use super::support::*;
    use crate::application::{PetImageUseCase, PetsConfig};
    use crate::error::PetsError;

    struct Fixture {
        repo: Arc<InMemoryPetRepo>,
        storage: Arc<InMemoryStorage>,
        pet_id: PetId,
        use_case: PetImageUseCase<InMemoryPetRepo, InMemoryStorage>,
    }

    fn fixture() -> Fixture {
        let repo = Arc::new(InMemoryPetRepo::default());
        let storage = Arc::new(InMemoryStorage::default());
        let pet_id = repo.with_pet(complete_draft("Azor"));
        let use_case = PetImageUseCase::new(
            repo.clone(),
            storage.clone(),
            Arc::new(PetsConfig::default()),
        );
        Fixture {
            repo,
            storage,
            pet_id,
            use_case,
        }
    }

    async fn gallery_image(f: &Fixture) -> UploadedFileId {
        f.use_case
            .upload_gallery_image(&principal(Role::Toz), f.pet_id, Some(PNG_BYTES.to_vec()))
            .await
            .unwrap();
        f.repo.pet(f.pet_id).unwrap().gallery.last().unwrap().id
    }

    #[tokio::test]
    async fn test_main_image_upload_sets_url() {
        let f = fixture();

        let url = f
            .use_case
            .upload_main_image(&principal(Role::Toz), f.pet_id, Some(PNG_BYTES.to_vec()))
            .await
            .unwrap();

        assert!(url.starts_with("/storage/"));
        assert!(url.ends_with(".png"));
        assert_eq!(f.repo.pet(f.pet_id).unwrap().image_url, Some(url));
        assert_eq!(f.storage.file_count(), 1);
    }

    #[tokio::test]
    async fn test_upload_rejections() {
        let f = fixture();
        let admin = principal(Role::SuperAdmin);

        let result = f
            .use_case
            .upload_main_image(&principal(Role::Volunteer), f.pet_id, Some(PNG_BYTES.to_vec()))
            .await;
        assert!(matches!(result, Err(PetsError::PermissionDenied(_))));

        let result = f
            .use_case
            .upload_main_image(&admin, PetId::new(), Some(PNG_BYTES.to_vec()))
            .await;
        assert!(matches!(result, Err(PetsError::PetNotFound(_))));

        let result = f.use_case.upload_main_image(&admin, f.pet_id, None).await;
        assert!(matches!(result, Err(PetsError::MissingFile)));

        let result = f
            .use_case
            .upload_gallery_image(&admin, f.pet_id, Some(b"%PDF-1.7".to_vec()))
            .await;
        assert!(matches!(result, Err(PetsError::InvalidImage)));

        assert_eq!(f.storage.file_count(), 0);
    }

    #[tokio::test]
    async fn test_gallery_upload_appends_file_with_url() {
        let f = fixture();
        let first = gallery_image(&f).await;
        let second = gallery_image(&f).await;

        let gallery = f.repo.pet(f.pet_id).unwrap().gallery;
        let ids: Vec<_> = gallery.iter().map(|file| file.id).collect();
        assert_eq!(ids, vec![first, second]);
        assert_eq!(
            gallery[0].file_url.as_deref(),
            Some(format!("/storage/{}", gallery[0].path).as_str())
        );
    }

    #[tokio::test]
    async fn test_failed_gallery_commit_deletes_stored_file() {
        let f = fixture();
        f.repo.fail_gallery_add.store(true, Ordering::SeqCst);

        let result = f
            .use_case
            .upload_gallery_image(&principal(Role::Toz), f.pet_id, Some(PNG_BYTES.to_vec()))
            .await;

        assert!(matches!(result, Err(PetsError::Internal(_))));
        assert_eq!(f.storage.file_count(), 0);
        assert_eq!(f.storage.delete_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_remove_gallery_image() {
        let f = fixture();
        let image = gallery_image(&f).await;

        f.use_case
            .remove_gallery_image(&principal(Role::Toz), f.pet_id, image)
            .await
            .unwrap();

        assert!(f.repo.pet(f.pet_id).unwrap().gallery.is_empty());
        assert_eq!(f.storage.file_count(), 0);
    }

    #[tokio::test]
    async fn test_remove_gallery_image_preconditions() {
        let f = fixture();
        let admin = principal(Role::Toz);
        let image = gallery_image(&f).await;

        let result = f
            .use_case
            .remove_gallery_image(&principal(Role::Volunteer), f.pet_id, image)
            .await;
        assert!(matches!(result, Err(PetsError::PermissionDenied(_))));

        let result = f
            .use_case
            .remove_gallery_image(&admin, f.pet_id, UploadedFileId::new())
            .await;
        assert!(matches!(result, Err(PetsError::ImageNotFound(_))));

        let result = f
            .use_case
            .remove_gallery_image(&admin, PetId::new(), image)
            .await;
        assert!(matches!(result, Err(PetsError::PetNotFound(_))));

        let other_pet = f.repo.with_pet(complete_draft("Reksio"));
        let result = f
            .use_case
            .remove_gallery_image(&admin, other_pet, image)
            .await;
        assert!(matches!(result, Err(PetsError::ImageNotInGallery { .. })));

        assert_eq!(f.storage.delete_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_detach_failure_still_deletes_stored_file() {
        let f = fixture();
        let image = gallery_image(&f).await;
        f.repo.fail_gallery_remove.store(true, Ordering::SeqCst);

        let result = f
            .use_case
            .remove_gallery_image(&principal(Role::Toz), f.pet_id, image)
            .await;

        assert!(matches!(result, Err(PetsError::GalleryDetachFailed(_))));
        assert_eq!(f.storage.delete_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_delete_failure_after_detach_is_reported() {
        let f = fixture();
        let image = gallery_image(&f).await;
        f.storage.fail_delete.store(true, Ordering::SeqCst);

        let result = f
            .use_case
            .remove_gallery_image(&principal(Role::Toz), f.pet_id, image)
            .await;

        assert!(matches!(result, Err(PetsError::StoredFileDeleteFailed(_))));
        assert!(f.repo.pet(f.pet_id).unwrap().gallery.is_empty());
    }

    #[tokio::test]
    async fn test_both_phases_failing_reports_detach() {
        let f = fixture();
        let image = gallery_image(&f).await;
        f.repo.fail_gallery_remove.store(true, Ordering::SeqCst);
        f.storage.fail_delete.store(true, Ordering::SeqCst);

        let result = f
            .use_case
            .remove_gallery_image(&principal(Role::Toz), f.pet_id, image)
            .await;

        assert!(matches!(result, Err(PetsError::GalleryDetachFailed(_))));
        assert_eq!(f.storage.delete_calls.load(Ordering::SeqCst), 1);
    }
}

#[cfg(test)]
mod router_tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::{Extension, Router};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use auth::Role;

    use super::support::*;
    use crate::application::PetsConfig;
    use crate::presentation::router::pets_router_generic;

    const BOUNDARY: &str = "shelter-boundary";

    fn app(repo: &InMemoryPetRepo, storage: &InMemoryStorage, role: Role) -> Router {
        Router::new()
            .nest(
                "/pets",
                pets_router_generic(repo.clone(), storage.clone(), PetsConfig::default()),
            )
            .layer(Extension(principal(role)))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_request(uri: &str, field: &str, bytes: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; \
                 filename=\"upload.bin\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_anonymous_listing_and_fetch() {
        let repo = InMemoryPetRepo::default();
        let storage = InMemoryStorage::default();
        let complete = repo.with_pet(complete_draft("Azor"));
        let incomplete = repo.with_pet(incomplete_draft("Bez imienia"));
        let app = app(&repo, &storage, Role::Anonymous);

        let response = app.clone().oneshot(get_request("/pets")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["id"], complete.to_string());
        assert_eq!(body[0]["type"], "DOG");

        let response = app
            .clone()
            .oneshot(get_request(&format!("/pets/{incomplete}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await["code"], "PERMISSION_DENIED");

        let response = app
            .oneshot(get_request(&format!("/pets/{}", kernel::id::PetId::new())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let app = app(
            &InMemoryPetRepo::default(),
            &InMemoryStorage::default(),
            Role::Toz,
        );

        let response = app.oneshot(get_request("/pets/not-a-uuid")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_create_returns_location() {
        let repo = InMemoryPetRepo::default();
        let app = app(&repo, &InMemoryStorage::default(), Role::Toz);

        let response = app
            .oneshot(json_request(
                "POST",
                "/pets",
                json!({ "name": "Azor", "type": "DOG", "sex": "MALE" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let location = response.headers()[header::LOCATION]
            .to_str()
            .unwrap()
            .to_string();
        let body = body_json(response).await;
        assert_eq!(location, format!("/pets/{}", body["id"].as_str().unwrap()));
        assert_eq!(body["sex"], "MALE");
        assert_eq!(body["petStatus"], Value::Null);
        assert_eq!(repo.pets.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejections() {
        let repo = InMemoryPetRepo::default();
        let storage = InMemoryStorage::default();

        let response = app(&repo, &storage, Role::Volunteer)
            .oneshot(json_request("POST", "/pets", json!({ "name": "Azor" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let admin = app(&repo, &storage, Role::SuperAdmin);

        let response = admin
            .clone()
            .oneshot(json_request(
                "POST",
                "/pets",
                json!({ "name": "x".repeat(36), "address": "ok" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["violations"][0]["field"], "name");

        let response = admin
            .oneshot(json_request("POST", "/pets", json!({ "type": "BIRD" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

        assert!(repo.pets.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = InMemoryPetRepo::default();
        let id = repo.with_pet(complete_draft("Azor"));
        let app = app(&repo, &InMemoryStorage::default(), Role::Toz);

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/pets/{id}"),
                json!({ "name": "Reksio", "type": "CAT", "sex": "FEMALE" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["type"], "CAT");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/pets/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/pets/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_image_upload() {
        let repo = InMemoryPetRepo::default();
        let storage = InMemoryStorage::default();
        let id = repo.with_pet(complete_draft("Azor"));
        let app = app(&repo, &storage, Role::Toz);

        let uri = format!("/pets/{id}/images");
        let response = app
            .clone()
            .oneshot(multipart_request(&uri, "file", PNG_BYTES))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::LOCATION], uri.as_str());
        let body = body_json(response).await;
        assert_eq!(
            repo.pet(id).unwrap().image_url.as_deref(),
            body["url"].as_str()
        );

        let response = app
            .clone()
            .oneshot(multipart_request(&uri, "other", PNG_BYTES))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(multipart_request(&uri, "file", b"plain text"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["code"], "UNPROCESSABLE_ENTITY");

        assert_eq!(storage.file_count(), 1);
    }

    #[tokio::test]
    async fn test_upload_refused_before_body_is_read() {
        let repo = InMemoryPetRepo::default();
        let storage = InMemoryStorage::default();
        let id = repo.with_pet(complete_draft("Azor"));

        for uri in [format!("/pets/{id}/images"), format!("/pets/{id}/gallery")] {
            let response = app(&repo, &storage, Role::Volunteer)
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri(&uri)
                        .header(header::CONTENT_TYPE, "text/plain")
                        .body(Body::from("not multipart"))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
            assert_eq!(body_json(response).await["code"], "PERMISSION_DENIED");
        }

        let response = app(&repo, &storage, Role::Toz)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/pets/{id}/images"))
                    .header(header::CONTENT_TYPE, "text/plain")
                    .body(Body::from("not multipart"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(storage.file_count(), 0);
    }

    #[tokio::test]
    async fn test_gallery_upload_and_removal() {
        let repo = InMemoryPetRepo::default();
        let storage = InMemoryStorage::default();
        let id = repo.with_pet(complete_draft("Azor"));
        let app = app(&repo, &storage, Role::SuperAdmin);

        let response = app
            .clone()
            .oneshot(multipart_request(
                &format!("/pets/{id}/gallery"),
                "file",
                PNG_BYTES,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let pet = repo.pet(id).unwrap();
        assert_eq!(pet.gallery.len(), 1);
        let image = pet.gallery[0].id;

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/pets/{id}/gallery/{image}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(repo.pet(id).unwrap().gallery.is_empty());
        assert_eq!(storage.file_count(), 0);
    }
}

#[cfg(test)]
mod auth_layer_tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use kernel::id::UserId;
    use tower::ServiceExt;
    use uuid::Uuid;

    use auth::domain::entity::{auth_session::AuthSession, user::User};
    use auth::domain::repository::{AuthSessionRepository, UserRepository};
    use auth::domain::value_object::email::Email;
    use auth::{AuthConfig, AuthResult, with_authentication};

    use super::support::*;
    use crate::application::PetsConfig;
    use crate::presentation::router::pets_router_generic;

    /// Session store with nobody signed in
    #[derive(Clone)]
    struct NoSessions;

    impl UserRepository for NoSessions {
        async fn find_by_id(&self, _user_id: &UserId) -> AuthResult<Option<User>> {
            Ok(None)
        }

        async fn find_by_email(&self, _email: &Email) -> AuthResult<Option<User>> {
            Ok(None)
        }
    }

    impl AuthSessionRepository for NoSessions {
        async fn create(&self, _session: &AuthSession) -> AuthResult<()> {
            Ok(())
        }

        async fn find_by_id(&self, _session_id: Uuid) -> AuthResult<Option<AuthSession>> {
            Ok(None)
        }

        async fn touch(&self, _session: &AuthSession) -> AuthResult<()> {
            Ok(())
        }

        async fn delete(&self, _session_id: Uuid) -> AuthResult<()> {
            Ok(())
        }

        async fn cleanup_expired(&self) -> AuthResult<u64> {
            Ok(0)
        }
    }

    fn app(repo: &InMemoryPetRepo) -> Router {
        let routes = Router::new().nest(
            "/pets",
            pets_router_generic(
                repo.clone(),
                InMemoryStorage::default(),
                PetsConfig::default(),
            ),
        );
        with_authentication(routes, NoSessions, AuthConfig::default())
    }

    #[tokio::test]
    async fn test_visitor_without_session_reads_but_cannot_write() {
        let repo = InMemoryPetRepo::default();
        let id = repo.with_pet(complete_draft("Azor"));

        let response = app(&repo)
            .oneshot(Request::builder().uri("/pets").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app(&repo)
            .oneshot(
                Request::builder()
                    .uri(format!("/pets/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app(&repo)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/pets")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"Burek"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(repo.pets.lock().unwrap().len(), 1);
    }
}

#[cfg(test)]
mod error_tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use kernel::error::kind::ErrorKind;
    use kernel::id::PetId;

    use auth::{PermissionDenied, Role};

    use crate::error::PetsError;

    #[test]
    fn test_error_into_response_status_codes() {
        let cases = vec![
            (PetsError::PetNotFound(PetId::new()), StatusCode::NOT_FOUND),
            (
                PetsError::PermissionDenied(PermissionDenied::requiring(&Role::ADMINS)),
                StatusCode::FORBIDDEN,
            ),
            (PetsError::Validation(vec![]), StatusCode::BAD_REQUEST),
            (PetsError::MissingFile, StatusCode::BAD_REQUEST),
            (PetsError::InvalidImage, StatusCode::UNPROCESSABLE_ENTITY),
            (
                PetsError::StoredFileDeleteFailed(Box::new(PetsError::Internal("x".into()))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status_code(), expected);
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let error = PetsError::Internal("connection string leaked".into());
        assert_eq!(error.kind(), ErrorKind::InternalServerError);

        let app_error = error.into_app_error();
        assert!(!app_error.message().contains("connection string"));
    }
}
