use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use shared::{
    domain::{Contact, ContactDraft, ContactId, Tags},
    error::{ApiError, ErrorCode},
};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{error::StoreError, store::ContactStore};

pub(crate) fn draft(name: &str, tags: &str) -> ContactDraft {
    let slug = name.to_ascii_lowercase().replace(' ', ".");
    ContactDraft {
        full_name: name.to_string(),
        email: format!("{slug}@example.com"),
        phone_number: "555-123-4567".to_string(),
        tags: Tags::parse(tags),
    }
}

pub(crate) fn names(contacts: &[Contact]) -> Vec<String> {
    contacts.iter().map(|c| c.full_name.clone()).collect()
}

/// In-memory contact collection shared by the fake HTTP server and the
/// scripted store.
#[derive(Default)]
pub(crate) struct FakeDb {
    next_id: i64,
    pub contacts: Vec<Contact>,
    pub list_calls: usize,
}

impl FakeDb {
    pub fn seeded(drafts: Vec<ContactDraft>) -> Self {
        let mut db = Self::default();
        for draft in drafts {
            db.insert(draft);
        }
        db
    }

    pub fn insert(&mut self, draft: ContactDraft) -> Contact {
        self.next_id += 1;
        let contact = draft.into_contact(ContactId::Numeric(self.next_id));
        self.contacts.push(contact.clone());
        contact
    }

    fn create(&mut self, draft: ContactDraft) -> Result<Contact, ApiError> {
        if draft.full_name.trim().is_empty() {
            return Err(ApiError::new(ErrorCode::Validation, "full_name is required"));
        }
        if self.contacts.iter().any(|c| c.email == draft.email) {
            return Err(ApiError::new(ErrorCode::Validation, "email already in use"));
        }
        Ok(self.insert(draft))
    }

    fn update(&mut self, id: &ContactId, draft: ContactDraft) -> Option<Contact> {
        let slot = self.contacts.iter_mut().find(|c| &c.id == id)?;
        *slot = draft.into_contact(id.clone());
        Some(slot.clone())
    }

    fn delete(&mut self, id: &ContactId) -> bool {
        let before = self.contacts.len();
        self.contacts.retain(|c| &c.id != id);
        self.contacts.len() != before
    }
}

pub(crate) type SharedDb = Arc<Mutex<FakeDb>>;

async fn list_contacts(State(db): State<SharedDb>) -> Json<Vec<Contact>> {
    let mut db = db.lock().await;
    db.list_calls += 1;
    Json(db.contacts.clone())
}

async fn get_contact(
    State(db): State<SharedDb>,
    Path(id): Path<i64>,
) -> Result<Json<Contact>, StatusCode> {
    let db = db.lock().await;
    db.contacts
        .iter()
        .find(|c| c.id == ContactId::Numeric(id))
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn create_contact(
    State(db): State<SharedDb>,
    Json(draft): Json<ContactDraft>,
) -> Result<(StatusCode, Json<Contact>), (StatusCode, Json<ApiError>)> {
    db.lock()
        .await
        .create(draft)
        .map(|contact| (StatusCode::CREATED, Json(contact)))
        .map_err(|err| (StatusCode::BAD_REQUEST, Json(err)))
}

async fn update_contact(
    State(db): State<SharedDb>,
    Path(id): Path<i64>,
    Json(draft): Json<ContactDraft>,
) -> Result<Json<Contact>, StatusCode> {
    db.lock()
        .await
        .update(&ContactId::Numeric(id), draft)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn delete_contact(State(db): State<SharedDb>, Path(id): Path<i64>) -> StatusCode {
    if db.lock().await.delete(&ContactId::Numeric(id)) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn slow_list() -> Json<Vec<Contact>> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(Vec::new())
}

async fn broken_list() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "database offline")
}

pub(crate) struct FakeServer {
    pub url: String,
    pub db: SharedDb,
}

/// Fake contacts backend on an ephemeral port. Besides `/api/contacts` it
/// serves `/slow/api/contacts` (never answers in time) and
/// `/broken/api/contacts` (500).
pub(crate) async fn spawn_contacts_server(drafts: Vec<ContactDraft>) -> FakeServer {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let db: SharedDb = Arc::new(Mutex::new(FakeDb::seeded(drafts)));

    let app = Router::new()
        .route("/api/contacts", get(list_contacts).post(create_contact))
        .route(
            "/api/contacts/:id",
            get(get_contact).put(update_contact).delete(delete_contact),
        )
        .route("/slow/api/contacts", get(slow_list))
        .route("/broken/api/contacts", get(broken_list))
        .with_state(Arc::clone(&db));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    FakeServer {
        url: format!("http://{addr}"),
        db,
    }
}

/// Store double that serves a `FakeDb` directly and can be told to fail
/// every mutating call.
pub(crate) struct TestContactStore {
    pub db: Mutex<FakeDb>,
    pub fail_mutations_with: Option<StoreError>,
    pub fail_lists_with: Mutex<Option<StoreError>>,
    pub list_calls: AtomicUsize,
}

impl TestContactStore {
    pub fn seeded(drafts: Vec<ContactDraft>) -> Self {
        Self {
            db: Mutex::new(FakeDb::seeded(drafts)),
            fail_mutations_with: None,
            fail_lists_with: Mutex::new(None),
            list_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_mutations(drafts: Vec<ContactDraft>, err: StoreError) -> Self {
        let mut store = Self::seeded(drafts);
        store.fail_mutations_with = Some(err);
        store
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn check_mutation(&self) -> Result<(), StoreError> {
        match &self.fail_mutations_with {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ContactStore for TestContactStore {
    async fn list_all(&self) -> Result<Vec<Contact>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.fail_lists_with.lock().await.clone() {
            return Err(err);
        }
        Ok(self.db.lock().await.contacts.clone())
    }

    async fn get(&self, id: &ContactId) -> Result<Contact, StoreError> {
        self.db
            .lock()
            .await
            .contacts
            .iter()
            .find(|c| &c.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn create(&self, draft: &ContactDraft) -> Result<Contact, StoreError> {
        self.check_mutation()?;
        self.db
            .lock()
            .await
            .create(draft.clone())
            .map_err(|err| StoreError::Validation(err.message))
    }

    async fn update(&self, id: &ContactId, draft: &ContactDraft) -> Result<Contact, StoreError> {
        self.check_mutation()?;
        self.db
            .lock()
            .await
            .update(id, draft.clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn delete(&self, id: &ContactId) -> Result<(), StoreError> {
        self.check_mutation()?;
        if self.db.lock().await.delete(id) {
            Ok(())
        } else {
            Err(StoreError::NotFound(id.to_string()))
        }
    }
}
