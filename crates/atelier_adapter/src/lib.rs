#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod http;
pub mod journal;

pub mod grpc_api {
    tonic::include_proto!("atelier.adapter.v1");
}

use std::sync::{
    Arc, Mutex, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
};
use std::time::{SystemTime, UNIX_EPOCH};

use atelier_contracts::contact::{
    ContactSubmissionId, ContactSubmissionInput, ContactSubmissionRecord,
};
use atelier_contracts::gallery::{Category, GalleryItemId, GalleryItemInput, GalleryItemRecord};
use atelier_contracts::ownership::{ClaimDecision, OwnerState, ReadDecision};
use atelier_contracts::{MonotonicTimeNs, Principal};
use atelier_engines::ownership_gate::{
    reason_code_for_claim, reason_code_for_read, OwnershipGate,
};
use atelier_storage::store::{StorageError, StudioStore};

pub use config::AdapterConfig;
pub use error::{AdapterError, AdapterErrorResponse};
pub use journal::{Journal, JournalEvent};

/// Rendered in place of an owner by transports when the cell is empty.
pub const NO_OWNER_DISPLAY: &str = "No owner set yet.";

/// Pieces shown on a fresh site until the owner curates their own.
pub const SEED_GALLERY_CATALOGUE: [(&str, Category, &str, &str); 6] = [
    (
        "Elegant Woman Portrait",
        Category::PencilSketch,
        "Detailed pencil sketch capturing graceful feminine features",
        "/assets/generated/portrait-sketch-1.dim_600x750.jpg",
    ),
    (
        "Couple's Cherished Moment",
        Category::PortraitArt,
        "A beautiful portrait capturing the bond between two souls",
        "/assets/generated/portrait-sketch-2.dim_600x750.jpg",
    ),
    (
        "Childhood Innocence",
        Category::PencilSketch,
        "A delicate child portrait full of wonder and joy",
        "/assets/generated/portrait-sketch-3.dim_600x750.jpg",
    ),
    (
        "Wisdom in Lines",
        Category::PortraitArt,
        "Portrait of an elderly gentleman with dignified presence",
        "/assets/generated/portrait-sketch-4.dim_600x750.jpg",
    ),
    (
        "Family Legacy",
        Category::CustomOrders,
        "A custom multi-person family portrait, full of love",
        "/assets/generated/portrait-sketch-5.dim_600x750.jpg",
    ),
    (
        "Bridal Radiance",
        Category::CustomOrders,
        "An exquisite bridal portrait capturing timeless elegance",
        "/assets/generated/portrait-sketch-6.dim_600x750.jpg",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OwnerView {
    pub status: String,
    pub owner: Option<String>,
    pub display: String,
}

impl OwnerView {
    pub fn from_owner(owner: Option<&Principal>) -> Self {
        Self {
            status: "ok".to_string(),
            owner: owner.map(|p| p.to_string()),
            display: owner_display(owner),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClaimOwnerResponse {
    pub status: String,
    pub outcome: String,
    pub owner: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ContactSubmissionView {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub message: String,
    pub timestamp_ns: u64,
}

impl From<&ContactSubmissionRecord> for ContactSubmissionView {
    fn from(row: &ContactSubmissionRecord) -> Self {
        Self {
            id: row.contact_submission_id.0,
            name: row.name.clone(),
            email: row.email.clone(),
            message: row.message.clone(),
            timestamp_ns: row.submitted_at.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ContactSubmissionsResponse {
    pub status: String,
    pub submissions: Vec<ContactSubmissionView>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ContactFormRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ContactFormResponse {
    pub status: String,
    pub contact_submission_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GalleryItemView {
    pub id: u64,
    pub title: String,
    pub category: Category,
    pub description: String,
    pub image_url: String,
}

impl From<&GalleryItemRecord> for GalleryItemView {
    fn from(row: &GalleryItemRecord) -> Self {
        Self {
            id: row.gallery_item_id.0,
            title: row.title.clone(),
            category: row.category,
            description: row.description.clone(),
            image_url: row.image_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GalleryItemsResponse {
    pub status: String,
    pub items: Vec<GalleryItemView>,
}

/// Category travels as its wire name and is parsed by the runtime, so an
/// unknown category is a 400 like every other invalid field.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AddGalleryItemRequest {
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AddGalleryItemResponse {
    pub status: String,
    pub gallery_item_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SeedGalleryResponse {
    pub status: String,
    pub seeded: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AdapterHealthResponse {
    pub status: String,
    pub outcome: String,
    pub owner_claimed: bool,
    pub contact_submissions: usize,
    pub gallery_items: usize,
}

/// Handler context shared by the HTTP and gRPC transports.
///
/// The owner is published in a `OnceLock`, so `get_owner` and the
/// submissions gate never wait on a writer. Claims serialize on their own
/// mutex around check, journal append and publish; ledger writes serialize
/// on a second mutex. The store `RwLock` is only held for in-memory work,
/// never across journal I/O.
#[derive(Debug, Clone)]
pub struct StudioRuntime {
    gate: OwnershipGate,
    owner: Arc<OnceLock<Principal>>,
    claim_lock: Arc<Mutex<()>>,
    ledger_lock: Arc<Mutex<()>>,
    store: Arc<RwLock<StudioStore>>,
    journal: Option<Journal>,
}

impl Default for StudioRuntime {
    fn default() -> Self {
        Self::new(StudioStore::new_in_memory())
    }
}

impl StudioRuntime {
    pub fn new(store: StudioStore) -> Self {
        Self::from_parts(store, None)
    }

    /// Replays `journal` into a fresh store; later mutations append to it.
    pub fn new_with_journal(journal: Journal) -> Result<Self, AdapterError> {
        let mut store = StudioStore::new_in_memory();
        let applied = journal.replay_into(&mut store)?;
        tracing::info!(
            path = %journal.path().display(),
            events = applied,
            owner_claimed = store.owner().is_some(),
            "studio journal replayed"
        );
        Ok(Self::from_parts(store, Some(journal)))
    }

    fn from_parts(store: StudioStore, journal: Option<Journal>) -> Self {
        let owner = OnceLock::new();
        if let Some(principal) = store.owner_principal() {
            let _ = owner.set(principal.clone());
        }
        Self {
            gate: OwnershipGate::new(),
            owner: Arc::new(owner),
            claim_lock: Arc::new(Mutex::new(())),
            ledger_lock: Arc::new(Mutex::new(())),
            store: Arc::new(RwLock::new(store)),
            journal,
        }
    }

    pub fn from_config(config: &AdapterConfig) -> Result<Self, AdapterError> {
        let runtime = Self::new_with_journal(Journal::open(&config.store_path)?)?;
        if config.seed_gallery {
            runtime.seed_initial_gallery_items()?;
        }
        Ok(runtime)
    }

    fn read_store(&self) -> RwLockReadGuard<'_, StudioStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_store(&self) -> RwLockWriteGuard<'_, StudioStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn journal_append(&self, event: JournalEvent) -> Result<(), AdapterError> {
        match self.journal.as_ref() {
            Some(journal) => journal.append(event),
            None => Ok(()),
        }
    }

    pub fn get_owner(&self) -> Option<Principal> {
        self.owner.get().cloned()
    }

    pub fn owner_state(&self) -> OwnerState {
        OwnerState::from_owner(self.owner.get())
    }

    pub fn claim_owner(&self, caller: &Principal) -> Result<Principal, AdapterError> {
        self.claim_owner_at(caller, MonotonicTimeNs(system_time_now_ns()))
    }

    pub fn claim_owner_at(
        &self,
        caller: &Principal,
        now: MonotonicTimeNs,
    ) -> Result<Principal, AdapterError> {
        let _claim = self
            .claim_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let decision = self.gate.evaluate_claim(caller, self.owner.get());
        let reason_code = reason_code_for_claim(&decision);
        let owner = match decision {
            ClaimDecision::Accept { owner } => owner,
            ClaimDecision::Refuse(refusal) => {
                tracing::warn!(
                    caller = %caller,
                    outcome = refusal.outcome_label(),
                    reason_code = %reason_code,
                    "owner claim refused"
                );
                return Err(refusal.into());
            }
        };

        self.journal_append(JournalEvent::OwnerClaimed {
            principal: owner.to_string(),
            claimed_at_ns: now.0,
        })?;
        self.owner
            .set(owner.clone())
            .map_err(|_| StorageError::AppendOnlyViolation { table: "owner" })?;
        self.write_store().set_owner_once(owner.clone(), now)?;
        tracing::info!(owner = %owner, reason_code = %reason_code, "owner claimed");
        Ok(owner)
    }

    /// Gate decision alone, without copying rows out.
    pub fn authorize_submissions_read(&self, caller: &Principal) -> ReadDecision {
        self.gate.evaluate_submissions_read(caller, self.owner.get())
    }

    pub fn list_contact_submissions(
        &self,
        caller: &Principal,
    ) -> Result<Vec<ContactSubmissionRecord>, AdapterError> {
        let decision = self.authorize_submissions_read(caller);
        let reason_code = reason_code_for_read(&decision);
        decision.into_result().map_err(|refusal| {
            tracing::warn!(
                caller = %caller,
                outcome = refusal.outcome_label(),
                reason_code = %reason_code,
                "submissions read denied"
            );
            refusal
        })?;
        let rows = self.read_store().contact_submission_rows().to_vec();
        tracing::debug!(caller = %caller, rows = rows.len(), "submissions read authorized");
        Ok(rows)
    }

    pub fn submit_contact_form(
        &self,
        name: String,
        email: String,
        message: String,
    ) -> Result<ContactSubmissionId, AdapterError> {
        self.submit_contact_form_at(name, email, message, MonotonicTimeNs(system_time_now_ns()))
    }

    pub fn submit_contact_form_at(
        &self,
        name: String,
        email: String,
        message: String,
        now: MonotonicTimeNs,
    ) -> Result<ContactSubmissionId, AdapterError> {
        let input = ContactSubmissionInput::v1(name, email, message, now)?;
        let _ledger = self
            .ledger_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.journal_append(JournalEvent::ContactSubmitted {
            name: input.name.clone(),
            email: input.email.clone(),
            message: input.message.clone(),
            submitted_at_ns: now.0,
        })?;
        let id = self.write_store().append_contact_submission(input)?;
        tracing::info!(contact_submission_id = id.0, "contact submission stored");
        Ok(id)
    }

    pub fn list_gallery_items(&self, category: Option<Category>) -> Vec<GalleryItemRecord> {
        let store = self.read_store();
        match category {
            Some(category) => store
                .gallery_items_by_category(category)
                .into_iter()
                .cloned()
                .collect(),
            None => store.gallery_item_rows().to_vec(),
        }
    }

    /// Public, like the contact form. The gallery sits outside the
    /// ownership gate.
    pub fn add_gallery_item(
        &self,
        input: GalleryItemInput,
    ) -> Result<GalleryItemId, AdapterError> {
        let _ledger = self
            .ledger_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let id = self.append_gallery_item_serialized(input)?;
        tracing::info!(gallery_item_id = id.0, "gallery item added");
        Ok(id)
    }

    /// Inserts the catalogue when the gallery is empty. Returns how many
    /// items were inserted; 0 means the gallery already had content.
    pub fn seed_initial_gallery_items(&self) -> Result<u32, AdapterError> {
        let _ledger = self
            .ledger_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !self.read_store().gallery_item_rows().is_empty() {
            return Ok(0);
        }
        let mut seeded = 0u32;
        for (title, category, description, image_url) in SEED_GALLERY_CATALOGUE {
            let input = GalleryItemInput::v1(
                title.to_string(),
                category,
                description.to_string(),
                image_url.to_string(),
            )?;
            self.append_gallery_item_serialized(input)?;
            seeded += 1;
        }
        tracing::info!(seeded, "gallery seeded");
        Ok(seeded)
    }

    /// Caller holds `ledger_lock`.
    fn append_gallery_item_serialized(
        &self,
        input: GalleryItemInput,
    ) -> Result<GalleryItemId, AdapterError> {
        self.journal_append(JournalEvent::GalleryItemAdded {
            title: input.title.clone(),
            category: input.category,
            description: input.description.clone(),
            image_url: input.image_url.clone(),
        })?;
        Ok(self.write_store().append_gallery_item(input)?)
    }

    pub fn health_report(&self) -> AdapterHealthResponse {
        let owner_claimed = self.owner_state().is_claimed();
        let store = self.read_store();
        AdapterHealthResponse {
            status: "ok".to_string(),
            outcome: "HEALTHY".to_string(),
            owner_claimed,
            contact_submissions: store.contact_submission_rows().len(),
            gallery_items: store.gallery_item_rows().len(),
        }
    }
}

pub fn owner_display(owner: Option<&Principal>) -> String {
    match owner {
        Some(p) => p.to_string(),
        None => NO_OWNER_DISPLAY.to_string(),
    }
}

/// Missing or blank means the anonymous sentinel.
pub fn principal_from_header_value(raw: Option<&str>) -> Result<Principal, AdapterError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(Principal::anonymous()),
        Some(v) => Principal::new(v)
            .map_err(|err| AdapterError::InvalidInput(format!("invalid principal: {err}"))),
    }
}

pub fn parse_category_filter(raw: Option<&str>) -> Result<Option<Category>, AdapterError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => Category::parse(v)
            .map(Some)
            .ok_or_else(|| AdapterError::InvalidInput(format!("unknown category '{v}'"))),
    }
}

impl AddGalleryItemRequest {
    pub fn into_input(self) -> Result<GalleryItemInput, AdapterError> {
        let category = Category::parse(&self.category).ok_or_else(|| {
            AdapterError::InvalidInput(format!("unknown category '{}'", self.category))
        })?;
        Ok(GalleryItemInput::v1(
            self.title,
            category,
            self.description,
            self.image_url,
        )?)
    }
}

pub fn system_time_now_ns() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(1);
    if nanos > u64::MAX as u128 {
        u64::MAX
    } else {
        nanos as u64
    }
}
