//! InMemoryContactStore - HashMap-backed contact store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use super::{ContactStore, Guarded, SaveOutcome};
use crate::contact::{Contact, ContactUpdate, UNASSIGNED_ID};
use crate::error::StoreError;
use crate::etag::{Evaluation, Preconditions};

/// First id handed out by a store that was not told otherwise.
pub const DEFAULT_FIRST_ID: u64 = 1000;

/// Id of the fixture record inserted by [`InMemoryContactStore::with_test_contact`].
pub const TEST_CONTACT_ID: u64 = 1000;

/// A stored record plus its insertion sequence, which defines store order.
struct StoredContact {
    seq: u64,
    contact: Contact,
}

#[derive(Default)]
struct Records {
    by_id: HashMap<u64, StoredContact>,
    next_seq: u64,
}

impl Records {
    fn append(&mut self, contact: Contact) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.by_id.insert(contact.id, StoredContact { seq, contact });
    }

    fn ordered(&self) -> Vec<&StoredContact> {
        let mut stored: Vec<&StoredContact> = self.by_id.values().collect();
        stored.sort_by_key(|s| s.seq);
        stored
    }
}

/// In-memory contact store.
///
/// Records live in an id-keyed map behind a single `RwLock`: lookups share
/// the lock, every mutation (including id allocation) holds it exclusively.
/// Clone-friendly via Arc; clones share the same records.
#[derive(Clone)]
pub struct InMemoryContactStore {
    records: Arc<RwLock<Records>>,
    next_id: Arc<AtomicU64>,
    /// Set once `u64::MAX` has been handed out; the counter cannot move past it.
    last_id_issued: Arc<AtomicBool>,
}

impl Default for InMemoryContactStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryContactStore {
    /// Create an empty store allocating ids from [`DEFAULT_FIRST_ID`].
    pub fn new() -> Self {
        Self::with_first_id(DEFAULT_FIRST_ID)
    }

    /// Create an empty store whose id counter starts at `first_id`.
    pub fn with_first_id(first_id: u64) -> Self {
        Self::from_records(first_id, Records::default())
    }

    /// Create a store holding the fixture contact (id [`TEST_CONTACT_ID`]).
    pub fn with_test_contact() -> Self {
        Self::seeded(DEFAULT_FIRST_ID)
    }

    /// Like [`with_test_contact`](Self::with_test_contact) with a custom id seed.
    pub fn seeded(first_id: u64) -> Self {
        let mut records = Records::default();
        records.append(test_contact());
        Self::from_records(first_id, records)
    }

    fn from_records(first_id: u64, records: Records) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
            next_id: Arc::new(AtomicU64::new(first_id)),
            last_id_issued: Arc::new(AtomicBool::new(false)),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Records>, StoreError> {
        self.records
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Records>, StoreError> {
        self.records
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))
    }

    /// Take the next counter value not held by any record.
    ///
    /// Must be called with the write lock held so the chosen id cannot be
    /// claimed between the check and the insert.
    fn allocate_id(&self, records: &Records) -> Result<u64, StoreError> {
        loop {
            let id = match self
                .next_id
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |id| id.checked_add(1))
            {
                Ok(id) => id,
                // The counter is parked at u64::MAX; that value is offered once.
                Err(ceiling) if !self.last_id_issued.swap(true, Ordering::SeqCst) => ceiling,
                Err(_) => return Err(StoreError::IdSpaceExhausted),
            };
            if id != UNASSIGNED_ID && !records.by_id.contains_key(&id) {
                return Ok(id);
            }
        }
    }
}

/// The fixture record a seeded store starts with.
pub fn test_contact() -> Contact {
    Contact::new("Test contact", "Joe Experimental", "none@testing.com").with_id(TEST_CONTACT_ID)
}

/// Evaluate `preconditions` against a stored record. `Some` means refused.
fn refuse(contact: &Contact, preconditions: &Preconditions) -> Option<Guarded<Contact>> {
    if preconditions.is_empty() {
        return None;
    }
    let current = contact.entity_tag();
    match preconditions.evaluate(&current, false) {
        Evaluation::Proceed => None,
        Evaluation::NotModified | Evaluation::PreconditionFailed => {
            Some(Guarded::PreconditionFailed { current })
        }
    }
}

impl ContactStore for InMemoryContactStore {
    fn find(&self, id: u64) -> Result<Option<Contact>, StoreError> {
        let records = self.read()?;
        Ok(records.by_id.get(&id).map(|s| s.contact.clone()))
    }

    fn find_by_title(&self, title: &str) -> Result<Option<Contact>, StoreError> {
        let records = self.read()?;
        Ok(records
            .by_id
            .values()
            .filter(|s| s.contact.title == title)
            .min_by_key(|s| s.seq)
            .map(|s| s.contact.clone()))
    }

    fn find_all(&self) -> Result<Vec<Contact>, StoreError> {
        let records = self.read()?;
        Ok(records
            .ordered()
            .into_iter()
            .map(|s| s.contact.clone())
            .collect())
    }

    fn save(&self, mut contact: Contact) -> Result<SaveOutcome, StoreError> {
        let mut records = self.write()?;

        if contact.is_unassigned() {
            contact.id = self.allocate_id(&records)?;
            debug!(id = contact.id, "allocated contact id");
        } else if let Some(existing) = records.by_id.get(&contact.id) {
            if existing.contact == contact {
                return Ok(SaveOutcome::Unchanged(contact));
            }
            debug!(id = contact.id, "save refused, id held by a different contact");
            return Ok(SaveOutcome::Conflict { id: contact.id });
        }

        records.append(contact.clone());
        debug!(id = contact.id, "contact saved");
        Ok(SaveOutcome::Created(contact))
    }

    fn replace(&self, contact: Contact) -> Result<Option<Contact>, StoreError> {
        let guarded = self.replace_guarded(contact, &Preconditions::none())?;
        Ok(guarded.applied())
    }

    fn update(&self, id: u64, update: &ContactUpdate) -> Result<Option<Contact>, StoreError> {
        let guarded = self.update_guarded(id, update, &Preconditions::none())?;
        Ok(guarded.applied())
    }

    fn delete(&self, id: u64) -> Result<bool, StoreError> {
        let guarded = self.delete_guarded(id, &Preconditions::none())?;
        Ok(guarded.is_applied())
    }

    fn replace_guarded(
        &self,
        contact: Contact,
        preconditions: &Preconditions,
    ) -> Result<Guarded<Contact>, StoreError> {
        let mut records = self.write()?;
        let Some(stored) = records.by_id.get_mut(&contact.id) else {
            return Ok(Guarded::NotFound);
        };
        if let Some(refused) = refuse(&stored.contact, preconditions) {
            return Ok(refused);
        }

        stored.contact = contact.clone();
        debug!(id = contact.id, "contact replaced");
        Ok(Guarded::Applied(contact))
    }

    fn update_guarded(
        &self,
        id: u64,
        update: &ContactUpdate,
        preconditions: &Preconditions,
    ) -> Result<Guarded<Contact>, StoreError> {
        let mut records = self.write()?;
        let Some(stored) = records.by_id.get_mut(&id) else {
            return Ok(Guarded::NotFound);
        };
        if let Some(refused) = refuse(&stored.contact, preconditions) {
            return Ok(refused);
        }

        stored.contact.apply_update(update);
        debug!(id, "contact updated");
        Ok(Guarded::Applied(stored.contact.clone()))
    }

    fn delete_guarded(
        &self,
        id: u64,
        preconditions: &Preconditions,
    ) -> Result<Guarded<Contact>, StoreError> {
        let mut records = self.write()?;
        let Some(stored) = records.by_id.get(&id) else {
            return Ok(Guarded::NotFound);
        };
        if let Some(refused) = refuse(&stored.contact, preconditions) {
            return Ok(refused);
        }

        let removed = records.by_id.remove(&id).map(|s| s.contact);
        debug!(id, "contact deleted");
        Ok(removed.map_or(Guarded::NotFound, Guarded::Applied))
    }

    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.by_id.len())
    }
}
