//! ContactStore - the record store contract.

use super::{Guarded, SaveOutcome};
use crate::contact::{Contact, ContactUpdate};
use crate::error::StoreError;
use crate::etag::Preconditions;

/// Abstract storage for contact records.
///
/// `Err` is reserved for infrastructure faults. Absence is reported through
/// the `Ok` value.
pub trait ContactStore: Send + Sync {
    /// Get a contact by id. Returns `None` if not found.
    fn find(&self, id: u64) -> Result<Option<Contact>, StoreError>;

    /// First contact whose title equals `title` exactly, in store order.
    ///
    /// Titles are not unique; with duplicates only the earliest stored match
    /// is returned.
    fn find_by_title(&self, title: &str) -> Result<Option<Contact>, StoreError>;

    /// Snapshot of every contact in store order.
    fn find_all(&self) -> Result<Vec<Contact>, StoreError>;

    /// Insert a contact, allocating an id when it is unassigned.
    fn save(&self, contact: Contact) -> Result<SaveOutcome, StoreError>;

    /// Overwrite an existing contact in place. Returns `None` if absent.
    fn replace(&self, contact: Contact) -> Result<Option<Contact>, StoreError>;

    /// Merge `update` into the contact with `id`. Returns `None` if absent,
    /// in which case nothing is inserted.
    fn update(&self, id: u64, update: &ContactUpdate) -> Result<Option<Contact>, StoreError>;

    /// Remove a contact. Returns true if it existed.
    fn delete(&self, id: u64) -> Result<bool, StoreError>;

    /// [`replace`](Self::replace) if the current record satisfies `preconditions`.
    fn replace_guarded(
        &self,
        contact: Contact,
        preconditions: &Preconditions,
    ) -> Result<Guarded<Contact>, StoreError>;

    /// [`update`](Self::update) if the current record satisfies `preconditions`.
    fn update_guarded(
        &self,
        id: u64,
        update: &ContactUpdate,
        preconditions: &Preconditions,
    ) -> Result<Guarded<Contact>, StoreError>;

    /// [`delete`](Self::delete) if the current record satisfies `preconditions`.
    /// The applied value is the removed contact.
    fn delete_guarded(
        &self,
        id: u64,
        preconditions: &Preconditions,
    ) -> Result<Guarded<Contact>, StoreError>;

    /// Number of stored contacts.
    fn len(&self) -> Result<usize, StoreError>;

    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}
