//! Contact stores - the authoritative holders of contact records.
//!
//! ## Example
//!
//! ```
//! use contact_store::{Contact, ContactStore, InMemoryContactStore, SaveOutcome};
//!
//! let store = InMemoryContactStore::with_test_contact();
//! let saved = match store.save(Contact::new("A", "Alice", "alice@example.com")).unwrap() {
//!     SaveOutcome::Created(contact) => contact,
//!     other => panic!("unexpected outcome: {:?}", other),
//! };
//! assert_ne!(saved.id, 1000);
//! assert_eq!(store.find(saved.id).unwrap().unwrap().title, "A");
//! ```

mod in_memory;
mod store;

use crate::contact::Contact;
use crate::etag::EntityTag;

pub use in_memory::{test_contact, InMemoryContactStore, DEFAULT_FIRST_ID, TEST_CONTACT_ID};
pub use store::ContactStore;

/// Outcome of [`ContactStore::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The record was inserted; carries the stored copy with its id.
    Created(Contact),
    /// A record with identical content already holds this id.
    Unchanged(Contact),
    /// A different record already holds this id; nothing was written.
    Conflict { id: u64 },
}

impl SaveOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, SaveOutcome::Conflict { .. })
    }

    /// The stored contact, unless the save conflicted.
    pub fn contact(&self) -> Option<&Contact> {
        match self {
            SaveOutcome::Created(contact) | SaveOutcome::Unchanged(contact) => Some(contact),
            SaveOutcome::Conflict { .. } => None,
        }
    }
}

/// Outcome of a conditional (precondition-guarded) mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guarded<T> {
    Applied(T),
    NotFound,
    /// The preconditions did not hold; carries the tag of the current record.
    PreconditionFailed { current: EntityTag },
}

impl<T> Guarded<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Guarded::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Guarded::Applied(value) => Some(value),
            _ => None,
        }
    }
}
