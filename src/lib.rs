//! In-memory contact records with entity-tag optimistic concurrency.
//!
//! [`InMemoryContactStore`] is the authoritative holder of [`Contact`]
//! records. With the `http` feature (on by default), [`http::router`]
//! exposes it as a `/contacts` REST resource.

mod contact;
mod error;
mod etag;
mod store;

#[cfg(feature = "http")]
pub mod config;
#[cfg(feature = "http")]
pub mod http;

pub use contact::{Contact, ContactUpdate, UNASSIGNED_ID};
pub use error::StoreError;
pub use etag::{EntityTag, Evaluation, Preconditions, TagMatch};
pub use store::{
    test_contact, ContactStore, Guarded, InMemoryContactStore, SaveOutcome, DEFAULT_FIRST_ID,
    TEST_CONTACT_ID,
};

#[cfg(feature = "http")]
pub use config::Config;
