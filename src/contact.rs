//! The `Contact` record and its partial-update payload.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::etag::EntityTag;

/// Id value meaning "not yet assigned"; the store allocates one on save.
pub const UNASSIGNED_ID: u64 = 0;

/// A contact record.
///
/// `id == 0` marks a record the store has not assigned an id to yet. The
/// other fields are opaque text; only `title` is used as a lookup key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl Contact {
    /// Create an unsaved contact (id 0).
    pub fn new(
        title: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: UNASSIGNED_ID,
            title: title.into(),
            name: name.into(),
            email: email.into(),
        }
    }

    /// Builder-style id setter.
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    pub fn is_unassigned(&self) -> bool {
        self.id == UNASSIGNED_ID
    }

    /// Merge `update` into this record. Fields set in the update overwrite,
    /// unset fields are kept. The id never changes.
    pub fn apply_update(&mut self, update: &ContactUpdate) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(email) = &update.email {
            self.email = email.clone();
        }
    }

    /// Content fingerprint covering every field.
    ///
    /// Equal content always yields the same tag within a process.
    pub fn entity_tag(&self) -> EntityTag {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        EntityTag::strong(format!("{:016x}", hasher.finish()))
    }
}

/// A partial update: `Some` fields overwrite, `None` fields are preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ContactUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.name.is_none() && self.email.is_none()
    }
}

impl From<Contact> for ContactUpdate {
    /// Every field of the contact becomes a set field (full overwrite).
    fn from(contact: Contact) -> Self {
        Self {
            title: Some(contact.title),
            name: Some(contact.name),
            email: Some(contact.email),
        }
    }
}
