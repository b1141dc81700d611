//! Entity tags and conditional-request evaluation.
//!
//! An [`EntityTag`] is an opaque fingerprint of a record's content. Clients
//! echo it back in `If-Match` / `If-None-Match` to make reads and writes
//! conditional; [`Preconditions::evaluate`] decides the outcome following
//! RFC 7232 section 6.

use std::fmt;

/// An opaque validator for the current content of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityTag {
    value: String,
    weak: bool,
}

impl EntityTag {
    /// Create a strong tag.
    pub fn strong(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            weak: false,
        }
    }

    /// Create a weak tag.
    pub fn weak(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            weak: true,
        }
    }

    /// Parse a single tag as it appears in a header: `"abc"`, `W/"abc"`,
    /// or a bare token. Returns `None` for empty input.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (weak, rest) = match raw.strip_prefix("W/") {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let value = rest
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(rest);
        if value.is_empty() {
            return None;
        }
        Some(Self {
            value: value.to_string(),
            weak,
        })
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_weak(&self) -> bool {
        self.weak
    }

    /// Strong comparison: both tags strong and values equal.
    pub fn strong_eq(&self, other: &EntityTag) -> bool {
        !self.weak && !other.weak && self.value == other.value
    }

    /// Weak comparison: values equal, weakness ignored.
    pub fn weak_eq(&self, other: &EntityTag) -> bool {
        self.value == other.value
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.weak {
            write!(f, "W/\"{}\"", self.value)
        } else {
            write!(f, "\"{}\"", self.value)
        }
    }
}

/// The value of an `If-Match` or `If-None-Match` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagMatch {
    /// `*`
    Any,
    Tags(Vec<EntityTag>),
}

impl TagMatch {
    /// Parse a comma separated header value. Returns `None` when nothing
    /// usable is present.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim() == "*" {
            return Some(TagMatch::Any);
        }
        let tags: Vec<EntityTag> = raw.split(',').filter_map(EntityTag::parse).collect();
        if tags.is_empty() {
            None
        } else {
            Some(TagMatch::Tags(tags))
        }
    }

    fn matches_strong(&self, current: &EntityTag) -> bool {
        match self {
            TagMatch::Any => true,
            TagMatch::Tags(tags) => tags.iter().any(|t| t.strong_eq(current)),
        }
    }

    fn matches_weak(&self, current: &EntityTag) -> bool {
        match self {
            TagMatch::Any => true,
            TagMatch::Tags(tags) => tags.iter().any(|t| t.weak_eq(current)),
        }
    }
}

/// Result of evaluating request preconditions against the current tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    Proceed,
    NotModified,
    PreconditionFailed,
}

/// Conditional headers supplied with a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preconditions {
    pub if_match: Option<TagMatch>,
    pub if_none_match: Option<TagMatch>,
}

impl Preconditions {
    /// No conditions: every evaluation proceeds.
    pub fn none() -> Self {
        Self::default()
    }

    /// Require the current tag to equal `tag`.
    pub fn if_match(tag: EntityTag) -> Self {
        Self {
            if_match: Some(TagMatch::Tags(vec![tag])),
            if_none_match: None,
        }
    }

    /// Require the current tag to differ from `tag`.
    pub fn if_none_match(tag: EntityTag) -> Self {
        Self {
            if_match: None,
            if_none_match: Some(TagMatch::Tags(vec![tag])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.if_match.is_none() && self.if_none_match.is_none()
    }

    /// Evaluate against the tag of an existing record.
    ///
    /// `safe` is true for GET/HEAD, where a matching `If-None-Match` yields
    /// `NotModified` instead of a failure.
    pub fn evaluate(&self, current: &EntityTag, safe: bool) -> Evaluation {
        if let Some(if_match) = &self.if_match {
            if !if_match.matches_strong(current) {
                return Evaluation::PreconditionFailed;
            }
        }
        if let Some(if_none_match) = &self.if_none_match {
            if if_none_match.matches_weak(current) {
                return if safe {
                    Evaluation::NotModified
                } else {
                    Evaluation::PreconditionFailed
                };
            }
        }
        Evaluation::Proceed
    }
}
