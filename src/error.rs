use std::fmt;

/// Infrastructure failures of a contact store.
///
/// Expected absence (unknown id, unmatched title) is never reported through
/// this type; store methods signal it with `Option`, `bool` or an outcome enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    LockPoisoned(&'static str),
    IdSpaceExhausted,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::LockPoisoned(operation) => {
                write!(f, "contact store lock poisoned during {}", operation)
            }
            StoreError::IdSpaceExhausted => {
                write!(f, "no unused contact id left to allocate")
            }
        }
    }
}

impl std::error::Error for StoreError {}
