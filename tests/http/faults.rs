//! Store faults surface as 500 with a JSON error body.

use std::sync::Arc;

use contact_store::{
    http, Contact, ContactStore, ContactUpdate, Guarded, Preconditions, SaveOutcome, StoreError,
};

/// A store whose lock is always poisoned.
struct PoisonedStore;

impl ContactStore for PoisonedStore {
    fn find(&self, _id: u64) -> Result<Option<Contact>, StoreError> {
        Err(StoreError::LockPoisoned("read"))
    }

    fn find_by_title(&self, _title: &str) -> Result<Option<Contact>, StoreError> {
        Err(StoreError::LockPoisoned("read"))
    }

    fn find_all(&self) -> Result<Vec<Contact>, StoreError> {
        Err(StoreError::LockPoisoned("read"))
    }

    fn save(&self, _contact: Contact) -> Result<SaveOutcome, StoreError> {
        Err(StoreError::LockPoisoned("write"))
    }

    fn replace(&self, _contact: Contact) -> Result<Option<Contact>, StoreError> {
        Err(StoreError::LockPoisoned("write"))
    }

    fn update(&self, _id: u64, _update: &ContactUpdate) -> Result<Option<Contact>, StoreError> {
        Err(StoreError::LockPoisoned("write"))
    }

    fn delete(&self, _id: u64) -> Result<bool, StoreError> {
        Err(StoreError::LockPoisoned("write"))
    }

    fn replace_guarded(
        &self,
        _contact: Contact,
        _preconditions: &Preconditions,
    ) -> Result<Guarded<Contact>, StoreError> {
        Err(StoreError::LockPoisoned("write"))
    }

    fn update_guarded(
        &self,
        _id: u64,
        _update: &ContactUpdate,
        _preconditions: &Preconditions,
    ) -> Result<Guarded<Contact>, StoreError> {
        Err(StoreError::LockPoisoned("write"))
    }

    fn delete_guarded(
        &self,
        _id: u64,
        _preconditions: &Preconditions,
    ) -> Result<Guarded<Contact>, StoreError> {
        Err(StoreError::LockPoisoned("write"))
    }

    fn len(&self) -> Result<usize, StoreError> {
        Err(StoreError::LockPoisoned("read"))
    }
}

async fn start_poisoned_server() -> String {
    let app = http::router(Arc::new(PoisonedStore));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn read_fault_returns_500_with_error_body() {
    let base = start_poisoned_server().await;

    let resp = reqwest::get(format!("{base}/contacts/1000")).await.unwrap();
    assert_eq!(resp.status(), 500);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("read"));
}

#[tokio::test]
async fn write_fault_returns_500_with_error_body() {
    let base = start_poisoned_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/contacts"))
        .json(&Contact::new("A", "", ""))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("write"));

    let resp = client
        .delete(format!("{base}/contacts/1000"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
}
