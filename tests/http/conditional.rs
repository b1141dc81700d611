//! Entity-tag preconditions over HTTP.

use contact_store::{ContactStore, TEST_CONTACT_ID};
use serde_json::json;

use crate::support::{etag, start_server};

#[tokio::test]
async fn get_returns_stable_etag() {
    let (base, _store) = start_server().await;

    let first = reqwest::get(format!("{base}/contacts/{TEST_CONTACT_ID}"))
        .await
        .unwrap();
    let second = reqwest::get(format!("{base}/contacts/{TEST_CONTACT_ID}"))
        .await
        .unwrap();
    assert_eq!(first.status(), 200);
    assert_eq!(etag(&first), etag(&second));
}

#[tokio::test]
async fn if_none_match_hit_returns_304() {
    let (base, _store) = start_server().await;
    let client = reqwest::Client::new();
    let url = format!("{base}/contacts/{TEST_CONTACT_ID}");

    let tag = etag(&client.get(&url).send().await.unwrap());

    let resp = client
        .get(&url)
        .header("if-none-match", &tag)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 304);
    assert_eq!(etag(&resp), tag);

    let resp = client
        .get(&url)
        .header("if-none-match", "\"stale\"")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn put_with_stale_tag_returns_412() {
    let (base, store) = start_server().await;
    let client = reqwest::Client::new();
    let url = format!("{base}/contacts/{TEST_CONTACT_ID}");

    let tag = etag(&client.get(&url).send().await.unwrap());

    // Someone else changes the record first.
    let resp = client
        .patch(&url)
        .json(&json!({ "name": "Somebody Else" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = client
        .put(&url)
        .header("if-match", &tag)
        .json(&json!({ "title": "Mine" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 412);
    assert_eq!(
        etag(&resp),
        store
            .find(TEST_CONTACT_ID)
            .unwrap()
            .unwrap()
            .entity_tag()
            .to_string()
    );
    assert_eq!(
        store.find(TEST_CONTACT_ID).unwrap().unwrap().name,
        "Somebody Else"
    );
}

#[tokio::test]
async fn put_with_current_tag_succeeds_and_returns_new_tag() {
    let (base, _store) = start_server().await;
    let client = reqwest::Client::new();
    let url = format!("{base}/contacts/{TEST_CONTACT_ID}");

    let tag = etag(&client.get(&url).send().await.unwrap());

    let resp = client
        .put(&url)
        .header("if-match", &tag)
        .json(&json!({ "title": "Mine", "name": "Joe", "email": "joe@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let new_tag = etag(&resp);
    assert_ne!(new_tag, tag);

    // The old tag is now stale.
    let resp = client
        .patch(&url)
        .header("if-match", &tag)
        .json(&json!({ "title": "Again" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 412);

    let resp = client
        .patch(&url)
        .header("if-match", &new_tag)
        .json(&json!({ "title": "Again" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn delete_honours_if_match() {
    let (base, store) = start_server().await;
    let client = reqwest::Client::new();
    let url = format!("{base}/contacts/{TEST_CONTACT_ID}");

    let resp = client
        .delete(&url)
        .header("if-match", "\"stale\"")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 412);
    assert!(store.find(TEST_CONTACT_ID).unwrap().is_some());

    let resp = client
        .delete(&url)
        .header("if-match", "*")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(store.find(TEST_CONTACT_ID).unwrap().is_none());
}

#[tokio::test]
async fn get_with_failing_if_match_returns_412() {
    let (base, _store) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base}/contacts/{TEST_CONTACT_ID}"))
        .header("if-match", "\"stale\"")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 412);
}
