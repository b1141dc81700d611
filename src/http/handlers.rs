//! Request handlers for the `/contacts` resource.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::error::ApiError;
use crate::contact::{Contact, ContactUpdate};
use crate::etag::{Evaluation, Preconditions, TagMatch};
use crate::store::{ContactStore, Guarded, SaveOutcome};

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    title: Option<String>,
}

/// `GET /health` - returns `{ "ok": true, "contacts": n }`.
pub(crate) async fn health<S: ContactStore + 'static>(
    State(store): State<Arc<S>>,
) -> Result<Response, ApiError> {
    let contacts = store.len()?;
    Ok(Json(json!({ "ok": true, "contacts": contacts })).into_response())
}

/// `GET /contacts[?title=]` - every contact, or the first one with `title`.
pub(crate) async fn list_contacts<S: ContactStore + 'static>(
    State(store): State<Arc<S>>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiError> {
    match query.title {
        Some(title) => {
            let contact = store
                .find_by_title(&title)?
                .ok_or_else(|| ApiError::NotFound(format!("title {:?}", title)))?;
            Ok(tagged(StatusCode::OK, contact))
        }
        None => Ok(Json(store.find_all()?).into_response()),
    }
}

/// `GET /contacts/:id` - conditional read.
pub(crate) async fn get_contact<S: ContactStore + 'static>(
    State(store): State<Arc<S>>,
    path: Result<Path<u64>, PathRejection>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let id = path_id(path)?;
    let contact = store
        .find(id)?
        .ok_or_else(|| ApiError::NotFound(id.to_string()))?;
    let tag = contact.entity_tag();

    match preconditions_from_headers(&headers).evaluate(&tag, true) {
        Evaluation::Proceed => Ok(tagged(StatusCode::OK, contact)),
        Evaluation::NotModified => {
            Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, tag.to_string())]).into_response())
        }
        Evaluation::PreconditionFailed => Err(ApiError::PreconditionFailed { current: tag }),
    }
}

/// `POST /contacts` - create, allocating an id when none is supplied.
pub(crate) async fn create_contact<S: ContactStore + 'static>(
    State(store): State<Arc<S>>,
    payload: Result<Json<Contact>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(contact) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;

    // A retried create of identical content answers like the first one.
    let contact = match store.save(contact)? {
        SaveOutcome::Created(contact) | SaveOutcome::Unchanged(contact) => contact,
        SaveOutcome::Conflict { id } => {
            warn!(id, "create refused, id already taken");
            return Err(ApiError::Conflict(id));
        }
    };
    info!(id = contact.id, "contact created");

    let location = format!("/contacts/{}", contact.id);
    let tag = contact.entity_tag();
    Ok((
        StatusCode::CREATED,
        [
            (header::LOCATION, location),
            (header::ETAG, tag.to_string()),
        ],
        Json(contact),
    )
        .into_response())
}

/// `PUT /contacts/:id` - full replacement guarded by the request's preconditions.
pub(crate) async fn replace_contact<S: ContactStore + 'static>(
    State(store): State<Arc<S>>,
    path: Result<Path<u64>, PathRejection>,
    headers: HeaderMap,
    payload: Result<Json<Contact>, JsonRejection>,
) -> Result<Response, ApiError> {
    let id = path_id(path)?;
    let Json(mut contact) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    if !contact.is_unassigned() && contact.id != id {
        return Err(ApiError::Validation(format!(
            "body id {} does not match path id {}",
            contact.id, id
        )));
    }
    contact.id = id;

    let preconditions = preconditions_from_headers(&headers);
    let replaced = applied(id, store.replace_guarded(contact, &preconditions)?)?;
    info!(id, "contact replaced");
    Ok(tagged(StatusCode::OK, replaced))
}

/// `PATCH /contacts/:id` - merge the supplied fields.
pub(crate) async fn patch_contact<S: ContactStore + 'static>(
    State(store): State<Arc<S>>,
    path: Result<Path<u64>, PathRejection>,
    headers: HeaderMap,
    payload: Result<Json<ContactUpdate>, JsonRejection>,
) -> Result<Response, ApiError> {
    let id = path_id(path)?;
    let Json(update) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;

    let preconditions = preconditions_from_headers(&headers);
    let merged = applied(id, store.update_guarded(id, &update, &preconditions)?)?;
    info!(id, "contact patched");
    Ok(tagged(StatusCode::OK, merged))
}

/// `DELETE /contacts/:id`
pub(crate) async fn delete_contact<S: ContactStore + 'static>(
    State(store): State<Arc<S>>,
    path: Result<Path<u64>, PathRejection>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let id = path_id(path)?;
    let preconditions = preconditions_from_headers(&headers);
    applied(id, store.delete_guarded(id, &preconditions)?)?;
    info!(id, "contact deleted");
    Ok(StatusCode::OK.into_response())
}

/// The `:id` segment, or a JSON 400 when it is not an unsigned integer.
fn path_id(path: Result<Path<u64>, PathRejection>) -> Result<u64, ApiError> {
    path.map(|Path(id)| id).map_err(|e| ApiError::Validation(e.body_text()))
}

fn applied(id: u64, guarded: Guarded<Contact>) -> Result<Contact, ApiError> {
    match guarded {
        Guarded::Applied(contact) => Ok(contact),
        Guarded::NotFound => Err(ApiError::NotFound(id.to_string())),
        Guarded::PreconditionFailed { current } => {
            warn!(id, current = %current, "precondition failed");
            Err(ApiError::PreconditionFailed { current })
        }
    }
}

/// A JSON contact response carrying the contact's entity tag.
fn tagged(status: StatusCode, contact: Contact) -> Response {
    let tag = contact.entity_tag();
    (status, [(header::ETAG, tag.to_string())], Json(contact)).into_response()
}

/// Read `If-Match` / `If-None-Match`. Repeated headers are combined;
/// values that are not valid text are ignored.
pub(crate) fn preconditions_from_headers(headers: &HeaderMap) -> Preconditions {
    Preconditions {
        if_match: tag_match(headers, header::IF_MATCH),
        if_none_match: tag_match(headers, header::IF_NONE_MATCH),
    }
}

fn tag_match(headers: &HeaderMap, name: HeaderName) -> Option<TagMatch> {
    let values: Vec<&str> = headers
        .get_all(name)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();
    if values.is_empty() {
        return None;
    }
    TagMatch::parse(&values.join(","))
}
