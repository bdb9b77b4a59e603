//! Generic CRUD handler shared by every resource.

use clubhouse_model::Id;
use hyper::body::Bytes;
use hyper::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;

use super::response::{empty_response, json_response, HttpError};
use crate::service::CrudService;

/// Run one request against `service`.
///
/// `id` is the parsed `{id}` path segment, absent on collection paths.
pub async fn handle<S: CrudService>(
    service: &S,
    method: &Method,
    id: Option<Id>,
    body: &Bytes,
) -> Result<Response<Bytes>, HttpError> {
    match (method, id) {
        (&Method::GET, None) => json_response(StatusCode::OK, &service.find_all().await?),
        (&Method::GET, Some(id)) => json_response(StatusCode::OK, &service.find_by_id(id).await?),
        (&Method::POST, None) => {
            let input = parse_body::<S::Input>(body)?;
            json_response(StatusCode::CREATED, &service.create(input).await?)
        }
        (&Method::PUT, Some(id)) => {
            let input = parse_body::<S::Input>(body)?;
            json_response(StatusCode::OK, &service.update(id, input).await?)
        }
        (&Method::DELETE, Some(id)) => {
            service.delete(id).await?;
            Ok(empty_response(StatusCode::NO_CONTENT))
        }
        _ => Err(HttpError::MethodNotAllowed),
    }
}

/// Parse a `{id}` path segment.
pub fn parse_id(raw: &str) -> Result<Id, HttpError> {
    raw.parse()
        .map_err(|_| HttpError::BadRequest(format!("Invalid id: {raw}")))
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, HttpError> {
    serde_json::from_slice(body)
        .map_err(|e| HttpError::BadRequest(format!("Malformed request body: {e}")))
}
