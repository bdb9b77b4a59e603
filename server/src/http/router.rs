//! Matchit routing configuration.

use std::fmt::Display;
use std::time::Duration;

use http_body_util::BodyExt;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use matchit::Router as MatchitRouter;

use super::handlers::{handle, parse_id};
use super::response::{error_response, HttpError};
use crate::service::Services;

/// The resource a route addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resource {
    Authors,
    Publishers,
    Categories,
    Books,
    Libraries,
    Coaches,
    Leagues,
    Teams,
    Players,
    Matches,
}

const COLLECTIONS: [(&str, Resource); 10] = [
    ("/api/reference/authors", Resource::Authors),
    ("/api/reference/publishers", Resource::Publishers),
    ("/api/reference/categories", Resource::Categories),
    ("/api/books", Resource::Books),
    ("/api/libraries", Resource::Libraries),
    ("/api/coaches", Resource::Coaches),
    ("/api/leagues", Resource::Leagues),
    ("/api/teams", Resource::Teams),
    ("/api/players", Resource::Players),
    ("/api/matches", Resource::Matches),
];

/// HTTP request router.
pub struct Router {
    inner: MatchitRouter<Resource>,
    services: Services,
    body_timeout: Duration,
}

impl Router {
    /// Register every collection path and its `/{id}` item path.
    pub fn new(services: Services, body_timeout: Duration) -> Result<Self, matchit::InsertError> {
        let mut inner = MatchitRouter::new();
        for (path, resource) in COLLECTIONS {
            inner.insert(path, resource)?;
            inner.insert(format!("{path}/{{id}}"), resource)?;
        }
        Ok(Self {
            inner,
            services,
            body_timeout,
        })
    }

    /// Read the request body, dispatch, and log the outcome.
    pub async fn route<B>(&self, req: Request<B>) -> Response<Bytes>
    where
        B: Body,
        B::Error: Display,
    {
        let (parts, body) = req.into_parts();
        let path = parts.uri.path().to_string();

        let response = match read_body_with_timeout(body, self.body_timeout).await {
            Ok(bytes) => self.dispatch(&parts.method, &path, bytes).await,
            Err(err) => err.into_response(),
        };

        tracing::info!(
            method = %parts.method,
            path = %path,
            status = response.status().as_u16(),
            "HTTP request"
        );
        response
    }

    /// Route `method path` with an already-read body.
    pub async fn dispatch(&self, method: &Method, path: &str, body: Bytes) -> Response<Bytes> {
        let matched = match self.inner.at(path) {
            Ok(matched) => matched,
            Err(_) => {
                return error_response(
                    hyper::StatusCode::NOT_FOUND,
                    &format!("No route found for {path}"),
                )
            }
        };

        let resource = *matched.value;
        let id = match matched.params.get("id").map(parse_id).transpose() {
            Ok(id) => id,
            Err(err) => return err.into_response(),
        };

        let s = &self.services;
        let result = match resource {
            Resource::Authors => handle(&s.authors, method, id, &body).await,
            Resource::Publishers => handle(&s.publishers, method, id, &body).await,
            Resource::Categories => handle(&s.categories, method, id, &body).await,
            Resource::Books => handle(&s.books, method, id, &body).await,
            Resource::Libraries => handle(&s.libraries, method, id, &body).await,
            Resource::Coaches => handle(&s.coaches, method, id, &body).await,
            Resource::Leagues => handle(&s.leagues, method, id, &body).await,
            Resource::Teams => handle(&s.teams, method, id, &body).await,
            Resource::Players => handle(&s.players, method, id, &body).await,
            Resource::Matches => handle(&s.matches, method, id, &body).await,
        };

        result.unwrap_or_else(HttpError::into_response)
    }
}

/// Collect the request body, giving up after `timeout`.
async fn read_body_with_timeout<B>(body: B, timeout: Duration) -> Result<Bytes, HttpError>
where
    B: Body,
    B::Error: Display,
{
    let collected = tokio::time::timeout(timeout, body.collect())
        .await
        .map_err(|_| HttpError::Timeout)?
        .map_err(|e| HttpError::BadRequest(format!("Failed to read request body: {e}")))?;
    Ok(collected.to_bytes())
}
