//! Route table and handlers for the `/squirrels` resource.
//!
//! | method | path | success |
//! |---|---|---|
//! | GET | `/squirrels` | 200 JSON array |
//! | GET | `/squirrels/{id}` | 200 JSON object |
//! | POST | `/squirrels` | 201 JSON object + `Location` |
//! | PUT | `/squirrels/{id}` | 204 |
//! | DELETE | `/squirrels/{id}` | 204 |
//!
//! Everything else, including malformed ids and method mismatches, is `404 Not Found`.
//! Ids are decimal digits only; leading zeros are accepted (`/squirrels/01` is record 1).
//! A body that is not a form is read as an empty form, never rejected.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::{FormRejection, PathRejection};
use axum::extract::{Path, Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Json, Router};
use log::{debug, info};
use serde::Deserialize;
use squirrel_core::{NewSquirrel, Squirrel, SquirrelId};
use std::time::Instant;

const COLLECTION_PATH: &str = "/squirrels";

type IdPath = Result<Path<String>, PathRejection>;
type FormBody = Result<Form<SquirrelForm>, FormRejection>;

/// Form body for create and update. Missing fields are stored as empty text.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SquirrelForm {
    pub name: String,
    pub size: String,
}

impl From<SquirrelForm> for NewSquirrel {
    fn from(form: SquirrelForm) -> Self {
        NewSquirrel::new(form.name, form.size)
    }
}

/// Builds the full application router over `state`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            COLLECTION_PATH,
            get(list_squirrels).post(create_squirrel).fallback(not_found),
        )
        .route(
            "/squirrels/:id",
            get(get_squirrel)
                .put(update_squirrel)
                .delete(delete_squirrel)
                .fallback(not_found),
        )
        .fallback(not_found)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn list_squirrels(State(state): State<AppState>) -> Result<Json<Vec<Squirrel>>, ApiError> {
    state.with_service(|service| service.list_squirrels()).map(Json)
}

async fn get_squirrel(
    State(state): State<AppState>,
    path: IdPath,
) -> Result<Json<Squirrel>, ApiError> {
    let id = parse_id(path)?;
    state
        .with_service(|service| service.get_squirrel(id))?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

async fn create_squirrel(
    State(state): State<AppState>,
    form: FormBody,
) -> Result<Response, ApiError> {
    let input = form_input(form);
    let created = state.with_service(|service| service.create_squirrel(&input))?;
    let location = format!("{COLLECTION_PATH}/{}", created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    )
        .into_response())
}

async fn update_squirrel(
    State(state): State<AppState>,
    path: IdPath,
    form: FormBody,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(path)?;
    let input = form_input(form);
    state.with_service(|service| service.update_squirrel(id, &input))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_squirrel(
    State(state): State<AppState>,
    path: IdPath,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(path)?;
    state.with_service(|service| service.delete_squirrel(id))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Undecodable segments (e.g. `%FF`) are treated like any other malformed id.
fn parse_id(path: IdPath) -> Result<SquirrelId, ApiError> {
    let Path(raw) = path.map_err(|_| ApiError::NotFound)?;
    raw.parse().map_err(|_| ApiError::NotFound)
}

fn form_input(form: FormBody) -> NewSquirrel {
    match form {
        Ok(Form(form)) => form.into(),
        Err(rejection) => {
            debug!("event=form_fallback module=server status=ok reason={rejection}");
            NewSquirrel::default()
        }
    }
}

async fn log_request(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let response = next.run(request).await;

    info!(
        "event=http_request module=server status={} method={} path={} http_status={} duration_ms={}",
        if response.status().is_server_error() { "error" } else { "ok" },
        method,
        path,
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}
