use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod error;
pub mod handlers;
#[cfg(test)]
pub(crate) mod memory;
pub mod repo;
mod repo_types;
pub mod store;
mod validation;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::user_routes())
}
