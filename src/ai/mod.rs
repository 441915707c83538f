pub mod client;
mod dto;
pub mod extract;
pub mod handlers;
pub mod prompts;
pub mod services;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    handlers::ai_routes()
}
