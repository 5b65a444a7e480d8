//! Web layer for the KVB API.
//!
//! JSON endpoints for stations, lines, departures and timetable links.

mod cors;
mod dto;
mod routes;
mod state;

pub use cors::{CorsConfig, cors};
pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
