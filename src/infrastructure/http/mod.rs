//! REST API surface.

mod controller;
mod dto;

pub use controller::{AppState, create_router};
