//! API Module
//!
//! HTTP handlers and routing for the panel.
//!
//! # Endpoints
//! - `GET /panel` - Site card, selected element and snapshot state
//! - `PUT /selection` - Host pushes a selection change
//! - `POST /selection/refresh` - Pull the selection from the host
//! - `GET /snapshot/:element_id` - Resolve one snapshot through the cache
//! - `GET /stats` - Snapshot cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
