//! Manages the slot-data overlay: the `slotId -> content` map that holds a
//! template's current (AI-generated or hand-edited) content.
//!
//! The overlay is the template's data source, kept strictly separate from
//! the template itself so one template can be filled many times. The routes
//! are:
//!
//! - `GET /api/content/{template_id}`: the current overlay (empty map when
//!   nothing has been saved yet).
//!
//! - `PUT /api/content/{template_id}`: replaces the overlay wholesale.
//!   Content keyed by an ID the template doesn't know is rejected, because
//!   a typo'd slot ID would otherwise silently never render.
//!
//! - `POST /api/content/{template_id}/import`: accepts a raw AI response,
//!   runs the JSON repair ladder over it, keeps the keys matching real
//!   slots, and merges the result into the stored overlay. When even repair
//!   fails the caller is told to fall back to manual editing; the template
//!   itself is never touched.

use actix_web::web::{get, post, put, scope};
use actix_web::Scope;

mod get_data;
mod import;
mod save;

const API_PATH: &str = "/api/content";

/// Configures and returns the Actix scope for slot-data routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/{template_id}", get().to(get_data::process))
        .route("/{template_id}", put().to(save::process))
        .route("/{template_id}/import", post().to(import::process))
}
