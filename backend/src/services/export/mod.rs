//! # Export Service Module
//!
//! Turns a template plus its slot-data overlay into rendered output. Both
//! endpoints run the same DOM merge; they differ only in what happens to
//! the result.
//!
//! - `GET /api/export/{template_id}/preview`: merges and returns the full
//!   page as `text/html` for in-browser preview.
//!
//! - `POST /api/export/{template_id}`: merges, wraps the result into a
//!   static site (`index.html` + `styles.css`), writes the pair under the
//!   export directory, and returns the files as JSON. The export directory
//!   is also served at `/exports`, so the built site is browsable right
//!   away.

use actix_web::web::{get, post, scope};
use actix_web::Scope;

mod build;
mod preview;

const API_PATH: &str = "/api/export";

/// Configures and returns the Actix scope for export routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/{template_id}/preview", get().to(preview::process))
        .route("/{template_id}", post().to(build::process))
}
