//! # Template Service Module
//!
//! This module aggregates all API endpoints related to the management of
//! templates. It acts as a router, directing incoming HTTP requests under
//! the `/api/templates` path to the appropriate handler logic defined in
//! its sub-modules.
//!
//! ## Sub-modules:
//! - `upload`: Turns an uploaded HTML file into a template via the
//!   detection pipeline.
//! - `fetch`: Fetches a live page by URL and runs the same pipeline.
//! - `list`: Returns the template index.
//! - `get`: Retrieves a single template's full configuration.
//! - `fields`: Derives the AI-facing field definitions for a template.

mod fetch;
mod fields;
mod get;
mod list;
mod upload;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

/// The base path for all template-related API endpoints.
const API_PATH: &str = "/api/templates";

/// Configures and returns the Actix `Scope` for all template-related routes.
///
/// # Registered Routes:
///
/// *   **`POST /upload`**:
///     - **Handler**: `upload::process`
///     - **Description**: Accepts a multipart form with a `file` part (the
///       HTML document) and an optional `json` part with a display name and
///       base URL. Resolves relative URLs, detects editable slots, persists
///       the resulting template, and returns it. Re-uploading a
///       byte-identical document returns the already stored template.
///
/// *   **`POST /fetch`**:
///     - **Handler**: `fetch::process`
///     - **Description**: Fetches an http/https page server-side (avoiding
///       browser CORS limits), then runs the same resolve/detect/persist
///       pipeline with the page URL as the base for relative links.
///
/// *   **`GET /`**:
///     - **Handler**: `list::process`
///     - **Description**: Lists stored templates as lightweight metadata
///       rows (id, name, slot count, creation time).
///
/// *   **`GET /{template_id}`**:
///     - **Handler**: `get::process`
///     - **Description**: Returns the complete `TemplateConfig`, including
///       the slot-tagged body markup and all slot descriptors.
///
/// *   **`GET /{template_id}/fields`**:
///     - **Handler**: `fields::process`
///     - **Description**: Returns the field definitions handed to the AI
///       collaborator: one entry per text slot with its corrected type and
///       character budget.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/upload", post().to(upload::process))
        .route("/fetch", post().to(fetch::process))
        .route("", get().to(list::process))
        .route("/{template_id}", get().to(get::process))
        .route("/{template_id}/fields", get().to(fields::process))
}
