//! # HTTP Server Module
//!
//! Axum API over the data manager.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/project/columns` - Column schema
//! - `/api/project/tabs[/:id]` - Tab CRUD, scoped to the `x-session-id` session
//!   (issued in the response header when the request has none)
//! - `/api/project/tabs/:id/tasks` - Filtered, ordered, paginated tasks
//! - `/api/project/tabs/:id/annotations` - Flattened completions of the tab's tasks

pub mod routes;
pub mod server;
pub mod session;

pub use routes::AppState;
pub use session::{SessionId, SESSION_HEADER};
pub use server::HttpServer;
