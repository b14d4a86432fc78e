pub mod protocol;
pub mod rest;
pub mod routes;
pub mod state;

// Re-export the router builder and shared state to make them easily
// accessible to the binary that starts the web server.
pub use routes::router;
pub use state::{AppState, DraftRegistry};
