pub mod error;
pub mod file_handlers;
pub mod middleware;
pub mod router;
pub mod state;
pub mod user_handlers;

pub use router::router;
pub use state::AppState;
