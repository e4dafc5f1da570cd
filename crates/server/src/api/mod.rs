pub mod handlers;
pub mod routes;
pub mod triage;

pub use routes::create_router;
