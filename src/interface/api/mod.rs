pub mod handler;
pub mod server;

pub use handler::ApiError;
pub use server::{build_router, load_repository, start_server, ServerConfig};
