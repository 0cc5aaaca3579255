pub mod api;
pub mod models;
pub mod service;
pub mod types;

pub use api::SessionApi;
pub use models::{Session, SessionStats};
pub use service::SessionService;
pub use types::SessionParams;
