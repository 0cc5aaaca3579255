pub mod api;
pub mod models;
pub mod service;
pub mod types;

pub use api::ContactApi;
pub use models::{Contact, ContactStats};
pub use service::ContactService;
pub use types::ContactParams;
