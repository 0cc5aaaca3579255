pub mod api;
pub mod models;
pub mod types;

pub use api::ChatlogApi;
pub use models::{message_type, Message};
pub use types::{ChatlogParams, SearchParams};
