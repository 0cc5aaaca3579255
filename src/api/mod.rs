pub mod chatlog;
pub mod client;
pub mod contact;
pub mod session;
pub mod types;

// 重新导出常用类型
pub use client::{ChatlogClient, ClientConfig};
pub use types::PaginatedResponse;
