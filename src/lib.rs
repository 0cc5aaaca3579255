pub mod api;
pub mod utils;

// 重新导出常用类型和函数，方便外部使用
pub use api::{
    chatlog::{ChatlogApi, ChatlogParams, Message, SearchParams},
    client::{ChatlogClient, ClientConfig},
    contact::{Contact, ContactService, ContactStats},
    session::{Session, SessionService, SessionStats},
    PaginatedResponse,
};
pub use utils::storage::{Storage, StorageOptions, StorageScope};
