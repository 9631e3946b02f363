//! Stockpile Core
//!
//! Domain model, request validation, and storage for the stockpile
//! inventory service. The HTTP surface lives in `stockpile-server`;
//! the client-side cache lives in `stockpile-client`.

pub mod item;
pub mod service;
pub mod sqlite_store;
pub mod store;
pub mod validate;

pub use item::*;
pub use service::ItemService;
pub use sqlite_store::SqliteItemStore;
pub use store::*;
pub use validate::*;
