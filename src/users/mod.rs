mod memory;
mod repo;
mod repo_types;
mod store;

pub use memory::MemoryUserStore;
pub use repo::PgUserStore;
pub use repo_types::{truncate_to_micros, NewUser, User};
pub use store::{StoreError, UserStore};
