//! Session storage implementations.

mod cookie;
mod file;
mod memory;

pub use cookie::InMemoryCookieJar;
pub use file::FileStore;
pub use memory::InMemoryStore;
