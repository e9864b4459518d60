pub mod models;
pub mod repo;

mod memory;
pub use memory::MemoryStore;

pub use models::{NewNote, Note, NoteAccess, NoteId, Tag, TagId, User, UserId, UserProfile};
pub use repo::{Store, StoreError, StoreResult};
