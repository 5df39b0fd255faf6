pub mod models;
pub mod share;
pub mod store;

pub use models::{EntryUpdate, PlaylistEntry};
pub use store::PlaylistStore;
