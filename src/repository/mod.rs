//! In-memory repositories, loaded once from the local store and written
//! back in full after every mutation.

mod links;
mod notes;

pub use links::{LinkOutcome, LinkRepository};
pub use notes::NoteRepository;
