mod link;
mod note;

pub use link::Link;
pub use note::{parse_tags, Note, NoteDraft};
