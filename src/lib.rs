pub mod cli;
pub mod config;
pub mod entity;
pub mod error;
pub mod notebook;
pub mod remote;
pub mod render;
pub mod repository;
pub mod snapshot;
pub mod storage;

pub use config::Config;
pub use error::{MindnotesError, Result};
pub use notebook::Notebook;
