pub mod repository;
pub mod project;

pub use repository::*;
pub use project::*;
