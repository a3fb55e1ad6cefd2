pub mod book;
pub mod saved;

pub use book::*;
pub use saved::*;
