pub mod book;
pub mod fallback;
