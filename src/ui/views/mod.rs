pub mod archive;
pub mod categories;
pub mod joke;
