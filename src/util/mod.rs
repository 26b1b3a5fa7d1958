pub mod path;
pub mod unicode;
