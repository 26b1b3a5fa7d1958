pub mod config;
pub mod entity;
pub mod error;
pub mod settings;
pub mod tags;
pub mod task;
pub mod tree;

pub use config::*;
pub use entity::*;
pub use error::*;
pub use settings::*;
pub use tags::*;
pub use task::*;
pub use tree::*;
