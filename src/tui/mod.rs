pub mod app;
pub mod editor;
pub mod forms;
pub mod input;
pub mod render;
pub mod theme;
pub mod wrap;

pub use app::run;
