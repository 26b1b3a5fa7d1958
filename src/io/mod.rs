pub mod config_io;
pub mod fs_store;
pub mod logging;
pub mod state;
pub mod store;
pub mod watcher;
