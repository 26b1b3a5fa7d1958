//! quill: a single-pane terminal workspace for markdown notes, tasks, and tags.
//!
//! The stateful core lives in [`workspace`]; everything in [`ops`] is pure.

pub mod cli;
pub mod io;
pub mod model;
pub mod ops;
pub mod tui;
pub mod util;
pub mod workspace;
