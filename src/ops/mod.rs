pub mod index;
pub mod markdown;
pub mod note_tasks;
pub mod tags;
pub mod task_order;
pub mod template;
