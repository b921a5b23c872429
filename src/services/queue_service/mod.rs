pub mod control;
pub mod page;
pub mod view;

pub use control::{advance_queue, complete_visit, QueueError};
pub use page::{load_queue_page, QueuePage};
pub use view::QueueView;
