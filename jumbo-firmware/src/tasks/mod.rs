//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod button;
pub mod buzzer;
pub mod face;
pub mod feed;
pub mod tick;

pub use button::button_task;
pub use buzzer::buzzer_task;
pub use face::{face_task, FacePanel};
pub use feed::feed_task;
pub use tick::tick_task;
