//! Course entity and its owned chapter/video tree.

pub mod chapter;
pub mod model;
pub mod video;

pub use chapter::{Chapter, CreateChapter};
pub use model::{Course, CreateCourse};
pub use video::{CreateVideo, Video, VideoStatus};
