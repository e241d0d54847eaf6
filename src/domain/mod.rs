pub mod chart;
pub mod comment;

pub use chart::{ChartResult, Track};
pub use comment::{Comment, CommentListing};
