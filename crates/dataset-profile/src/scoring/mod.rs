//! Metadata-derived scores.
//!
//! These checks read the metadata mapping (and, for the upload delay, the
//! dataset's date index) rather than the cell values:
//! - publisher category and openness rating
//! - months since creation and upload delay

mod openness;
mod timing;

pub use openness::{MAX_OPENNESS_SCORE, MIN_OPENNESS_SCORE, base_score, openness_score, source_category};
pub use timing::{months_since_creation, upload_delay};
