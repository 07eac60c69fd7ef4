//! Command implementations behind the CLI surface.

mod analyze;
mod similar;
mod utils;

pub use analyze::{run_analyze, AnalyzeOptions};
pub use similar::run_similar;
pub use utils::find_listing_files;
