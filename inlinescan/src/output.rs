//! Terminal and JSON output for matched classes.

mod findings;
mod progress;
mod summary;
mod tables;

pub use findings::{InlineFinding, NodeSpan};
pub use progress::{create_progress_bar, create_spinner};
pub use summary::{print_header, print_scan_stats, print_summary_pills};
pub use tables::print_matched_classes;
