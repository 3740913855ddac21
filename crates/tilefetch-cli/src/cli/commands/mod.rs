//! CLI command handlers, one per file.

mod completions;
mod extract;
mod fetch;
mod fetch_image;
mod reset_dir;

pub use completions::{run_completions, run_man};
pub use extract::run_extract;
pub use fetch::run_fetch;
pub use fetch_image::run_fetch_image;
pub use reset_dir::run_reset_dir;
