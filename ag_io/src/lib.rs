pub mod fetch;
pub mod render;

pub use fetch::{Fetcher, decode_index};
pub use render::{RenderOutcome, open_viewer, render_image, write_dot};
