pub mod filter;
pub mod handler;

pub use filter::filter_direction;
pub use handler::{InputHandler, KeyAction};
