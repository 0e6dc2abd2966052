//! Presentation mapping
//!
//! Turns timer events into animation parameters and output lines. Nothing
//! here renders; hosts feed the results to their own display layer.

pub mod animation;
pub mod display;

pub use animation::{animation_for, MascotAnimation, MascotOffset};
pub use display::{render_line, DisplayFormat};
