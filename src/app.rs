//! Writing pad
//!
//! A minimal full-screen editor that feeds the suggestion engine and
//! draws its overlay. The host side of the engine's contract lives here.

mod events;
mod render;
mod state;

pub use events::run;
pub use state::App;
