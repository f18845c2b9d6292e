pub mod display;
pub mod repl;
pub mod session;

pub use display::{render_display, render_history, render_keypad};
pub use repl::run as run_repl;
pub use session::Session;
