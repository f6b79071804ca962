//! Small shared helpers: signal mutation sugar and platform timers.

mod signal_ext;
mod time;

pub use signal_ext::SignalExt;
pub use time::sleep;
