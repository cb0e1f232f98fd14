use std::sync::atomic::AtomicBool;

pub mod helper;
pub mod stdio;

/// Set by the Ctrl-C handler. Interactive sessions stop taking input once it
/// flips; a one-shot request is abandoned.
pub static DONE: AtomicBool = AtomicBool::new(false);
