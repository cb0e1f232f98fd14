pub mod ctx;
pub mod detect;
pub mod form;
pub mod monitor;
pub mod session;
pub mod utils;
pub mod view;
