mod setting_handler;

pub use setting_handler::*;
