mod website_handler;

pub use website_handler::*;
