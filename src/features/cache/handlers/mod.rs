mod cache_handler;

pub use cache_handler::*;
