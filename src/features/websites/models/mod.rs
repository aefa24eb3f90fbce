mod website;

pub use website::{Website, WebsiteTag};
