mod category;

pub use category::{Category, CategoryWithCount};
