mod home_dto;

pub use home_dto::{select_sidebar, HomeView};
