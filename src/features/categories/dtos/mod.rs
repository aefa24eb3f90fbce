mod category_dto;

pub use category_dto::{
    CategoryListing, CategoryNode, CategoryOrderDto, CategoryResponseDto, CreateCategoryDto,
    ReorderCategoriesDto, UpdateCategoryDto,
};
