mod website_dto;

pub use website_dto::{
    CategoryRefDto, CreateWebsiteDto, RecommendedWebsiteDto, RecommendedWebsitesView,
    UpdateWebsiteDto, WebsiteResponseDto,
};
