mod cache_dto;

pub use cache_dto::CacheFlushDto;
