mod tag_dto;

pub use tag_dto::{normalize_tag_name, CreateTagDto, TagOrder, TagWithCountDto, UpdateTagDto};
