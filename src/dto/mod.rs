pub mod common;
pub mod schedule_dto;
pub mod template_dto;
pub mod vehicle_dto;
