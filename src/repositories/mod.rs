pub mod inspection_repository;
pub mod schedule_repository;
pub mod template_repository;
pub mod vehicle_repository;
