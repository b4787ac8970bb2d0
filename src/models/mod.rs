pub mod inspection;
pub mod rule;
pub mod schedule;
pub mod template;
pub mod vehicle;
