pub mod fleet_controller;
pub mod inspection_schedule_controller;
pub mod schedule_rules_controller;
