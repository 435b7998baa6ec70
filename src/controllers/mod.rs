pub mod crowd_density_controller;
pub mod route_controller;
pub mod safety_alert_controller;
