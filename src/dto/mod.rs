pub mod alert_dto;
pub mod density_dto;
pub mod route_dto;
