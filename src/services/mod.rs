//! Services module
//!
//! Este módulo contiene la lógica de negocio: el simulador de densidad,
//! el adaptador sobre la tabla de lecturas, el cálculo de rutas y el
//! refresco periódico.

pub mod density_model;
pub mod density_poller;
pub mod density_service;
pub mod route_service;
