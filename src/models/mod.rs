//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos: catálogo estático de
//! ubicaciones, lecturas de densidad, rutas y alertas de seguridad.

pub mod alert;
pub mod density;
pub mod location;
pub mod route;
