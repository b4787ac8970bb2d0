//! Backend de gestión de flota: programaciones de inspección recurrentes.
//!
//! El subsistema central es el motor de expansión de recurrencias
//! (`services::recurrence`), que proyecta las programaciones habilitadas
//! sobre la flota activa y reconcilia el resultado con las inspecciones
//! registradas. El resto es la capa MVC convencional alrededor.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
