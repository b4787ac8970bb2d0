//! Lógica de dominio pura, separada de la capa HTTP y del acceso a datos

pub mod recurrence;
