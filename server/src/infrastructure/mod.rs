//! Capa de infraestructura

pub mod persistence;
