//! Capa de dominio

pub mod entities;
pub mod repositories;
