//! sea-orm database backend

pub mod entities;
pub mod migration;
mod seaorm_db;

pub use seaorm_db::{DatabaseBackendType, SeaOrmDatabase};
