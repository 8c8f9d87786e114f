//! The module contains the errors the engine can throw.
//!
//! `KeyNotFound` covers both truly absent records and records that exist in
//! another organization: the two cases are deliberately indistinguishable so
//! that cross-tenant probing leaks nothing.

use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(i64),
    #[error("Invalid kind: {0}")]
    InvalidKind(String),
    #[error("Invalid role: {0}")]
    InvalidRole(String),
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
    #[error("Delete rejected: {0}")]
    InvalidDelete(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidKind(a), Self::InvalidKind(b)) => a == b,
            (Self::InvalidRole(a), Self::InvalidRole(b)) => a == b,
            (Self::InvalidFilter(a), Self::InvalidFilter(b)) => a == b,
            (Self::InvalidDelete(a), Self::InvalidDelete(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
