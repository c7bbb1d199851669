pub mod crud;
pub mod model;

pub use crud::{AuditCrud, AuditLog};
