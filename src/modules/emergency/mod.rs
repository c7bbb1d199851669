pub mod crud;
pub mod manager;
pub mod model;
pub mod schema;

pub use manager::EmergencyAccessManager;
pub use schema::EmergencyAccessError;
