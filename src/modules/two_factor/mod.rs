pub mod crud;
pub mod issuer;
pub mod model;
pub mod schema;

pub use issuer::TwoFactorIssuer;
pub use schema::TwoFactorError;
