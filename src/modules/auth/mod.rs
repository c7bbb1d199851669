pub mod controller;
pub mod model;
pub mod schema;

pub use controller::AuthController;
pub use schema::{AuthError, LoginOutcome, RestoreOutcome};
