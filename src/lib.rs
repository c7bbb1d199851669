pub mod config;
pub mod modules;
pub mod services;

pub use modules::auth::{AuthController, AuthError, LoginOutcome, RestoreOutcome};
pub use modules::emergency::{EmergencyAccessError, EmergencyAccessManager};
pub use modules::two_factor::{TwoFactorError, TwoFactorIssuer};
