pub mod audit;
pub mod auth;
pub mod device;
pub mod emergency;
pub mod two_factor;
