pub mod crud;
pub mod interface;
pub mod model;
pub mod schema;

pub use interface::{DeviceError, DeviceRegistry};
