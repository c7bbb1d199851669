pub mod biometric;
pub mod countdown;
pub mod credential_store;
pub mod encryption;
pub mod fingerprint;
pub mod kyc;
pub mod otp;
pub mod session;
