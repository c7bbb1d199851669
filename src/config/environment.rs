use std::env;

/// Environment configuration
/// Loads and validates environment variables
pub struct Config {
    pub database_url: String,
    pub kyc_base_url: String,
    pub kyc_api_key: String,
    pub auth_base_url: String,
    pub auth_api_key: String,
    pub otp_provider_url: String,
    pub otp_api_key: String,
    pub sweep_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set".to_string())?;

        let kyc_base_url = env::var("KYC_BASE_URL")
            .map_err(|_| "KYC_BASE_URL must be set".to_string())?;

        let kyc_api_key = env::var("KYC_API_KEY")
            .map_err(|_| "KYC_API_KEY must be set".to_string())?;

        let auth_base_url = env::var("AUTH_BASE_URL")
            .map_err(|_| "AUTH_BASE_URL must be set".to_string())?;

        let auth_api_key = env::var("AUTH_API_KEY")
            .map_err(|_| "AUTH_API_KEY must be set".to_string())?;

        let otp_provider_url = env::var("OTP_PROVIDER_URL")
            .map_err(|_| "OTP_PROVIDER_URL must be set".to_string())?;

        let otp_api_key = env::var("OTP_API_KEY")
            .map_err(|_| "OTP_API_KEY must be set".to_string())?;

        let sweep_interval_secs = env::var("SWEEP_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        Ok(Self {
            database_url,
            kyc_base_url,
            kyc_api_key,
            auth_base_url,
            auth_api_key,
            otp_provider_url,
            otp_api_key,
            sweep_interval_secs,
        })
    }
}
