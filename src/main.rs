use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use carelock::config::{environment::Config, init_db};
use carelock::modules::emergency::crud::EmergencyAccessCrud;
use carelock::modules::two_factor::crud::TwoFactorCrud;

/// Expiry sweeper: flips overdue emergency grants to `expired` and prunes
/// stale two-factor codes. Both sweeps only move state forward in time, so
/// running alongside the app (or another sweeper) is safe.
#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "carelock=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Failed to load environment configuration");

    let db = init_db().await;
    tracing::info!("Connected to record store");

    let emergency = EmergencyAccessCrud::new(db.clone());
    let two_factor = TwoFactorCrud::new(db);

    let mut interval =
        tokio::time::interval(std::time::Duration::from_secs(config.sweep_interval_secs));

    loop {
        interval.tick().await;

        match emergency.sweep_expired().await {
            Ok(0) => {}
            Ok(n) => tracing::info!(expired = n, "emergency grants swept"),
            Err(e) => tracing::error!(error = %e, "emergency sweep failed"),
        }

        match two_factor.sweep_expired().await {
            Ok(0) => {}
            Ok(n) => tracing::info!(pruned = n, "stale two-factor codes pruned"),
            Err(e) => tracing::error!(error = %e, "two-factor sweep failed"),
        }
    }
}
