use std::time::Duration;

use sea_orm::Database;
use tracing::{error, info};

use presenza_attendance::config::AttendanceConfig;
use presenza_attendance::router::build_router;
use presenza_attendance::state::AppState;
use presenza_attendance::usecase::sweep::ExpirySweepUseCase;
use presenza_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AttendanceConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState { db };

    spawn_sweep_task(state.clone(), config.sweep_interval_secs);

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.attendance_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("attendance service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}

/// Background expiry sweep. Each tick is an independent pass; an error is
/// logged and the next tick retries from storage, so a transient failure
/// never wedges the reconciliation loop.
fn spawn_sweep_task(state: AppState, interval_secs: u64) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let sweep = ExpirySweepUseCase {
                countdowns: state.countdown_repo(),
                clock: state.clock(),
            };
            match sweep.run().await {
                Ok(report) if report.executed_count + report.already_handled_count > 0 => {
                    info!(
                        executed = report.executed_count,
                        already_handled = report.already_handled_count,
                        "expiry sweep pass"
                    );
                }
                Ok(_) => {}
                Err(e) => error!(error = %e, "expiry sweep pass failed"),
            }
        }
    });
}
