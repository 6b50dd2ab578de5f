// ABOUTME: Up command implementation.
// ABOUTME: Launches one configured fixture, holds it until Ctrl-C, then tears it down.

use dockfix::config::Config;
use dockfix::error::Result;
use dockfix::fixture::FixtureManager;
use dockfix::output::Output;
use tokio_util::sync::CancellationToken;

/// Cancel `token` on the next Ctrl-C.
fn cancel_on_ctrl_c(token: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    })
}

pub async fn up(config: &Config, fixture: &str, mut output: Output) -> Result<()> {
    let fixture = config.fixture(fixture)?;
    let spec = fixture.to_spec()?;
    let probe = fixture.probe.to_probe();
    let manager = FixtureManager::from_config(config);

    output.start_timer();
    output.progress(&format!("Starting {} ({})...", spec.name(), spec.image()));

    let interrupted = CancellationToken::new();
    let watcher = cancel_on_ctrl_c(interrupted.clone());

    let running = match manager
        .launch_with_cancel(spec, &probe, &interrupted)
        .await
    {
        Ok(running) => running,
        Err(e) => {
            watcher.abort();
            return Err(e.into());
        }
    };

    let seen = running.warnings().len();
    for warning in running.warnings() {
        output.warning(warning);
    }
    output.ready(running.name().as_str(), &running.addr());
    output.progress("Press Ctrl-C to stop.");

    interrupted.cancelled().await;
    output.progress(&format!("Stopping {}... (Ctrl-C again to kill)", running.name()));

    let forced = CancellationToken::new();
    let _watcher = cancel_on_ctrl_c(forced.clone());

    let report = match running.shutdown_with_cancel(&forced).await {
        Ok(report) => report,
        Err((stopping, _)) => {
            output.progress("Killing runtime client...");
            stopping.abort().await
        }
    };

    for warning in report.warnings.iter().skip(seen) {
        output.warning(warning);
    }
    if report.removed {
        output.success(&format!("Removed {}", report.name));
    }
    Ok(())
}
