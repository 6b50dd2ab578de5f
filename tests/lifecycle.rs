// ABOUTME: Integration tests for the fixture lifecycle against a scripted runtime client.
// ABOUTME: Covers launch, readiness, shutdown, removal warnings and the name registry.

#![cfg(unix)]

mod support;

use dockfix::config::{ReadinessPolicy, StopConfig};
use dockfix::diagnostics::WarningKind;
use dockfix::fixture::{
    ContainerSpec, Fixture, FixtureErrorKind, FixtureManager, ProbeError, probe_fn,
};
use dockfix::runtime::{HostResolver, RuntimeClient, RuntimeConfig};
use dockfix::types::{ContainerName, ContainerPort};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use support::{FakeRuntime, RmBehavior, RunBehavior};
use tokio_util::sync::CancellationToken;

fn name(value: &str) -> ContainerName {
    ContainerName::new(value).unwrap()
}

fn spec(fixture: &str) -> ContainerSpec {
    ContainerSpec::new("X", name(fixture), ContainerPort::tcp(5432).unwrap())
}

fn fast_policy() -> ReadinessPolicy {
    ReadinessPolicy::default()
        .interval(Duration::from_millis(10))
        .timeout(Duration::from_secs(10))
}

fn manager(fake: &FakeRuntime) -> FixtureManager {
    support::init_tracing();
    FixtureManager::new(&RuntimeConfig::default())
        .with_client(RuntimeClient::new(fake.program()))
        .with_resolver(HostResolver::fixed("localhost"))
        .with_readiness(fast_policy())
}

fn never_ready() -> impl dockfix::fixture::ReadinessProbe {
    probe_fn(|_addr: String| async { Err::<(), ProbeError>(ProbeError::from("connection refused")) })
}

mod launch_and_shutdown {
    use super::*;

    #[tokio::test]
    async fn round_trip_removes_before_run_and_after_exit() {
        let fake = FakeRuntime::new(RunBehavior::Serve, RmBehavior::NoSuchContainer);
        let manager = manager(&fake);
        let probe = fake.started_probe();

        let running = manager.launch(spec("fixture-a"), probe.as_ref()).await.unwrap();
        let port = running.host_port();

        assert_eq!(running.addr(), format!("localhost:{port}"));
        assert_eq!(running.host(), "localhost");
        assert_eq!(running.name().as_str(), "fixture-a");
        assert_eq!(running.image(), "X");
        assert!(running.readiness().attempts >= 1);
        assert!(running.pid().is_some());
        assert!(running.warnings().is_empty());
        assert!(manager.registry().is_active(&name("fixture-a")));

        let report = running.shutdown().await;

        assert!(report.removed);
        assert!(report.exit_status.is_some());
        assert!(report.warnings.is_empty());
        assert!(!manager.registry().is_active(&name("fixture-a")));
        assert_eq!(
            fake.calls(),
            vec![
                "rm --force fixture-a".to_string(),
                format!("run --name=fixture-a -p {port}:5432 X"),
                "rm --force fixture-a".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn extra_args_and_environment_reach_the_client() {
        let fake = FakeRuntime::new(RunBehavior::Serve, RmBehavior::Ok);
        let manager = manager(&fake);
        let probe = fake.started_probe();
        let spec = spec("fixture-env")
            .arg("--rm")
            .env("POSTGRES_PASSWORD", "secret")
            .env("A", "1");

        let running = manager.launch(spec, probe.as_ref()).await.unwrap();
        let port = running.host_port();
        running.shutdown().await;

        let run = fake
            .calls()
            .into_iter()
            .find(|call| call.starts_with("run "))
            .unwrap();
        assert_eq!(
            run,
            format!("run --rm --name=fixture-env -e A=1 -e POSTGRES_PASSWORD=secret -p {port}:5432 X")
        );
    }

    #[tokio::test]
    async fn detached_client_keeps_polling_until_ready() {
        let fake = FakeRuntime::new(RunBehavior::Detach, RmBehavior::Ok);
        let manager = manager(&fake).with_readiness(
            ReadinessPolicy::unbounded().interval(Duration::from_millis(20)),
        );
        let calls = Arc::new(AtomicU32::new(0));
        let counted = calls.clone();
        let probe = probe_fn(move |_addr: String| {
            let call = counted.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if call >= 3 {
                    Ok::<(), ProbeError>(())
                } else {
                    Err(ProbeError::from("connection refused"))
                }
            }
        });

        let running = manager
            .launch(spec("fixture-detached").arg("-d"), &probe)
            .await
            .unwrap();

        assert_eq!(running.readiness().attempts, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        let report = running.shutdown().await;
        assert!(report.is_clean());
        assert!(report.removed);
        assert!(report.exit_status.is_some());
        assert_eq!(fake.count("rm"), 2);
    }

    #[tokio::test]
    async fn sequential_launches_get_their_own_ports() {
        let fake = FakeRuntime::new(RunBehavior::Serve, RmBehavior::Ok);
        let manager = manager(&fake);
        let probe = fake.started_probe();

        let first = manager.launch(spec("fixture-a"), probe.as_ref()).await.unwrap();
        let second = manager.launch(spec("fixture-b"), probe.as_ref()).await.unwrap();

        assert_ne!(first.addr(), second.addr());
        assert_eq!(
            manager.registry().active_names(),
            vec![name("fixture-a"), name("fixture-b")]
        );

        first.shutdown().await;
        second.shutdown().await;

        assert!(manager.registry().is_empty());
        assert_eq!(fake.count("run"), 2);
        assert_eq!(fake.count("rm"), 4);
    }

    #[tokio::test]
    async fn name_is_reusable_after_shutdown() {
        let fake = FakeRuntime::new(RunBehavior::Serve, RmBehavior::Ok);
        let manager = manager(&fake);
        let probe = fake.started_probe();

        let first = manager.launch(spec("fixture-a"), probe.as_ref()).await.unwrap();
        first.shutdown().await;
        let second = manager.launch(spec("fixture-a"), probe.as_ref()).await.unwrap();
        second.shutdown().await;

        assert_eq!(fake.count("run"), 2);
    }

    #[tokio::test]
    async fn interrupt_grace_still_stops_the_client() {
        let fake = FakeRuntime::new(RunBehavior::Serve, RmBehavior::Ok);
        let manager = manager(&fake)
            .with_stop(StopConfig::default().interrupt_grace(Duration::from_secs(5)));
        let probe = fake.started_probe();

        let running = manager.launch(spec("fixture-a"), probe.as_ref()).await.unwrap();
        let report = running.shutdown().await;

        assert!(report.is_clean());
        assert!(report.exit_status.is_some());
    }

    #[tokio::test]
    async fn typestate_steps_can_be_driven_by_hand() {
        support::init_tracing();
        let fake = FakeRuntime::new(RunBehavior::Serve, RmBehavior::Ok);
        let probe = fake.started_probe();
        let cancel = CancellationToken::new();

        let pending = Fixture::new(spec("fixture-manual"), RuntimeClient::new(fake.program()))
            .launch(&HostResolver::fixed("127.0.0.1"))
            .await
            .unwrap();
        assert!(pending.addr().starts_with("127.0.0.1:"));

        let ready = match pending
            .await_ready(probe.as_ref(), &fast_policy(), &cancel)
            .await
        {
            Ok(ready) => ready,
            Err((_, e)) => panic!("fixture never became ready: {e}"),
        };

        let stopping = ready.begin_shutdown().await;
        let report = match stopping.wait_for_exit(&cancel).await {
            Ok(report) => report,
            Err((_, e)) => panic!("shutdown wait failed: {e}"),
        };
        assert!(report.removed);
    }
}

mod removal_warnings {
    use super::*;

    #[tokio::test]
    async fn failed_removals_become_warnings() {
        let fake = FakeRuntime::new(RunBehavior::Serve, RmBehavior::Fail);
        let manager = manager(&fake);
        let probe = fake.started_probe();

        let running = manager.launch(spec("fixture-a"), probe.as_ref()).await.unwrap();

        assert_eq!(running.warnings().len(), 1);
        assert_eq!(running.warnings()[0].kind, WarningKind::StaleRemoval);
        assert!(running.warnings()[0].message.contains("permission denied"));

        let report = running.shutdown().await;

        assert!(!report.removed);
        assert!(!report.is_clean());
        let kinds: Vec<_> = report.warnings.iter().map(|w| w.kind).collect();
        assert_eq!(kinds, vec![WarningKind::StaleRemoval, WarningKind::CleanupRemoval]);
        assert!(!manager.registry().is_active(&name("fixture-a")));
    }

    #[tokio::test]
    async fn missing_container_is_not_a_warning() {
        let fake = FakeRuntime::new(RunBehavior::Serve, RmBehavior::NoSuchContainer);
        let manager = manager(&fake);
        let probe = fake.started_probe();

        let running = manager.launch(spec("fixture-a"), probe.as_ref()).await.unwrap();
        assert!(running.warnings().is_empty());

        let report = running.shutdown().await;
        assert!(report.removed);
        assert!(report.warnings.is_empty());
    }
}

mod failures {
    use super::*;

    #[tokio::test]
    async fn active_name_is_rejected_without_touching_the_runtime() {
        let fake = FakeRuntime::new(RunBehavior::Serve, RmBehavior::Ok);
        let manager = manager(&fake);
        let probe = fake.started_probe();

        let running = manager.launch(spec("fixture-a"), probe.as_ref()).await.unwrap();
        let calls_before = fake.calls().len();

        let err = manager
            .launch(spec("fixture-a"), probe.as_ref())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), FixtureErrorKind::NameInUse);
        assert_eq!(fake.calls().len(), calls_before);

        running.shutdown().await;
    }

    #[tokio::test]
    async fn client_exit_ends_the_wait() {
        let fake = FakeRuntime::new(RunBehavior::Exit(125), RmBehavior::Ok);
        let manager = manager(&fake).with_readiness(ReadinessPolicy::unbounded());

        let err = tokio::time::timeout(
            Duration::from_secs(20),
            manager.launch(spec("fixture-a"), &never_ready()),
        )
        .await
        .expect("launch should not hang when the client exits")
        .unwrap_err();

        assert_eq!(err.kind(), FixtureErrorKind::ProcessExited);
        assert!(manager.registry().is_empty());
        assert_eq!(fake.calls().last().map(String::as_str), Some("rm --force fixture-a"));
    }

    #[tokio::test]
    async fn never_ready_aborts_and_cleans_up() {
        let fake = FakeRuntime::new(RunBehavior::Serve, RmBehavior::Ok);
        let manager = manager(&fake).with_readiness(
            ReadinessPolicy::unbounded()
                .interval(Duration::from_millis(10))
                .max_attempts(3),
        );

        let err = manager
            .launch(spec("fixture-a"), &never_ready())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), FixtureErrorKind::NeverReady);
        assert!(err.to_string().contains("connection refused"));
        assert!(manager.registry().is_empty());
        assert_eq!(fake.count("rm"), 2);
    }

    #[tokio::test]
    async fn cancelled_launch_aborts_and_cleans_up() {
        let fake = FakeRuntime::new(RunBehavior::Serve, RmBehavior::Ok);
        let manager = manager(&fake).with_readiness(ReadinessPolicy::unbounded());
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let err = manager
            .launch_with_cancel(spec("fixture-a"), &never_ready(), &cancel)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), FixtureErrorKind::Cancelled);
        assert!(manager.registry().is_empty());
        assert_eq!(fake.count("rm"), 2);
    }

    #[tokio::test]
    async fn missing_client_is_a_launch_error() {
        support::init_tracing();
        let manager = FixtureManager::new(&RuntimeConfig::default())
            .with_client(RuntimeClient::new("/nonexistent/dockfix-fake-docker"))
            .with_resolver(HostResolver::fixed("localhost"));
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();
        let probe = probe_fn(move |_addr: String| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok::<(), ProbeError>(()) }
        });

        let err = manager
            .launch(spec("fixture-a"), &probe)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), FixtureErrorKind::Launch);
        assert_eq!(attempts.load(Ordering::SeqCst), 0);
        assert!(manager.registry().is_empty());
    }

    #[tokio::test]
    async fn stubborn_client_can_be_aborted_after_cancelled_shutdown() {
        let fake = FakeRuntime::new(RunBehavior::IgnoreSignals, RmBehavior::Ok);
        let manager = manager(&fake);
        let probe = fake.started_probe();

        let running = manager.launch(spec("fixture-a"), probe.as_ref()).await.unwrap();

        let give_up = CancellationToken::new();
        let trigger = give_up.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            trigger.cancel();
        });

        let stopping = match running.shutdown_with_cancel(&give_up).await {
            Ok(_) => panic!("client should have ignored INT and TERM"),
            Err((stopping, e)) => {
                assert_eq!(e.kind(), FixtureErrorKind::Cancelled);
                stopping
            }
        };
        assert!(manager.registry().is_active(&name("fixture-a")));

        let report = stopping.abort().await;

        assert!(report.removed);
        assert!(report.exit_status.is_some_and(|status| !status.success()));
        assert!(!manager.registry().is_active(&name("fixture-a")));
    }
}
