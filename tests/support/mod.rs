// ABOUTME: Test support utilities.
// ABOUTME: Provides tracing setup and a scripted stand-in for the runtime client.

use dockfix::fixture::{ProbeError, ReadinessProbe, probe_fn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("dockfix=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// How the fake client behaves for `run`.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy)]
pub enum RunBehavior {
    /// Stay in the foreground until signalled, like an attached container.
    Serve,
    /// Ignore SIGINT and SIGTERM; only SIGKILL stops it.
    IgnoreSignals,
    /// Fail immediately with this exit code, like a name conflict.
    Exit(i32),
    /// Print a container id and exit 0, like `docker run -d`.
    Detach,
}

/// How the fake client behaves for `rm --force`.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy)]
pub enum RmBehavior {
    Ok,
    NoSuchContainer,
    Fail,
}

/// A shell script standing in for `docker`, logging every invocation.
#[allow(dead_code)]
pub struct FakeRuntime {
    dir: tempfile::TempDir,
    program: PathBuf,
    log: PathBuf,
}

#[allow(dead_code)]
impl FakeRuntime {
    pub fn new(run: RunBehavior, rm: RmBehavior) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let program = dir.path().join("fake-docker");
        let log = dir.path().join("calls.log");
        fs::write(&log, "").unwrap();

        let prelude = match run {
            RunBehavior::IgnoreSignals => "trap '' INT TERM",
            _ => ":",
        };
        let run_body = match run {
            RunBehavior::Serve | RunBehavior::IgnoreSignals => "exec sleep 30".to_string(),
            RunBehavior::Detach => "echo abc123; exit 0".to_string(),
            RunBehavior::Exit(code) => {
                format!("echo 'Error response from daemon: Conflict.' >&2; exit {code}")
            }
        };
        let rm_body = match rm {
            RmBehavior::Ok => "exit 0",
            RmBehavior::NoSuchContainer => "echo \"Error: No such container: $3\" >&2; exit 1",
            RmBehavior::Fail => "echo 'Error response from daemon: permission denied' >&2; exit 1",
        };

        let script = format!(
            "#!/bin/sh\n\
             {prelude}\n\
             echo \"$*\" >> '{log}'\n\
             case \"$1\" in\n\
               run) {run_body} ;;\n\
               rm) {rm_body} ;;\n\
             esac\n",
            log = log.display(),
        );
        write_executable(&program, &script);

        Self { dir, program, log }
    }

    pub fn program(&self) -> String {
        self.program.display().to_string()
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Every invocation so far, one argument string per call.
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn count(&self, subcommand: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.split(' ').next() == Some(subcommand))
            .count()
    }

    /// True once the client has logged its `run` invocation.
    pub fn has_run(&self) -> bool {
        self.count("run") > 0
    }

    /// A probe that succeeds once the client has started serving.
    pub fn started_probe(&self) -> Box<dyn ReadinessProbe> {
        let log = self.log.clone();
        Box::new(probe_fn(move |_addr: String| {
            let log = log.clone();
            async move {
                let logged = fs::read_to_string(&log).unwrap_or_default();
                if logged.lines().any(|line| line.starts_with("run ")) {
                    Ok::<(), ProbeError>(())
                } else {
                    Err(ProbeError::from("client has not started"))
                }
            }
        }))
    }
}

/// Write a script and mark it executable.
#[allow(dead_code)]
pub fn write_executable(path: &Path, script: &str) {
    use std::os::unix::fs::PermissionsExt;

    fs::write(path, script).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}
