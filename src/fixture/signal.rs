// ABOUTME: Signal delivery to the runtime client process.
// ABOUTME: Interrupt then terminate, the way a terminal user stops a foreground client.

use tokio::process::Child;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StopSignal {
    Interrupt,
    Terminate,
}

/// Send `signal` to the child. A child that has already been reaped has no
/// pid and is skipped.
#[cfg(unix)]
pub(crate) fn send_signal(child: &mut Child, signal: StopSignal) -> std::io::Result<()> {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    let Some(pid) = child.id() else {
        return Ok(());
    };
    let signal = match signal {
        StopSignal::Interrupt => Signal::SIGINT,
        StopSignal::Terminate => Signal::SIGTERM,
    };
    tracing::debug!(pid, ?signal, "signalling runtime client");
    kill(Pid::from_raw(pid as i32), signal).map_err(std::io::Error::from)
}

// Without POSIX signals both steps fall back to a hard kill.
#[cfg(not(unix))]
pub(crate) fn send_signal(child: &mut Child, signal: StopSignal) -> std::io::Result<()> {
    tracing::debug!(?signal, "killing runtime client");
    match child.start_kill() {
        Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => Ok(()),
        other => other,
    }
}
