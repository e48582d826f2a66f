//! Background task runner.
//!
//! Each dispatched call gets its own OS thread with a small tokio runtime;
//! the result comes back over a single-shot channel that the UI thread polls.
//! The runner never queues or cancels: keeping one call per kind in flight
//! is the controller's job.

use providers::ApiFailure;
use std::future::Future;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::time::Instant;

/// The kinds of remote call, at most one of each in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallKind {
    Chat,
    Search,
    Extract,
}

impl CallKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallKind::Chat => "chat",
            CallKind::Search => "search",
            CallKind::Extract => "extract",
        }
    }
}

/// Handle to one dispatched call. Yields its completion exactly once.
pub struct PendingCall<T> {
    kind: CallKind,
    started: Instant,
    rx: Receiver<Result<T, ApiFailure>>,
}

impl<T> PendingCall<T> {
    /// Non-blocking check. `None` while the worker is still running.
    pub fn try_complete(&self) -> Option<Result<T, ApiFailure>> {
        let outcome = match self.rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            // Worker went away without reporting (panicked)
            Err(TryRecvError::Disconnected) => Err(ApiFailure::new(format!(
                "{} worker stopped unexpectedly",
                self.kind.as_str()
            ))),
        };
        tracing::debug!(
            kind = self.kind.as_str(),
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            ok = outcome.is_ok(),
            "call completed"
        );
        Some(outcome)
    }
}

/// Run `make()` to completion on a fresh worker thread.
pub fn spawn_call<T, F, Fut>(kind: CallKind, make: F) -> PendingCall<T>
where
    T: Send + 'static,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, ApiFailure>>,
{
    let (tx, rx) = channel();
    tracing::info!(kind = kind.as_str(), "dispatching call");

    std::thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                let _ = tx.send(Err(ApiFailure::new(format!(
                    "Failed to start async runtime: {}",
                    e
                ))));
                return;
            }
        };
        let outcome = rt.block_on(make());
        // Receiver may already be gone if the app is shutting down
        let _ = tx.send(outcome);
    });

    PendingCall {
        kind,
        started: Instant::now(),
        rx,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn wait<T>(call: &PendingCall<T>) -> Result<T, ApiFailure> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(outcome) = call.try_complete() {
                return outcome;
            }
            assert!(Instant::now() < deadline, "call never completed");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_delivers_success() {
        let call = spawn_call(CallKind::Search, || async { Ok(41 + 1) });
        assert_eq!(wait(&call), Ok(42));
    }

    #[test]
    fn test_delivers_failure() {
        let call: PendingCall<()> =
            spawn_call(CallKind::Chat, || async { Err(ApiFailure::new("boom")) });
        assert_eq!(wait(&call).unwrap_err().reason, "boom");
    }

    #[test]
    fn test_pending_until_worker_finishes() {
        let (gate_tx, gate_rx) = channel::<()>();
        let call = spawn_call(CallKind::Extract, move || async move {
            let _ = gate_rx.recv_timeout(Duration::from_secs(5));
            Ok("done")
        });
        std::thread::sleep(Duration::from_millis(20));
        assert!(call.try_complete().is_none());
        gate_tx.send(()).unwrap();
        assert_eq!(wait(&call), Ok("done"));
    }

    #[test]
    fn test_panicking_worker_reports_failure() {
        let call: PendingCall<()> = spawn_call(CallKind::Chat, || async {
            if true {
                panic!("worker exploded");
            }
            Ok(())
        });
        let err = wait(&call).unwrap_err();
        assert!(err.reason.contains("chat worker stopped"));
    }
}
