//! Progress milestones and background tasks.
//!
//! Long operations report a handful of coarse [`Milestone`]s to a
//! [`ProgressSink`]. [`spawn_task`] runs one synchronous call on a worker thread
//! and relays its milestones and result over a channel. Tasks cannot be
//! cancelled; dropping the handle only discards the result.

use std::fmt;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use crate::error::{DegscopeError, Result};

/// A coarse step of a long operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Milestone {
    Loading { path: PathBuf },
    Parsed { rows: usize, columns: usize },
    Mapped { mapped: usize, unmapped_required: usize },
    Standardized { rows: usize, values_coerced: usize },
    DatasetBuilt { name: String },
    Computing { operation: &'static str },
    Finished { operation: &'static str },
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Milestone::Loading { path } => write!(f, "Loading {}", path.display()),
            Milestone::Parsed { rows, columns } => {
                write!(f, "Parsed {} rows x {} columns", rows, columns)
            }
            Milestone::Mapped {
                mapped,
                unmapped_required,
            } => write!(
                f,
                "Mapped {} columns ({} required unmapped)",
                mapped, unmapped_required
            ),
            Milestone::Standardized {
                rows,
                values_coerced,
            } => write!(
                f,
                "Standardized {} rows ({} values set to missing)",
                rows, values_coerced
            ),
            Milestone::DatasetBuilt { name } => write!(f, "Built dataset '{}'", name),
            Milestone::Computing { operation } => write!(f, "Computing {}", operation),
            Milestone::Finished { operation } => write!(f, "Finished {}", operation),
        }
    }
}

/// Receives progress milestones.
pub trait ProgressSink {
    fn report(&self, milestone: Milestone);
}

/// Discards all milestones.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _milestone: Milestone) {}
}

impl<F: Fn(Milestone)> ProgressSink for F {
    fn report(&self, milestone: Milestone) {
        self(milestone)
    }
}

/// Message sent from a background task.
#[derive(Debug)]
pub enum TaskEvent<T> {
    Progress(Milestone),
    Finished(Result<T>),
}

struct ChannelSink<T> {
    tx: Sender<TaskEvent<T>>,
}

impl<T> ProgressSink for ChannelSink<T> {
    fn report(&self, milestone: Milestone) {
        // The receiver may already be gone; the task still runs to completion
        let _ = self.tx.send(TaskEvent::Progress(milestone));
    }
}

/// Handle to a task started with [`spawn_task`].
pub struct TaskHandle<T> {
    events: Receiver<TaskEvent<T>>,
    worker: Option<JoinHandle<()>>,
}

impl<T> TaskHandle<T> {
    /// Next pending event without blocking.
    pub fn try_event(&self) -> Option<TaskEvent<T>> {
        match self.events.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Block until the task finishes, discarding progress.
    pub fn wait(self) -> Result<T> {
        self.wait_with(&NoProgress)
    }

    /// Block until the task finishes, forwarding progress to `sink`.
    pub fn wait_with(mut self, sink: &dyn ProgressSink) -> Result<T> {
        let outcome = loop {
            match self.events.recv() {
                Ok(TaskEvent::Progress(milestone)) => sink.report(milestone),
                Ok(TaskEvent::Finished(result)) => break Some(result),
                Err(_) => break None,
            }
        };

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                return Err(DegscopeError::Computation(
                    "Background task panicked".to_string(),
                ));
            }
        }

        outcome.unwrap_or_else(|| {
            Err(DegscopeError::Computation(
                "Background task ended without a result".to_string(),
            ))
        })
    }
}

/// Run `task` on a worker thread.
///
/// # Example
///
/// ```
/// use degscope::progress::{spawn_task, Milestone};
///
/// let handle = spawn_task(|progress| {
///     progress.report(Milestone::Computing { operation: "sum" });
///     Ok((1..=10).sum::<u32>())
/// });
/// assert_eq!(handle.wait().unwrap(), 55);
/// ```
pub fn spawn_task<T, F>(task: F) -> TaskHandle<T>
where
    T: Send + 'static,
    F: FnOnce(&dyn ProgressSink) -> Result<T> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let worker = thread::spawn(move || {
        let sink = ChannelSink { tx: tx.clone() };
        let result = task(&sink);
        let _ = tx.send(TaskEvent::Finished(result));
    });

    TaskHandle {
        events: rx,
        worker: Some(worker),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[test]
    fn test_closure_sink() {
        let seen = RefCell::new(Vec::new());
        let sink = |m: Milestone| seen.borrow_mut().push(m.to_string());
        sink.report(Milestone::Parsed { rows: 3, columns: 2 });
        assert_eq!(seen.into_inner(), vec!["Parsed 3 rows x 2 columns"]);
    }

    #[test]
    fn test_task_relays_progress_and_result() {
        let handle = spawn_task(|progress| {
            progress.report(Milestone::Computing { operation: "fisher" });
            progress.report(Milestone::Finished { operation: "fisher" });
            Ok(42)
        });

        let seen = RefCell::new(Vec::new());
        let result = handle
            .wait_with(&|m: Milestone| seen.borrow_mut().push(m))
            .unwrap();

        assert_eq!(result, 42);
        assert_eq!(
            seen.into_inner(),
            vec![
                Milestone::Computing { operation: "fisher" },
                Milestone::Finished { operation: "fisher" },
            ]
        );
    }

    #[test]
    fn test_task_error_is_returned() {
        let handle = spawn_task::<(), _>(|_| Err(DegscopeError::Comparison("nope".into())));
        assert!(matches!(handle.wait(), Err(DegscopeError::Comparison(_))));
    }

    #[test]
    fn test_task_panic_is_reported() {
        let handle = spawn_task::<(), _>(|_| panic!("boom"));
        assert!(matches!(handle.wait(), Err(DegscopeError::Computation(_))));
    }
}
