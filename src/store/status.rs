use std::fmt::Display;
use std::future::Future;

use serde::Serialize;

use super::observable::Observable;

/// Lifecycle of one named mutating command.
///
/// `Idle` is the construction default. A command always re-enters
/// `Processing`, whatever terminal value it held before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationStatus {
    #[default]
    Idle,
    Processing,
    Successful,
    Failed,
}

impl OperationStatus {
    pub fn is_idle(&self) -> bool {
        matches!(self, OperationStatus::Idle)
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, OperationStatus::Processing)
    }

    pub fn is_successful(&self) -> bool {
        matches!(self, OperationStatus::Successful)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, OperationStatus::Failed)
    }
}

/// Drive one status field through `Processing` and into a terminal value.
///
/// Publishes on entry and on completion. `apply` runs under the same write
/// as the `Successful` transition; on failure the state is left untouched
/// apart from the status. Returns whether the call succeeded.
pub(crate) async fn run_operation<S, T, E, Fut>(
    observable: &Observable<S>,
    operation: &'static str,
    status: impl Fn(&mut S) -> &mut OperationStatus,
    call: Fut,
    apply: impl FnOnce(&mut S, T),
) -> bool
where
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    observable.update(|state| *status(state) = OperationStatus::Processing);
    tracing::debug!(operation, "Operation started");

    match call.await {
        Ok(value) => {
            observable.update(|state| {
                apply(state, value);
                *status(state) = OperationStatus::Successful;
            });
            tracing::debug!(operation, "Operation succeeded");
            true
        }
        Err(e) => {
            tracing::warn!(operation, error = %e, "Operation failed");
            observable.update(|state| *status(state) = OperationStatus::Failed);
            false
        }
    }
}
