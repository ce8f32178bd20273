pub mod appointment;
pub mod availability;

use tokio_util::sync::{CancellationToken, DropGuard};

use crate::ApiState;

/// Cancellation scope of a single request.
///
/// The token is a child of the server shutdown token, and the guard cancels
/// it when the handler future is dropped (client gone or request timed out).
pub(crate) fn request_scope(state: &ApiState) -> (CancellationToken, DropGuard) {
    let cancel = state.shutdown.child_token();
    let guard = cancel.clone().drop_guard();
    (cancel, guard)
}
