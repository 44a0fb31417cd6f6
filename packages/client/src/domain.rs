//! Reconnection decisions.
//!
//! Pure functions, kept apart from the runner so they can be tested without a
//! network.

use crate::error::ClientError;

/// Check if the client should exit immediately based on the error type.
///
/// # Returns
///
/// `true` if retrying cannot succeed (e.g. a malformed URL)
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::InvalidUrl(_))
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - Failed attempts so far, including this one
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}

/// Attempt counter after a failure.
///
/// A lost connection was up before it failed, so counting restarts from it;
/// failures to connect keep accumulating.
pub fn next_attempt(error: &ClientError, current_attempt: u32) -> u32 {
    match error {
        ClientError::ConnectionLost => 1,
        _ => current_attempt + 1,
    }
}
