//! One-shot authorization gate in front of an asset source.
//!
//! Sources answer permission requests through a callback, possibly from
//! another thread. The gate turns that into a blocking call.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::source::AssetSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Authorization {
    Granted,
    Denied,
}

/// Callback a source invokes once with its answer.
pub type AuthorizationReply = Box<dyn FnOnce(Authorization) + Send>;

#[derive(Debug, Error)]
pub enum GateError {
    #[error("no authorization answer within {0:?}")]
    TimedOut(Duration),
    #[error("asset source dropped the authorization request without answering")]
    Abandoned,
    #[error("access to {0} was denied")]
    Denied(String),
}

/// Request access and block until the source answers.
///
/// With no timeout this waits for as long as the source takes.
pub fn await_authorization<S: AssetSource + ?Sized>(
    source: &S,
    timeout: Option<Duration>,
) -> Result<Authorization, GateError> {
    let (tx, rx) = mpsc::channel();
    source.request_authorization(Box::new(move |status| {
        // receiver is gone only if the gate already gave up
        let _ = tx.send(status);
    }));

    match timeout {
        None => rx.recv().map_err(|_| GateError::Abandoned),
        Some(limit) => rx.recv_timeout(limit).map_err(|e| match e {
            RecvTimeoutError::Timeout => GateError::TimedOut(limit),
            RecvTimeoutError::Disconnected => GateError::Abandoned,
        }),
    }
}
