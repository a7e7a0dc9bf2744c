//! Outbound intent sink.
//!
//! The session never talks to a socket directly. It hands each intent to an
//! [`IntentSink`]; sends are fire-and-forget and a failure is reported, never
//! retried.

use taskboard_types::Intent;
use thiserror::Error;
use tokio::sync::mpsc;

/// Failure to hand an intent to the transport.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The transport side has gone away.
    #[error("push channel closed")]
    Closed,
    /// The transport refused the intent.
    #[error("send failed: {0}")]
    Rejected(String),
}

/// Where outbound intents go.
pub trait IntentSink {
    fn send(&mut self, intent: Intent) -> Result<(), TransportError>;
}

impl IntentSink for mpsc::UnboundedSender<Intent> {
    fn send(&mut self, intent: Intent) -> Result<(), TransportError> {
        mpsc::UnboundedSender::send(self, intent).map_err(|_| TransportError::Closed)
    }
}

/// Collects intents in memory. Used by tests and dry runs.
impl IntentSink for Vec<Intent> {
    fn send(&mut self, intent: Intent) -> Result<(), TransportError> {
        self.push(intent);
        Ok(())
    }
}

impl<S: IntentSink + ?Sized> IntentSink for Box<S> {
    fn send(&mut self, intent: Intent) -> Result<(), TransportError> {
        (**self).send(intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_sink_reports_closed() {
        let (mut tx, rx) = mpsc::unbounded_channel::<Intent>();
        assert!(IntentSink::send(&mut tx, Intent::GetTasks).is_ok());
        drop(rx);
        assert_eq!(IntentSink::send(&mut tx, Intent::GetTasks), Err(TransportError::Closed));
    }
}
