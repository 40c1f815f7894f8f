use crate::observable::Observable;
use std::{
  sync::mpsc::{channel, RecvTimeoutError},
  time::Duration,
};
use thiserror::Error;

/// Failure surfaced by [`Observable::wait`].
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum WaitError {
  /// No value arrived within the allotted time.
  #[error("timed out waiting for a value")]
  Timeout,
  /// The subscription ended before a value arrived.
  #[error("the observable stopped delivering before a value arrived")]
  Disconnected,
}

impl<T: Clone + Send + 'static> Observable<T> {
  /// Block the calling thread until a value arrives or `timeout` elapses;
  /// `None` waits indefinitely.
  ///
  /// A retained value is delivered immediately, so on a retaining cell
  /// this means "current or next value". This is the crate's only
  /// deliberately blocking operation.
  pub fn wait(&self, timeout: Option<Duration>) -> Result<T, WaitError> {
    let (sender, receiver) = channel();
    let token = self.subscribe(move |value| {
      let _ = sender.send(value.clone());
    });
    let result = match timeout {
      Some(timeout) => receiver.recv_timeout(timeout).map_err(|e| match e {
        RecvTimeoutError::Timeout => WaitError::Timeout,
        RecvTimeoutError::Disconnected => WaitError::Disconnected,
      }),
      None => receiver.recv().map_err(|_| WaitError::Disconnected),
    };
    token.unsubscribe();
    result
  }
}
