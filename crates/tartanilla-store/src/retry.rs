//! Timeout with one retry at a longer timeout.
//!
//! Only timeouts are retried. Any other failure surfaces immediately, so the
//! caller can tell "the server is slow" apart from "the request failed".

use std::future::Future;
use std::time::Duration;

use crate::error::{Result, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub retry_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            retry_timeout: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Run `op` with the first timeout; on a timeout, run it once more with
    /// the longer one. `op` receives the timeout to apply.
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T>
    where
        F: FnMut(Duration) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match op(self.timeout).await {
            Err(err) if err.is_timeout() => {
                log::warn!(
                    "{} timed out after {:?}, retrying with {:?}",
                    what,
                    self.timeout,
                    self.retry_timeout
                );
            }
            other => return other,
        }

        match op(self.retry_timeout).await {
            Err(err) if err.is_timeout() => Err(StoreError::Timeout { attempts: 2 }),
            other => other,
        }
    }
}
