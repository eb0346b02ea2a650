//! Last-request-wins task launcher

use std::future::Future;
use std::sync::Mutex;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::sync::lock;

/// Holds the cancellation token of the most recent launch.
///
/// Launching again cancels the previous task's token; the previous task is
/// expected to observe it and finish on its own so its cleanup still runs.
#[derive(Default)]
pub struct SingleFlight {
    current: Mutex<Option<CancellationToken>>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn launch<F, Fut>(&self, task: F) -> JoinHandle<()>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        if let Some(previous) = lock(&self.current).replace(token.clone()) {
            if !previous.is_cancelled() {
                tracing::debug!("Superseding pending launch");
            }
            previous.cancel();
        }
        tokio::spawn(task(token))
    }

    pub fn cancel(&self) {
        if let Some(token) = lock(&self.current).take() {
            token.cancel();
        }
    }
}
