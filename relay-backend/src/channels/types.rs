use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Handle to a running channel listener. Starting a channel returns this
/// instead of a bare status string so the caller can still observe or stop
/// the listener after the fact.
pub struct ChannelHandle {
    pub channel_type: String,
    pub name: String,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ChannelHandle {
    pub fn new(
        channel_type: impl Into<String>,
        name: impl Into<String>,
        shutdown_tx: oneshot::Sender<()>,
        task: JoinHandle<()>,
    ) -> Self {
        Self {
            channel_type: channel_type.into(),
            name: name.into(),
            shutdown_tx: Some(shutdown_tx),
            task,
        }
    }

    /// Whether the listener task has exited (fatal error or prior shutdown).
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Signal the listener to shut down and wait for its task to exit.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = self.task.await {
            log::warn!("{} listener task panicked: {}", self.channel_type, e);
        }
    }
}
