use tokio::sync::broadcast;

/// Fan-out sink for the single coarse `state_changed` signal. Observers
/// refetch authoritative state on receipt; there is no payload, no
/// ordering guarantee across subscribers, and delivery failures are not
/// propagated to the caller that triggered the notification.
#[derive(Clone)]
pub struct StateBroadcaster {
    sender: broadcast::Sender<()>,
}

impl StateBroadcaster {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(64);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.sender.subscribe()
    }

    /// Fire-and-forget: a `SendError` just means nobody is listening
    /// right now, which is not an error from the caller's perspective.
    pub fn notify(&self) {
        let _ = self.sender.send(());
    }
}

impl Default for StateBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_notify() {
        let broadcaster = StateBroadcaster::new();
        let mut rx = broadcaster.subscribe();
        broadcaster.notify();
        assert!(rx.recv().await.is_ok());
    }

    #[test]
    fn notify_without_subscribers_does_not_panic() {
        let broadcaster = StateBroadcaster::new();
        broadcaster.notify();
    }
}
