use nexus_core::RelayFrame;
use tokio::sync::broadcast;

/// Shared broadcast domain for outbound frames.
///
/// Delivery is best-effort and fire-and-forget: a frame published while
/// nobody is subscribed is dropped, there is no replay buffer, and a
/// subscriber that falls more than the channel capacity behind skips ahead.
/// The relay never learns which physical connection speaks for a given bot;
/// every subscriber sees every frame and bots self-filter on `bot_id`.
#[derive(Clone)]
pub struct Bus {
    tx: broadcast::Sender<RelayFrame>,
}

impl Bus {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Attaches a new subscriber. Frames published before this call are
    /// never delivered to it.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RelayFrame> {
        self.tx.subscribe()
    }

    /// Publishes a frame to every current subscriber and returns how many
    /// there were. Zero subscribers is not an error.
    pub fn publish(&self, frame: RelayFrame) -> usize {
        self.tx.send(frame).unwrap_or(0)
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_core::Notice;

    #[tokio::test]
    async fn publish_without_subscribers_is_dropped() {
        let bus = Bus::new(16);
        assert_eq!(bus.publish(RelayFrame::Error(Notice::new("nobody home"))), 0);
    }

    #[tokio::test]
    async fn late_subscriber_misses_earlier_frames() {
        let bus = Bus::new(16);
        bus.publish(RelayFrame::Error(Notice::new("before")));

        let mut rx = bus.subscribe();
        bus.publish(RelayFrame::Error(Notice::new("after")));

        let frame = rx.recv().await.unwrap();
        assert_eq!(frame, RelayFrame::Error(Notice::new("after")));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn every_subscriber_sees_every_frame() {
        let bus = Bus::new(16);
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        assert_eq!(bus.publish(RelayFrame::Error(Notice::new("fanout"))), 2);
        assert_eq!(a.recv().await.unwrap(), RelayFrame::Error(Notice::new("fanout")));
        assert_eq!(b.recv().await.unwrap(), RelayFrame::Error(Notice::new("fanout")));
    }
}
