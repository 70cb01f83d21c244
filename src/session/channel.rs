//! Broadcast channel that fans packets out to its listeners.

use tokio::sync::Mutex;

use crate::session::Packet;

#[derive(Debug)]
pub struct Channel {
    pub name: String,
    queue: Mutex<Vec<Packet>>,
}

impl Channel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            queue: Mutex::new(Vec::new()),
        }
    }

    pub async fn enqueue(&self, packet: Packet) {
        self.queue.lock().await.push(packet);
    }

    /// Returns a copy of the queued packets without removing them.
    pub async fn pending(&self) -> Vec<Packet> {
        self.queue.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_queue() {
        let channel = Channel::new("#lobby");
        channel.enqueue(Packet::DisposeMatch(3)).await;
        channel.enqueue(Packet::DisposeMatch(4)).await;

        assert_eq!(
            channel.pending().await,
            vec![Packet::DisposeMatch(3), Packet::DisposeMatch(4)]
        );
        assert_eq!(channel.pending().await.len(), 2);
    }
}
