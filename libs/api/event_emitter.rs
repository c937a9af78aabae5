use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Fan-out of values to every live [`EventListener`]. Clones share the same
/// listener set.
#[derive(Clone)]
pub struct EventEmitter<T: Clone> {
    listener_ids_counter: Arc<AtomicU64>,
    listeners: Arc<DashMap<u64, Sender<T>>>,
}

impl<T: Clone> EventEmitter<T> {
    pub fn new() -> Self {
        Self {
            listener_ids_counter: Arc::new(AtomicU64::default()),
            listeners: Arc::new(DashMap::new()),
        }
    }

    pub fn notify(&self, data: &T) {
        let mut disconnected = Vec::new();

        for listener in self.listeners.iter() {
            if listener.value().send(data.clone()).is_err() {
                disconnected.push(*listener.key());
            }
        }

        // removing while iterating would deadlock the shard
        for listener_id in disconnected {
            tracing::trace!(listener_id, "dropping disconnected listener");
            self.listeners.remove(&listener_id);
        }
    }

    fn generate_listener_id(&self) -> u64 {
        self.listener_ids_counter.fetch_add(1, Ordering::SeqCst)
    }

    pub fn subscribe(&self) -> EventListener<T> {
        let listener_id = self.generate_listener_id();
        let (sender, receiver) = crossbeam_channel::unbounded();
        self.listeners.insert(listener_id, sender);
        EventListener {
            id: listener_id,
            receiver,
        }
    }

    pub fn unsubscribe(&self, listener_id: u64) {
        self.listeners.remove(&listener_id);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<T: Clone> Default for EventEmitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct EventListener<T> {
    pub id: u64,
    receiver: Receiver<T>,
}

impl<T> EventListener<T> {
    /// Next pending value, without waiting.
    pub fn try_next(&self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    /// Every value received since the last call, oldest first.
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }

    pub fn next_timeout(&self, timeout: Duration) -> eyre::Result<Option<T>> {
        match self.receiver.recv_timeout(timeout) {
            Ok(data) => Ok(Some(data)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(eyre::eyre!("emitter was dropped")),
        }
    }
}

impl<T: Send + 'static> EventListener<T> {
    /// Runs `on` for every value on a blocking thread until the emitter goes away.
    pub fn start_listen(
        self,
        on: impl Fn(T) -> eyre::Result<()> + Send + 'static,
    ) -> tokio::task::JoinHandle<()> {
        tokio::task::spawn_blocking(move || {
            while let Ok(data) = self.receiver.recv() {
                if let Err(e) = on(data) {
                    tracing::error!("Error in listener: {e:?}");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listener_receives_each_value() {
        let emitter = EventEmitter::<u32>::new();
        let first = emitter.subscribe();
        let second = emitter.subscribe();

        emitter.notify(&1);
        emitter.notify(&2);

        assert_eq!(first.drain(), vec![1, 2]);
        assert_eq!(second.drain(), vec![1, 2]);
        assert!(first.try_next().is_none());
    }

    #[test]
    fn unsubscribed_listener_stops_receiving() {
        let emitter = EventEmitter::<&'static str>::new();
        let listener = emitter.subscribe();

        emitter.unsubscribe(listener.id);
        emitter.notify(&"ignored");

        assert!(listener.drain().is_empty());
        assert_eq!(emitter.listener_count(), 0);
    }

    #[test]
    fn dropped_listeners_are_pruned_on_notify() {
        let emitter = EventEmitter::<u8>::new();
        let kept = emitter.subscribe();
        drop(emitter.subscribe());

        emitter.notify(&7);

        assert_eq!(emitter.listener_count(), 1);
        assert_eq!(kept.drain(), vec![7]);
    }

    #[test]
    fn clones_share_listeners() {
        let emitter = EventEmitter::<u8>::new();
        let listener = emitter.subscribe();

        emitter.clone().notify(&3);

        assert_eq!(listener.drain(), vec![3]);
    }

    #[tokio::test]
    async fn start_listen_runs_until_emitter_is_dropped() -> eyre::Result<()> {
        let emitter = EventEmitter::<u32>::new();
        let (tx, rx) = crossbeam_channel::unbounded();
        let handle = emitter.subscribe().start_listen(move |value| {
            tx.send(value * 10)?;
            Ok(())
        });

        emitter.notify(&4);
        drop(emitter);
        handle.await?;

        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![40]);
        Ok(())
    }
}
