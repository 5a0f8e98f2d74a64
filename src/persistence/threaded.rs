//! Background writer
//!
//! Wraps a blocking store so `set` only enqueues. A worker thread applies the
//! writes, coalescing repeated writes to the same key. Reads go straight to
//! the wrapped store.

use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use super::{ScoreStore, StoreError};

/// Store whose writes happen off the calling thread
pub struct ThreadedStore<S: ScoreStore + Send + 'static> {
    inner: Arc<Mutex<S>>,
    tx: Option<Sender<(String, u64)>>,
    worker: Option<JoinHandle<()>>,
}

impl<S: ScoreStore + Send + 'static> ThreadedStore<S> {
    pub fn new(store: S) -> Result<Self, StoreError> {
        let inner = Arc::new(Mutex::new(store));
        let (tx, rx) = mpsc::channel();
        let worker_store = Arc::clone(&inner);
        let worker = std::thread::Builder::new()
            .name("score-writer".to_string())
            .spawn(move || write_loop(&worker_store, &rx))?;
        Ok(Self {
            inner,
            tx: Some(tx),
            worker: Some(worker),
        })
    }
}

fn write_loop<S: ScoreStore>(store: &Mutex<S>, rx: &Receiver<(String, u64)>) {
    while let Ok((key, value)) = rx.recv() {
        // Only the newest queued value per key is worth writing
        let mut batch = BTreeMap::new();
        batch.insert(key, value);
        for (key, value) in rx.try_iter() {
            batch.insert(key, value);
        }

        let Ok(mut store) = store.lock() else {
            log::warn!("Score writer lost its store, dropping {} writes", batch.len());
            return;
        };
        for (key, value) in batch {
            if let Err(e) = store.set(&key, value) {
                log::warn!("Failed to persist {key}={value}: {e}");
            }
        }
    }
}

impl<S: ScoreStore + Send + 'static> ScoreStore for ThreadedStore<S> {
    fn get(&self, key: &str) -> Result<Option<u64>, StoreError> {
        let store = self.inner.lock().map_err(|_| StoreError::Unavailable)?;
        store.get(key)
    }

    fn set(&mut self, key: &str, value: u64) -> Result<(), StoreError> {
        let tx = self.tx.as_ref().ok_or(StoreError::WriterClosed)?;
        tx.send((key.to_string(), value))
            .map_err(|_| StoreError::WriterClosed)
    }
}

impl<S: ScoreStore + Send + 'static> Drop for ThreadedStore<S> {
    /// Closes the queue and waits for pending writes to land
    fn drop(&mut self) {
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("Score writer thread panicked");
            }
        }
    }
}
