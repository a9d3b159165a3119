//! Per-model signal hooks.
//!
//! Every concrete model carries a `SignalEmitter` with six predefined
//! signals: (pre/post) x (save/update/delete). Receivers are connected by
//! application code and emitted by the persistence layer around the
//! corresponding operations.

use std::fmt;
use std::sync::Arc;

/// A validated record instance, as produced by the record layer.
pub type RecordData = serde_json::Map<String, serde_json::Value>;

/// A connected signal receiver.
pub type Receiver = Arc<dyn Fn(&RecordData) + Send + Sync>;

/// A single named signal with a list of connected receivers.
#[derive(Clone, Default)]
pub struct Signal {
    receivers: Vec<Receiver>,
}

impl Signal {
    /// Create an empty signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect a receiver.
    pub fn connect(&mut self, receiver: Receiver) {
        self.receivers.push(receiver);
    }

    /// Number of connected receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.receivers.len()
    }

    /// Invoke every connected receiver with the given record.
    pub fn emit(&self, record: &RecordData) {
        for receiver in &self.receivers {
            receiver(record);
        }
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("receivers", &self.receivers.len())
            .finish()
    }
}

/// The six predefined per-model signals.
#[derive(Debug, Clone, Default)]
pub struct SignalEmitter {
    pub pre_save: Signal,
    pub post_save: Signal,
    pub pre_update: Signal,
    pub post_update: Signal,
    pub pre_delete: Signal,
    pub post_delete: Signal,
}

impl SignalEmitter {
    /// Create an emitter with all six signals empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total receivers across all six signals.
    #[must_use]
    pub fn total_receivers(&self) -> usize {
        self.pre_save.receiver_count()
            + self.post_save.receiver_count()
            + self.pre_update.receiver_count()
            + self.post_update.receiver_count()
            + self.pre_delete.receiver_count()
            + self.post_delete.receiver_count()
    }
}
