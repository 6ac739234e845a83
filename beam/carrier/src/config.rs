/*!
    Runtime configuration for the bridge.
*/

use std::io;

use tokio::runtime::{Builder, Runtime};

/**
    Configuration for the runtime that carries bridge operations.

    Codec lookups and opens run on the runtime's blocking pool while
    completions run on its worker threads.
*/
#[derive(Clone, Debug)]
pub struct BridgeConfig {
    /// Number of worker threads (None = one per core).
    pub worker_threads: Option<usize>,
    /// Upper bound on concurrently executing native calls.
    pub max_blocking_threads: usize,
    /// Name given to runtime threads.
    pub thread_name: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            max_blocking_threads: 64,
            thread_name: String::from("beam-worker"),
        }
    }
}

impl BridgeConfig {
    /**
        Create a new config with default settings.
    */
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads.max(1));
        self
    }

    pub fn with_max_blocking_threads(mut self, threads: usize) -> Self {
        self.max_blocking_threads = threads.max(1);
        self
    }

    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /**
        Build a multi-threaded runtime with this configuration.
    */
    pub fn build_runtime(&self) -> io::Result<Runtime> {
        let mut builder = Builder::new_multi_thread();
        builder
            .enable_all()
            .max_blocking_threads(self.max_blocking_threads)
            .thread_name(self.thread_name.clone());
        if let Some(threads) = self.worker_threads {
            builder.worker_threads(threads);
        }
        builder.build()
    }
}
