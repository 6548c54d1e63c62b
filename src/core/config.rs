/// Configuration for memory access counting
///
/// This module provides configuration types for the uninitialized-read
/// detector and for how bulk operations (reset, region summaries) are run.

/// Enumeration of supported concurrency modes for bulk operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcurrencyMode {
    /// Regions are walked in order on the calling thread
    Sequential,
    /// Regions are walked in parallel using Rayon
    Rayon,
}

impl Default for ConcurrencyMode {
    fn default() -> Self {
        ConcurrencyMode::Sequential
    }
}

/// Which accesses count as initializing an address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UninitPolicy {
    /// A write or an instruction fetch initializes the address
    WriteOrExec,
    /// Only a write initializes the address
    WriteOnly,
}

impl Default for UninitPolicy {
    fn default() -> Self {
        UninitPolicy::WriteOrExec
    }
}

/// Configuration for a memory access counter
#[derive(Debug, Clone, Default)]
pub struct CounterConfig {
    /// The uninitialized-read policy
    pub uninit_policy: UninitPolicy,
    /// Never flag reads of ROM categories as uninitialized
    pub ignore_read_only: bool,
    /// The concurrency mode for reset and region summaries
    pub concurrency_mode: ConcurrencyMode,
    /// The size of a dedicated thread pool for bulk operations
    /// Only relevant when concurrency_mode is Rayon; None uses the global pool
    pub thread_pool_size: Option<usize>,
}

impl CounterConfig {
    /// Create a new configuration with default values
    ///
    /// Default configuration flags reads before any write or exec, covers ROM
    /// categories, and runs bulk operations sequentially
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the uninitialized-read policy
    ///
    /// # Arguments
    /// * `policy` - Which accesses count as initializing an address
    ///
    /// # Returns
    /// A new configuration with the specified policy
    pub fn with_uninit_policy(mut self, policy: UninitPolicy) -> Self {
        self.uninit_policy = policy;
        self
    }

    /// Skip uninitialized-read detection on ROM categories
    ///
    /// # Arguments
    /// * `ignore` - Whether reads of ROM categories are never flagged
    ///
    /// # Returns
    /// A new configuration with the specified ROM handling
    pub fn with_ignore_read_only(mut self, ignore: bool) -> Self {
        self.ignore_read_only = ignore;
        self
    }

    /// Set the concurrency mode for bulk operations
    ///
    /// # Arguments
    /// * `mode` - The concurrency mode to use for reset and region summaries
    ///
    /// # Returns
    /// A new configuration with the specified concurrency mode
    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = mode;
        self
    }

    /// Set the thread pool size for parallel bulk operations
    ///
    /// # Arguments
    /// * `size` - The number of threads in the dedicated pool
    ///
    /// # Returns
    /// A new configuration with the specified thread pool size
    ///
    /// # Note
    /// This setting only affects execution when concurrency_mode is Rayon
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }
}
