use serde::Serialize;
use std::fmt;

/// Number of worker threads a parallel run may use. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkerCount(usize);

impl WorkerCount {
    /// Exactly `workers` threads, floored at 1
    pub fn fixed(workers: usize) -> Self {
        Self(workers.max(1))
    }

    /// Workers derived from the cores on this machine
    ///
    /// # Algorithm
    /// ```text
    /// 1. Detect available CPU cores: num_cpus::get()
    /// 2. Leave `reserved` cores to the operating system
    /// 3. Apply config limit: min(max_workers, result) if max_workers > 0
    /// 4. Ensure minimum: max(1, final_result)
    /// ```
    pub fn available(reserved: usize, max_workers: usize) -> Self {
        Self::from_cores(num_cpus::get(), reserved, max_workers)
    }

    /// Same calculation as [`WorkerCount::available`] for a given core count
    pub fn from_cores(cores: usize, reserved: usize, max_workers: usize) -> Self {
        let workers = cores.saturating_sub(reserved);
        let workers = if max_workers > 0 {
            workers.min(max_workers)
        } else {
            workers
        };
        Self::fixed(workers)
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for WorkerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
