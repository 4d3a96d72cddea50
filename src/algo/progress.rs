//! Progress reporting for long-running conversions.
//!
//! Relief construction itself never prints. Callers that want feedback pass
//! a [`Progress`] whose callback receives stage updates.
//!
//! # Example
//!
//! ```
//! use relief::algo::Progress;
//! use relief::algo::relief::{build_relief_with_progress, ReliefOptions};
//! use relief::mesh::Heightmap;
//!
//! let progress = Progress::new(|current, total, message| {
//!     println!("[{}/{}] {}", current, total, message);
//! });
//!
//! let map = Heightmap::flat(8, 8, 0.25).unwrap();
//! build_relief_with_progress(&map, &ReliefOptions::default(), &progress).unwrap();
//! ```

/// A progress callback that receives updates during long-running operations.
///
/// The callback receives:
/// - `current`: Completed steps
/// - `total`: Total number of steps
/// - `message`: Description of the current stage
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// Create a no-op progress reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording() -> (Progress, Arc<Mutex<Vec<(usize, usize)>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let progress = Progress::new(move |c, t, _| sink.lock().unwrap().push((c, t)));
        (progress, log)
    }

    #[test]
    fn test_report_forwards() {
        let (progress, log) = recording();
        progress.report(2, 5, "stage");
        assert_eq!(*log.lock().unwrap(), vec![(2, 5)]);
    }
}
