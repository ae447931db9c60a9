//! Progress reporting for long analysis runs.
//!
//! An [`Analyzer`](crate::core::processor::Analyzer) can carry a
//! [`ProgressCallback`]; it is invoked every `progress_interval`
//! conversations and once when the walk finishes.
//!
//! # Example
//!
//! ```rust
//! use chatpulse::progress::{Progress, ProgressCallback};
//! use std::sync::Arc;
//!
//! let callback: ProgressCallback = Arc::new(|progress| {
//!     if let Some(pct) = progress.percentage() {
//!         println!("Progress: {:.1}%", pct);
//!     }
//! });
//!
//! callback(Progress::new(500, Some(1000)));
//! ```

use std::sync::Arc;

/// Progress of a walk over the record set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// Conversations processed so far.
    pub items_processed: usize,

    /// Total conversations, if known.
    pub total_items: Option<usize>,
}

impl Progress {
    /// Creates a new progress instance.
    pub fn new(items_processed: usize, total_items: Option<usize>) -> Self {
        Self {
            items_processed,
            total_items,
        }
    }

    /// Returns the progress as a percentage (0.0 - 100.0).
    ///
    /// Returns `None` if the total is not known.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chatpulse::progress::Progress;
    ///
    /// assert_eq!(Progress::new(250, Some(1000)).percentage(), Some(25.0));
    /// assert_eq!(Progress::new(250, None).percentage(), None);
    /// ```
    pub fn percentage(&self) -> Option<f64> {
        self.total_items.map(|total| {
            if total == 0 {
                100.0
            } else {
                (self.items_processed as f64 / total as f64) * 100.0
            }
        })
    }

    /// Returns whether every item has been processed.
    pub fn is_complete(&self) -> bool {
        self.total_items
            .map(|total| self.items_processed >= total)
            .unwrap_or(false)
    }

    /// Returns the number of items left, if the total is known.
    pub fn remaining(&self) -> Option<usize> {
        self.total_items
            .map(|total| total.saturating_sub(self.items_processed))
    }
}

/// Callback type for receiving progress updates.
///
/// This is a thread-safe callback that receives [`Progress`] updates
/// during long-running operations.
pub type ProgressCallback = Arc<dyn Fn(Progress) + Send + Sync>;

/// Creates a no-op progress callback.
pub fn no_progress() -> ProgressCallback {
    Arc::new(|_| {})
}

/// Creates a progress callback that prints to stderr.
///
/// ```rust
/// use chatpulse::progress::{Progress, stderr_progress};
///
/// let callback = stderr_progress();
/// // Prints "   Processed 500/1000 conversations..." to stderr
/// callback(Progress::new(500, Some(1000)));
/// ```
pub fn stderr_progress() -> ProgressCallback {
    Arc::new(|progress| match progress.total_items {
        Some(total) if !progress.is_complete() => {
            eprintln!("   Processed {}/{} conversations...", progress.items_processed, total);
        }
        _ => {}
    })
}
