//! Statistical utilities for the qswarm workspace.
//!
//! - [`rolling`]: bounded FIFO of recent samples with a full-window mean, used to
//!   track learning-speed trends between successes
//! - [`descriptive`]: descriptive statistics for summarizing a finished run
//!
//! # Examples
//!
//! ```
//! use qswarm_stats::descriptive::DescriptiveStats;
//!
//! let episodes_per_success = [120.0, 80.0, 100.0];
//! let stats = DescriptiveStats::new(episodes_per_success).unwrap();
//! assert_eq!(stats.mean, 100.0);
//! ```

pub mod descriptive;
pub mod rolling;
