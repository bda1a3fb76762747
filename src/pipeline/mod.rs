pub mod aggregator;
pub mod cleaner;
pub mod progress;

pub use aggregator::{RecordAggregator, SkipTally};
pub use cleaner::clean;
pub use progress::{ProgressEvent, ProgressReporter};
