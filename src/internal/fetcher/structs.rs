pub mod segment_outcome;

pub use segment_outcome::SegmentOutcome;
