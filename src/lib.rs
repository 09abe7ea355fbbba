//! # aqalign - Air-Quality Sensor Series Alignment
//!
//! `aqalign` batch-processes time-series air-quality measurements (PM2.5,
//! NO2, O3) recorded by co-located sensors of different makes — PurpleAir
//! units, Aeroqual AQY monitors, lab particle counters — during controlled
//! field experiments. Sensors disagree about everything: timestamp layout,
//! reporting zone, clock drift, sample rate, CSV shape. This crate puts
//! their readings onto one comparable footing so they can be differenced,
//! ratioed and averaged pointwise.
//!
//! ## Pipeline
//!
//! ```text
//! sensor CSVs --ingest--> (raw time, value) rows
//!             --normalize--> local-zone timestamps / relative offsets
//!             --bucket--> series per experimental round or calendar day
//!             --align--> series resampled onto a common time grid
//!             --combine--> derived series (difference, ratio, mean, median)
//!             --export--> time,value CSVs for external plotting
//! ```
//!
//! The core stages (normalize, bucket, align, combine) are pure functions
//! over in-memory series: no I/O, no shared state, deterministic outputs.
//! File reading and writing live at the edges in [`ingest`] and [`export`],
//! and experiment policy (reference instant, round boundaries, zone offsets,
//! clock corrections) comes from a TOML file handled by [`experiment`].
//!
//! ## Quick Start
//!
//! ```rust
//! use aqalign::prelude::*;
//!
//! // Two sensors sampling at different rates over the same round.
//! let near = Series::from_pairs([(0.0, 80.0), (1.0, 95.0), (2.0, 60.0)]);
//! let background = Series::from_pairs([(0.0, 12.0), (2.0, 16.0)]);
//!
//! // Resample the background onto the near sensor's time grid, then
//! // compute the background-corrected signal.
//! let background = align(&near, &background)?;
//! let corrected = subtract(&near, &background);
//! let enhancement = divide(&near, &background);
//!
//! assert_eq!(corrected.values(), vec![68.0, 81.0, 44.0]);
//! assert_eq!(enhancement.times(), near.times());
//! # Ok::<(), aqalign::align::AlignError>(())
//! ```
//!
//! ## Scope
//!
//! Offline, single-threaded, in-memory batch processing of at most a few
//! thousand samples per series. Plotting and animation are deliberately out
//! of scope; the CLI exports CSVs that external tools render.

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod align;
pub mod bucket;
pub mod combine;
pub mod experiment;
pub mod export;
pub mod ingest;
pub mod normalize;
pub mod series;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::align::{align, densify, truncate_to_common, AlignError};
    pub use crate::bucket::{bucket, bucket_by_day, Interval};
    pub use crate::combine::{
        add, average, divide, mean_in_window, median, subtract, CombineError,
    };
    pub use crate::experiment::{ConfigError, ExperimentConfig};
    pub use crate::export::{write_buckets, write_series, ExportError};
    pub use crate::ingest::{read_rows, ColumnSpec, IngestError, RawRow, TimeTrim};
    pub use crate::normalize::{
        TimeError, TimeFormat, TimeNormalizer, TimeUnit, TimedSample,
    };
    pub use crate::series::{BucketedSeries, Sample, Series};
}
