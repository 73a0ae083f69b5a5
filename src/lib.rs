//! Select the customers living within a given great-circle distance of a
//! reference point.
//!
//! Input and output are JSON Lines files: one customer object per line with
//! at least `user_id`, `latitude`, `longitude` and `name`. Lines that fail
//! validation are skipped and reported; the survivors within the radius are
//! written back sorted by `user_id`, every original field intact.

pub mod config;
pub mod data;
pub mod geodesy;
pub mod pipeline;

pub use config::{CoordinateBounds, CoordinateRange, PipelineConfig};
pub use data::model::{Coordinates, CustomerRecord, ReferencePoint};
pub use data::validate::{validate_line, Diagnostic, Rejection};
pub use geodesy::{great_circle_distance, radius_at_latitude, EarthModel};
pub use pipeline::{run, run_files, PipelineError, RunReport};
