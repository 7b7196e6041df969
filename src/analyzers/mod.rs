//! Academic performance aggregation.
//!
//! Maps letter grades to grade points, averages them into a CGPA and
//! per-semester GPAs, weighs attendance into an overall percentage, and
//! assembles the per-student progress report.

pub mod aggregate;
pub mod analyzer;
pub mod grade;
pub mod types;
pub mod utility;
