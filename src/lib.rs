pub mod analyzers;
pub mod config;
pub mod error;
pub mod output;
pub mod parser;
pub mod records;
pub mod sources;
pub mod stats;

pub use analyzers::aggregate::{
    GradePolicy, compute_cgpa, compute_cgpa_with, compute_overall_attendance,
    compute_subject_percentage,
};
pub use error::AggregateError;
