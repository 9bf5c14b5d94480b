//! Input/output helpers.
//!
//! - model input JSON (`model`)
//! - observation CSV ingest + validation (`ingest`)
//! - scorecard/score exports to CSV (`export`)
//! - scorecard JSON read/write (`scorecard_file`)

pub mod export;
pub mod ingest;
pub mod model;
pub mod scorecard_file;

pub use export::*;
pub use ingest::*;
pub use model::*;
pub use scorecard_file::*;
