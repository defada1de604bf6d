//! IO module for reading planning inputs and writing results.
//!
//! # Format Modules
//!
//! - `csv` - CSV tables of population points, facilities, sub-areas and regencies, and CSV result tables
//! - `json` - JSON serialization of results

pub(crate) mod csv;
pub(crate) mod json;
