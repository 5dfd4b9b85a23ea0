//! Output side of the S2K → Nastran converter.
//!
//! This crate provides:
//! - **Bulk data writer** producing GRID, CBAR, CTRIA3, CQUAD4 and SET records
//! - **Conversion pipeline** with atomic replacement of the output file
//! - **JSON conversion reports** for batch tooling
//! - **Id list expansion** from range notation to one id per line

pub mod converters;
pub mod error;
pub mod id_list;
pub mod nastran;
mod report;

pub use converters::{ConversionStats, S2kToBdfConverter};
pub use error::{ElementKind, IoError, Result};
pub use id_list::{expand_id_ranges, format_id_list};
pub use nastran::{BdfOptions, BdfWriter, render};
pub use report::{ConversionReport, JobStatus, load_report, write_report};
pub use s2k_deck::{Model, ParseError, parse};
