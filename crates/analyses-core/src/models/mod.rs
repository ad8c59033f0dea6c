//! Data models for the analyses service

mod analysis;

pub use analysis::*;
