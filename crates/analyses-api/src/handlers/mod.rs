//! HTTP request handlers for the analyses API

pub mod analyses;
