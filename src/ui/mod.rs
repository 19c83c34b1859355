//! Terminal and CI output

pub mod json;
