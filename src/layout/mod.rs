//! Canvas-unit to screen mapping.

pub mod mapper;
