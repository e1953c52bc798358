//! Dataset profiling: statistics and quality heuristics in [`logic`], SVG
//! figures in [`plots`].

pub mod logic;
pub mod plots;
