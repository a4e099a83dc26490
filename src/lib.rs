//! Building massing and panorama rendering.
//!
//! Footprint outlines are read from CSV, extruded into closed prisms on a
//! small B-rep kernel ([`topology`], [`operations`], [`tessellation`]), placed
//! in a daylight scene, and rendered as 360° equirectangular panoramas from a
//! list of camera positions.

pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod massing;
pub mod math;
pub mod operations;
pub mod pipeline;
pub mod render;
pub mod scene;
pub mod tessellation;
pub mod topology;

pub use error::{MassingError, Result};
