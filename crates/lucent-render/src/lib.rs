//! Compute path tracing pipeline for the Lucent programs.
//!
//! This crate owns the final step of the bootstrap sequence: a compute
//! pipeline that renders a floating-point image into a host-visible storage
//! buffer, and the HDR file output for the readback.

pub mod camera;
pub mod hdr;
pub mod trace_pipeline;

pub use camera::{Camera, TracePushConstants};
pub use hdr::save_hdr;
pub use trace_pipeline::TracePipeline;

use thiserror::Error;

/// Rendering and image output errors.
#[derive(Error, Debug)]
pub enum RenderError {
    /// GPU error.
    #[error("GPU error: {0}")]
    Gpu(#[from] lucent_gpu::GpuError),

    /// Pixel data did not match the expected dimensions.
    #[error("invalid image data: expected {expected} floats, got {actual}")]
    InvalidImageData { expected: usize, actual: usize },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, RenderError>;
