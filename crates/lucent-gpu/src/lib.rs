//! Headless Vulkan abstraction layer for the Lucent compute programs.
//!
//! This crate provides:
//! - Vulkan instance and device management (no surface, no swapchain)
//! - GPU capability and ray tracing feature detection
//! - Memory allocation via gpu-allocator
//! - Compute pipeline and descriptor management
//! - Single-shot command submission with blocking waits

pub mod capabilities;
pub mod command;
pub mod context;
pub mod debug;
pub mod descriptors;
pub mod error;
pub mod instance;
pub mod memory;
pub mod pipeline;
pub mod sync;

pub use capabilities::{GpuCapabilities, GpuVendor, RayTracingCapabilities};
pub use command::CommandPool;
pub use context::{GpuContext, GpuContextBuilder};
pub use debug::DebugMessenger;
pub use descriptors::{write_storage_buffer, DescriptorPool, DescriptorSetLayoutBuilder};
pub use error::{GpuError, Result};
pub use memory::{GpuAllocator, GpuBuffer};
pub use pipeline::{dispatch_group_count, ComputePipeline};
pub use sync::{create_fence, wait_for_fence};
