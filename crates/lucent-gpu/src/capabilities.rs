//! GPU capability detection.

use ash::vk;
use std::collections::HashSet;
use std::ffi::CStr;

/// GPU vendor identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpuVendor {
    Nvidia,
    Amd,
    Intel,
    Apple,
    Other(u32),
}

impl GpuVendor {
    /// Identify vendor from PCI vendor ID.
    pub fn from_vendor_id(id: u32) -> Self {
        match id {
            0x10DE => Self::Nvidia,
            0x1002 => Self::Amd,
            0x8086 => Self::Intel,
            0x106B => Self::Apple,
            other => Self::Other(other),
        }
    }
}

/// Detected GPU capabilities.
#[derive(Debug, Clone)]
pub struct GpuCapabilities {
    /// GPU vendor
    pub vendor: GpuVendor,
    /// Device name
    pub device_name: String,
    /// Vulkan API version
    pub api_version: u32,
    /// Driver version
    pub driver_version: u32,

    /// Buffer device address support
    pub supports_buffer_device_address: bool,
    /// Scalar block layout support
    pub supports_scalar_block_layout: bool,

    // Memory info
    /// Device-local memory in MB
    pub device_local_memory_mb: u64,
    /// Maximum memory allocation count
    pub max_memory_allocation_count: u32,

    // Compute limits
    /// Maximum compute workgroup size
    pub max_compute_workgroup_size: [u32; 3],
    /// Maximum compute workgroup invocations
    pub max_compute_workgroup_invocations: u32,
    /// Maximum compute shared memory size
    pub max_compute_shared_memory_size: u32,

    // Available extensions
    pub available_extensions: HashSet<String>,
}

impl GpuCapabilities {
    /// Query capabilities from a physical device.
    ///
    /// # Safety
    /// The instance and physical device must be valid.
    pub unsafe fn query(instance: &ash::Instance, physical_device: vk::PhysicalDevice) -> Self {
        // Get basic properties
        let properties = instance.get_physical_device_properties(physical_device);
        let memory_properties = instance.get_physical_device_memory_properties(physical_device);

        // Get available extensions
        let extensions = instance
            .enumerate_device_extension_properties(physical_device)
            .unwrap_or_default();

        let available_extensions: HashSet<String> = extensions
            .iter()
            .filter_map(|ext| {
                CStr::from_ptr(ext.extension_name.as_ptr())
                    .to_str()
                    .ok()
                    .map(String::from)
            })
            .collect();

        // Parse device info
        let vendor = GpuVendor::from_vendor_id(properties.vendor_id);
        let device_name = CStr::from_ptr(properties.device_name.as_ptr())
            .to_string_lossy()
            .into_owned();

        // Calculate device-local memory
        let device_local_memory_mb: u64 = memory_properties
            .memory_heaps
            .iter()
            .take(memory_properties.memory_heap_count as usize)
            .filter(|heap| heap.flags.contains(vk::MemoryHeapFlags::DEVICE_LOCAL))
            .map(|heap| heap.size / (1024 * 1024))
            .sum();

        // These are core in Vulkan 1.2/1.3; check the API version
        let api_version = properties.api_version;
        let has_vulkan_1_3 =
            vk::api_version_major(api_version) >= 1 && vk::api_version_minor(api_version) >= 3;

        Self {
            vendor,
            device_name,
            api_version,
            driver_version: properties.driver_version,

            supports_buffer_device_address: has_vulkan_1_3
                || available_extensions.contains("VK_KHR_buffer_device_address"),
            supports_scalar_block_layout: has_vulkan_1_3
                || available_extensions.contains("VK_EXT_scalar_block_layout"),

            device_local_memory_mb,
            max_memory_allocation_count: properties.limits.max_memory_allocation_count,

            max_compute_workgroup_size: properties.limits.max_compute_work_group_size,
            max_compute_workgroup_invocations: properties.limits.max_compute_work_group_invocations,
            max_compute_shared_memory_size: properties.limits.max_compute_shared_memory_size,

            available_extensions,
        }
    }

    /// Check if the GPU meets the minimum requirements for these programs.
    pub fn meets_requirements(&self) -> bool {
        // Require Vulkan 1.3 for core features
        let api_major = vk::api_version_major(self.api_version);
        let api_minor = vk::api_version_minor(self.api_version);

        if api_major < 1 || (api_major == 1 && api_minor < 3) {
            return false;
        }

        // The trace pipeline relies on tightly packed storage buffers
        if !self.supports_scalar_block_layout {
            return false;
        }

        true
    }

    /// Get a human-readable summary of capabilities.
    pub fn summary(&self) -> String {
        format!(
            "{} ({:?}) - Vulkan {}.{}.{} - {} MB VRAM",
            self.device_name,
            self.vendor,
            vk::api_version_major(self.api_version),
            vk::api_version_minor(self.api_version),
            vk::api_version_patch(self.api_version),
            self.device_local_memory_mb,
        )
    }
}

/// Ray tracing feature support, probed through the `PhysicalDeviceFeatures2` chain.
///
/// The probe program requires `acceleration_structure` and `ray_query`; the
/// ray tracing pipeline feature is reported for completeness but nothing in
/// this workspace needs it yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct RayTracingCapabilities {
    /// `VK_KHR_acceleration_structure` feature is available.
    pub acceleration_structure: bool,
    /// `VK_KHR_ray_query` feature is available.
    pub ray_query: bool,
    /// `VK_KHR_ray_tracing_pipeline` feature is available.
    pub ray_tracing_pipeline: bool,
    /// `VK_KHR_deferred_host_operations` extension is present (required by
    /// the acceleration structure extension).
    pub deferred_host_operations: bool,
}

impl RayTracingCapabilities {
    /// Query ray tracing features from a physical device.
    ///
    /// # Safety
    /// The instance and physical device must be valid.
    pub unsafe fn query(instance: &ash::Instance, physical_device: vk::PhysicalDevice) -> Self {
        let extensions = instance
            .enumerate_device_extension_properties(physical_device)
            .unwrap_or_default();

        let has_extension = |name: &CStr| {
            extensions
                .iter()
                .any(|ext| CStr::from_ptr(ext.extension_name.as_ptr()) == name)
        };

        let deferred_host_operations = has_extension(ash::khr::deferred_host_operations::NAME);

        // Feature structs are only filled in when the matching extension exists
        if !has_extension(ash::khr::acceleration_structure::NAME)
            && !has_extension(ash::khr::ray_query::NAME)
        {
            return Self {
                deferred_host_operations,
                ..Self::default()
            };
        }

        let mut acceleration_structure_features =
            vk::PhysicalDeviceAccelerationStructureFeaturesKHR::default();
        let mut ray_query_features = vk::PhysicalDeviceRayQueryFeaturesKHR::default();
        let mut ray_tracing_pipeline_features =
            vk::PhysicalDeviceRayTracingPipelineFeaturesKHR::default();

        let mut features2 = vk::PhysicalDeviceFeatures2::default()
            .push_next(&mut acceleration_structure_features)
            .push_next(&mut ray_query_features)
            .push_next(&mut ray_tracing_pipeline_features);

        instance.get_physical_device_features2(physical_device, &mut features2);

        Self {
            acceleration_structure: acceleration_structure_features.acceleration_structure
                == vk::TRUE,
            ray_query: ray_query_features.ray_query == vk::TRUE,
            ray_tracing_pipeline: ray_tracing_pipeline_features.ray_tracing_pipeline == vk::TRUE,
            deferred_host_operations,
        }
    }

    /// Whether the device can run ray queries from compute shaders.
    pub fn ray_query_ready(&self) -> bool {
        self.acceleration_structure && self.ray_query && self.deferred_host_operations
    }

    /// Get a human-readable summary of ray tracing support.
    pub fn summary(&self) -> String {
        format!(
            "acceleration_structure: {}, ray_query: {}, ray_tracing_pipeline: {}, deferred_host_operations: {}",
            self.acceleration_structure,
            self.ray_query,
            self.ray_tracing_pipeline,
            self.deferred_host_operations,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_identification() {
        assert_eq!(GpuVendor::from_vendor_id(0x10DE), GpuVendor::Nvidia);
        assert_eq!(GpuVendor::from_vendor_id(0x1002), GpuVendor::Amd);
        assert_eq!(GpuVendor::from_vendor_id(0x8086), GpuVendor::Intel);
        assert_eq!(GpuVendor::from_vendor_id(0x1234), GpuVendor::Other(0x1234));
    }

    #[test]
    fn ray_query_ready_needs_all_three() {
        let mut caps = RayTracingCapabilities {
            acceleration_structure: true,
            ray_query: true,
            ray_tracing_pipeline: false,
            deferred_host_operations: true,
        };
        assert!(caps.ray_query_ready());

        caps.deferred_host_operations = false;
        assert!(!caps.ray_query_ready());
    }
}
