//! Path tracing compute pipeline.
//!
//! Renders into a host-visible storage buffer so the result can be mapped and
//! consumed directly after the blocking wait, without a staging copy.

use ash::vk;
use gpu_allocator::MemoryLocation;
use lucent_gpu::command::barrier_to_host_read;
use lucent_gpu::descriptors::{write_storage_buffer, DescriptorPool, DescriptorSetLayoutBuilder};
use lucent_gpu::error::{GpuError, Result};
use lucent_gpu::memory::{GpuAllocator, GpuBuffer};
use lucent_gpu::pipeline::{dispatch_group_count, ComputePipeline};

use crate::camera::Camera;

/// Bytes per pixel in the render target (tightly packed float RGB).
const PIXEL_STRIDE: u64 = 12;

/// Path tracing compute pipeline.
///
/// Owns the pipeline state and the render target buffer for a fixed-size
/// floating-point image.
pub struct TracePipeline {
    /// The compute pipeline.
    pipeline: ComputePipeline,
    /// Descriptor set layout.
    descriptor_set_layout: vk::DescriptorSetLayout,
    /// Descriptor pool.
    descriptor_pool: DescriptorPool,
    /// The single descriptor set.
    descriptor_set: vk::DescriptorSet,

    /// Host-visible render target buffer.
    render_buffer: GpuBuffer,

    /// Output width in pixels.
    width: u32,
    /// Output height in pixels.
    height: u32,
}

impl TracePipeline {
    /// Create a new path tracing pipeline.
    ///
    /// # Safety
    /// The device must be valid and support compute shaders.
    pub unsafe fn new(
        device: &ash::Device,
        allocator: &mut GpuAllocator,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        // 1. Create descriptor set layout
        // Binding 0: render target storage buffer
        let descriptor_set_layout = DescriptorSetLayoutBuilder::new()
            .storage_buffer(0, vk::ShaderStageFlags::COMPUTE)
            .build(device)?;

        // 2. Create push constant range
        let push_constant_range = vk::PushConstantRange::default()
            .stage_flags(vk::ShaderStageFlags::COMPUTE)
            .offset(0)
            .size(crate::camera::TracePushConstants::SIZE);

        // 3. Load the shader and create the compute pipeline
        let shader_code = lucent_shaders::load(lucent_shaders::TRACE)
            .map_err(|e| GpuError::ShaderCompilation(e.to_string()))?;
        let pipeline = ComputePipeline::new(
            device,
            &shader_code,
            &[descriptor_set_layout],
            &[push_constant_range],
        )?;

        // 4. Create the host-visible render target buffer
        let buffer_size = u64::from(width) * u64::from(height) * PIXEL_STRIDE;
        let render_buffer = allocator.create_buffer(
            buffer_size,
            vk::BufferUsageFlags::STORAGE_BUFFER,
            MemoryLocation::GpuToCpu,
            "trace_render_target",
        )?;

        // 5. Create descriptor pool and allocate the single set
        let pool_sizes = [vk::DescriptorPoolSize::default()
            .ty(vk::DescriptorType::STORAGE_BUFFER)
            .descriptor_count(1)];

        let descriptor_pool = DescriptorPool::new(device, 1, &pool_sizes)?;
        let descriptor_set = descriptor_pool.allocate(device, &[descriptor_set_layout])?[0];

        // 6. Point the set at the render target
        write_storage_buffer(
            device,
            descriptor_set,
            0,
            render_buffer.buffer,
            0,
            buffer_size,
        );

        Ok(Self {
            pipeline,
            descriptor_set_layout,
            descriptor_pool,
            descriptor_set,
            render_buffer,
            width,
            height,
        })
    }

    /// Record the trace dispatch into a command buffer.
    ///
    /// Ends with a compute-to-host barrier so the render target is readable
    /// once the submission's fence signals.
    ///
    /// # Safety
    /// The command buffer must be in recording state.
    pub unsafe fn record(
        &self,
        device: &ash::Device,
        cmd: vk::CommandBuffer,
        camera: &Camera,
        sample_count: u32,
        max_bounces: u32,
    ) {
        device.cmd_bind_pipeline(cmd, vk::PipelineBindPoint::COMPUTE, self.pipeline.pipeline);
        device.cmd_bind_descriptor_sets(
            cmd,
            vk::PipelineBindPoint::COMPUTE,
            self.pipeline.layout,
            0,
            &[self.descriptor_set],
            &[],
        );

        let push_constants =
            camera.push_constants(self.width, self.height, sample_count, max_bounces);
        device.cmd_push_constants(
            cmd,
            self.pipeline.layout,
            vk::ShaderStageFlags::COMPUTE,
            0,
            bytemuck::bytes_of(&push_constants),
        );

        let group_size = lucent_shaders::TRACE_WORKGROUP_SIZE;
        device.cmd_dispatch(
            cmd,
            dispatch_group_count(self.width, group_size),
            dispatch_group_count(self.height, group_size),
            1,
        );

        barrier_to_host_read(
            device,
            cmd,
            self.render_buffer.buffer,
            vk::PipelineStageFlags2::COMPUTE_SHADER,
            vk::AccessFlags2::SHADER_STORAGE_WRITE,
        );
    }

    /// Read the rendered image as tightly packed float RGB.
    ///
    /// Call this after submitting the recorded commands and waiting for
    /// completion.
    pub fn read_output(&self) -> Result<Vec<f32>> {
        let count = self.width as usize * self.height as usize * 3;
        self.render_buffer.read::<f32>(count)
    }

    /// Get the output image dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Destroy all GPU resources.
    ///
    /// # Safety
    /// The device must be valid and the pipeline must not be in use.
    pub unsafe fn destroy(
        mut self,
        device: &ash::Device,
        allocator: &mut GpuAllocator,
    ) -> Result<()> {
        allocator.free_buffer(&mut self.render_buffer)?;
        self.descriptor_pool.destroy(device);
        device.destroy_descriptor_set_layout(self.descriptor_set_layout, None);
        self.pipeline.destroy(device);
        Ok(())
    }
}
