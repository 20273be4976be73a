//! Compute dispatch with debug-printf output from the shader.
//!
//! Fourth program of the sequence: the same dispatch as `lucent-dispatch`,
//! but the instance is created with the validation layer's debug-printf
//! feature enabled and the shader calls `debugPrintfEXT`. The printed line
//! arrives through the debug utils messenger and lands in the log alongside
//! the host-side readback.
//!
//! Requires the `VK_LAYER_KHRONOS_validation` layer (part of the Vulkan SDK)
//! to be installed.
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level (e.g., info, debug, trace)

use anyhow::Context;
use ash::vk;
use gpu_allocator::MemoryLocation;
use lucent_gpu::command::{barrier_to_host_read, execute_single_time_commands, CommandPool};
use lucent_gpu::descriptors::{write_storage_buffer, DescriptorPool, DescriptorSetLayoutBuilder};
use lucent_gpu::pipeline::{dispatch_group_count, ComputePipeline};
use lucent_gpu::GpuContextBuilder;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Number of floats the shader writes.
const ELEMENT_COUNT: u32 = 64;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // debug_printf implies validation and installs the messenger
    let context = GpuContextBuilder::new()
        .app_name("lucent-printf")
        .debug_printf(true)
        .build()
        .context("creating GPU context with debug-printf enabled")?;
    let device = context.device();

    let buffer_size = u64::from(ELEMENT_COUNT) * std::mem::size_of::<f32>() as u64;
    let mut buffer = context.allocator().lock().create_buffer(
        buffer_size,
        vk::BufferUsageFlags::STORAGE_BUFFER,
        MemoryLocation::GpuToCpu,
        "printf_output",
    )?;

    let descriptor_set_layout = unsafe {
        DescriptorSetLayoutBuilder::new()
            .storage_buffer(0, vk::ShaderStageFlags::COMPUTE)
            .build(device)
    }?;

    let pool_sizes = [vk::DescriptorPoolSize::default()
        .ty(vk::DescriptorType::STORAGE_BUFFER)
        .descriptor_count(1)];
    let descriptor_pool = unsafe { DescriptorPool::new(device, 1, &pool_sizes) }?;
    let descriptor_set = unsafe { descriptor_pool.allocate(device, &[descriptor_set_layout]) }?[0];
    unsafe {
        write_storage_buffer(device, descriptor_set, 0, buffer.buffer, 0, buffer_size);
    }

    let shader_code = lucent_shaders::load(lucent_shaders::SQUARES_PRINTF)
        .context("loading debug-printf compute shader")?;
    let pipeline =
        unsafe { ComputePipeline::new(device, &shader_code, &[descriptor_set_layout], &[]) }?;

    let command_pool = unsafe {
        CommandPool::new(
            device,
            context.compute_queue_family(),
            vk::CommandPoolCreateFlags::empty(),
        )
    }?;

    info!("Dispatching; shader output should appear below via the messenger");
    unsafe {
        execute_single_time_commands(device, &command_pool, context.compute_queue(), |cmd| {
            device.cmd_bind_pipeline(cmd, vk::PipelineBindPoint::COMPUTE, pipeline.pipeline);
            device.cmd_bind_descriptor_sets(
                cmd,
                vk::PipelineBindPoint::COMPUTE,
                pipeline.layout,
                0,
                &[descriptor_set],
                &[],
            );
            device.cmd_dispatch(
                cmd,
                dispatch_group_count(ELEMENT_COUNT, lucent_shaders::SQUARES_WORKGROUP_SIZE),
                1,
                1,
            );
            barrier_to_host_read(
                device,
                cmd,
                buffer.buffer,
                vk::PipelineStageFlags2::COMPUTE_SHADER,
                vk::AccessFlags2::SHADER_STORAGE_WRITE,
            );
        })
    }?;

    let values: Vec<f32> = buffer.read(ELEMENT_COUNT as usize)?;
    info!("Host-side readback of the same buffer: {:?}", &values[..8]);

    // Teardown in reverse creation order; the context handles the rest on drop
    unsafe {
        command_pool.destroy(device);
        pipeline.destroy(device);
        descriptor_pool.destroy(device);
        device.destroy_descriptor_set_layout(descriptor_set_layout, None);
    }
    context.allocator().lock().free_buffer(&mut buffer)?;

    Ok(())
}
