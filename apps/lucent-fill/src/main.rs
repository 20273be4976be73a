//! Buffer allocation and fill-buffer test.
//!
//! Second program of the sequence: allocate a host-visible buffer, fill it
//! on the transfer queue with `vkCmdFillBuffer`, wait for the submission to
//! complete, then map the buffer and print its contents. The fill value is
//! the bit pattern of a float so the readback prints something recognizable.
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level (e.g., info, debug, trace)

use anyhow::Context;
use ash::vk;
use gpu_allocator::MemoryLocation;
use lucent_gpu::command::{barrier_to_host_read, execute_single_time_commands, CommandPool};
use lucent_gpu::GpuContextBuilder;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Number of floats in the test buffer.
const ELEMENT_COUNT: usize = 64;
/// Value every element is filled with.
const FILL_VALUE: f32 = 1.0;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let context = GpuContextBuilder::new()
        .app_name("lucent-fill")
        .build()
        .context("creating GPU context")?;
    let device = context.device();

    // Host-visible fill target
    let mut buffer = context.allocator().lock().create_buffer(
        (ELEMENT_COUNT * std::mem::size_of::<f32>()) as u64,
        vk::BufferUsageFlags::TRANSFER_DST,
        MemoryLocation::GpuToCpu,
        "fill_target",
    )?;

    let command_pool = unsafe {
        CommandPool::new(
            device,
            context.transfer_queue_family(),
            vk::CommandPoolCreateFlags::empty(),
        )
    }?;

    // Record fill + host-visibility barrier, submit, block until complete
    unsafe {
        execute_single_time_commands(device, &command_pool, context.transfer_queue(), |cmd| {
            device.cmd_fill_buffer(cmd, buffer.buffer, 0, vk::WHOLE_SIZE, FILL_VALUE.to_bits());
            barrier_to_host_read(
                device,
                cmd,
                buffer.buffer,
                vk::PipelineStageFlags2::TRANSFER,
                vk::AccessFlags2::TRANSFER_WRITE,
            );
        })
    }?;

    // Map and consume
    let values: Vec<f32> = buffer.read(ELEMENT_COUNT)?;
    info!("First 8 elements: {:?}", &values[..8]);

    anyhow::ensure!(
        values.iter().all(|&v| v == FILL_VALUE),
        "fill test failed: expected every element to be {FILL_VALUE}"
    );
    info!("Fill test passed: {ELEMENT_COUNT} elements set to {FILL_VALUE}");

    // Teardown in reverse creation order; the context handles the rest on drop
    unsafe {
        command_pool.destroy(device);
    }
    context.allocator().lock().free_buffer(&mut buffer)?;

    Ok(())
}
