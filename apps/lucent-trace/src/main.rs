//! Compute path tracer writing a floating-point image to disk.
//!
//! Fifth program of the sequence, and the point the earlier ones build
//! toward: the dispatch now runs a small path tracer over an analytic scene,
//! accumulating jittered samples per pixel into a host-visible storage
//! buffer. After the blocking wait, the buffer is mapped and written to
//! `render.hdr` as a Radiance HDR image.
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level (e.g., info, debug, trace)

use anyhow::Context;
use ash::vk;
use lucent_gpu::command::{execute_single_time_commands, CommandPool};
use lucent_gpu::GpuContextBuilder;
use lucent_render::{save_hdr, Camera, TracePipeline};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Render target width in pixels.
const WIDTH: u32 = 800;
/// Render target height in pixels.
const HEIGHT: u32 = 600;
/// Jittered samples accumulated per pixel.
const SAMPLE_COUNT: u32 = 64;
/// Maximum path length before a ray is dropped.
const MAX_BOUNCES: u32 = 8;
/// Fixed output filename.
const OUTPUT_PATH: &str = "render.hdr";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let context = GpuContextBuilder::new()
        .app_name("lucent-trace")
        .build()
        .context("creating GPU context")?;
    let device = context.device();

    let mut allocator = context.allocator().lock();
    let pipeline = unsafe { TracePipeline::new(device, &mut allocator, WIDTH, HEIGHT) }
        .context("creating trace pipeline")?;
    drop(allocator);

    let command_pool = unsafe {
        CommandPool::new(
            device,
            context.compute_queue_family(),
            vk::CommandPoolCreateFlags::empty(),
        )
    }?;

    let camera = Camera::default();
    info!(
        "Tracing {WIDTH}x{HEIGHT} at {SAMPLE_COUNT} samples per pixel, {MAX_BOUNCES} bounces"
    );

    unsafe {
        execute_single_time_commands(device, &command_pool, context.compute_queue(), |cmd| {
            pipeline.record(device, cmd, &camera, SAMPLE_COUNT, MAX_BOUNCES);
        })
    }?;

    // Map the render target and write it out
    let pixels = pipeline.read_output()?;
    save_hdr(&pixels, WIDTH, HEIGHT, OUTPUT_PATH).context("writing output image")?;
    info!("Wrote {OUTPUT_PATH}");

    // Teardown in reverse creation order; the context handles the rest on drop
    unsafe {
        command_pool.destroy(device);
    }
    let mut allocator = context.allocator().lock();
    unsafe { pipeline.destroy(device, &mut allocator) }?;
    drop(allocator);

    Ok(())
}
