//! Device bootstrap and ray tracing feature probe.
//!
//! First program of the sequence: create a headless GPU context with the ray
//! query feature chain requested (`VK_KHR_acceleration_structure`,
//! `VK_KHR_ray_query`, `VK_KHR_deferred_host_operations`), then report what
//! the selected device supports. The build fails up front when the features
//! are missing, so reaching the summary means the device is ready for the
//! ray tracing work the later programs build toward.
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level (e.g., info, debug, trace)

use anyhow::Context;
use lucent_gpu::GpuContextBuilder;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let context = GpuContextBuilder::new()
        .app_name("lucent-probe")
        .ray_query(true)
        .build()
        .context("creating GPU context with the ray query feature chain")?;

    let capabilities = context.capabilities();
    let ray_tracing = context.ray_tracing();

    info!("Device: {}", capabilities.summary());
    info!("Ray tracing: {}", ray_tracing.summary());
    info!(
        "Compute limits: workgroup size {:?}, {} invocations, {} bytes shared memory",
        capabilities.max_compute_workgroup_size,
        capabilities.max_compute_workgroup_invocations,
        capabilities.max_compute_shared_memory_size,
    );

    // The builder already refused a device without these; restate the
    // guarantee the rest of the sequence depends on
    anyhow::ensure!(
        ray_tracing.acceleration_structure && ray_tracing.ray_query,
        "device created without acceleration structure / ray query support"
    );

    info!("Ray query feature chain enabled; probe complete");

    // Context teardown (allocator, device, messenger, instance) happens in
    // reverse creation order on drop
    Ok(())
}
