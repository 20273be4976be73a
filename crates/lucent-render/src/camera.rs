//! Pinhole camera and push constant layout for the trace shader.

use glam::Vec3;

/// Pinhole camera in world space.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    /// Eye position.
    pub position: Vec3,
    /// Point the camera looks at.
    pub look_at: Vec3,
    /// Up direction.
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub vfov_degrees: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.4, 1.2),
            look_at: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::Y,
            vfov_degrees: 55.0,
        }
    }
}

impl Camera {
    /// Build the push constants for a render of the given extent.
    pub fn push_constants(
        &self,
        width: u32,
        height: u32,
        sample_count: u32,
        max_bounces: u32,
    ) -> TracePushConstants {
        let aspect = width as f32 / height as f32;

        let theta = self.vfov_degrees.to_radians();
        let viewport_height = 2.0 * (theta / 2.0).tan();
        let viewport_width = aspect * viewport_height;

        // Right-handed camera basis
        let w = (self.position - self.look_at).normalize();
        let u = self.up.cross(w).normalize();
        let v = w.cross(u);

        let horizontal = viewport_width * u;
        let vertical = viewport_height * v;
        let lower_left = self.position - horizontal / 2.0 - vertical / 2.0 - w;

        TracePushConstants {
            render_extent: [width, height],
            sample_count,
            max_bounces,
            cam_origin: self.position.extend(0.0).to_array(),
            cam_lower_left: lower_left.extend(0.0).to_array(),
            cam_horizontal: horizontal.extend(0.0).to_array(),
            cam_vertical: vertical.extend(0.0).to_array(),
        }
    }
}

/// Push constants for the trace compute shader.
///
/// This structure must match the layout in `trace.comp`:
/// ```glsl
/// layout(push_constant) uniform PushConstants {
///     uvec2 render_extent;    // 8 bytes
///     uint sample_count;      // 4 bytes
///     uint max_bounces;       // 4 bytes
///     vec4 cam_origin;        // 16 bytes
///     vec4 cam_lower_left;    // 16 bytes
///     vec4 cam_horizontal;    // 16 bytes
///     vec4 cam_vertical;      // 16 bytes
/// } pc;
/// ```
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TracePushConstants {
    /// Render target dimensions (width, height).
    pub render_extent: [u32; 2],
    /// Jittered samples accumulated per pixel.
    pub sample_count: u32,
    /// Maximum path length before a ray is dropped.
    pub max_bounces: u32,
    /// Eye position (w unused).
    pub cam_origin: [f32; 4],
    /// Viewport lower-left corner (w unused).
    pub cam_lower_left: [f32; 4],
    /// Viewport horizontal span (w unused).
    pub cam_horizontal: [f32; 4],
    /// Viewport vertical span (w unused).
    pub cam_vertical: [f32; 4],
}

impl TracePushConstants {
    /// Size in bytes (must stay within the 128 byte push constant minimum).
    pub const SIZE: u32 = std::mem::size_of::<Self>() as u32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_constants_size() {
        assert_eq!(TracePushConstants::SIZE, 80);
    }

    #[test]
    fn push_constants_layout() {
        // Verify offsets match shader expectations
        assert_eq!(std::mem::offset_of!(TracePushConstants, render_extent), 0);
        assert_eq!(std::mem::offset_of!(TracePushConstants, sample_count), 8);
        assert_eq!(std::mem::offset_of!(TracePushConstants, max_bounces), 12);
        assert_eq!(std::mem::offset_of!(TracePushConstants, cam_origin), 16);
        assert_eq!(std::mem::offset_of!(TracePushConstants, cam_lower_left), 32);
        assert_eq!(
            std::mem::offset_of!(TracePushConstants, cam_horizontal),
            48
        );
        assert_eq!(std::mem::offset_of!(TracePushConstants, cam_vertical), 64);
    }

    #[test]
    fn camera_basis_is_orthogonal() {
        let pc = Camera::default().push_constants(800, 600, 16, 8);

        let h = Vec3::from_slice(&pc.cam_horizontal[..3]);
        let v = Vec3::from_slice(&pc.cam_vertical[..3]);
        assert!(h.dot(v).abs() < 1e-4);
    }

    #[test]
    fn camera_spans_scale_with_aspect() {
        let camera = Camera::default();
        let wide = camera.push_constants(1600, 400, 1, 1);
        let square = camera.push_constants(400, 400, 1, 1);

        let len = |c: [f32; 4]| Vec3::from_slice(&c[..3]).length();
        assert!(len(wide.cam_horizontal) > len(square.cam_horizontal));
        assert!((len(wide.cam_vertical) - len(square.cam_vertical)).abs() < 1e-4);
    }
}
