//! GLSL compute shaders for the Lucent programs.
//!
//! The GLSL sources live under `shaders/` and are compiled to SPIR-V next to
//! them by the build script (when `glslc` is available) or out of band. The
//! programs load the precompiled binaries from that fixed location at
//! runtime.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Compiled name of the dispatch test shader.
pub const SQUARES: &str = "squares.comp.spv";
/// Compiled name of the dispatch test shader with `debugPrintfEXT` output.
pub const SQUARES_PRINTF: &str = "squares_printf.comp.spv";
/// Compiled name of the path tracing shader.
pub const TRACE: &str = "trace.comp.spv";

/// Workgroup width of the one-dimensional test shaders.
pub const SQUARES_WORKGROUP_SIZE: u32 = 64;
/// Workgroup edge length of the two-dimensional trace shader.
pub const TRACE_WORKGROUP_SIZE: u32 = 16;

/// First word of every SPIR-V module.
const SPIRV_MAGIC: u32 = 0x0723_0203;

/// Shader loading errors.
#[derive(Error, Debug)]
pub enum ShaderError {
    /// The compiled binary is missing or unreadable.
    #[error("failed to read shader {path:?} ({source}); compile the shaders first (see crates/lucent-shaders)")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file is not a SPIR-V module.
    #[error("shader {path:?} is not valid SPIR-V: {reason}")]
    InvalidSpirv { path: PathBuf, reason: String },
}

/// Fixed on-disk location of a compiled shader binary.
pub fn shader_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("shaders")
        .join(name)
}

/// Load a compiled shader binary as aligned SPIR-V words.
pub fn load(name: &str) -> Result<Vec<u32>, ShaderError> {
    let path = shader_path(name);
    let bytes = std::fs::read(&path).map_err(|source| ShaderError::Read {
        path: path.clone(),
        source,
    })?;

    bytes_to_spirv(&bytes).map_err(|reason| ShaderError::InvalidSpirv { path, reason })
}

/// Convert a byte slice to aligned u32 words and validate the magic number.
fn bytes_to_spirv(bytes: &[u8]) -> Result<Vec<u32>, String> {
    if bytes.len() % 4 != 0 {
        return Err(format!("length {} is not a multiple of 4", bytes.len()));
    }

    let words: Vec<u32> = bytes
        .chunks_exact(4)
        .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    match words.first() {
        Some(&SPIRV_MAGIC) => Ok(words),
        Some(&other) => Err(format!("bad magic number {other:#010x}")),
        None => Err("empty module".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_module() {
        let mut bytes = SPIRV_MAGIC.to_le_bytes().to_vec();
        bytes.extend_from_slice(&0x0001_0600u32.to_le_bytes());
        let words = bytes_to_spirv(&bytes).unwrap();
        assert_eq!(words[0], SPIRV_MAGIC);
        assert_eq!(words.len(), 2);
    }

    #[test]
    fn rejects_bad_magic() {
        let bytes = 0xdead_beefu32.to_le_bytes();
        assert!(bytes_to_spirv(&bytes).is_err());
    }

    #[test]
    fn rejects_unaligned_length() {
        assert!(bytes_to_spirv(&[0x03, 0x02, 0x23]).is_err());
    }

    #[test]
    fn rejects_empty_module() {
        assert!(bytes_to_spirv(&[]).is_err());
    }

    #[test]
    fn path_is_under_shader_dir() {
        let path = shader_path(SQUARES);
        assert!(path.ends_with("shaders/squares.comp.spv"));
    }

    #[test]
    fn missing_shader_reports_path() {
        let err = load("does_not_exist.comp.spv").unwrap_err();
        assert!(err.to_string().contains("does_not_exist.comp.spv"));
    }
}
