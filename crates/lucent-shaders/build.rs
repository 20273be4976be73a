//! Build script to compile GLSL shaders to SPIR-V.

use std::path::Path;
use std::process::Command;

const SHADERS: &[&str] = &["squares.comp", "squares_printf.comp", "trace.comp"];

fn main() {
    println!("cargo:rerun-if-changed=shaders/");

    for shader in SHADERS {
        let input = format!("shaders/{shader}");
        let output = format!("shaders/{shader}.spv");
        compile_shader(&input, &output);
    }
}

fn compile_shader(input: &str, output: &str) {
    let input_path = Path::new(input);
    let output_path = Path::new(output);

    // Compile using glslc (part of the Vulkan SDK)
    let result = Command::new("glslc")
        .arg("--target-env=vulkan1.3")
        .arg(input_path)
        .arg("-o")
        .arg(output_path)
        .status();

    match result {
        Ok(status) if status.success() => {
            println!("Compiled {input} -> {output}");
        }
        Ok(status) => {
            panic!("Failed to compile {}: exit code {:?}", input, status.code());
        }
        Err(e) => {
            println!("cargo:warning=glslc not found ({e}); shaders not compiled");
            println!("cargo:warning=Install the Vulkan SDK or compile manually: glslc {input} -o {output}");
        }
    }
}
