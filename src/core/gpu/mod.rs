// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright © 2021-2022 Adrian <adrian.eddy at gmail>

mod uniforms;
pub use uniforms::{ ShaderUniforms, UniformValue };

/// Post-process pass for wgpu. Bindings: 0 `ShaderUniforms`, 1 left eye texture,
/// 2 right eye texture, 3 sampler. Draw 4 vertices as a triangle strip per eye.
pub const POSTPROCESS_WGSL: &str = include_str!("postprocess.wgsl");
pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";
