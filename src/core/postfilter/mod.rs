// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright © 2021-2022 Adrian <adrian.eddy at gmail>

mod pixel_formats;
mod sampler;
mod cpu_postfilter;
pub mod distortion_models;

pub use pixel_formats::*;
pub use sampler::{ AddressMode, SourceImage };
pub use cpu_postfilter::{ postfilter, sample_distorted };
pub use distortion_models::DistortionModel;
