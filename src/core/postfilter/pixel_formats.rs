// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright © 2021-2022 Adrian <adrian.eddy at gmail>

use nalgebra::Vector4;

pub trait PixelType: Default + Copy + Send + Sync + bytemuck::Pod {
    const COUNT: usize = 1;
    const SCALAR_BYTES: usize = 1;
    /// Factor bringing a stored channel value into 0..1
    const NORMALIZE: f32 = 1.0 / 255.0;
    type Scalar: Default + bytemuck::Pod;

    fn to_float(v: Self) -> Vector4<f32>;
    fn from_float(v: Vector4<f32>) -> Self;
    fn name() -> &'static str;
}

#[derive(Default, Clone, Copy, Debug, PartialEq, PartialOrd)] pub struct Luma8(pub u8);
#[derive(Default, Clone, Copy, Debug, PartialEq, PartialOrd)] pub struct RGB8(pub u8, pub u8, pub u8);
#[derive(Default, Clone, Copy, Debug, PartialEq, PartialOrd)] pub struct RGBA8(pub u8, pub u8, pub u8, pub u8);
#[derive(Default, Clone, Copy, Debug, PartialEq, PartialOrd)] pub struct RGBAf(pub f32, pub f32, pub f32, pub f32);

unsafe impl bytemuck::Zeroable for Luma8 { }
unsafe impl bytemuck::Pod for Luma8 { }
impl PixelType for Luma8 {
    const COUNT: usize = 1;
    const SCALAR_BYTES: usize = 1;
    type Scalar = u8;
    #[inline] fn to_float(v: Self) -> Vector4<f32> { Vector4::new(v.0 as f32, 0.0, 0.0, 0.0) }
    #[inline] fn from_float(v: Vector4<f32>) -> Self { Self(v[0] as Self::Scalar) }
    #[inline] fn name() -> &'static str { "Luma8" }
}
unsafe impl bytemuck::Zeroable for RGB8 { }
unsafe impl bytemuck::Pod for RGB8 { }
impl PixelType for RGB8 {
    const COUNT: usize = 3;
    const SCALAR_BYTES: usize = 1;
    type Scalar = u8;
    #[inline] fn to_float(v: Self) -> Vector4<f32> { Vector4::new(v.0 as f32, v.1 as f32, v.2 as f32, 0.0) }
    #[inline] fn from_float(v: Vector4<f32>) -> Self { Self(v[0] as Self::Scalar, v[1] as Self::Scalar, v[2] as Self::Scalar) }
    #[inline] fn name() -> &'static str { "RGB8" }
}
unsafe impl bytemuck::Zeroable for RGBA8 { }
unsafe impl bytemuck::Pod for RGBA8 { }
impl PixelType for RGBA8 {
    const COUNT: usize = 4;
    const SCALAR_BYTES: usize = 1;
    type Scalar = u8;
    #[inline] fn to_float(v: Self) -> Vector4<f32> { Vector4::new(v.0 as f32, v.1 as f32, v.2 as f32, v.3 as f32) }
    // `as u8` saturates, so this clamps to 0..255 and truncates
    #[inline] fn from_float(v: Vector4<f32>) -> Self { Self(v[0] as Self::Scalar, v[1] as Self::Scalar, v[2] as Self::Scalar, v[3] as Self::Scalar) }
    #[inline] fn name() -> &'static str { "RGBA8" }
}
unsafe impl bytemuck::Zeroable for RGBAf { }
unsafe impl bytemuck::Pod for RGBAf { }
impl PixelType for RGBAf {
    const COUNT: usize = 4;
    const SCALAR_BYTES: usize = 4;
    const NORMALIZE: f32 = 1.0;
    type Scalar = f32;
    #[inline] fn to_float(v: Self) -> Vector4<f32> { Vector4::new(v.0, v.1, v.2, v.3) }
    #[inline] fn from_float(v: Vector4<f32>) -> Self { Self(v[0], v[1], v[2], v[3]) }
    #[inline] fn name() -> &'static str { "RGBAf" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba8_from_float_saturates_and_truncates() {
        let px = RGBA8::from_float(Vector4::new(-3.0, 255.9, 300.0, 127.99));
        assert_eq!(px, RGBA8(0, 255, 255, 127));
        assert_eq!(RGBA8::from_float(Vector4::new(f32::NAN, 0.0, 0.0, 0.0)).0, 0);
    }

    #[test]
    fn layouts_match_channel_counts() {
        assert_eq!(std::mem::size_of::<Luma8>(), Luma8::COUNT * Luma8::SCALAR_BYTES);
        assert_eq!(std::mem::size_of::<RGB8>(),  RGB8::COUNT  * RGB8::SCALAR_BYTES);
        assert_eq!(std::mem::size_of::<RGBA8>(), RGBA8::COUNT * RGBA8::SCALAR_BYTES);
        assert_eq!(std::mem::size_of::<RGBAf>(), RGBAf::COUNT * RGBAf::SCALAR_BYTES);
    }
}
