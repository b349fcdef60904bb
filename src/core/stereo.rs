// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright © 2021-2022 Adrian <adrian.eddy at gmail>

use crate::{ CompositorError, Eye };
use crate::postfilter::{ PixelType, SourceImage, RGBA8 };

/*
    Eye buffers as the renderer hands them over. Each eye is rendered `margin`
    pixels wider than it is shown, the left eye keeps its margin on the right,
    the right eye on the left:

      left:  [ eye_width ........ | margin ]
      right: [ margin | eye_width ........ ]

    Both may also come packed into one side-by-side buffer of `2 * eye_stride`.
*/
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct StereoLayout {
    pub eye_width: usize,
    pub height: usize,
    pub margin: usize,
}

impl StereoLayout {
    pub fn new(eye_width: usize, height: usize, margin: usize) -> Result<Self, CompositorError> {
        if eye_width == 0 || height == 0 {
            log::warn!("Rejected stereo layout of {eye_width}x{height}");
            return Err(CompositorError::InvalidDimensions { width: eye_width, height });
        }
        // Packed side-by-side rows are 2 * (eye_width + margin) wide
        if eye_width.checked_add(margin).and_then(|x| x.checked_mul(2)).is_none() {
            log::warn!("Rejected stereo layout: eye width {eye_width} with margin {margin}");
            return Err(CompositorError::InvalidLayout { width: eye_width, x_offset: margin, stride: usize::MAX });
        }
        Ok(Self { eye_width, height, margin })
    }

    /// Row length of one eye buffer, in pixels.
    #[inline]
    pub fn eye_stride(&self) -> usize { self.eye_width + self.margin }

    #[inline]
    pub fn x_offset(&self, eye: Eye) -> usize {
        match eye {
            Eye::Left  => 0,
            Eye::Right => self.margin,
        }
    }

    /// Visible share of an eye buffer row.
    pub fn x_width(&self) -> f32 {
        self.eye_width as f32 / self.eye_stride() as f32
    }
    /// Margin share of an eye buffer row.
    pub fn x_margin(&self) -> f32 {
        self.margin as f32 / self.eye_stride() as f32
    }

    /// Visible window of a separate eye buffer.
    pub fn eye_source<'a, T: PixelType>(&self, eye: Eye, buffer: &'a [u8]) -> Result<SourceImage<'a, T>, CompositorError> {
        SourceImage::new(buffer, self.eye_width, self.height, self.eye_stride(), self.x_offset(eye))
    }

    /// Visible window of one eye inside a packed side-by-side buffer.
    pub fn side_by_side_source<'a, T: PixelType>(&self, eye: Eye, buffer: &'a [u8]) -> Result<SourceImage<'a, T>, CompositorError> {
        let x_offset = match eye {
            Eye::Left  => 0,
            Eye::Right => self.eye_stride() + self.margin,
        };
        SourceImage::new(buffer, self.eye_width, self.height, 2 * self.eye_stride(), x_offset)
    }
}

/// Puts two RGBA8 eye images next to each other into one `2 * width` wide image.
pub fn compose_side_by_side(left: &[u8], right: &[u8], width: usize, height: usize) -> Result<Vec<u8>, CompositorError> {
    if width == 0 || height == 0 {
        return Err(CompositorError::InvalidDimensions { width, height });
    }
    let row_bytes = width * std::mem::size_of::<RGBA8>();
    for eye in [left, right] {
        if eye.len() != row_bytes * height {
            log::warn!("Rejected eye image of {} bytes, expected {}", eye.len(), row_bytes * height);
            return Err(CompositorError::BufferSize { expected: row_bytes * height, actual: eye.len() });
        }
    }

    let mut out = Vec::with_capacity(2 * row_bytes * height);
    for (l, r) in left.chunks_exact(row_bytes).zip(right.chunks_exact(row_bytes)) {
        out.extend_from_slice(l);
        out.extend_from_slice(r);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::postfilter::AddressMode;
    use test_case::test_case;

    // Pixel value = (eye, column in its row buffer, row)
    fn eye_buffer(eye: u8, layout: &StereoLayout) -> Vec<u8> {
        let mut buf = Vec::new();
        for y in 0..layout.height {
            for x in 0..layout.eye_stride() {
                buf.extend_from_slice(&[eye, x as u8, y as u8, 255]);
            }
        }
        buf
    }

    #[test]
    fn ratios_split_the_row() {
        let layout = StereoLayout::new(600, 400, 40).unwrap();
        assert_eq!(layout.eye_stride(), 640);
        assert!((layout.x_width() - 600.0 / 640.0).abs() < 1e-7);
        assert!((layout.x_margin() - 40.0 / 640.0).abs() < 1e-7);
        assert!((layout.x_width() + layout.x_margin() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn no_margin_means_full_width() {
        let layout = StereoLayout::new(64, 64, 0).unwrap();
        assert_eq!(layout.x_width(), 1.0);
        assert_eq!(layout.x_margin(), 0.0);
        assert_eq!(layout.x_offset(Eye::Right), 0);
    }

    #[test_case(Eye::Left,  0, 0 ; "left")]
    #[test_case(Eye::Right, 1, 3 ; "right")]
    fn eye_windows_skip_the_margin(eye: Eye, id: u8, first_column: u8) {
        let layout = StereoLayout::new(8, 4, 3).unwrap();
        let buf = eye_buffer(id, &layout);
        let src = layout.eye_source::<RGBA8>(eye, &buf).unwrap();
        assert_eq!(src.width(), 8);
        assert_eq!(src.pixel(0, 2), RGBA8(id, first_column, 2, 255));
        assert_eq!(src.pixel(7, 3), RGBA8(id, first_column + 7, 3, 255));
        // Clamping never leaves the visible window
        let edge = src.sample(1.5, 0.0, AddressMode::ClampToEdge);
        assert!((edge[1] - (first_column + 7) as f32 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn side_by_side_windows() {
        let layout = StereoLayout::new(8, 4, 3).unwrap();
        let (l, r) = (eye_buffer(0, &layout), eye_buffer(1, &layout));
        let packed = compose_rows(&l, &r, layout.eye_stride() * 4);

        let left = layout.side_by_side_source::<RGBA8>(Eye::Left, &packed).unwrap();
        let right = layout.side_by_side_source::<RGBA8>(Eye::Right, &packed).unwrap();
        assert_eq!(left.pixel(0, 1), RGBA8(0, 0, 1, 255));
        assert_eq!(right.pixel(0, 1), RGBA8(1, 3, 1, 255));
        assert_eq!(right.pixel(7, 3), RGBA8(1, 10, 3, 255));
    }

    fn compose_rows(l: &[u8], r: &[u8], row: usize) -> Vec<u8> {
        l.chunks(row).zip(r.chunks(row)).flat_map(|(a, b)| a.iter().chain(b.iter()).copied()).collect()
    }

    #[test]
    fn short_eye_buffer_is_rejected() {
        let layout = StereoLayout::new(8, 4, 3).unwrap();
        let buf = vec![0u8; 40 * 4]; // needs 3 * 11 + 8 = 41 pixels
        assert!(matches!(layout.eye_source::<RGBA8>(Eye::Left, &buf), Err(CompositorError::BufferSize { .. })));
    }

    #[test_case(usize::MAX, 1 ; "margin wraps the eye stride")]
    #[test_case(usize::MAX / 2, 1 ; "packed row wraps")]
    fn oversized_layout_is_rejected(eye_width: usize, margin: usize) {
        assert!(matches!(StereoLayout::new(eye_width, 4, margin), Err(CompositorError::InvalidLayout { .. })));
    }

    #[test]
    fn compose_interleaves_rows() {
        let left = vec![1u8; 2 * 2 * 4];
        let right = vec![2u8; 2 * 2 * 4];
        let out = compose_side_by_side(&left, &right, 2, 2).unwrap();
        assert_eq!(out.len(), 4 * 2 * 4);
        assert_eq!(&out[..8], &[1; 8]);
        assert_eq!(&out[8..16], &[2; 8]);
        assert_eq!(&out[16..24], &[1; 8]);
        assert!(matches!(compose_side_by_side(&left, &right[1..], 2, 2), Err(CompositorError::BufferSize { .. })));
    }
}
