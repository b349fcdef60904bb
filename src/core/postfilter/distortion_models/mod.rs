// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright © 2022 Adrian <adrian.eddy at gmail>

mod hmd_warp;
mod passthrough;
pub use hmd_warp::{ HmdWarp, FIELD_HALF_EXTENT, is_within_field };
pub use passthrough::Passthrough;

use crate::{ DistortionParams, EyeViewport };

macro_rules! impl_models {
    ($($name:ident => $class:ty,)*) => {
        #[derive(Clone, Copy, Debug, PartialEq)]
        pub enum DistortionModels {
            $($name($class),)*
        }
        impl Default for DistortionModels {
            fn default() -> Self { DistortionModels::HmdWarp(HmdWarp { }) }
        }
        #[derive(Default, Clone, Copy, Debug, PartialEq)]
        pub struct DistortionModel {
            inner: DistortionModels
        }
        impl DistortionModel {
            /// Maps an output-space coordinate to the source coordinate to sample,
            /// or `None` when it falls outside of the lens field of view.
            #[inline]
            pub fn distort_uv(&self, uv: (f32, f32), viewport: &EyeViewport, params: &DistortionParams) -> Option<(f32, f32)> {
                match &self.inner {
                    $(DistortionModels::$name(x) => x.distort_uv(uv, viewport, params),)*
                }
            }

            pub fn id(&self)                 -> &'static str { match &self.inner { $(DistortionModels::$name(_) => <$class>::id(),)* } }
            pub fn name(&self)               -> &'static str { match &self.inner { $(DistortionModels::$name(_) => <$class>::name(),)* } }
            pub fn applies_distortion(&self) -> bool         { match &self.inner { $(DistortionModels::$name(_) => <$class>::applies_distortion(),)* } }

            pub fn from_id(id: &str) -> Self {
                $(
                    if id == <$class>::id() {
                        return Self { inner: DistortionModels::$name(<$class>::default()) };
                    }
                )*
                log::warn!("Unknown distortion model {id:?}, using {}", Self::default().id());
                Self::default()
            }
        }
    };
}

impl_models! {
    HmdWarp     => hmd_warp::HmdWarp,
    Passthrough => passthrough::Passthrough,
}
