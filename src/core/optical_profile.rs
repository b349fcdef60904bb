// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright © 2021-2022 Adrian <adrian.eddy at gmail>

use serde::{ Serialize, Deserialize };
use crate::CompositorError;

// Fixed optics of the reference HMD
pub const HMD_WARP_PARAM:       [f32; 4] = [1.0, 0.22, 0.24, 0.0];
pub const HMD_CHROMA_AB_PARAM:  [f32; 4] = [0.996, -0.004, 1.014, 0.0];
pub const HMD_DISTORTION_SCALE: f32 = 1.714606;
pub const HMD_X_CENTER_OFFSET:  f32 = 0.151976;

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct DistortionParams {
    pub warp_param:       [f32; 4], // K0..K3 - radial polynomial
    pub chroma_ab_param:  [f32; 4], // CA0..CA3 - chromatic aberration
    pub distortion_scale: f32,
    pub x_center_offset:  f32,      // lens center shift, in units of half the eye viewport
}

impl Default for DistortionParams {
    fn default() -> Self {
        Self {
            warp_param:       HMD_WARP_PARAM,
            chroma_ab_param:  HMD_CHROMA_AB_PARAM,
            distortion_scale: HMD_DISTORTION_SCALE,
            x_center_offset:  HMD_X_CENTER_OFFSET,
        }
    }
}

impl DistortionParams {
    pub fn new(warp_param: [f32; 4], chroma_ab_param: [f32; 4], distortion_scale: f32, x_center_offset: f32) -> Result<Self, CompositorError> {
        let params = Self { warp_param, chroma_ab_param, distortion_scale, x_center_offset };
        params.validate()?;
        Ok(params)
    }

    /// Coefficients for which the warp maps every output coordinate onto itself.
    pub fn identity() -> Self {
        Self {
            warp_param:       [1.0, 0.0, 0.0, 0.0],
            chroma_ab_param:  [1.0, 0.0, 1.0, 0.0],
            distortion_scale: 1.0,
            x_center_offset:  0.0,
        }
    }

    pub fn validate(&self) -> Result<(), CompositorError> {
        if self.warp_param.iter().any(|x| !x.is_finite()) { return Err(CompositorError::NonFiniteParameter("warp_param")); }
        if self.chroma_ab_param.iter().any(|x| !x.is_finite()) { return Err(CompositorError::NonFiniteParameter("chroma_ab_param")); }
        if !self.x_center_offset.is_finite() { return Err(CompositorError::NonFiniteParameter("x_center_offset")); }
        if !self.distortion_scale.is_finite() || self.distortion_scale == 0.0 {
            return Err(CompositorError::InvalidDistortionScale(self.distortion_scale));
        }
        Ok(())
    }
}

#[derive(Deserialize, Serialize, Default, Clone, Debug)]
#[serde(default)]
pub struct OpticalProfile {
    pub name: String,
    pub note: String,
    pub hmd_model: String,

    #[serde(flatten)]
    pub distortion: DistortionParams,

    #[serde(skip)]
    pub filename: String,
}

impl OpticalProfile {
    pub fn from_json(json: &str) -> Result<Self, CompositorError> {
        let profile: Self = serde_json::from_str(json)?;
        profile.distortion.validate()?;
        Ok(profile)
    }

    pub fn load_from_file(path: &str) -> Result<Self, CompositorError> {
        let data = std::fs::read_to_string(path)?;
        let mut profile = Self::from_json(&data)?;
        profile.filename = path.to_string();
        log::info!("Loaded optical profile {:?} from {path}", profile.name);
        Ok(profile)
    }

    pub fn get_json(&self) -> Result<String, CompositorError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_reference_hmd() {
        let p = DistortionParams::default();
        assert_eq!(p.warp_param, [1.0, 0.22, 0.24, 0.0]);
        assert_eq!(p.chroma_ab_param, [0.996, -0.004, 1.014, 0.0]);
        assert_eq!(p.distortion_scale, 1.714606);
        assert_eq!(p.x_center_offset, 0.151976);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn zero_scale_is_rejected_at_construction() {
        let err = DistortionParams::new(HMD_WARP_PARAM, HMD_CHROMA_AB_PARAM, 0.0, 0.0).unwrap_err();
        assert!(matches!(err, CompositorError::InvalidDistortionScale(s) if s == 0.0));
    }

    #[test]
    fn non_finite_coefficients_are_rejected() {
        let err = DistortionParams::new([1.0, f32::NAN, 0.0, 0.0], HMD_CHROMA_AB_PARAM, 1.0, 0.0).unwrap_err();
        assert!(matches!(err, CompositorError::NonFiniteParameter("warp_param")));
        let err = DistortionParams::new(HMD_WARP_PARAM, HMD_CHROMA_AB_PARAM, 1.0, f32::INFINITY).unwrap_err();
        assert!(matches!(err, CompositorError::NonFiniteParameter("x_center_offset")));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let profile = OpticalProfile::from_json(r#"{ "name": "test", "distortion_scale": 1.5 }"#).unwrap();
        assert_eq!(profile.name, "test");
        assert_eq!(profile.distortion.distortion_scale, 1.5);
        assert_eq!(profile.distortion.warp_param, HMD_WARP_PARAM);
        assert_eq!(profile.distortion.x_center_offset, HMD_X_CENTER_OFFSET);
    }

    #[test]
    fn json_with_zero_scale_fails_to_load() {
        assert!(OpticalProfile::from_json(r#"{ "distortion_scale": 0.0 }"#).is_err());
    }

    #[test]
    fn json_roundtrip_keeps_coefficients() {
        let profile = OpticalProfile { name: "dk1".into(), ..Default::default() };
        let json = profile.get_json().unwrap();
        let loaded = OpticalProfile::from_json(&json).unwrap();
        assert_eq!(loaded.distortion, profile.distortion);
        assert_eq!(loaded.name, "dk1");
    }
}
