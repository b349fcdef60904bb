// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright © 2022 Adrian <adrian.eddy at gmail>

use argh::FromArgs;
use hmdwarp_core::*;
use hmdwarp_core::postfilter::RGBA8;
use std::error::Error;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EyeSelection {
    Both,
    Left,
    Right,
}
impl FromStr for EyeSelection {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "both" => Ok(Self::Both),
            "left" | "l" => Ok(Self::Left),
            "right" | "r" => Ok(Self::Right),
            _ => Err(format!("unknown eye {s:?}, expected both, left or right"))
        }
    }
}

/** hmdwarp
Lens distortion post-process for side-by-side stereo HMD frames
*/
#[derive(FromArgs)]
struct Opts {
    /// input image: side-by-side stereo frame, left eye first
    #[argh(positional)]
    input: Option<String>,

    /// output image, default: <input>_warped.png
    #[argh(option, short = 'o')]
    output: Option<String>,

    /// extra pixels rendered next to each eye (right of the left eye, left of the right eye), default: 0
    #[argh(option, short = 'm', default = "0")]
    margin: usize,

    /// eye to output: both, left or right. default: both
    #[argh(option, short = 'e', default = "EyeSelection::Both")]
    eye: EyeSelection,

    /// optical profile JSON file, default: built-in HMD optics
    #[argh(option, short = 'p')]
    profile: Option<String>,

    /// sample the eyes without lens distortion
    #[argh(switch)]
    no_distortion: bool,

    /// wrap out-of-range coordinates instead of clamping them to the edge
    #[argh(switch)]
    repeat: bool,

    /// shift of the right eye texture in the GPU uniforms, in texture widths. default: 0
    #[argh(option, default = "0.0")]
    right_offset: f32,

    /// write the shader uniforms of both eyes to a JSON file
    #[argh(option)]
    uniforms: Option<String>,

    /// write the WGSL post-process shader to a file
    #[argh(option)]
    export_shader: Option<String>,

    /// print app version
    #[argh(switch)]
    version: bool,
}

fn default_output_path(input: &str) -> String {
    let path = Path::new(input);
    let stem = path.file_stem().map(|x| x.to_string_lossy().to_string()).unwrap_or_default();
    path.with_file_name(format!("{stem}_warped.png")).to_string_lossy().to_string()
}

pub fn run() -> Result<(), Box<dyn Error>> {
    let opts: Opts = argh::from_env();

    if opts.version {
        println!("hmdwarp v{}", crate::util::get_version());
        return Ok(());
    }

    if let Some(path) = &opts.export_shader {
        std::fs::write(path, gpu::POSTPROCESS_WGSL)?;
        log::info!("Shader written to {path}");
    }

    let Some(input) = &opts.input else {
        if opts.export_shader.is_some() { return Ok(()); }
        return Err("No input image, see --help".into());
    };

    let profile = match &opts.profile {
        Some(path) => OpticalProfile::load_from_file(path)?,
        None => OpticalProfile::default(),
    };

    let img = image::open(input)?.to_rgba8();
    let (width, height) = (img.width() as usize, img.height() as usize);
    if width % 2 != 0 || width / 2 <= opts.margin {
        return Err(format!("{input}: {width}x{height} is not a side-by-side frame with a margin of {}", opts.margin).into());
    }

    let layout = StereoLayout::new(width / 2 - opts.margin, height, opts.margin)?;
    let mut compositor = StereoCompositor::<RGBA8>::new(profile.distortion, layout)?;
    compositor.set_apply_distortion(!opts.no_distortion);
    if opts.repeat {
        compositor.address_mode = AddressMode::Repeat;
    }
    compositor.set_right_offset(opts.right_offset);
    log::info!("{input}: {}x{} per eye, margin {}, model: {}", layout.eye_width, layout.height, layout.margin, compositor.distortion_model.name());

    if let Some(path) = &opts.uniforms {
        let json = serde_json::json!({
            "left":  compositor.shader_uniforms(Eye::Left).get_json()?,
            "right": compositor.shader_uniforms(Eye::Right).get_json()?,
        });
        std::fs::write(path, serde_json::to_string_pretty(&json)?)?;
        log::info!("Uniforms written to {path}");
    }

    let time = Instant::now();
    let frame = img.as_raw();
    let (pixels, out_width) = match opts.eye {
        EyeSelection::Both => (compositor.process_side_by_side(frame)?, 2 * layout.eye_width),
        EyeSelection::Left | EyeSelection::Right => {
            let eye = if opts.eye == EyeSelection::Left { Eye::Left } else { Eye::Right };
            let source = layout.side_by_side_source::<RGBA8>(eye, frame)?;
            let mut pixels = vec![0u8; layout.eye_width * layout.height * 4];
            compositor.process_eye(eye, &source, &mut pixels)?;
            (pixels, layout.eye_width)
        }
    };
    log::debug!("Processed in {:.2}ms", time.elapsed().as_micros() as f64 / 1000.0);

    let output = opts.output.clone().unwrap_or_else(|| default_output_path(input));
    image::save_buffer(&output, &pixels, out_width as u32, height as u32, image::ColorType::Rgba8)?;
    log::info!("Saved {output}");

    Ok(())
}
