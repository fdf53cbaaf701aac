use image::GrayImage;
use imageproc::distance_transform::Norm;
use imageproc::filter::{Kernel, gaussian_blur_f32};
use imageproc::morphology::{dilate, erode};

/// `passes` rounds of a 3x3 minimum filter.
pub fn erode_passes(mask: &GrayImage, passes: u32) -> GrayImage {
    let mut out = mask.clone();
    for _ in 0..passes {
        out = erode(&out, Norm::LInf, 1);
    }
    out
}

/// `passes` rounds of a `(2 * radius + 1)`-square maximum filter.
pub fn dilate_passes(mask: &GrayImage, passes: u32, radius: u8) -> GrayImage {
    let mut out = mask.clone();
    for _ in 0..passes {
        out = dilate(&out, Norm::LInf, radius);
    }
    out
}

pub fn gaussian_blur(mask: &GrayImage, sigma: f32) -> GrayImage {
    gaussian_blur_f32(mask, sigma)
}

/// Above `high` becomes 255, at or below `low` becomes 0, anything between
/// keeps its gradient value.
pub fn three_way_threshold(mask: &GrayImage, low: u8, high: u8) -> GrayImage {
    let mut out = mask.clone();
    for p in out.pixels_mut() {
        let v = p.0[0];
        p.0[0] = if v > high {
            255
        } else if v > low {
            v
        } else {
            0
        };
    }
    out
}

// 5x5 "smooth more" kernel, row-major, normalized by its sum of 100.
const SMOOTH_MORE_KERNEL: [f32; 25] = [
    0.01, 0.01, 0.01, 0.01, 0.01, //
    0.01, 0.05, 0.05, 0.05, 0.01, //
    0.01, 0.05, 0.44, 0.05, 0.01, //
    0.01, 0.05, 0.05, 0.05, 0.01, //
    0.01, 0.01, 0.01, 0.01, 0.01,
];

/// Strong 5x5 smoothing; edges are padded by continuity.
pub fn smooth_more(mask: &GrayImage) -> GrayImage {
    if mask.width() == 0 || mask.height() == 0 {
        return mask.clone();
    }
    Kernel::new(&SMOOTH_MORE_KERNEL, 5, 5).filter(mask, |out: &mut u8, acc: f32| {
        *out = acc.round().clamp(0.0, 255.0) as u8;
    })
}

/// Force `mask` to 255 wherever `interior` is set.
pub fn force_interior(mut mask: GrayImage, interior: &GrayImage) -> GrayImage {
    for (m, i) in mask.pixels_mut().zip(interior.pixels()) {
        if i.0[0] > 0 {
            m.0[0] = 255;
        }
    }
    mask
}
