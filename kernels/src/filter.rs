use glam::Vec4;

/// Blend one pixel of the temporal accumulator with the raw sample of frame
/// `tick`. Early frames use a running-average weight of `1 / tick` so the
/// history warms up without ghosting, then the weight settles at `exponent`
/// and the accumulator becomes a plain exponential moving average.
pub fn temporal_blend(accum: Vec4, raw: Vec4, tick: u32, exponent: f32) -> Vec4 {
    if tick == 0 {
        return raw;
    }
    let tick_f = tick as f32;
    let weight = if tick_f < 1.0 / exponent {
        1.0 / tick_f
    } else {
        exponent
    };
    accum.lerp(raw, weight)
}

/// Box-average the window of side `window` centered at `(x, y)`. Zero-valued
/// pixels carry no data and are skipped; a window with no data stays zero.
pub fn spatial_box(
    buffer: &[Vec4],
    width: u32,
    height: u32,
    x: u32,
    y: u32,
    window: u32,
) -> Vec4 {
    let half = (window / 2) as i32;
    let mut sum = Vec4::ZERO;
    let mut count = 0u32;
    for dy in -half..=half {
        let sy = y as i32 + dy;
        if sy < 0 || sy >= height as i32 {
            continue;
        }
        for dx in -half..=half {
            let sx = x as i32 + dx;
            if sx < 0 || sx >= width as i32 {
                continue;
            }
            let sample = buffer[(sy as u32 * width + sx as u32) as usize];
            if sample == Vec4::ZERO {
                continue;
            }
            sum += sample;
            count += 1;
        }
    }
    if count == 0 {
        Vec4::ZERO
    } else {
        sum / count as f32
    }
}
