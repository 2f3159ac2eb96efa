//! Procedural eye art, written as static tables into OUT_DIR
//!
//! Layout of the generated file:
//! - `SCLERA` (`SCLERA_SIZE` square): white with a red-veined rim and a
//!   black disc under the iris, which shows through as the pupil wherever
//!   the polar distance is at or above the iris threshold
//! - `IRIS` (`IRIS_MAP_WIDTH` x `IRIS_MAP_HEIGHT`): columns are angle,
//!   row 0 is the outer edge and the last row borders the pupil
//! - `POLAR` (`IRIS_SIZE` square): `(angle << 7) | distance`, distance
//!   127 at the center and outside the iris disc, 0 on its rim
//! - `UPPER` / `LOWER` (screen size): eyelid thresholds, low values
//!   close first

use std::f64::consts::PI;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

pub const SCLERA_SIZE: usize = 200;
pub const IRIS_SIZE: usize = 150;
pub const IRIS_MAP_WIDTH: usize = 256;
pub const IRIS_MAP_HEIGHT: usize = 64;

/// Smallest pupil radius as a fraction of the iris radius
const PUPIL_FRACTION: f64 = 0.62;

fn rgb565(r: f64, g: f64, b: f64) -> u16 {
    let c = |v: f64| v.clamp(0.0, 255.0) as u16;
    ((c(r) & 0xF8) << 8) | ((c(g) & 0xFC) << 3) | (c(b) >> 3)
}

/// Cheap deterministic noise in 0..1
fn hash(x: i64, y: i64) -> f64 {
    let mut h = (x.wrapping_mul(374_761_393) ^ y.wrapping_mul(668_265_263)) as u64;
    h = (h ^ (h >> 13)).wrapping_mul(1_274_126_177);
    ((h ^ (h >> 16)) & 0xFFFF) as f64 / 65535.0
}

fn sclera() -> Vec<u16> {
    let c = (SCLERA_SIZE as f64 - 1.0) / 2.0;
    let pupil = IRIS_SIZE as f64 / 2.0;
    let mut out = Vec::with_capacity(SCLERA_SIZE * SCLERA_SIZE);
    for y in 0..SCLERA_SIZE {
        for x in 0..SCLERA_SIZE {
            let (dx, dy) = (x as f64 - c, y as f64 - c);
            let d = (dx * dx + dy * dy).sqrt();
            if d < pupil {
                out.push(0);
                continue;
            }
            let r = d / c;
            let theta = dy.atan2(dx);
            let shade = 1.0 - 0.35 * r * r;
            let vein = (theta * 7.0 + r * 9.0).sin() * (theta * 13.0 - r * 5.0).sin();
            let (mut red, mut green, mut blue) = (236.0 * shade, 228.0 * shade, 222.0 * shade);
            if r > 0.5 && vein > 0.9 {
                let k = ((vein - 0.9) * 10.0).min(1.0) * ((r - 0.5) * 2.0).min(1.0);
                red += (200.0 - red) * k;
                green += (70.0 - green) * k;
                blue += (70.0 - blue) * k;
            }
            let grain = (hash(x as i64, y as i64) - 0.5) * 10.0;
            out.push(rgb565(red + grain, green + grain, blue + grain));
        }
    }
    out
}

fn iris() -> Vec<u16> {
    let mut out = Vec::with_capacity(IRIS_MAP_WIDTH * IRIS_MAP_HEIGHT);
    for row in 0..IRIS_MAP_HEIGHT {
        let t = row as f64 / (IRIS_MAP_HEIGHT - 1) as f64;
        for col in 0..IRIS_MAP_WIDTH {
            let a = col as f64 / IRIS_MAP_WIDTH as f64 * 2.0 * PI;
            // Radial fibers, brighter toward the pupil, dark limbal ring
            let fiber = 0.75 + 0.25 * (a * 41.0).sin() * (a * 17.0 + t * 6.0).cos();
            let limbus = (t * 6.0).min(1.0);
            let collarette = 1.0 + 0.4 * (-((t - 0.8) * 10.0).powi(2)).exp();
            let k = fiber * limbus * collarette;
            let grain = (hash(col as i64, row as i64 + 1000) - 0.5) * 16.0;
            out.push(rgb565(
                70.0 * k + grain,
                120.0 * k + grain,
                60.0 * k + grain,
            ));
        }
    }
    out
}

fn polar() -> Vec<u16> {
    let c = (IRIS_SIZE as f64 - 1.0) / 2.0;
    let radius = IRIS_SIZE as f64 / 2.0;
    let mut out = Vec::with_capacity(IRIS_SIZE * IRIS_SIZE);
    for y in 0..IRIS_SIZE {
        for x in 0..IRIS_SIZE {
            let (dx, dy) = (x as f64 - c, y as f64 - c);
            let r = (dx * dx + dy * dy).sqrt() / radius;
            let angle = ((dy.atan2(dx) + PI) / (2.0 * PI) * 512.0) as u16 & 0x1FF;
            let distance = if r >= 1.0 {
                127
            } else {
                (((1.0 - r) / (1.0 - PUPIL_FRACTION)).min(1.0) * 127.0) as u16
            };
            out.push((angle << 7) | distance.min(127));
        }
    }
    out
}

/// Threshold map for one lid; `from_top` picks the upper lid
fn lid(width: usize, height: usize, from_top: bool) -> Vec<u8> {
    let cx = (width as f64 - 1.0) / 2.0;
    let span = height as f64 * 0.6;
    let depth = if from_top { 0.12 } else { 0.06 };
    let mut out = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let u = (x as f64 - cx) / cx.max(1.0);
            // Lids arch toward the middle of the eye
            let arch = height as f64 * depth * (1.0 - u * u);
            let edge = if from_top { y as f64 } else { (height - 1 - y) as f64 };
            let v = (edge + arch) / span * 255.0;
            out.push(v.clamp(0.0, 255.0) as u8);
        }
    }
    out
}

fn emit<T: std::fmt::Display>(src: &mut String, name: &str, ty: &str, data: &[T]) {
    let _ = writeln!(src, "pub static {name}: [{ty}; {}] = [", data.len());
    for line in data.chunks(16) {
        src.push_str("    ");
        for v in line {
            let _ = write!(src, "{v},");
        }
        src.push('\n');
    }
    src.push_str("];\n\n");
}

/// Write `eye_assets.rs` for a `width` x `height` screen
pub fn generate(out: &Path, width: usize, height: usize) -> io::Result<()> {
    let mut src = String::new();
    src.push_str("// Generated by build.rs\n\n");
    let _ = writeln!(src, "pub const SCREEN_WIDTH: usize = {width};");
    let _ = writeln!(src, "pub const SCREEN_HEIGHT: usize = {height};");
    let _ = writeln!(src, "pub const SCLERA_SIZE: usize = {SCLERA_SIZE};");
    let _ = writeln!(src, "pub const IRIS_SIZE: usize = {IRIS_SIZE};");
    let _ = writeln!(src, "pub const IRIS_MAP_WIDTH: usize = {IRIS_MAP_WIDTH};");
    let _ = writeln!(src, "pub const IRIS_MAP_HEIGHT: usize = {IRIS_MAP_HEIGHT};\n");

    emit(&mut src, "SCLERA", "u16", &sclera());
    emit(&mut src, "IRIS", "u16", &iris());
    emit(&mut src, "POLAR", "u16", &polar());
    emit(&mut src, "UPPER", "u8", &lid(width, height, true));
    emit(&mut src, "LOWER", "u8", &lid(width, height, false));

    fs::write(out, src)
}
