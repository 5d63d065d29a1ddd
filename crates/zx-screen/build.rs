use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// IEC 61966-2-1 piecewise decode: gamma-encoded sRGB to linear light.
fn srgb_to_linear_exact(srgb: f64) -> f64 {
    if srgb <= 0.04045 {
        srgb / 12.92
    } else {
        ((srgb + 0.055) / 1.055).powf(2.4)
    }
}

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("gamma_lut.rs");
    let mut file = File::create(&dest_path).unwrap();

    // 4096 entries keep interpolation error well below one Lab unit.
    writeln!(file, "/// sRGB to linear lookup table.").unwrap();
    writeln!(file, "/// Index: srgb fraction * 4095.0, Value: linear fraction").unwrap();
    writeln!(file, "pub static SRGB_TO_LINEAR: [f32; 4096] = [").unwrap();
    for i in 0..4096 {
        let srgb = i as f64 / 4095.0;
        if i > 0 && i % 8 == 0 {
            writeln!(file).unwrap();
        }
        write!(file, "    {:.9},", srgb_to_linear_exact(srgb) as f32).unwrap();
    }
    writeln!(file, "\n];").unwrap();

    println!("cargo::rerun-if-changed=build.rs");
}
