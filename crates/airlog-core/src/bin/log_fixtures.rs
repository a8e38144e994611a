use std::fs;
use std::path::{Path, PathBuf};

use airlog_core::{Measurement, encode_frame, encode_frames};

const MAY_FIRST: u32 = 1_714_521_600;

fn main() -> Result<(), String> {
    let root = PathBuf::from("tests/golden");
    write_segment(root.join("steady").join("input.bin"), &steady())?;
    write_segment(root.join("gap").join("input.bin"), &gap())?;
    write_segment(root.join("noisy").join("input.bin"), &noisy())?;
    Ok(())
}

/// Four readings ten minutes apart.
fn steady() -> Vec<u8> {
    encode_frames(&[
        reading(MAY_FIRST, 5, 8, 12),
        reading(MAY_FIRST + 600, 6, 9, 14),
        reading(MAY_FIRST + 1200, 7, 11, 15),
        reading(MAY_FIRST + 1800, 6, 10, 13),
    ])
}

/// An hour of silence between the second and third reading.
fn gap() -> Vec<u8> {
    encode_frames(&[
        reading(MAY_FIRST, 10, 20, 35),
        reading(MAY_FIRST + 600, 12, 26, 45),
        reading(MAY_FIRST + 4200, 18, 30, 60),
        reading(MAY_FIRST + 4800, 16, 28, 55),
    ])
}

/// Stray bytes around frames, one gap, and a truncated trailing frame.
fn noisy() -> Vec<u8> {
    let mut bytes = vec![0xff, 0x00, 0x07];
    bytes.extend_from_slice(&encode_frame(&reading(MAY_FIRST, 3, 4, 5)));
    bytes.extend_from_slice(&[0x0d, 0xaa]);
    bytes.extend_from_slice(&encode_frame(&reading(MAY_FIRST + 900, 50, 90, 120)));
    bytes.extend_from_slice(&encode_frame(&reading(MAY_FIRST + 1801, 2, 3, 4)));
    bytes.extend_from_slice(&[12, 1, 2, 3]);
    bytes
}

fn reading(timestamp: u32, pm1: u16, pm2_5: u16, pm10: u16) -> Measurement {
    Measurement {
        timestamp,
        pm1,
        pm2_5,
        pm10,
    }
}

fn write_segment(path: PathBuf, bytes: &[u8]) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }
    fs::write(&path, bytes).map_err(|err| format!("failed to write {}: {}", path.display(), err))
}

fn create_dir(path: &Path) -> Result<(), String> {
    fs::create_dir_all(path)
        .map_err(|err| format!("failed to create {}: {}", path.display(), err))
}
