//! End-to-end fusion of synthetic view renders written to disk.

use image::{Rgba, RgbaImage};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use volfuse_data::{JsonVolumeWriter, ViewAxis};
use volfuse_fuse::{FrameSequenceDriver, FuseError, FusionConfig};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("volfuse-e2e-{}-{}", std::process::id(), name));
    std::fs::remove_dir_all(&dir).ok();
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn view_color(view: ViewAxis) -> [u8; 3] {
    match view {
        ViewAxis::NegX => [255, 0, 0],
        ViewAxis::NegY => [0, 255, 0],
        ViewAxis::NegZ => [0, 0, 255],
        ViewAxis::PosX => [255, 255, 0],
        ViewAxis::PosY => [0, 255, 255],
        ViewAxis::PosZ => [255, 0, 255],
    }
}

/// 2x2 render where every pixel sits at mid depth (alpha 128 -> x = 1 at N = 4).
fn write_view(dir: &Path, frame: i64, view: ViewAxis) {
    let [r, g, b] = view_color(view);
    let img = RgbaImage::from_pixel(2, 2, Rgba([r, g, b, 128]));
    img.save(dir.join(format!("{:04}{}.png", frame, view.suffix())))
        .unwrap();
}

/// coord -> (color, opacity) read back from the JSON document.
fn read_volume(path: &Path) -> HashMap<[i64; 3], ([f64; 3], f64)> {
    let doc: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    let coord = |v: &Value| -> [i64; 3] {
        let a = v["coord"].as_array().unwrap();
        [a[0].as_i64().unwrap(), a[1].as_i64().unwrap(), a[2].as_i64().unwrap()]
    };
    let mut colors = HashMap::new();
    for v in doc["grids"][0]["voxels"].as_array().unwrap() {
        let c = v["value"].as_array().unwrap();
        colors.insert(
            coord(v),
            [c[0].as_f64().unwrap(), c[1].as_f64().unwrap(), c[2].as_f64().unwrap()],
        );
    }
    doc["grids"][1]["voxels"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| (coord(v), (colors[&coord(v)], v["value"].as_f64().unwrap())))
        .collect()
}

#[test]
fn six_views_fuse_into_expected_voxels() {
    let input = scratch_dir("six-in");
    let output = scratch_dir("six-out");
    for view in ViewAxis::ALL {
        write_view(&input, 1, view);
    }

    let config = FusionConfig::new(&input, &output)
        .with_frames(1, 1)
        .with_resolution(4);
    let writer = JsonVolumeWriter::new();
    let report = FrameSequenceDriver::new(config.clone(), &writer)
        .run()
        .unwrap();
    assert!(report.is_success());
    assert_eq!(report.written[0].views_loaded, 6);

    let voxels = read_volume(&config.output_path(1));
    // 6 views x 4 pixels, with -y and -z coinciding at two coordinates.
    assert_eq!(voxels.len(), 22);

    // -x: (N-1-x, y, z) with x = 1
    assert_eq!(voxels[&[2, 0, 0]], ([1.0, 0.0, 0.0], 1.0));
    // +z: (y, x, z)
    assert_eq!(voxels[&[1, 1, 1]], ([1.0, 0.0, 1.0], 1.0));
    // +y: (N-1-z, y, N-1-x)
    assert_eq!(voxels[&[3, 1, 2]], ([0.0, 1.0, 1.0], 1.0));
    // +x: (x, N-1-y, z)
    assert_eq!(voxels[&[1, 2, 1]], ([1.0, 1.0, 0.0], 1.0));

    // -y (N-1-z, N-1-y, x) and -z (N-1-y, N-1-x, z) meet here.
    for shared in [[3, 2, 1], [2, 2, 1]] {
        let (color, opacity) = voxels[&shared];
        assert_eq!(opacity, 2.0);
        assert_eq!(color, [0.0, 0.5, 0.5]);
    }

    let single = voxels.values().filter(|(_, a)| *a == 1.0).count();
    assert_eq!(single, 20);
}

#[test]
fn missing_views_do_not_leak_between_frames() {
    let input = scratch_dir("iso-in");
    let output = scratch_dir("iso-out");
    for view in ViewAxis::ALL {
        write_view(&input, 1, view);
    }
    // Frame 2 only has its +z view; frame 3 has every view again.
    write_view(&input, 2, ViewAxis::PosZ);
    for view in ViewAxis::ALL {
        write_view(&input, 3, view);
    }

    let config = FusionConfig::new(&input, &output)
        .with_frames(1, 3)
        .with_resolution(4);
    let writer = JsonVolumeWriter::new();
    let report = FrameSequenceDriver::new(config.clone(), &writer)
        .run()
        .unwrap();
    assert_eq!(report.written.len(), 3);
    assert_eq!(report.written[1].skipped_views.len(), 5);

    let first = read_volume(&config.output_path(1));
    let second = read_volume(&config.output_path(2));
    let third = read_volume(&config.output_path(3));
    assert_eq!(second.len(), 4);
    assert_eq!(first, third);
}

#[test]
fn missing_input_directory_aborts_before_any_frame() {
    let output = scratch_dir("missing-out");
    let config = FusionConfig::new(output.join("nope"), &output).with_frames(1, 2);
    let writer = JsonVolumeWriter::new();
    let result = FrameSequenceDriver::new(config, &writer).run();
    assert!(matches!(result, Err(FuseError::InputDirMissing(_))));
    assert_eq!(std::fs::read_dir(&output).unwrap().count(), 0);
}
