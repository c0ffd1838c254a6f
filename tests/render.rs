#![cfg(all(
  feature = "read_image_file",
  feature = "save_image_file",
  feature = "directory_record"
))]

mod common;

use std::path::{Path, PathBuf};

use common::synthetic_image::{PURE_RED, fill_disk, green_canvas};
use rubus::{
  frame::ImageFrame,
  input::ImageFileInput,
  model::{Analysis, Detection, RipenessDetectorBuilder},
  output::{DirectoryRecordOutput, Render, SaveImageFileOutput},
};

fn scratch_dir(name: &str) -> PathBuf {
  let dir = std::env::temp_dir().join(format!("rubus-{}-{}", name, std::process::id()));
  let _ = std::fs::remove_dir_all(&dir);
  std::fs::create_dir_all(&dir).unwrap();
  dir
}

fn files_under(dir: &Path) -> Vec<PathBuf> {
  let mut files = Vec::new();
  let mut pending = vec![dir.to_path_buf()];
  while let Some(dir) = pending.pop() {
    for entry in std::fs::read_dir(&dir).unwrap() {
      let path = entry.unwrap().path();
      if path.is_dir() {
        pending.push(path);
      } else {
        files.push(path);
      }
    }
  }
  files.sort();
  files
}

fn berry_frame() -> ImageFrame {
  let mut image = green_canvas(100, 80);
  fill_disk(&mut image, 50, 40, 18, PURE_RED);
  ImageFrame::new(image, "berry.png")
}

fn analyze(frame: &ImageFrame) -> Analysis {
  RipenessDetectorBuilder::new()
    .build()
    .unwrap()
    .analyze(&frame.image)
    .unwrap()
}

#[test]
fn single_file_output_writes_annotation_and_masks() {
  let dir = scratch_dir("single-hit");
  let frame = berry_frame();
  let analysis = analyze(&frame);
  assert!(analysis.detection.is_some());

  let output = SaveImageFileOutput::new(dir.join("result.png"));
  output.render_result(&frame, &analysis).unwrap();

  assert!(dir.join("result.png").is_file());
  assert!(dir.join("result-red-mask.png").is_file());
  assert!(dir.join("result-fruit-mask.png").is_file());

  let annotated = image::open(dir.join("result.png")).unwrap().to_rgb8();
  assert_eq!(annotated.dimensions(), frame.image.dimensions());
  assert_ne!(annotated, frame.image);

  let mask = image::open(dir.join("result-red-mask.png")).unwrap().to_luma8();
  assert_eq!(mask, analysis.red_mask);

  std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn single_file_output_without_detection_skips_fruit_mask() {
  let dir = scratch_dir("single-miss");
  let frame = ImageFrame::new(green_canvas(40, 30), "leaf.png");
  let analysis = analyze(&frame);
  assert!(analysis.detection.is_none());

  let output = SaveImageFileOutput::new(dir.join("nested/result.png"));
  output.render_result(&frame, &analysis).unwrap();

  let saved = image::open(dir.join("nested/result.png")).unwrap().to_rgb8();
  assert_eq!(saved, frame.image);
  assert!(dir.join("nested/result-red-mask.png").is_file());
  assert!(!dir.join("nested/result-fruit-mask.png").exists());

  std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn directory_record_keeps_json_next_to_images() {
  let dir = scratch_dir("record-hit");
  let frame = berry_frame();
  let analysis = analyze(&frame);

  let output = DirectoryRecordOutput::new(&dir);
  output.render_result(&frame, &analysis).unwrap();

  let files = files_under(&dir);
  assert_eq!(files.len(), 4, "{:?}", files);

  let record = files
    .iter()
    .find(|p| p.extension().is_some_and(|e| e == "json"))
    .unwrap();
  let name = record.file_stem().unwrap().to_string_lossy();
  assert!(name.starts_with("berry-"));

  let parsed: Option<Detection> =
    serde_json::from_str(&std::fs::read_to_string(record).unwrap()).unwrap();
  assert_eq!(parsed, analysis.detection);

  std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn directory_record_skips_misses_unless_always() {
  let dir = scratch_dir("record-miss");
  let frame = ImageFrame::new(green_canvas(40, 30), "leaf.png");
  let analysis = analyze(&frame);

  DirectoryRecordOutput::new(&dir)
    .render_result(&frame, &analysis)
    .unwrap();
  assert!(files_under(&dir).is_empty());

  DirectoryRecordOutput::new(&dir)
    .with_always(true)
    .render_result(&frame, &analysis)
    .unwrap();
  let files = files_under(&dir);
  // 原图、红色掩码和记录，没有果实掩码
  assert_eq!(files.len(), 3, "{:?}", files);
  let record = files
    .iter()
    .find(|p| p.extension().is_some_and(|e| e == "json"))
    .unwrap();
  assert_eq!(std::fs::read_to_string(record).unwrap().trim(), "null");

  std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn decoded_png_matches_in_memory_analysis() {
  let dir = scratch_dir("decode");
  let frame = berry_frame();
  let path = dir.join("berry.png");
  frame.image.save(&path).unwrap();

  let mut input = ImageFileInput::open([&path]);
  let loaded = input.next().unwrap().unwrap();
  assert!(input.next().is_none());
  assert_eq!(loaded.image, frame.image);
  assert_eq!(loaded.stem(), "berry");

  assert_eq!(analyze(&loaded).detection, analyze(&frame).detection);

  std::fs::remove_dir_all(&dir).unwrap();
}
