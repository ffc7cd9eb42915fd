#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// A minimal uncompressed 24-bit BMP. `imagesize` reads its dimensions
/// from the header.
pub fn bmp_bytes(width: u32, height: u32) -> Vec<u8> {
    let row_stride = (width * 3).div_ceil(4) * 4;
    let pixel_array_size = row_stride * height;
    let file_size = 54 + pixel_array_size;

    let mut bytes = Vec::with_capacity(file_size as usize);
    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&file_size.to_le_bytes());
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.extend_from_slice(&54u32.to_le_bytes());

    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(&(width as i32).to_le_bytes());
    bytes.extend_from_slice(&(height as i32).to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&24u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&pixel_array_size.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());

    bytes.resize(file_size as usize, 0);
    bytes
}

pub fn write_bmp(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, bmp_bytes(width, height)).expect("write bmp file");
}

/// Lays out a small project:
///
/// ```text
/// root/train/images/cat.bmp   64x48
/// root/train/images/dog.bmp   32x32
/// root/val/images/bird.bmp    40x30
/// root/val/images/notes.txt
/// ```
pub fn write_project_tree(root: &Path) {
    write_bmp(&root.join("train/images/cat.bmp"), 64, 48);
    write_bmp(&root.join("train/images/dog.bmp"), 32, 32);
    write_bmp(&root.join("val/images/bird.bmp"), 40, 30);
    fs::write(root.join("val/images/notes.txt"), "not an image").expect("write notes");
}

/// A COCO document for one `train/images/cat.jpg` with two annotations.
pub const CAT_COCO_JSON: &str = r#"{
  "images": [
    {"id": 7, "file_name": "train/images/cat.jpg", "width": 640, "height": 480}
  ],
  "annotations": [
    {"id": 1, "image_id": 7, "category_id": 2, "bbox": [10, 20, 30, 40]},
    {"id": 2, "image_id": 7, "category_id": 1, "bbox": [50.5, 60.9, 70.2, 80.0]}
  ],
  "categories": [
    {"id": 1, "name": "cat"},
    {"id": 2, "name": "whisker"}
  ]
}"#;

pub fn write_coco(path: &Path, json: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, json).expect("write coco json");
}

pub fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, b"x").expect("write file");
}
