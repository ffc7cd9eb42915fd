#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use boxlabel::model::{Annotation, BoundingBox, Image};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// What an annotation means, independent of ids and timestamps.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct AnnSem {
    pub image_file: String,
    pub label_id: i64,
    pub label_name: String,
    pub bbox: (i32, i32, i32, i32),
}

/// Sorted semantics of every annotation in `images`.
pub fn ann_semantics(images: &[Image]) -> Vec<AnnSem> {
    let mut out: Vec<AnnSem> = images
        .iter()
        .flat_map(|image| {
            image.annotations.iter().map(move |ann| AnnSem {
                image_file: image.filename.clone(),
                label_id: ann.label_id.as_i64(),
                label_name: ann.label_name.clone(),
                bbox: (
                    ann.bounding_box.x,
                    ann.bounding_box.y,
                    ann.bounding_box.width,
                    ann.bounding_box.height,
                ),
            })
        })
        .collect();
    out.sort();
    out
}

pub fn assert_annotations_equivalent(a: &[Image], b: &[Image]) -> Result<(), String> {
    let left = ann_semantics(a);
    let right = ann_semantics(b);

    if left.len() != right.len() {
        return Err(format!(
            "annotation count mismatch: left={} right={}",
            left.len(),
            right.len()
        ));
    }

    match left.iter().zip(&right).find(|(l, r)| l != r) {
        Some((l, r)) => Err(format!("annotation mismatch: {:?} vs {:?}", l, r)),
        None => Ok(()),
    }
}

/// Creates an (empty) file for every image under `root` so that imports
/// can resolve them.
pub fn materialize(images: &[Image], root: &Path) {
    for image in images {
        let path = root.join(&image.filename);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, b"").expect("write placeholder image");
    }
}

pub fn arb_bbox_within(width: u32, height: u32) -> BoxedStrategy<BoundingBox> {
    prop::num::u32::ANY
        .prop_map(move |seed| {
            bbox_from_seed(
                width,
                height,
                seed,
                seed.rotate_left(3),
                seed.rotate_left(7),
                seed.rotate_left(11),
            )
        })
        .boxed()
}

/// Images with unique relative file names, each annotated with boxes that
/// fit inside it. Label ids are `1..=label_count`, names unique.
pub fn arb_images(
    max_images: usize,
    max_labels: usize,
    max_anns: usize,
) -> BoxedStrategy<Vec<Image>> {
    assert!(max_images > 0, "max_images must be > 0");
    assert!(max_labels > 0, "max_labels must be > 0");

    (1usize..=max_images, 1usize..=max_labels, 0usize..=max_anns)
        .prop_flat_map(|(image_count, label_count, ann_count)| {
            (
                proptest::collection::hash_map(
                    image_file_name_strategy(),
                    (2u32..=4096, 2u32..=4096),
                    image_count..=image_count,
                ),
                proptest::collection::hash_set(label_name_strategy(), label_count..=label_count),
                proptest::collection::vec(ann_seed_strategy(), ann_count..=ann_count),
            )
                .prop_map(|(images, labels, ann_seeds)| build_images(images, labels, ann_seeds))
        })
        .boxed()
}

type AnnSeed = (u16, u16, u32, u32, u32, u32);

fn ann_seed_strategy() -> impl Strategy<Value = AnnSeed> {
    (
        any::<u16>(),
        any::<u16>(),
        any::<u32>(),
        any::<u32>(),
        any::<u32>(),
        any::<u32>(),
    )
}

fn image_file_name_strategy() -> BoxedStrategy<String> {
    proptest::string::string_regex("(train|val)/images/[a-z0-9_]{1,12}\\.jpg")
        .expect("valid filename regex")
        .boxed()
}

fn label_name_strategy() -> BoxedStrategy<String> {
    proptest::string::string_regex("[a-z]{1,20}")
        .expect("valid label name regex")
        .boxed()
}

fn build_images(
    image_data: HashMap<String, (u32, u32)>,
    label_names: HashSet<String>,
    ann_seeds: Vec<AnnSeed>,
) -> Vec<Image> {
    let mut image_rows: Vec<(String, (u32, u32))> = image_data.into_iter().collect();
    image_rows.sort_by(|a, b| a.0.cmp(&b.0));

    let mut labels: Vec<String> = label_names.into_iter().collect();
    labels.sort();

    let mut images: Vec<Image> = image_rows
        .into_iter()
        .map(|(file_name, (width, height))| {
            Image::new(format!("/data/{file_name}"), file_name, width, height)
        })
        .collect();

    for (image_seed, label_seed, sx, sy, sw, sh) in ann_seeds {
        let image_idx = image_seed as usize % images.len();
        let label_idx = label_seed as usize % labels.len();

        let image = &mut images[image_idx];
        let bbox = bbox_from_seed(image.width, image.height, sx, sy, sw, sh);
        let ann = Annotation::new(
            image.id(),
            bbox,
            label_idx as i64 + 1,
            labels[label_idx].clone(),
        );
        image.add_annotation(ann);
    }

    images
}

/// A box with positive size that lies inside a `width` x `height` image.
fn bbox_from_seed(width: u32, height: u32, sx: u32, sy: u32, sw: u32, sh: u32) -> BoundingBox {
    let x = sx % (width - 1);
    let y = sy % (height - 1);
    let w = 1 + sw % (width - x - 1).max(1);
    let h = 1 + sh % (height - y - 1).max(1);

    BoundingBox::new(x as i32, y as i32, w as i32, h as i32)
}
