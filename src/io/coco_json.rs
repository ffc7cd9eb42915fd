//! COCO JSON export and import.
//!
//! # Export
//!
//! Produces a single pretty-printed document with `info`, `licenses`,
//! `images`, `annotations` and `categories`:
//!
//! - images get 1-based ids in input order,
//! - annotations get 1-based ids in encounter order (image order, then each
//!   image's annotation order) and integer `bbox: [x, y, width, height]`,
//! - categories are the distinct labels actually used, sorted by id. If the
//!   same label id was used under two names, the first one seen wins.
//!
//! # Import
//!
//! The document must be an object carrying `images`, `annotations` and
//! `categories`. Everything after that is best-effort: image files are
//! located with [`resolve_image_file`], images that cannot be found are
//! dropped along with their annotations, and every such decision is
//! recorded in the returned [`ImportReport`].

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::report::{ImportCounts, ImportIssue, ImportIssueCode, ImportReport};
use super::resolve::{resolve_image_file, ResolvedVia};
use crate::error::{BoxlabelError, EmptyExportReason};
use crate::labels::LabelId;
use crate::model::{Annotation, BoundingBox, Image};

/// `info.description` of every exported document.
pub const EXPORT_DESCRIPTION: &str = "Image Annotation Tool - Annotated Dataset";

const REQUIRED_KEYS: [&str; 3] = ["images", "annotations", "categories"];

// ============================================================================
// Export schema
// ============================================================================

/// An exported COCO document, ready to serialize.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CocoDocument {
    pub info: CocoInfo,
    pub licenses: Vec<serde_json::Value>,
    pub images: Vec<CocoImage>,
    pub annotations: Vec<CocoAnnotation>,
    pub categories: Vec<CocoCategory>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CocoInfo {
    pub description: String,
    pub url: String,
    pub version: String,
    pub year: i32,
    pub contributor: String,
    pub date_created: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CocoImage {
    pub id: u64,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub date_captured: String,
    pub license: u32,
    pub coco_url: String,
    pub flickr_url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CocoAnnotation {
    pub id: u64,
    pub image_id: u64,
    pub category_id: i64,
    pub bbox: [i32; 4],
    pub area: i64,
    pub segmentation: Vec<serde_json::Value>,
    pub iscrowd: u8,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CocoCategory {
    pub id: i64,
    pub name: String,
    pub supercategory: String,
}

// ============================================================================
// Import schema (lenient: only the fields import uses)
// ============================================================================

#[derive(Debug, Deserialize)]
struct CocoInput {
    images: Vec<CocoImageIn>,
    annotations: Vec<CocoAnnotationIn>,
    categories: Vec<CocoCategoryIn>,
}

#[derive(Debug, Deserialize)]
struct CocoImageIn {
    id: i64,
    file_name: String,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
}

#[derive(Clone, Debug, Deserialize)]
struct CocoAnnotationIn {
    image_id: i64,
    category_id: i64,
    bbox: [f64; 4],
}

#[derive(Debug, Deserialize)]
struct CocoCategoryIn {
    id: i64,
    name: String,
}

// ============================================================================
// Export API
// ============================================================================

/// Builds the export document with `now` as the creation time.
///
/// # Errors
/// [`BoxlabelError::EmptyExport`] if `images` is empty or holds no
/// annotations.
pub fn build_coco_document(
    images: &[Image],
    now: NaiveDateTime,
) -> Result<CocoDocument, BoxlabelError> {
    if images.is_empty() {
        return Err(BoxlabelError::EmptyExport(EmptyExportReason::NoImages));
    }

    let mut coco_images = Vec::with_capacity(images.len());
    let mut coco_annotations = Vec::new();
    let mut categories: BTreeMap<i64, &str> = BTreeMap::new();

    for (image_id, image) in (1u64..).zip(images) {
        coco_images.push(CocoImage {
            id: image_id,
            file_name: image.filename.clone(),
            width: image.width,
            height: image.height,
            date_captured: String::new(),
            license: 0,
            coco_url: String::new(),
            flickr_url: String::new(),
        });

        for ann in &image.annotations {
            let label_id = ann.label_id.as_i64();
            categories.entry(label_id).or_insert(ann.label_name.as_str());

            let bbox = &ann.bounding_box;
            coco_annotations.push(CocoAnnotation {
                id: coco_annotations.len() as u64 + 1,
                image_id,
                category_id: label_id,
                bbox: [bbox.x, bbox.y, bbox.width, bbox.height],
                area: bbox.area(),
                segmentation: Vec::new(),
                iscrowd: 0,
            });
        }
    }

    if coco_annotations.is_empty() {
        return Err(BoxlabelError::EmptyExport(
            EmptyExportReason::NoAnnotations,
        ));
    }

    Ok(CocoDocument {
        info: CocoInfo {
            description: EXPORT_DESCRIPTION.to_string(),
            url: String::new(),
            version: "1.0".to_string(),
            year: now.year(),
            contributor: String::new(),
            date_created: now.format("%Y-%m-%d %H:%M:%S").to_string(),
        },
        licenses: Vec::new(),
        images: coco_images,
        annotations: coco_annotations,
        categories: categories
            .into_iter()
            .map(|(id, name)| CocoCategory {
                id,
                name: name.to_string(),
                supercategory: String::new(),
            })
            .collect(),
    })
}

/// Writes `images` as a COCO JSON file, stamped with the local time.
///
/// Nothing is created on disk if the export is empty.
pub fn write_coco_json(path: &Path, images: &[Image]) -> Result<(), BoxlabelError> {
    let document = build_coco_document(images, Local::now().naive_local())?;

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &document).map_err(|source| {
        BoxlabelError::CocoJsonWrite {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer.flush()?;

    log::info!(
        "Exported {} image(s), {} annotation(s), {} categor{} to {}",
        document.images.len(),
        document.annotations.len(),
        document.categories.len(),
        if document.categories.len() == 1 { "y" } else { "ies" },
        path.display()
    );
    Ok(())
}

/// Renders the COCO export as a pretty-printed string.
pub fn to_coco_string(images: &[Image]) -> Result<String, BoxlabelError> {
    let document = build_coco_document(images, Local::now().naive_local())?;
    serde_json::to_string_pretty(&document).map_err(|source| BoxlabelError::CocoJsonWrite {
        path: PathBuf::from("<memory>"),
        source,
    })
}

// ============================================================================
// Import API
// ============================================================================

/// Options for [`read_coco_json`].
#[derive(Clone, Debug, Default)]
pub struct ImportOptions {
    /// Directory image `file_name`s are resolved against. Defaults to the
    /// directory containing the JSON file.
    pub base_dir: Option<PathBuf>,
}

/// Result of a COCO import.
#[derive(Clone, Debug)]
pub struct CocoImport {
    /// Images whose files were found, with their annotations attached.
    pub images: Vec<Image>,
    /// Labels declared by `categories`.
    pub labels: BTreeMap<LabelId, String>,
    pub report: ImportReport,
}

impl CocoImport {
    pub fn annotation_count(&self) -> usize {
        self.images.iter().map(|image| image.annotations.len()).sum()
    }
}

/// Imports a COCO JSON file.
///
/// # Errors
/// I/O errors opening the file, [`BoxlabelError::CocoJsonParse`] for
/// malformed JSON or wrongly typed fields, and
/// [`BoxlabelError::CocoFormat`] when a required top-level key is missing.
/// Unresolvable images are not errors; see [`CocoImport::report`].
pub fn read_coco_json(path: &Path, options: &ImportOptions) -> Result<CocoImport, BoxlabelError> {
    let file = File::open(path)?;
    let value: serde_json::Value = serde_json::from_reader(BufReader::new(file)).map_err(
        |source| BoxlabelError::CocoJsonParse {
            path: path.to_path_buf(),
            source,
        },
    )?;

    let base_dir = match &options.base_dir {
        Some(dir) => dir.clone(),
        None => match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        },
    };
    let base_dir = std::path::absolute(&base_dir)?;

    let import = import_value(value, path, &base_dir)?;
    log::info!(
        "Imported {} of {} image(s) and {} annotation(s) from {}",
        import.report.output.images,
        import.report.input.images,
        import.report.output.annotations,
        path.display()
    );
    Ok(import)
}

/// Imports a COCO document held in memory, resolving images against
/// `base_dir`.
pub fn from_coco_str(json: &str, base_dir: &Path) -> Result<CocoImport, BoxlabelError> {
    from_coco_slice(json.as_bytes(), base_dir)
}

/// Imports a COCO document from raw bytes.
pub fn from_coco_slice(bytes: &[u8], base_dir: &Path) -> Result<CocoImport, BoxlabelError> {
    let source_path = Path::new("<input>");
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|source| BoxlabelError::CocoJsonParse {
            path: source_path.to_path_buf(),
            source,
        })?;
    import_value(value, source_path, base_dir)
}

fn import_value(
    value: serde_json::Value,
    path: &Path,
    base_dir: &Path,
) -> Result<CocoImport, BoxlabelError> {
    let object = value.as_object().ok_or_else(|| BoxlabelError::CocoFormat {
        path: path.to_path_buf(),
        message: "top-level value must be a JSON object".to_string(),
    })?;

    let missing: Vec<&str> = REQUIRED_KEYS
        .iter()
        .copied()
        .filter(|key| !object.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        return Err(BoxlabelError::CocoFormat {
            path: path.to_path_buf(),
            message: format!("missing required key(s): {}", missing.join(", ")),
        });
    }

    let input: CocoInput =
        serde_json::from_value(value).map_err(|source| BoxlabelError::CocoJsonParse {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(coco_to_images(input, base_dir))
}

fn coco_to_images(input: CocoInput, base_dir: &Path) -> CocoImport {
    let mut report = ImportReport::new();
    report.input = ImportCounts {
        images: input.images.len(),
        categories: input.categories.len(),
        annotations: input.annotations.len(),
    };

    let mut labels: BTreeMap<LabelId, String> = BTreeMap::new();
    for category in input.categories {
        let id = LabelId(category.id);
        if let Some(kept) = labels.get(&id) {
            if *kept != category.name {
                report.add(ImportIssue::info(
                    ImportIssueCode::DuplicateCategory,
                    format!(
                        "category {} declared as both '{}' and '{}'; keeping '{}'",
                        id, kept, category.name, kept
                    ),
                ));
            }
            continue;
        }
        labels.insert(id, category.name);
    }

    let mut by_image: HashMap<i64, Vec<CocoAnnotationIn>> = HashMap::new();
    for ann in input.annotations {
        by_image.entry(ann.image_id).or_default().push(ann);
    }

    let mut unknown_categories: BTreeMap<i64, usize> = BTreeMap::new();
    let mut images = Vec::with_capacity(input.images.len());
    let mut declared: HashSet<i64> = HashSet::with_capacity(input.images.len());

    for coco_image in input.images {
        // Images sharing an id each receive that id's annotations.
        if !declared.insert(coco_image.id) {
            report.add(ImportIssue::info(
                ImportIssueCode::DuplicateImageId,
                format!(
                    "image id {} declared more than once ('{}'); its annotations are attached to every copy",
                    coco_image.id, coco_image.file_name
                ),
            ));
        }
        let annotations = by_image.get(&coco_image.id).cloned().unwrap_or_default();

        let Some(resolved) = resolve_image_file(base_dir, &coco_image.file_name) else {
            log::warn!(
                "Could not find image file for id {}: {}",
                coco_image.id,
                coco_image.file_name
            );
            report.add(ImportIssue::warning(
                ImportIssueCode::ImageNotFound,
                format!(
                    "image {} '{}' not found under {}",
                    coco_image.id,
                    coco_image.file_name,
                    base_dir.display()
                ),
            ));
            if !annotations.is_empty() {
                report.add(ImportIssue::warning(
                    ImportIssueCode::AnnotationImageDropped,
                    format!(
                        "{} annotation(s) of missing image '{}' dropped",
                        annotations.len(),
                        coco_image.file_name
                    ),
                ));
            }
            continue;
        };

        match resolved.via {
            ResolvedVia::RelativePath => report.resolutions.by_relative_path += 1,
            ResolvedVia::Basename => report.resolutions.by_basename += 1,
            ResolvedVia::Search => report.resolutions.by_search += 1,
        }

        let mut image = Image::new(
            resolved.path,
            coco_image.file_name,
            coco_image.width,
            coco_image.height,
        );

        for ann in annotations {
            let label_id = LabelId(ann.category_id);
            let label_name = match labels.get(&label_id) {
                Some(name) => name.clone(),
                None => {
                    *unknown_categories.entry(ann.category_id).or_default() += 1;
                    format!("unknown_{}", ann.category_id)
                }
            };
            image.add_annotation(Annotation::new(
                image.id(),
                BoundingBox::from_coco(ann.bbox),
                label_id,
                label_name,
            ));
        }

        images.push(image);
    }

    // Annotations whose image id no image declared.
    let mut orphans: Vec<(i64, usize)> = by_image
        .into_iter()
        .filter(|(image_id, _)| !declared.contains(image_id))
        .map(|(image_id, anns)| (image_id, anns.len()))
        .collect();
    orphans.sort_unstable();
    for (image_id, count) in orphans {
        report.add(ImportIssue::warning(
            ImportIssueCode::AnnotationImageMissing,
            format!("{count} annotation(s) reference undeclared image id {image_id}"),
        ));
    }

    for (category_id, count) in unknown_categories {
        report.add(ImportIssue::info(
            ImportIssueCode::UnknownCategory,
            format!(
                "{count} annotation(s) use undeclared category {category_id}; labelled 'unknown_{category_id}'"
            ),
        ));
    }

    report.output = ImportCounts {
        images: images.len(),
        categories: labels.len(),
        annotations: images.iter().map(|image| image.annotations.len()).sum(),
    };

    CocoImport {
        images,
        labels,
        report,
    }
}
