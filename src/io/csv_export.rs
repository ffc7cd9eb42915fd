//! Flat CSV export: one row per annotation.
//!
//! ```text
//! image_name,x,y,width,height,label_id,label_name
//! train/images/cat.jpg,10,20,90,60,1,cat
//! ```
//!
//! Rows follow image order, then each image's annotation order.
//! `image_name` is the image's `filename` (relative to the scan base when
//! bulk-loaded). Quoting is left to the `csv` crate.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{BoxlabelError, EmptyExportReason};
use crate::model::Image;

/// Column order of the exported file.
pub const CSV_HEADER: [&str; 7] = [
    "image_name",
    "x",
    "y",
    "width",
    "height",
    "label_id",
    "label_name",
];

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    image_name: &'a str,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    label_id: i64,
    label_name: &'a str,
}

/// Writes all annotations of `images` to a CSV file.
///
/// # Errors
/// [`BoxlabelError::EmptyExport`] if there are no images or no annotations;
/// the file is not created in that case. I/O and CSV errors otherwise.
pub fn write_csv(path: &Path, images: &[Image]) -> Result<(), BoxlabelError> {
    let rows = collect_rows(images)?;

    let file = File::create(path)?;
    let writer = write_rows(BufWriter::new(file), &rows).map_err(|source| {
        BoxlabelError::CsvWrite {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer
        .into_inner()
        .map_err(|e| BoxlabelError::Io(e.into_error()))?
        .flush()?;

    log::info!("Exported {} annotation(s) to {}", rows.len(), path.display());
    Ok(())
}

/// Renders the CSV export as a string.
pub fn to_csv_string(images: &[Image]) -> Result<String, BoxlabelError> {
    let rows = collect_rows(images)?;
    let writer = write_rows(Vec::new(), &rows).map_err(|source| BoxlabelError::CsvWrite {
        path: PathBuf::from("<memory>"),
        source,
    })?;
    let bytes = writer
        .into_inner()
        .map_err(|e| BoxlabelError::Io(e.into_error()))?;

    // Every field came from a `&str` or an integer.
    String::from_utf8(bytes)
        .map_err(|e| BoxlabelError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

fn collect_rows(images: &[Image]) -> Result<Vec<CsvRow<'_>>, BoxlabelError> {
    if images.is_empty() {
        return Err(BoxlabelError::EmptyExport(EmptyExportReason::NoImages));
    }

    let rows: Vec<CsvRow<'_>> = images
        .iter()
        .flat_map(|image| {
            image.annotations.iter().map(move |ann| CsvRow {
                image_name: &image.filename,
                x: ann.bounding_box.x,
                y: ann.bounding_box.y,
                width: ann.bounding_box.width,
                height: ann.bounding_box.height,
                label_id: ann.label_id.as_i64(),
                label_name: &ann.label_name,
            })
        })
        .collect();

    if rows.is_empty() {
        return Err(BoxlabelError::EmptyExport(
            EmptyExportReason::NoAnnotations,
        ));
    }
    Ok(rows)
}

fn write_rows<W: Write>(writer: W, rows: &[CsvRow<'_>]) -> Result<csv::Writer<W>, csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(csv_writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Annotation, BoundingBox};

    fn image_with(name: &str, boxes: &[(i32, i32, i32, i32, i64, &str)]) -> Image {
        let mut image = Image::new(format!("/data/{name}"), name, 640, 480);
        for &(x, y, w, h, label_id, label_name) in boxes {
            let ann = Annotation::new(
                image.id(),
                BoundingBox::new(x, y, w, h),
                label_id,
                label_name,
            );
            image.add_annotation(ann);
        }
        image
    }

    #[test]
    fn rows_follow_image_then_annotation_order() {
        let images = vec![
            image_with("b.jpg", &[(1, 2, 3, 4, 2, "dog"), (5, 6, 7, 8, 1, "cat")]),
            image_with("empty.jpg", &[]),
            image_with("a.jpg", &[(0, 0, 10, 10, 1, "cat")]),
        ];

        let csv = to_csv_string(&images).expect("export");
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], CSV_HEADER.join(","));
        assert_eq!(
            &lines[1..],
            &[
                "b.jpg,1,2,3,4,2,dog",
                "b.jpg,5,6,7,8,1,cat",
                "a.jpg,0,0,10,10,1,cat",
            ]
        );
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let images = vec![image_with("x,y.jpg", &[(1, 1, 1, 1, 3, "big, red")])];
        let csv = to_csv_string(&images).expect("export");
        assert!(csv.contains("\"x,y.jpg\",1,1,1,1,3,\"big, red\""));
    }

    #[test]
    fn empty_inputs_are_rejected_without_writing() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("out.csv");

        let err = write_csv(&path, &[]).unwrap_err();
        assert!(matches!(
            err,
            BoxlabelError::EmptyExport(EmptyExportReason::NoImages)
        ));

        let err = write_csv(&path, &[image_with("a.jpg", &[])]).unwrap_err();
        assert!(matches!(
            err,
            BoxlabelError::EmptyExport(EmptyExportReason::NoAnnotations)
        ));
        assert!(!path.exists());
    }

    #[test]
    fn writes_file() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("out.csv");
        write_csv(&path, &[image_with("a.jpg", &[(1, 2, 3, 4, 1, "cat")])]).expect("write");

        let text = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(
            text,
            "image_name,x,y,width,height,label_id,label_name\na.jpg,1,2,3,4,1,cat\n"
        );
    }
}
