mod common;

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

use common::{touch, write_coco, write_project_tree, CAT_COCO_JSON};

fn boxlabel() -> Command {
    let mut cmd = Command::cargo_bin("boxlabel").unwrap();
    cmd.env_remove("BOXLABEL_BASE_DIR");
    cmd
}

#[test]
fn runs() {
    boxlabel().assert().success();
}

#[test]
fn outputs_tool_name() {
    let mut cmd = boxlabel();
    cmd.arg("-V");
    cmd.assert().success().stdout("boxlabel 0.1.0\n");
}

// Import subcommand tests

#[test]
fn import_reports_counts_and_resolution() {
    let temp = tempfile::tempdir().unwrap();
    touch(&temp.path().join("train/images/cat.jpg"));
    let json_path = temp.path().join("annotations.json");
    write_coco(&json_path, CAT_COCO_JSON);

    let mut cmd = boxlabel();
    cmd.arg("import").arg(&json_path);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "1 images, 2 categories, 2 annotations",
        ))
        .stdout(predicate::str::contains(
            "located: 1 by path, 0 by file name, 0 by search",
        ))
        .stdout(predicate::str::contains("Annotations:"));
}

#[test]
fn import_json_output() {
    let temp = tempfile::tempdir().unwrap();
    touch(&temp.path().join("cat.jpg"));
    let json_path = temp.path().join("annotations.json");
    write_coco(&json_path, CAT_COCO_JSON);

    let mut cmd = boxlabel();
    cmd.arg("import")
        .arg(&json_path)
        .args(["--output", "json"]);
    let output = cmd.assert().success().get_output().stdout.clone();

    let summary: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(summary["report"]["resolutions"]["by_basename"], 1);
    assert_eq!(summary["stats"]["total_annotations"], 2);
    assert_eq!(summary["stats"]["label_distribution"]["whisker"], 1);
    assert!(summary["label_conflicts"].as_array().unwrap().is_empty());
}

#[test]
fn import_missing_images_are_reported_not_fatal() {
    let temp = tempfile::tempdir().unwrap();
    let json_path = temp.path().join("annotations.json");
    write_coco(&json_path, CAT_COCO_JSON);

    let mut cmd = boxlabel();
    cmd.arg("import").arg(&json_path);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Warnings (2):"))
        .stdout(predicate::str::contains("not found under"));
}

#[test]
fn import_base_dir_from_env() {
    let json_dir = tempfile::tempdir().unwrap();
    let image_dir = tempfile::tempdir().unwrap();
    touch(&image_dir.path().join("train/images/cat.jpg"));
    let json_path = json_dir.path().join("annotations.json");
    write_coco(&json_path, CAT_COCO_JSON);

    let mut cmd = boxlabel();
    cmd.env("BOXLABEL_BASE_DIR", image_dir.path())
        .arg("import")
        .arg(&json_path);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("located: 1 by path"));
}

#[test]
fn import_writes_csv_and_coco() {
    let temp = tempfile::tempdir().unwrap();
    touch(&temp.path().join("train/images/cat.jpg"));
    let json_path = temp.path().join("annotations.json");
    write_coco(&json_path, CAT_COCO_JSON);
    let csv_path = temp.path().join("out.csv");
    let coco_path = temp.path().join("out.json");

    let mut cmd = boxlabel();
    cmd.arg("import")
        .arg(&json_path)
        .arg("--csv")
        .arg(&csv_path)
        .arg("--coco")
        .arg(&coco_path);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    let csv = fs::read_to_string(&csv_path).unwrap();
    assert_eq!(
        csv,
        "image_name,x,y,width,height,label_id,label_name\n\
         train/images/cat.jpg,10,20,30,40,2,whisker\n\
         train/images/cat.jpg,50,60,70,80,1,cat\n"
    );

    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&coco_path).unwrap()).unwrap();
    assert_eq!(doc["images"][0]["file_name"], "train/images/cat.jpg");
    assert_eq!(doc["categories"][0]["name"], "cat");
    assert_eq!(doc["categories"][1]["name"], "whisker");
    assert_eq!(doc["annotations"][1]["area"], 5600);
}

#[test]
fn import_nonexistent_file_fails() {
    let mut cmd = boxlabel();
    cmd.args(["import", "nonexistent_file.json"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn import_malformed_document_fails() {
    let temp = tempfile::tempdir().unwrap();
    let json_path = temp.path().join("broken.json");
    write_coco(&json_path, r#"{"images": []}"#);

    let mut cmd = boxlabel();
    cmd.arg("import").arg(&json_path);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("missing required key(s)"));
}

#[test]
fn import_rejects_unknown_output_format() {
    let temp = tempfile::tempdir().unwrap();
    let json_path = temp.path().join("annotations.json");
    write_coco(&json_path, CAT_COCO_JSON);

    let mut cmd = boxlabel();
    cmd.arg("import")
        .arg(&json_path)
        .args(["--output", "yaml"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported format"));
}

// Scan subcommand tests

#[test]
fn scan_summarizes_loaded_images() {
    let temp = tempfile::tempdir().unwrap();
    write_project_tree(temp.path());

    let mut cmd = boxlabel();
    cmd.arg("scan")
        .arg(temp.path())
        .args(["train/images", "val/images"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Loaded 3 image(s)"))
        .stdout(predicate::str::contains("Annotations:"))
        .stdout(predicate::str::contains("notes.txt").not());
}

#[test]
fn scan_reads_label_file() {
    let temp = tempfile::tempdir().unwrap();
    write_project_tree(temp.path());
    let labels_path = temp.path().join("labels.csv");
    fs::write(&labels_path, "label_id,label_name\n1,cat\n2, dog\n").unwrap();

    let mut cmd = boxlabel();
    cmd.arg("scan")
        .arg(temp.path())
        .arg("train/images")
        .arg("--labels")
        .arg(&labels_path)
        .args(["--output", "json"]);
    let output = cmd.assert().success().get_output().stdout.clone();

    let summary: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(summary["loaded"], 2);
    assert_eq!(summary["labels"][1][1], "dog");
    assert_eq!(summary["stats"]["total_images"], 2);
}

#[test]
fn scan_skips_corrupt_images() {
    let temp = tempfile::tempdir().unwrap();
    write_project_tree(temp.path());
    fs::write(temp.path().join("val/images/broken.png"), b"not a png").unwrap();

    let mut cmd = boxlabel();
    cmd.arg("scan").arg(temp.path()).arg("val/images");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Loaded 1 image(s)"))
        .stdout(predicate::str::contains("Skipped (1):"))
        .stdout(predicate::str::contains("broken.png"));
}

#[test]
fn scan_export_without_annotations_fails() {
    let temp = tempfile::tempdir().unwrap();
    write_project_tree(temp.path());
    let coco_path = temp.path().join("out.json");

    let mut cmd = boxlabel();
    cmd.arg("scan")
        .arg(temp.path())
        .arg("train/images")
        .arg("--coco")
        .arg(&coco_path);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to export"));
    assert!(!coco_path.exists());
}

#[test]
fn scan_requires_a_subdirectory() {
    let temp = tempfile::tempdir().unwrap();

    let mut cmd = boxlabel();
    cmd.arg("scan").arg(temp.path());
    cmd.assert().failure();
}
