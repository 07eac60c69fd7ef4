#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::str_to_string,
    clippy::missing_docs_in_private_items,
    missing_docs
)]

use std::fs;

use inlinescan::entry_point::run_with_args_to;

const LISTING: &str = r#"{
    "name": "dup_chain",
    "entry": 4096,
    "blocks": [
        { "id": 0, "start": 4096,
          "insns": [ { "itype": 90, "size": 2 } ], "succs": [1, 5] },
        { "id": 1, "start": 4098,
          "insns": [ { "itype": 10, "ops": [[0, 1]], "size": 2 } ], "succs": [2] },
        { "id": 2, "start": 4100,
          "insns": [ { "itype": 11, "ops": [[0, 1]], "size": 2 } ], "succs": [3] },
        { "id": 3, "start": 4102,
          "insns": [ { "itype": 12, "ops": [[0, 1]], "size": 2 } ], "succs": [4] },
        { "id": 4, "start": 4104,
          "insns": [ { "itype": 13, "ops": [[0, 1]], "size": 2 } ], "succs": [] },
        { "id": 5, "start": 4106,
          "insns": [ { "itype": 10, "ops": [[0, 1]], "size": 2 } ], "succs": [6] },
        { "id": 6, "start": 4108,
          "insns": [ { "itype": 11, "ops": [[0, 1]], "size": 2 } ], "succs": [7] },
        { "id": 7, "start": 4110,
          "insns": [ { "itype": 12, "ops": [[0, 1]], "size": 2 } ], "succs": [8] },
        { "id": 8, "start": 4112,
          "insns": [ { "itype": 13, "ops": [[0, 1]], "size": 2 } ], "succs": [] }
    ]
}"#;

#[test]
fn json_scan_reports_the_duplicated_chain() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("dup.json"), LISTING).expect("write listing");

    let mut out = Vec::new();
    let code = run_with_args_to(
        vec![dir.path().display().to_string(), "--json".to_owned()],
        &mut out,
    )
    .expect("run succeeds");
    assert_eq!(code, 0);

    let findings: serde_json::Value = serde_json::from_slice(&out).expect("valid JSON output");
    let findings = findings.as_array().expect("array of findings");
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0]["function"], "dup_chain");
    assert_eq!(findings[0]["occurrences"], 2);
    assert_eq!(findings[0]["blocks"], 4);
}

#[test]
fn report_file_carries_the_nodeset_lines() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("dup.json"), LISTING).expect("write listing");
    let report_path = dir.path().join("classes.report");

    let mut out = Vec::new();
    let code = run_with_args_to(
        vec![
            dir.path().display().to_string(),
            "--quiet".to_owned(),
            "--report".to_owned(),
            report_path.display().to_string(),
        ],
        &mut out,
    )
    .expect("run succeeds");
    assert_eq!(code, 0);

    let report = fs::read_to_string(&report_path).expect("report written");
    assert!(report.starts_with("ID:"));
    assert!(report.contains(";NODESET:("));
    assert!(report.trim_end().ends_with(");"));
}

#[test]
fn min_size_flag_filters_small_classes_out() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("dup.json"), LISTING).expect("write listing");

    let mut out = Vec::new();
    run_with_args_to(
        vec![
            dir.path().display().to_string(),
            "--json".to_owned(),
            "--min-size".to_owned(),
            "5".to_owned(),
        ],
        &mut out,
    )
    .expect("run succeeds");

    let findings: serde_json::Value = serde_json::from_slice(&out).expect("valid JSON output");
    assert_eq!(findings.as_array().map(Vec::len), Some(0));
}

#[test]
fn similar_subcommand_prints_aligned_sets() {
    let dir = tempfile::tempdir().expect("tempdir");
    let listing_path = dir.path().join("dup.json");
    fs::write(&listing_path, LISTING).expect("write listing");

    let mut out = Vec::new();
    let code = run_with_args_to(
        vec![
            "similar".to_owned(),
            listing_path.display().to_string(),
            "--nodes".to_owned(),
            "1,2,3".to_owned(),
            "--json".to_owned(),
        ],
        &mut out,
    )
    .expect("run succeeds");
    assert_eq!(code, 0);

    let sets: Vec<Vec<u32>> = serde_json::from_slice(&out).expect("valid JSON output");
    assert_eq!(sets, vec![vec![1, 2, 3], vec![5, 6, 7]]);
}

#[test]
fn help_exits_cleanly() {
    let mut out = Vec::new();
    let code = run_with_args_to(vec!["--help".to_owned()], &mut out).expect("help succeeds");
    assert_eq!(code, 0);
    assert!(!out.is_empty());
}
