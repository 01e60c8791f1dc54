//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for pivot-export integration tests.

#![allow(dead_code)]

use engine::CellValue;
use persistence::{load_xlsx_from_bytes, Sheet};
use pivot_export::{DirectorySink, Record};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Owns a scratch directory that exports and input files are written into.
pub struct ExportHarness {
    pub dir: TempDir,
}

impl ExportHarness {
    pub fn new() -> Self {
        ExportHarness {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn out_dir(&self) -> PathBuf {
        self.dir.path().join("downloads")
    }

    pub fn sink(&self) -> DirectorySink {
        DirectorySink::new(self.out_dir())
    }

    /// Writes `content` to a file in the scratch directory.
    pub fn write_input(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).expect("write input file");
        path
    }

    pub fn read_output(&self, name: &str) -> Vec<u8> {
        std::fs::read(self.out_dir().join(name)).expect("read exported file")
    }

    /// Sorted names of the files in the output directory.
    pub fn output_names(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.out_dir()) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// Converts a list of JSON objects into records.
pub fn records(values: Vec<Value>) -> Vec<Record> {
    values
        .into_iter()
        .map(|v| match v {
            Value::Object(map) => map,
            other => panic!("not an object: {}", other),
        })
        .collect()
}

/// Loads the single summary sheet back from XLSX bytes.
pub fn read_summary(bytes: &[u8]) -> Sheet {
    let mut workbook = load_xlsx_from_bytes(bytes).expect("valid xlsx");
    assert_eq!(workbook.sheets.len(), 1, "summary workbook has one sheet");
    workbook.sheets.remove(0)
}

pub fn text(s: &str) -> CellValue {
    CellValue::Text(s.to_string())
}

pub fn num(n: u64) -> CellValue {
    CellValue::Number(n as f64)
}

/// Phone number subscriptions as a dashboard list endpoint returns them.
pub struct SubscriptionFixture;

impl SubscriptionFixture {
    pub fn data() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("0961000001", "Viettel", "active"),
            ("0912000002", "Vinaphone", "active"),
            ("0961000003", "Viettel", "locked"),
            ("0901000004", "Mobifone", "active"),
            ("0912000005", "Vinaphone", "pending"),
            ("0961000006", "Viettel", "active"),
            ("0901000007", "Mobifone", "locked"),
        ]
    }

    pub fn records() -> Vec<Record> {
        records(
            Self::data()
                .into_iter()
                .map(|(number, provider, status)| {
                    json!({ "phoneNumber": number, "provider": provider, "status": status })
                })
                .collect(),
        )
    }

    /// The same records wrapped the way the REST API pages them.
    pub fn envelope_json() -> String {
        let items: Vec<Value> = Self::records().into_iter().map(Value::Object).collect();
        json!({ "code": 0, "data": { "content": items, "totalElements": 7 } }).to_string()
    }
}
