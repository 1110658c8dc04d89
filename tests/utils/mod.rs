//! Shared fixtures for the integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use trade_reshape::{PipelineConfig, TradeRecord, read_rows};

pub const TRADE_HEADER: &str =
    "location_id,partner_id,product_id,year,export_value,import_value";

/// Write a trade file with the legacy leading index column
pub fn write_trade_file(path: &Path, rows: &[(i64, i64, i64, i64, f64, f64)]) {
    let mut text = format!(",{TRADE_HEADER}\n");
    for (i, (loc, partner, product, year, export, import)) in rows.iter().enumerate() {
        text.push_str(&format!("{i},{loc},{partner},{product},{year},{export},{import}\n"));
    }
    fs::write(path, text).expect("write trade fixture");
}

/// Create `<root>/<entity>/` and return its path
pub fn entity_dir(root: &Path, entity: &str) -> PathBuf {
    let dir = root.join(entity);
    fs::create_dir_all(&dir).expect("create entity dir");
    dir
}

/// Read back a trade file written by the pipeline
pub fn read_trade_file(path: &Path) -> Vec<TradeRecord> {
    read_rows(path).expect("read trade file")
}

/// Names of the files directly inside `dir`, sorted
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("list dir")
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Configuration rooted at a temporary data directory
pub fn test_config(data_root: &Path) -> PipelineConfig {
    PipelineConfig {
        data_root: data_root.to_path_buf(),
        ..Default::default()
    }
}

/// Category table from the taxonomy scenario plus an unrelated branch
pub fn write_product_table(path: &Path) {
    fs::write(
        path,
        "product_id,hs_product_code,hs_product_name_short_en,level,parent_id\n\
         1,0,Root,section,\n\
         2,1,Stones,section,0\n\
         10,01,Gems,2digit,2\n\
         20,0101,Diamonds,4digit,10\n\
         5,5,Textiles,section,0\n\
         50,50,Silk,2digit,5\n\
         500,5001,Raw silk,4digit,50\n",
    )
    .expect("write product fixture");
}
