//! Test fixtures for integration tests
//!
//! Snapshot files in the layouts the file provider accepts

use std::path::{Path, PathBuf};

/// Content frequencies as exported by the word counter
pub const CONTENT_CSV_ROUND_1: &str = "\
word,frequency
apple,10
banana,5
common_word,20
";

pub const CONTENT_CSV_ROUND_2: &str = "\
word,frequency
banana,5
common_word,50
durian,15
";

/// Title frequencies with an extra rank column and a malformed row
pub const TITLE_CSV: &str = "\
rank,word,count
1,election,12
2,\"rates, mortgage\",7
3,broken,n/a
";

/// Title frequencies as a JSON object
pub const TITLE_JSON: &str = r#"{"election": 12, "weather": 3.5}"#;

/// Write a fixture file into `dir`
pub fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write fixture");
    path
}
