#![cfg(test)]

use std::path::{Path, PathBuf};

use barrace::{Limit, Race};

mod harness;
mod tests;

fn data_file_path(file: &str) -> PathBuf {
    let tests_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(tests_dir).join("data").join(file)
}

fn data_file_str(file: &str) -> String {
    std::fs::read_to_string(data_file_path(file)).expect("File should exist")
}

/// One line of counts, then every frame of the race separated by blank lines
fn race_dump(race: &Race, limit: impl Into<Limit>) -> String {
    let mut dump = format!(
        "{} periods, {} skipped rows\n",
        race.len(),
        race.skipped_rows()
    );
    for frame in race.frames(limit) {
        dump.push('\n');
        dump.push_str(&frame.to_string());
    }
    dump
}

macro_rules! assert_dump_eq_ref {
    ($dump:expr, $ref_name:expr) => {
        if let Err(msg) = $crate::harness::check_dump_eq_ref(&$dump, $ref_name) {
            panic!("{}", msg);
        }
    };
}

macro_rules! assert_race_eq_ref {
    ($race:expr, $limit:expr, $ref_name:expr) => {
        let dump = $crate::race_dump($race, $limit);
        $crate::assert_dump_eq_ref!(dump, $ref_name);
    };
}

pub(crate) use {assert_dump_eq_ref, assert_race_eq_ref};
