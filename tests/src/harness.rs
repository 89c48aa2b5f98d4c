use std::path::{Path, PathBuf};

#[cfg(feature = "regenerate-refs")]
const REGENERATE_REFS: bool = true;

#[cfg(not(feature = "regenerate-refs"))]
const REGENERATE_REFS: bool = false;

fn regenerate_refs() -> bool {
    REGENERATE_REFS || std::env::var("BARRACE_TEST_REGENERATE_REFS").is_ok()
}

fn ref_file_path(ref_name: &str) -> PathBuf {
    let tests_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(tests_dir)
        .join("refs")
        .join(format!("{ref_name}.txt"))
}

fn actual_file_path(ref_name: &str) -> PathBuf {
    let tests_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(tests_dir)
        .join("actual")
        .join(format!("{ref_name}.txt"))
}

fn diff_file_path(ref_name: &str) -> PathBuf {
    let tests_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(tests_dir)
        .join("actual")
        .join(format!("{ref_name}.txt.diff"))
}

fn remove_if_exists(file: &Path) {
    if std::fs::exists(file).unwrap() {
        std::fs::remove_file(file).unwrap();
    }
}

/// Compare a text dump with the ref file of the given name.
///
/// On mismatch, the dump is written to `actual/` with a unified diff beside it.
/// With regeneration enabled, the ref file is overwritten instead.
pub fn check_dump_eq_ref(actual: &str, ref_name: &str) -> Result<(), String> {
    let ref_file = ref_file_path(ref_name);
    let actual_file = actual_file_path(ref_name);
    let diff_file = diff_file_path(ref_name);

    if regenerate_refs() {
        std::fs::create_dir_all(ref_file.parent().unwrap()).unwrap();
        std::fs::write(&ref_file, actual).unwrap();
        remove_if_exists(&actual_file);
        remove_if_exists(&diff_file);
        return Ok(());
    }

    if !std::fs::exists(&ref_file).unwrap() {
        std::fs::create_dir_all(actual_file.parent().unwrap()).unwrap();
        std::fs::write(&actual_file, actual).unwrap();
        return Err(format!(
            "No such ref: \"{}\"\n  Actual dump written to {}",
            ref_name,
            actual_file.display()
        ));
    }

    let expected = std::fs::read_to_string(&ref_file).unwrap();
    if actual != expected {
        let diff = similar::TextDiff::from_lines(expected.as_str(), actual);
        let udiff = diff
            .unified_diff()
            .header(&ref_file.display().to_string(), &actual_file.display().to_string())
            .to_string();

        std::fs::create_dir_all(actual_file.parent().unwrap()).unwrap();
        std::fs::write(&actual_file, actual).unwrap();
        std::fs::write(&diff_file, &udiff).unwrap();

        Err(format!(
            "Dump assertion failed\n  Actual dump: {:?}\n     Ref dump: {:?}\n         Diff: {:?}\n{}",
            actual_file, ref_file, diff_file, udiff
        ))
    } else {
        remove_if_exists(&actual_file);
        remove_if_exists(&diff_file);
        Ok(())
    }
}
