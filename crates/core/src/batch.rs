use crate::apply::{apply_plan_with_options, ApplyOptions, ApplyResult};
use crate::planner::generate_plan;
use crate::rule::{NameSlice, RenameRule};
use anyhow::Result;
use std::path::Path;

/// Renames every entry of `directory` whose name ends with `original_extension`
/// to `name[start..end] + new_name + counter + "." + new_extension`.
///
/// The range is validated before the directory is read. Counters are assigned
/// in sorted name order, starting at 1 and padded with zeros to `digits`.
/// A failing rename aborts the batch and rolls back the renames already done.
pub fn bulk_rename(
    directory: impl AsRef<Path>,
    new_name: &str,
    digits: usize,
    original_extension: &str,
    new_extension: &str,
    name_slice: (i64, i64),
) -> Result<ApplyResult> {
    let (start, end) = name_slice;
    let slice = NameSlice::new(start, end)?;
    let rule = RenameRule::new(
        directory.as_ref(),
        new_name,
        digits,
        original_extension,
        new_extension,
        slice,
    );
    bulk_rename_with_rule(&rule, &ApplyOptions::default())
}

pub fn bulk_rename_with_rule(rule: &RenameRule, options: &ApplyOptions) -> Result<ApplyResult> {
    let plan = generate_plan(rule)?;
    apply_plan_with_options(&plan, options)
}

#[cfg(test)]
mod tests {
    use super::bulk_rename;
    use crate::rule::RuleError;
    use std::collections::BTreeSet;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn listing(dir: &Path) -> BTreeSet<String> {
        fs::read_dir(dir)
            .expect("read dir")
            .flatten()
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn renames_single_image_end_to_end() {
        let temp = tempdir().expect("tempdir");
        fs::write(temp.path().join("IMG_001.png"), b"png").expect("write image");

        let result =
            bulk_rename(temp.path(), "vac", 2, ".png", "jpg", (0, 3)).expect("bulk rename");

        assert_eq!(result.applied, 1);
        assert_eq!(
            listing(temp.path()),
            BTreeSet::from(["IMGvac01.jpg".to_string()])
        );
    }

    #[test]
    fn empty_directory_is_a_no_op() {
        let temp = tempdir().expect("tempdir");
        for range in [(0, 0), (0, 5), (3, 3), (2, 100)] {
            let result = bulk_rename(temp.path(), "x", 3, ".txt", "txt", range)
                .expect("empty directory must succeed");
            assert_eq!(result.applied, 0);
            assert!(result.operations.is_empty());
        }
        assert!(listing(temp.path()).is_empty());
    }

    #[test]
    fn invalid_range_leaves_directory_untouched() {
        let temp = tempdir().expect("tempdir");
        fs::write(temp.path().join("a.txt"), b"A").expect("write A");
        fs::write(temp.path().join("b.txt"), b"B").expect("write B");
        let before = listing(temp.path());

        for range in [(5, 2), (-1, 3), (0, -1)] {
            let err = bulk_rename(temp.path(), "x", 3, ".txt", "dat", range)
                .expect_err("invalid range must fail");
            assert!(matches!(
                err.downcast_ref::<RuleError>(),
                Some(RuleError::InvalidRange { .. })
            ));
        }
        assert_eq!(listing(temp.path()), before);
    }

    #[test]
    fn invalid_range_is_reported_before_directory_is_read() {
        let temp = tempdir().expect("tempdir");
        let err = bulk_rename(temp.path().join("missing"), "x", 1, ".txt", "dat", (3, 1))
            .expect_err("must fail");
        assert!(err.downcast_ref::<RuleError>().is_some());
    }

    #[test]
    fn non_matching_files_are_left_alone() {
        let temp = tempdir().expect("tempdir");
        for name in ["a.txt", "b.csv", "c.txt"] {
            fs::write(temp.path().join(name), name).expect("write file");
        }

        bulk_rename(temp.path(), "doc", 3, ".txt", "md", (0, 1)).expect("bulk rename");

        assert_eq!(
            listing(temp.path()),
            BTreeSet::from([
                "adoc001.md".to_string(),
                "b.csv".to_string(),
                "cdoc002.md".to_string(),
            ])
        );
        assert_eq!(
            fs::read_to_string(temp.path().join("cdoc002.md")).expect("read renamed"),
            "c.txt"
        );
    }

    #[test]
    fn eleventh_candidate_gets_padded_counter() {
        let temp = tempdir().expect("tempdir");
        for i in 0..11 {
            fs::write(temp.path().join(format!("f{i:02}.log")), b"x").expect("write file");
        }

        bulk_rename(temp.path(), "run", 3, ".log", "log", (0, 0)).expect("bulk rename");

        let names = listing(temp.path());
        assert!(names.contains("run001.log"));
        assert!(names.contains("run011.log"));
        assert_eq!(names.len(), 11);
    }

    #[test]
    fn missing_directory_surfaces_filesystem_error() {
        let temp = tempdir().expect("tempdir");
        let err = bulk_rename(temp.path().join("missing"), "x", 1, ".txt", "dat", (0, 1))
            .expect_err("missing directory must fail");
        assert!(err.downcast_ref::<std::io::Error>().is_some());
    }
}
