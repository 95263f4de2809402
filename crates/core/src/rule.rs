use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("名前の切り出し範囲が不正です: [{start}, {end}] (0 <= start <= end が必要です)")]
    InvalidRange { start: i64, end: i64 },
}

/// Half-open `[start, end)` range over the characters of the original name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "(i64, i64)", into = "(i64, i64)")]
pub struct NameSlice {
    start: usize,
    end: usize,
}

impl NameSlice {
    pub fn new(start: i64, end: i64) -> Result<Self, RuleError> {
        if start < 0 || end < 0 || start > end {
            return Err(RuleError::InvalidRange { start, end });
        }
        let to_index =
            |v: i64| usize::try_from(v).map_err(|_| RuleError::InvalidRange { start, end });
        Ok(Self {
            start: to_index(start)?,
            end: to_index(end)?,
        })
    }

    pub fn empty() -> Self {
        Self { start: 0, end: 0 }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl TryFrom<(i64, i64)> for NameSlice {
    type Error = RuleError;

    fn try_from((start, end): (i64, i64)) -> Result<Self, Self::Error> {
        Self::new(start, end)
    }
}

impl From<NameSlice> for (i64, i64) {
    fn from(slice: NameSlice) -> Self {
        (slice.start as i64, slice.end as i64)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameRule {
    pub directory: PathBuf,
    pub new_name: String,
    pub digits: usize,
    pub original_extension: String,
    pub new_extension: String,
    pub name_slice: NameSlice,
    pub include_directories: bool,
}

impl RenameRule {
    pub fn new(
        directory: impl Into<PathBuf>,
        new_name: impl Into<String>,
        digits: usize,
        original_extension: impl Into<String>,
        new_extension: impl Into<String>,
        name_slice: NameSlice,
    ) -> Self {
        Self {
            directory: directory.into(),
            new_name: new_name.into(),
            digits,
            original_extension: original_extension.into(),
            new_extension: new_extension.into(),
            name_slice,
            include_directories: false,
        }
    }

    pub fn with_directories(mut self, include: bool) -> Self {
        self.include_directories = include;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{NameSlice, RuleError};

    #[test]
    fn name_slice_accepts_ordered_range() {
        let slice = NameSlice::new(3, 6).expect("must be valid");
        assert_eq!(slice.start(), 3);
        assert_eq!(slice.end(), 6);
        assert_eq!(slice.len(), 3);
    }

    #[test]
    fn name_slice_accepts_empty_range() {
        let slice = NameSlice::new(4, 4).expect("start == end is allowed");
        assert!(slice.is_empty());
        assert_eq!(NameSlice::empty(), NameSlice::new(0, 0).expect("zero range"));
    }

    #[test]
    fn name_slice_rejects_reversed_range() {
        let err = NameSlice::new(5, 2).expect_err("start > end must fail");
        assert_eq!(err, RuleError::InvalidRange { start: 5, end: 2 });
    }

    #[test]
    fn name_slice_rejects_negative_bounds() {
        assert!(matches!(
            NameSlice::new(-1, 3),
            Err(RuleError::InvalidRange { .. })
        ));
        assert!(matches!(
            NameSlice::new(0, -3),
            Err(RuleError::InvalidRange { .. })
        ));
        assert!(matches!(
            NameSlice::new(-4, -1),
            Err(RuleError::InvalidRange { .. })
        ));
    }

    #[test]
    fn name_slice_converts_from_tuple() {
        let slice = NameSlice::try_from((0, 3)).expect("tuple range");
        assert_eq!(<(i64, i64)>::from(slice), (0, 3));
        assert!(NameSlice::try_from((2, 1)).is_err());
    }
}
