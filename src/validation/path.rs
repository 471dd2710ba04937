//! Slash-separated location of a value inside an aggregate tree.

use super::ValidationError;
use smallvec::SmallVec;
use std::fmt;

/// Path from the validated root to the value being checked,
/// e.g. `CT_Worksheet/sheetData/row[2]/c[0]/r`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationPath {
    segments: SmallVec<[String; 8]>,
}

impl ValidationPath {
    pub fn new(root: impl Into<String>) -> Self {
        let mut segments = SmallVec::new();
        segments.push(root.into());
        Self { segments }
    }

    pub fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    pub fn pop(&mut self) -> Option<String> {
        self.segments.pop()
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Run `f` with `segment` appended, removing it again afterwards
    pub fn scoped<R>(&mut self, segment: impl Into<String>, f: impl FnOnce(&mut Self) -> R) -> R {
        self.push(segment);
        let result = f(self);
        self.pop();
        result
    }

    /// Failure at this path
    pub fn error(&self, message: impl Into<String>) -> ValidationError {
        ValidationError {
            path: self.to_string(),
            message: message.into(),
        }
    }

    /// Failure at `leaf` below this path
    pub fn error_at(&self, leaf: &str, message: impl Into<String>) -> ValidationError {
        ValidationError {
            path: format!("{}/{}", self, leaf),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                f.write_str("/")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}
