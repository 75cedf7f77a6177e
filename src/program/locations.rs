use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CharPosition {
    pub line_number: i32,
    pub char_column: i32,
}

impl CharPosition {
    pub fn new(line_number: i32, char_column: i32) -> Self {
        Self {
            line_number,
            char_column,
        }
    }
}

/// Where a declaration or annotation sits in the host program.
/// Positions come from the host parser and are 1-based.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextLocation {
    pub scope: PathBuf,
    pub start_pos: CharPosition,
    pub end_pos: CharPosition,
}

impl TextLocation {
    pub fn new(scope: PathBuf, start: CharPosition, end: CharPosition) -> Self {
        Self {
            scope,
            start_pos: start,
            end_pos: end,
        }
    }

    pub fn new_just_line(line: i32) -> Self {
        Self {
            scope: PathBuf::new(),
            start_pos: CharPosition::new(line, 1),
            end_pos: CharPosition::new(line, 120), // Arbitrary number
        }
    }

    pub fn from_path(path: &Path) -> Self {
        Self {
            scope: path.to_path_buf(),
            ..Self::default()
        }
    }
}

impl Display for TextLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.scope.display(),
            self.start_pos.line_number,
            self.start_pos.char_column
        )
    }
}
