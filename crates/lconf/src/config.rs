use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use lconf_parse::{MacroTable, ParseError, parse_file, parse_str};
use lconf_value::Section;

use crate::error::Error;

/// Reserved name of the root section.
pub const ROOT_NAME: &str = "ROOT";

/// A parsed configuration document.
///
/// Owns the root [`Section`] produced by one parse, macro resolution and
/// file includes already applied. `Config` dereferences to its root
/// section, so the whole typed access surface (`get`, `section`,
/// `vector`, `assert_type`, ...) is available directly on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    root: Section,
}

impl Config {
    /// Parse the file at `path`.
    ///
    /// The path is canonicalized first and its containing directory is
    /// registered as the builtin `DOT` substitution variable, so
    /// `@INCLUDE = "$DOT/other.cfg"` resolves relative to this file.
    /// Included files are parsed before this returns; the call blocks
    /// for the whole recursive parse.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let abspath = std::fs::canonicalize(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dir = abspath
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));

        let mut regs = MacroTable::default();
        *regs.define("DOT").map_err(ParseError::from)? = dir.display().to_string();

        let mut root = Section::new(ROOT_NAME);
        parse_file(&mut root, &abspath, &mut regs)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Section {
        &self.root
    }

    pub fn into_root(self) -> Section {
        self.root
    }
}

/// Parse in-memory text. No file is involved, so `DOT` is not bound.
impl FromStr for Config {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut regs = MacroTable::default();
        let mut root = Section::new(ROOT_NAME);
        parse_str(&mut root, text, &mut regs)?;
        Ok(Self { root })
    }
}

impl Deref for Config {
    type Target = Section;

    fn deref(&self) -> &Self::Target {
        &self.root
    }
}

impl core::fmt::Display for Config {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.root)
    }
}
