// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Test declaration lookup
//!
//! A Go package's import path maps to a directory below the module root:
//! with root `/src/shop` for `example.com/shop`, package
//! `example.com/shop/cart` lives in `/src/shop/cart`. Every `.go` file in
//! that directory (not its subdirectories) is scanned for a top-level `func`
//! with the test's name.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::LocateError;
use crate::scanner::{SourceFile, scan_source};

/// Where a test is declared
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Path relative to the root directory, `/`-separated
    pub file: String,
    /// 1-based line of the declaration
    pub line: usize,
}

/// Look up a test declaration once, without caching
///
/// `test_name` may name a subtest; only the part before the first `/` is
/// searched for. Returns `Ok(None)` when no declaration matches, which is
/// common for generated or table-driven test names.
///
/// # Errors
///
/// Returns `LocateError::PackageNotUnderRoot` if `package` does not start with
/// `root_pkg`, `LocateError::DirectoryUnavailable` if the package directory is
/// missing, and `LocateError::ParseFailed` if any source file in it cannot be
/// read or scanned.
pub fn find_test(
    package: &str,
    test_name: &str,
    root_path: &Path,
    root_pkg: &str,
) -> Result<Option<SourceLocation>, LocateError> {
    SourceLocator::new(root_path, root_pkg).locate(package, test_name)
}

/// Looks up test declarations below one root, caching scanned directories
///
/// The cache lives as long as the locator, so use one locator per run.
#[derive(Debug)]
pub struct SourceLocator {
    root_path: PathBuf,
    root_pkg: String,
    cache: HashMap<PathBuf, PackageDir>,
}

impl SourceLocator {
    /// Create a locator for the module rooted at `root_path` with import path `root_pkg`
    #[must_use]
    pub fn new(root_path: impl Into<PathBuf>, root_pkg: impl Into<String>) -> Self {
        Self {
            root_path: root_path.into(),
            root_pkg: root_pkg.into(),
            cache: HashMap::new(),
        }
    }

    /// Root directory
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Import path of the root directory
    #[must_use]
    pub fn root_pkg(&self) -> &str {
        &self.root_pkg
    }

    /// Directory that holds the sources of `package`
    ///
    /// # Errors
    ///
    /// Returns `LocateError::PackageNotUnderRoot` if `package` does not start
    /// with the root import path.
    pub fn package_dir(&self, package: &str) -> Result<PathBuf, LocateError> {
        let relative =
            package
                .strip_prefix(&self.root_pkg)
                .ok_or_else(|| LocateError::PackageNotUnderRoot {
                    package: package.to_string(),
                    root_pkg: self.root_pkg.clone(),
                })?;

        Ok(relative
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.root_path.clone(), |dir, segment| dir.join(segment)))
    }

    /// Find where `test_name` in `package` is declared
    ///
    /// See [`find_test`] for the lookup rules.
    ///
    /// # Errors
    ///
    /// Same as [`find_test`].
    pub fn locate(
        &mut self,
        package: &str,
        test_name: &str,
    ) -> Result<Option<SourceLocation>, LocateError> {
        let dir = self.package_dir(package)?;

        let metadata = fs::metadata(&dir).map_err(|e| LocateError::DirectoryUnavailable {
            path: dir.clone(),
            reason: e.to_string(),
        })?;
        if !metadata.is_dir() {
            return Err(LocateError::DirectoryUnavailable {
                path: dir,
                reason: "not a directory".to_string(),
            });
        }

        let name = test_name.split('/').next().unwrap_or(test_name);

        let scanned = match self.cache.entry(dir) {
            Entry::Occupied(entry) => {
                trace!(dir = %entry.key().display(), "Using cached package scan");
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                let scanned = PackageDir::scan(entry.key())?;
                entry.insert(scanned)
            }
        };

        let Some((file, line)) = scanned.find(name) else {
            debug!(package, test = name, "No declaration found");
            return Ok(None);
        };

        let relative = file
            .strip_prefix(&self.root_path)
            .map_err(|_| LocateError::DirectoryUnavailable {
                path: file.to_path_buf(),
                reason: format!("not below {}", self.root_path.display()),
            })?;

        Ok(Some(SourceLocation {
            file: annotation_path(relative),
            line,
        }))
    }
}

/// Render a root-relative path for workflow annotations
///
/// One parent step is prefixed and a single leading `.` dropped, which leaves
/// a `./`-relative path; any leading `./` is then dropped too.
fn annotation_path(relative: &Path) -> String {
    let joined = Path::new("..").join(relative);
    let rendered = joined
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    let rendered = rendered.strip_prefix('.').unwrap_or(&rendered);
    rendered.strip_prefix("./").unwrap_or(rendered).to_string()
}

/// Scanned sources of one directory, grouped by package clause
#[derive(Debug, Default)]
struct PackageDir {
    packages: BTreeMap<String, Vec<(PathBuf, SourceFile)>>,
}

impl PackageDir {
    fn scan(dir: &Path) -> Result<Self, LocateError> {
        let parse_failed = |path: &Path, message: String| LocateError::ParseFailed {
            path: path.to_path_buf(),
            message,
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| parse_failed(dir, e.to_string()))? {
            let entry = entry.map_err(|e| parse_failed(dir, e.to_string()))?;
            let is_dir = entry
                .file_type()
                .map_err(|e| parse_failed(&entry.path(), e.to_string()))?
                .is_dir();
            if !is_dir && entry.file_name().to_string_lossy().ends_with(".go") {
                paths.push(entry.path());
            }
        }
        paths.sort();

        let mut packages: BTreeMap<String, Vec<(PathBuf, SourceFile)>> = BTreeMap::new();
        for path in paths {
            let source = fs::read_to_string(&path).map_err(|e| parse_failed(&path, e.to_string()))?;
            let file = scan_source(&source).map_err(|e| parse_failed(&path, e.to_string()))?;
            packages.entry(file.package.clone()).or_default().push((path, file));
        }

        debug!(
            dir = %dir.display(),
            packages = packages.len(),
            "Scanned package directory"
        );
        Ok(Self { packages })
    }

    /// The last matching declaration in the first package that has one
    fn find(&self, name: &str) -> Option<(&Path, usize)> {
        self.packages.values().find_map(|files| {
            files
                .iter()
                .filter_map(|(path, file)| file.find(name).map(|decl| (path.as_path(), decl.line)))
                .last()
        })
    }
}
