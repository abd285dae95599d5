// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! testoutput-source: Go test declaration lookup for testoutput
//!
//! This library crate maps a failing Go test back to the file and line that
//! declares it, by scanning the top-level declarations of the test's package
//! directory.

#![warn(missing_docs)]

//! # Example
//!
//! ```no_run
//! use testoutput_source::find_test;
//!
//! let location = find_test(
//!     "example.com/shop/cart",
//!     "TestTotal/empty",
//!     "/src/shop".as_ref(),
//!     "example.com/shop",
//! )
//! .expect("package is under the root");
//!
//! if let Some(loc) = location {
//!     println!("{}:{}", loc.file, loc.line);
//! }
//! ```

pub mod error;
pub mod locator;
pub mod scanner;

pub use error::{LocateError, ScanError};
pub use locator::{SourceLocation, SourceLocator, find_test};
pub use scanner::{FuncDecl, SourceFile, scan_source};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::LocateError;
    pub use crate::locator::{SourceLocation, SourceLocator, find_test};
}
