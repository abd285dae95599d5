// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! testoutput library
//!
//! This module exports the reporting pipeline and its collaborators for use
//! in integration tests and as a library.

pub mod commander;
pub mod config;
pub mod reporter;
