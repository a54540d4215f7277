// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Whole-file persistence of documents.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::common::Result;
use crate::io_err;

/// Read a document file as UTF-8 text.
pub fn open(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(text) => {
            debug!("Read {} byte(s) from {}", text.len(), path.display());
            Ok(text)
        }
        Err(err) => io_err!(FileRead, format!("{}: {}", path.display(), err)),
    }
}

/// Write `text` to a document file, replacing its content.
pub fn save(path: &Path, text: &str) -> Result<()> {
    match fs::write(path, text) {
        Ok(()) => {
            debug!("Wrote {} byte(s) to {}", text.len(), path.display());
            Ok(())
        }
        Err(err) => io_err!(FileWrite, format!("{}: {}", path.display(), err)),
    }
}
