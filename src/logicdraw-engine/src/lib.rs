// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

#![forbid(unsafe_code)]

pub mod common;
mod config;
pub mod datamodel;
mod document;
pub mod format;
pub mod graph;
mod history;
pub mod ids;
#[cfg(feature = "file_io")]
pub mod io;
pub mod tags;
pub mod tree;
mod workspace;

pub use self::common::{Error, ErrorCode, ErrorKind, ParseWarning, Result};
pub use self::config::{HistoryConfig, ParseOptions};
pub use self::datamodel::{Point, Properties, WireFlags, WireRole};
pub use self::document::Document;
pub use self::format::{ParseOutput, RecordTotals};
pub use self::graph::{Canvas, Element, ElementHandle};
pub use self::history::{History, HistoryListener, HistoryStatus};
pub use self::ids::{ElementId, ElementKind, IdCounter, Name, TypeName};
pub use self::tags::{Tag, TagTable};
pub use self::workspace::Workspace;
