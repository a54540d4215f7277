// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;
use std::{error, result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NoError,      // will never be produced
    DoesNotExist, // the referenced element or node doesn't exist
    UnrecognizedRecord,
    BadFieldCount,
    ExpectedNumber,
    ExpectedBoolean,
    ExpectedRole,
    BadElementName,
    OrphanChildRecord,
    UnknownWire,
    UnresolvedWireEnd,
    BadConnectionRoot,
    NotDrawing,
    SplitConnectionCount,
    SplitUnresolvedEnds,
    NoOpenDiagram,
    FileRead,
    FileWrite,
    TagFile,
    Generic,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ErrorCode::*;
        let name = match self {
            NoError => "no_error",
            DoesNotExist => "does_not_exist",
            UnrecognizedRecord => "unrecognized_record",
            BadFieldCount => "bad_field_count",
            ExpectedNumber => "expected_number",
            ExpectedBoolean => "expected_boolean",
            ExpectedRole => "expected_role",
            BadElementName => "bad_element_name",
            OrphanChildRecord => "orphan_child_record",
            UnknownWire => "unknown_wire",
            UnresolvedWireEnd => "unresolved_wire_end",
            BadConnectionRoot => "bad_connection_root",
            NotDrawing => "not_drawing",
            SplitConnectionCount => "split_connection_count",
            SplitUnresolvedEnds => "split_unresolved_ends",
            NoOpenDiagram => "no_open_diagram",
            FileRead => "file_read",
            FileWrite => "file_write",
            TagFile => "tag_file",
            Generic => "generic",
        };

        write!(f, "{name}")
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Format,
    Graph,
    History,
    Io,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    pub code: ErrorCode,
    pub details: Option<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, code: ErrorCode, details: Option<String>) -> Self {
        Error {
            kind,
            code,
            details,
        }
    }

    pub fn get_details(&self) -> Option<String> {
        self.details.clone()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self.kind {
            ErrorKind::Format => "FormatError",
            ErrorKind::Graph => "GraphError",
            ErrorKind::History => "HistoryError",
            ErrorKind::Io => "IoError",
        };
        match self.details {
            Some(ref details) => write!(f, "{}{{{}: {}}}", kind, self.code, details),
            None => write!(f, "{}{{{}}}", kind, self.code),
        }
    }
}

impl error::Error for Error {}

pub type Result<T> = result::Result<T, Error>;

#[macro_export]
macro_rules! graph_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Graph, ErrorCode::$code, Some($str)))
    }};
    ($code:tt) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Graph, ErrorCode::$code, None))
    }};
}

#[macro_export]
macro_rules! io_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Io, ErrorCode::$code, Some($str)))
    }};
}

/// A record the parser skipped or could not fully resolve.
///
/// Loading never aborts on these; they are collected so callers can tell
/// a lossy load from a clean one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseWarning {
    /// 1-based line number, or 0 when the problem was found after the pass.
    pub line: usize,
    pub code: ErrorCode,
    pub details: String,
}

impl ParseWarning {
    pub fn new(line: usize, code: ErrorCode, details: impl Into<String>) -> Self {
        ParseWarning {
            line,
            code,
            details: details.into(),
        }
    }
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.line > 0 {
            write!(f, "line {}: {}: {}", self.line, self.code, self.details)
        } else {
            write!(f, "{}: {}", self.code, self.details)
        }
    }
}

#[test]
fn test_error_display() {
    let err = Error::new(
        ErrorKind::Graph,
        ErrorCode::SplitConnectionCount,
        Some("Wire|3 has 1 connections".to_owned()),
    );
    assert_eq!(
        "GraphError{split_connection_count: Wire|3 has 1 connections}",
        format!("{err}")
    );

    let err = Error::new(ErrorKind::Io, ErrorCode::FileRead, None);
    assert_eq!("IoError{file_read}", format!("{err}"));
}

#[test]
fn test_warning_display() {
    let warning = ParseWarning::new(4, ErrorCode::BadFieldCount, "+;Pin|0;1");
    assert_eq!("line 4: bad_field_count: +;Pin|0;1", warning.to_string());

    let warning = ParseWarning::new(0, ErrorCode::UnknownWire, "Wire|9");
    assert_eq!("unknown_wire: Wire|9", warning.to_string());
}
