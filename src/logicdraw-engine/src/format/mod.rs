// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The line-oriented document format.

pub mod creator;
pub mod generator;
pub mod grammar;
pub mod parser;

pub use self::creator::{Claim, ConnectionDict, ElementCreator};
pub use self::generator::{
    INDENT, generate_diagram, generate_elements, generate_selected, generate_solution,
};
pub use self::grammar::{ElementRecord, Record, parse_record};
pub use self::parser::{ParseOutput, RecordTotals, parse, parse_into};
