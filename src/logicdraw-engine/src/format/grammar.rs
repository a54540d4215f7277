// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Record grammar of the document format.
//!
//! A record is one line: a marker field, a `<TypeName>|<id>` name field and
//! a fixed number of positional fields.  The record kind is picked by the
//! pair (type-name prefix, exact field count) from [`RECORD_TABLE`], so every
//! accepted shape of every record is listed in one place.

use std::fmt;

use crate::common::ErrorCode;
use crate::datamodel::{Point, Properties, WireFlags, WireRole};
use crate::ids::{ElementId, ElementKind, Name, TypeName};

pub const FIELD_SEPARATOR: char = ';';
pub const ROOT_MARKER: &str = "+";
pub const CHILD_MARKER: &str = "-";

const TRUE: &str = "True";
const FALSE: &str = "False";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    Root,
    Child,
}

impl Marker {
    fn from_field(field: &str) -> Option<Marker> {
        match field {
            ROOT_MARKER => Some(Marker::Root),
            CHILD_MARKER => Some(Marker::Child),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Marker::Root => ROOT_MARKER,
            Marker::Child => CHILD_MARKER,
        }
    }
}

/// A root record introducing a canvas element.
#[derive(Clone, Debug, PartialEq)]
pub enum ElementRecord {
    Pin {
        id: u32,
        position: Point,
    },
    Input {
        id: u32,
        position: Point,
        tag: Option<i32>,
    },
    Output {
        id: u32,
        position: Point,
        tag: Option<i32>,
    },
    AndGate {
        id: u32,
        position: Point,
    },
    OrGate {
        id: u32,
        position: Point,
    },
    Wire {
        id: u32,
        start: Point,
        end: Point,
        flags: WireFlags,
    },
}

impl ElementRecord {
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementRecord::Pin { .. } => ElementKind::Pin,
            ElementRecord::Input { .. } => ElementKind::Input,
            ElementRecord::Output { .. } => ElementKind::Output,
            ElementRecord::AndGate { .. } => ElementKind::AndGate,
            ElementRecord::OrGate { .. } => ElementKind::OrGate,
            ElementRecord::Wire { .. } => ElementKind::Wire,
        }
    }

    pub fn id(&self) -> ElementId {
        let number = match self {
            ElementRecord::Pin { id, .. }
            | ElementRecord::Input { id, .. }
            | ElementRecord::Output { id, .. }
            | ElementRecord::AndGate { id, .. }
            | ElementRecord::OrGate { id, .. }
            | ElementRecord::Wire { id, .. } => *id,
        };
        ElementId::new(self.kind(), number)
    }

    /// The element position; for wires, the start point.
    pub fn position(&self) -> Point {
        match self {
            ElementRecord::Pin { position, .. }
            | ElementRecord::Input { position, .. }
            | ElementRecord::Output { position, .. }
            | ElementRecord::AndGate { position, .. }
            | ElementRecord::OrGate { position, .. } => *position,
            ElementRecord::Wire { start, .. } => *start,
        }
    }
}

/// One parsed line of a document.
#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    Solution {
        number: u32,
        tag_file: Option<String>,
        table_file: Option<String>,
    },
    Project {
        number: u32,
    },
    Diagram {
        number: u32,
        properties: Properties,
    },
    Element(ElementRecord),
    /// `-;Wire|<id>;Start|End`: the preceding root element owns that end of
    /// the named wire.
    WireRole {
        wire: Name,
        role: WireRole,
    },
}

type FieldParser = fn(Name, &[&str]) -> Result<Record, ErrorCode>;

/// One accepted record shape.
pub struct RecordShape {
    pub marker: Marker,
    pub type_name: TypeName,
    pub field_counts: &'static [usize],
    parse: FieldParser,
}

pub static RECORD_TABLE: [RecordShape; 10] = [
    RecordShape {
        marker: Marker::Root,
        type_name: TypeName::Solution,
        field_counts: &[2, 3, 4],
        parse: parse_solution,
    },
    RecordShape {
        marker: Marker::Root,
        type_name: TypeName::Project,
        field_counts: &[2],
        parse: parse_project,
    },
    RecordShape {
        marker: Marker::Root,
        type_name: TypeName::Diagram,
        field_counts: &[13],
        parse: parse_diagram,
    },
    RecordShape {
        marker: Marker::Root,
        type_name: TypeName::Pin,
        field_counts: &[4],
        parse: parse_point_element,
    },
    RecordShape {
        marker: Marker::Root,
        type_name: TypeName::Input,
        field_counts: &[4, 5],
        parse: parse_io_element,
    },
    RecordShape {
        marker: Marker::Root,
        type_name: TypeName::Output,
        field_counts: &[4, 5],
        parse: parse_io_element,
    },
    RecordShape {
        marker: Marker::Root,
        type_name: TypeName::AndGate,
        field_counts: &[4],
        parse: parse_point_element,
    },
    RecordShape {
        marker: Marker::Root,
        type_name: TypeName::OrGate,
        field_counts: &[4],
        parse: parse_point_element,
    },
    RecordShape {
        marker: Marker::Root,
        type_name: TypeName::Wire,
        field_counts: &[6, 8, 10],
        parse: parse_wire,
    },
    RecordShape {
        marker: Marker::Child,
        type_name: TypeName::Wire,
        field_counts: &[3],
        parse: parse_wire_role,
    },
];

/// Split a line into fields.
///
/// Current documents separate fields with `;`.  Older documents used tabs
/// or spaces, which are accepted when a line has no `;` at all.
pub fn split_fields(line: &str) -> Vec<&str> {
    let line = line.trim();
    if line.contains(FIELD_SEPARATOR) {
        line.split(FIELD_SEPARATOR).map(str::trim).collect()
    } else {
        line.split(['\t', ' '])
            .filter(|field| !field.is_empty())
            .collect()
    }
}

/// Parse a single line.
///
/// Returns `Ok(None)` for blank lines, and the error code describing why
/// the line is not a record otherwise.
pub fn parse_record(line: &str) -> Result<Option<Record>, ErrorCode> {
    let fields = split_fields(line);
    if fields.is_empty() {
        return Ok(None);
    }
    if fields.len() < 2 {
        return Err(ErrorCode::BadFieldCount);
    }

    let marker = Marker::from_field(fields[0]).ok_or(ErrorCode::UnrecognizedRecord)?;
    let type_name = TypeName::from_prefix(fields[1]).ok_or(ErrorCode::UnrecognizedRecord)?;
    let name = Name::parse(fields[1]).ok_or(ErrorCode::BadElementName)?;

    let mut known_kind = false;
    for entry in RECORD_TABLE.iter() {
        if entry.marker != marker || entry.type_name != type_name {
            continue;
        }
        known_kind = true;
        if entry.field_counts.contains(&fields.len()) {
            return (entry.parse)(name, &fields).map(Some);
        }
    }

    if known_kind {
        Err(ErrorCode::BadFieldCount)
    } else {
        Err(ErrorCode::UnrecognizedRecord)
    }
}

fn number(field: &str) -> Result<f64, ErrorCode> {
    field.parse::<f64>().map_err(|_| ErrorCode::ExpectedNumber)
}

fn boolean(field: &str) -> Result<bool, ErrorCode> {
    if field.eq_ignore_ascii_case(TRUE) {
        Ok(true)
    } else if field.eq_ignore_ascii_case(FALSE) {
        Ok(false)
    } else {
        Err(ErrorCode::ExpectedBoolean)
    }
}

fn point(x: &str, y: &str) -> Result<Point, ErrorCode> {
    Ok(Point::new(number(x)?, number(y)?))
}

fn optional_path(fields: &[&str], i: usize) -> Option<String> {
    fields
        .get(i)
        .filter(|field| !field.is_empty())
        .map(|field| field.to_string())
}

fn parse_solution(name: Name, fields: &[&str]) -> Result<Record, ErrorCode> {
    Ok(Record::Solution {
        number: name.number,
        tag_file: optional_path(fields, 2),
        table_file: optional_path(fields, 3),
    })
}

fn parse_project(name: Name, _fields: &[&str]) -> Result<Record, ErrorCode> {
    Ok(Record::Project {
        number: name.number,
    })
}

fn parse_diagram(name: Name, fields: &[&str]) -> Result<Record, ErrorCode> {
    let properties = Properties {
        page_width: number(fields[2])?,
        page_height: number(fields[3])?,
        grid_origin_x: number(fields[4])?,
        grid_origin_y: number(fields[5])?,
        grid_width: number(fields[6])?,
        grid_height: number(fields[7])?,
        grid_size: number(fields[8])?,
        snap_x: number(fields[9])?,
        snap_y: number(fields[10])?,
        snap_offset_x: number(fields[11])?,
        snap_offset_y: number(fields[12])?,
    };
    Ok(Record::Diagram {
        number: name.number,
        properties,
    })
}

fn parse_point_element(name: Name, fields: &[&str]) -> Result<Record, ErrorCode> {
    let id = name.number;
    let position = point(fields[2], fields[3])?;
    let element = match name.type_name {
        TypeName::Pin => ElementRecord::Pin { id, position },
        TypeName::AndGate => ElementRecord::AndGate { id, position },
        TypeName::OrGate => ElementRecord::OrGate { id, position },
        _ => return Err(ErrorCode::UnrecognizedRecord),
    };
    Ok(Record::Element(element))
}

fn parse_io_element(name: Name, fields: &[&str]) -> Result<Record, ErrorCode> {
    let id = name.number;
    let position = point(fields[2], fields[3])?;
    let tag = match fields.get(4) {
        Some(field) => {
            let tag_id = field
                .parse::<i32>()
                .map_err(|_| ErrorCode::ExpectedNumber)?;
            if tag_id < 0 { None } else { Some(tag_id) }
        }
        None => None,
    };
    let element = match name.type_name {
        TypeName::Input => ElementRecord::Input { id, position, tag },
        TypeName::Output => ElementRecord::Output { id, position, tag },
        _ => return Err(ErrorCode::UnrecognizedRecord),
    };
    Ok(Record::Element(element))
}

fn parse_wire(name: Name, fields: &[&str]) -> Result<Record, ErrorCode> {
    let start = point(fields[2], fields[3])?;
    let end = point(fields[4], fields[5])?;

    let mut flags = WireFlags::default();
    if fields.len() >= 8 {
        flags.start_visible = boolean(fields[6])?;
        flags.end_visible = boolean(fields[7])?;
    }
    if fields.len() >= 10 {
        flags.start_io = boolean(fields[8])?;
        flags.end_io = boolean(fields[9])?;
    }

    Ok(Record::Element(ElementRecord::Wire {
        id: name.number,
        start,
        end,
        flags,
    }))
}

fn parse_wire_role(name: Name, fields: &[&str]) -> Result<Record, ErrorCode> {
    let role = WireRole::from_field(fields[2]).ok_or(ErrorCode::ExpectedRole)?;
    Ok(Record::WireRole { wire: name, role })
}

fn bool_field(value: bool) -> &'static str {
    if value { TRUE } else { FALSE }
}

/// Records print in their full (newest) shape; this is the exact inverse
/// of [`parse_record`].
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sep = FIELD_SEPARATOR;
        match self {
            Record::Solution {
                number,
                tag_file,
                table_file,
            } => {
                let name = Name::new(TypeName::Solution, *number);
                write!(f, "{ROOT_MARKER}{sep}{name}")?;
                if tag_file.is_some() || table_file.is_some() {
                    write!(f, "{sep}{}", tag_file.as_deref().unwrap_or(""))?;
                }
                if let Some(table_file) = table_file {
                    write!(f, "{sep}{table_file}")?;
                }
                Ok(())
            }
            Record::Project { number } => {
                let name = Name::new(TypeName::Project, *number);
                write!(f, "{ROOT_MARKER}{sep}{name}")
            }
            Record::Diagram { number, properties } => {
                let name = Name::new(TypeName::Diagram, *number);
                let p = properties;
                write!(
                    f,
                    "{ROOT_MARKER}{sep}{name}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}",
                    p.page_width,
                    p.page_height,
                    p.grid_origin_x,
                    p.grid_origin_y,
                    p.grid_width,
                    p.grid_height,
                    p.grid_size,
                    p.snap_x,
                    p.snap_y,
                    p.snap_offset_x,
                    p.snap_offset_y,
                )
            }
            Record::Element(element) => {
                let name = element.id();
                match element {
                    ElementRecord::Pin { position, .. }
                    | ElementRecord::AndGate { position, .. }
                    | ElementRecord::OrGate { position, .. } => write!(
                        f,
                        "{ROOT_MARKER}{sep}{name}{sep}{}{sep}{}",
                        position.x, position.y
                    ),
                    ElementRecord::Input { position, tag, .. }
                    | ElementRecord::Output { position, tag, .. } => write!(
                        f,
                        "{ROOT_MARKER}{sep}{name}{sep}{}{sep}{}{sep}{}",
                        position.x,
                        position.y,
                        tag.unwrap_or(-1)
                    ),
                    ElementRecord::Wire {
                        start, end, flags, ..
                    } => write!(
                        f,
                        "{ROOT_MARKER}{sep}{name}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}",
                        start.x,
                        start.y,
                        end.x,
                        end.y,
                        bool_field(flags.start_visible),
                        bool_field(flags.end_visible),
                        bool_field(flags.start_io),
                        bool_field(flags.end_io),
                    ),
                }
            }
            Record::WireRole { wire, role } => {
                write!(f, "{CHILD_MARKER}{sep}{wire}{sep}{}", role.as_str())
            }
        }
    }
}
