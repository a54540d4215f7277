// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Element and node identifiers.
//!
//! Every element and tree node is named `<TypeName>|<integer>`, e.g.
//! `Wire|3`.  The type name doubles as the record vocabulary of the text
//! format, and the integer is handed out by an [`IdCounter`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Separates the type name from the numeric suffix of an id.
pub const ID_SEPARATOR: char = '|';

/// The full record vocabulary: tree nodes followed by element kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeName {
    Solution,
    Project,
    Diagram,
    Pin,
    Wire,
    Input,
    Output,
    AndGate,
    OrGate,
}

impl TypeName {
    pub const ALL: [TypeName; 9] = [
        TypeName::Solution,
        TypeName::Project,
        TypeName::Diagram,
        TypeName::Pin,
        TypeName::Wire,
        TypeName::Input,
        TypeName::Output,
        TypeName::AndGate,
        TypeName::OrGate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TypeName::Solution => "Solution",
            TypeName::Project => "Project",
            TypeName::Diagram => "Diagram",
            TypeName::Pin => "Pin",
            TypeName::Wire => "Wire",
            TypeName::Input => "Input",
            TypeName::Output => "Output",
            TypeName::AndGate => "AndGate",
            TypeName::OrGate => "OrGate",
        }
    }

    /// Match the type name at the start of a record name.
    ///
    /// Matching is by prefix: names differ from their type only in the
    /// `|<id>` suffix.
    pub fn from_prefix(name: &str) -> Option<TypeName> {
        TypeName::ALL
            .iter()
            .copied()
            .find(|type_name| name.starts_with(type_name.as_str()))
    }

    pub fn element_kind(self) -> Option<ElementKind> {
        match self {
            TypeName::Pin => Some(ElementKind::Pin),
            TypeName::Wire => Some(ElementKind::Wire),
            TypeName::Input => Some(ElementKind::Input),
            TypeName::Output => Some(ElementKind::Output),
            TypeName::AndGate => Some(ElementKind::AndGate),
            TypeName::OrGate => Some(ElementKind::OrGate),
            TypeName::Solution | TypeName::Project | TypeName::Diagram => None,
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The element variants that live on a canvas.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementKind {
    Pin,
    Wire,
    Input,
    Output,
    AndGate,
    OrGate,
}

impl ElementKind {
    pub fn type_name(self) -> TypeName {
        match self {
            ElementKind::Pin => TypeName::Pin,
            ElementKind::Wire => TypeName::Wire,
            ElementKind::Input => TypeName::Input,
            ElementKind::Output => TypeName::Output,
            ElementKind::AndGate => TypeName::AndGate,
            ElementKind::OrGate => TypeName::OrGate,
        }
    }

    /// Inputs and outputs mark the wire ends touching them as IO ends.
    pub fn is_io(self) -> bool {
        matches!(self, ElementKind::Input | ElementKind::Output)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.type_name().as_str())
    }
}

/// A parsed `<TypeName>|<integer>` name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name {
    pub type_name: TypeName,
    pub number: u32,
}

impl Name {
    pub fn new(type_name: TypeName, number: u32) -> Self {
        Name { type_name, number }
    }

    /// Parse a record name field.  Returns `None` when the type prefix is
    /// unknown or the suffix is not a non-negative integer.
    pub fn parse(field: &str) -> Option<Name> {
        let type_name = TypeName::from_prefix(field)?;
        let (_, number) = field.split_once(ID_SEPARATOR)?;
        let number = number.trim().parse::<u32>().ok()?;
        Some(Name { type_name, number })
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}{}", self.type_name, ID_SEPARATOR, self.number)
    }
}

/// The id of a canvas element.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId {
    pub kind: ElementKind,
    pub number: u32,
}

impl ElementId {
    pub fn new(kind: ElementKind, number: u32) -> Self {
        ElementId { kind, number }
    }

    pub fn name(&self) -> Name {
        Name::new(self.kind.type_name(), self.number)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}{}", self.kind, ID_SEPARATOR, self.number)
    }
}

/// Next free id for every element type and tree level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdCounter {
    pub solution: u32,
    pub project: u32,
    pub diagram: u32,
    pub pin: u32,
    pub wire: u32,
    pub input: u32,
    pub output: u32,
    pub and_gate: u32,
    pub or_gate: u32,
}

impl IdCounter {
    pub fn new() -> Self {
        Default::default()
    }

    fn field_mut(&mut self, type_name: TypeName) -> &mut u32 {
        match type_name {
            TypeName::Solution => &mut self.solution,
            TypeName::Project => &mut self.project,
            TypeName::Diagram => &mut self.diagram,
            TypeName::Pin => &mut self.pin,
            TypeName::Wire => &mut self.wire,
            TypeName::Input => &mut self.input,
            TypeName::Output => &mut self.output,
            TypeName::AndGate => &mut self.and_gate,
            TypeName::OrGate => &mut self.or_gate,
        }
    }

    pub fn get(&self, type_name: TypeName) -> u32 {
        match type_name {
            TypeName::Solution => self.solution,
            TypeName::Project => self.project,
            TypeName::Diagram => self.diagram,
            TypeName::Pin => self.pin,
            TypeName::Wire => self.wire,
            TypeName::Input => self.input,
            TypeName::Output => self.output,
            TypeName::AndGate => self.and_gate,
            TypeName::OrGate => self.or_gate,
        }
    }

    /// Hand out the next id for `type_name`.
    pub fn next(&mut self, type_name: TypeName) -> u32 {
        let field = self.field_mut(type_name);
        let id = *field;
        *field = field.saturating_add(1);
        id
    }

    pub fn next_element(&mut self, kind: ElementKind) -> ElementId {
        ElementId::new(kind, self.next(kind.type_name()))
    }

    /// Record that `name` is in use, so later ids never collide with it.
    pub fn observe(&mut self, name: Name) {
        let field = self.field_mut(name.type_name);
        *field = (*field).max(name.number.saturating_add(1));
    }

    /// Per-field maximum of both counters.
    pub fn merge(&mut self, other: &IdCounter) {
        for type_name in TypeName::ALL {
            let theirs = other.get(type_name);
            let field = self.field_mut(type_name);
            *field = (*field).max(theirs);
        }
    }

    /// Zero the element counters, used when the current diagram is cleared.
    pub fn reset_diagram(&mut self) {
        self.pin = 0;
        self.wire = 0;
        self.input = 0;
        self.output = 0;
        self.and_gate = 0;
        self.or_gate = 0;
    }

    /// Zero everything, used when the whole solution is cleared.
    pub fn reset_all(&mut self) {
        *self = IdCounter::default();
    }
}
