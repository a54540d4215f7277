// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The seam between the parser and whatever holds live elements.

use std::collections::HashMap;

use crate::common::ParseWarning;
use crate::datamodel::{Properties, WireRole};
use crate::format::grammar::ElementRecord;
use crate::graph::ElementHandle;
use crate::ids::{IdCounter, Name};

/// "Wire `wire` has `owner` as its Start/End", as read from a child record.
#[derive(Clone, Debug, PartialEq)]
pub struct Claim {
    pub wire: Name,
    pub owner: ElementHandle,
    pub role: WireRole,
    /// Line of the child record, for warnings.
    pub line: usize,
}

/// Name to element lookup plus the wire claims seen during one parse.
///
/// Child records may name wires that appear later in the text, so claims
/// are only resolved once the whole document has been read.
#[derive(Clone, Debug, Default)]
pub struct ConnectionDict {
    elements: HashMap<Name, ElementHandle>,
    claims: Vec<Claim>,
}

impl ConnectionDict {
    pub fn new() -> Self {
        Default::default()
    }

    /// Register a created element under the name it was read with.
    /// Returns the handle previously registered under that name, if any.
    pub fn register(&mut self, name: Name, handle: ElementHandle) -> Option<ElementHandle> {
        self.elements.insert(name, handle)
    }

    pub fn claim(&mut self, claim: Claim) {
        self.claims.push(claim);
    }

    pub fn get(&self, name: &Name) -> Option<ElementHandle> {
        self.elements.get(name).copied()
    }

    /// Claims in file order.
    /// Every registered element, in no particular order.
    pub fn handles(&self) -> impl Iterator<Item = ElementHandle> + '_ {
        self.elements.values().copied()
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Receiver of the live objects a parse materializes.
pub trait ElementCreator {
    /// Create an element from its record, at its own coordinates (snapped
    /// when `snap` is set).
    fn create_element(&mut self, record: &ElementRecord, snap: bool) -> ElementHandle;

    fn create_diagram(&mut self, properties: &Properties);

    fn create_grid(&mut self, origin_x: f64, origin_y: f64, width: f64, height: f64, size: f64);

    /// Resolve every claim of `dict` into edges and wire ends, in order.
    fn update_connections(&mut self, dict: &ConnectionDict) -> Vec<ParseWarning>;

    /// Merge the ids seen in the text into the authoritative counter.
    fn update_counter(&mut self, authoritative: &mut IdCounter, parsed: &IdCounter) {
        authoritative.merge(parsed);
    }

    /// Rename `elements` with fresh ids taken from `counter`.
    fn append_ids(&mut self, counter: &mut IdCounter, elements: &[ElementHandle]);

    /// Translate `elements` by the offset and hand them to the live
    /// document, selecting them when `select` is set.
    fn insert_elements(
        &mut self,
        elements: &[ElementHandle],
        select: bool,
        offset_x: f64,
        offset_y: f64,
    );
}
