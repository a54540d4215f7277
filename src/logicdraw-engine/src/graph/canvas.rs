// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::common::{ErrorCode, ParseWarning, Result};
use crate::datamodel::{Point, Properties, WireRole};
use crate::format::creator::{ConnectionDict, ElementCreator};
use crate::format::grammar::ElementRecord;
use crate::graph::element::{Edge, Element, ElementHandle, WireEnds};
use crate::graph_err;
use crate::ids::{ElementId, IdCounter};

/// Arena of the live elements of one diagram.
///
/// Removing an element leaves its slot empty, so handles held elsewhere
/// never silently point at a different element.
#[derive(Clone, Debug, Default)]
pub struct Canvas {
    slots: Vec<Option<Element>>,
    properties: Properties,
}

impl Canvas {
    pub fn new(properties: Properties) -> Self {
        Canvas {
            slots: Vec::new(),
            properties,
        }
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn set_properties(&mut self, properties: Properties) {
        self.properties = properties;
    }

    pub fn insert(&mut self, element: Element) -> ElementHandle {
        self.slots.push(Some(element));
        ElementHandle(self.slots.len() - 1)
    }

    pub fn get(&self, handle: ElementHandle) -> Option<&Element> {
        self.slots.get(handle.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, handle: ElementHandle) -> Option<&mut Element> {
        self.slots.get_mut(handle.0).and_then(Option::as_mut)
    }

    pub fn element(&self, handle: ElementHandle) -> Result<&Element> {
        match self.get(handle) {
            Some(element) => Ok(element),
            None => graph_err!(DoesNotExist, format!("no element at {}", handle.0)),
        }
    }

    pub fn element_mut(&mut self, handle: ElementHandle) -> Result<&mut Element> {
        match self.get_mut(handle) {
            Some(element) => Ok(element),
            None => graph_err!(DoesNotExist, format!("no element at {}", handle.0)),
        }
    }

    /// Live elements in canvas (insertion) order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementHandle, &Element)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|element| (ElementHandle(i), element)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ElementHandle, &mut Element)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_mut().map(|element| (ElementHandle(i), element)))
    }

    pub fn handles(&self) -> Vec<ElementHandle> {
        self.iter().map(|(handle, _)| handle).collect()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find(&self, id: ElementId) -> Option<ElementHandle> {
        self.iter()
            .find(|(_, element)| element.id == id)
            .map(|(handle, _)| handle)
    }

    /// Drop every element.  Properties are kept.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Every (owner, role) pair claiming `wire`, in canvas order.
    pub fn claims(&self, wire: ElementHandle) -> Vec<(ElementHandle, WireRole)> {
        self.iter()
            .flat_map(|(owner, element)| {
                element
                    .edges
                    .iter()
                    .filter(move |edge| edge.wire == wire)
                    .map(move |edge| (owner, edge.role))
            })
            .collect()
    }

    /// Attach `owner` to the `role` end of `wire`.
    ///
    /// The edge is always recorded on the owner; the return value tells
    /// whether the wire end was free to take it.
    pub fn add_edge(
        &mut self,
        owner: ElementHandle,
        wire: ElementHandle,
        role: WireRole,
    ) -> Result<bool> {
        let owner_element = self.element(owner)?;
        if owner_element.is_wire() {
            return graph_err!(
                BadConnectionRoot,
                format!("{} cannot own a wire end", owner_element.id)
            );
        }
        let wire_element = self.element(wire)?;
        if !wire_element.is_wire() {
            return graph_err!(UnknownWire, format!("{} is not a wire", wire_element.id));
        }

        self.element_mut(owner)?.edges.push(Edge::new(wire, role));
        let attached = match self.element_mut(wire)?.wire_mut() {
            Some(w) => w.ends.attach(owner, role),
            None => false,
        };
        Ok(attached)
    }

    /// Strip every claim referencing `wire` and reset its ends.  Returns the
    /// removed (owner, role) pairs.
    pub fn disconnect_wire(&mut self, wire: ElementHandle) -> Result<Vec<(ElementHandle, WireRole)>> {
        let element = self.element_mut(wire)?;
        if !element.is_wire() {
            return graph_err!(UnknownWire, format!("{} is not a wire", element.id));
        }
        if let Some(w) = element.wire_mut() {
            w.ends = WireEnds::Unconnected;
        }

        let mut removed = Vec::new();
        for (owner, element) in self.iter_mut() {
            element.edges.retain(|edge| {
                if edge.wire == wire {
                    removed.push((owner, edge.role));
                    false
                } else {
                    true
                }
            });
        }
        Ok(removed)
    }

    /// Remove an element.  Wires attached to a removed non-wire element
    /// go with it.  Returns every removed handle.
    pub fn remove(&mut self, handle: ElementHandle) -> Result<Vec<ElementHandle>> {
        let element = self.element(handle)?;
        let id = element.id;
        let mut removed = Vec::new();

        if element.is_wire() {
            self.disconnect_wire(handle)?;
        } else {
            let mut wires: Vec<ElementHandle> = element.edges.iter().map(|edge| edge.wire).collect();
            wires.sort_unstable();
            wires.dedup();
            for wire in wires {
                if self.get(wire).is_some() {
                    self.disconnect_wire(wire)?;
                    self.slots[wire.0] = None;
                    removed.push(wire);
                }
            }
        }

        self.slots[handle.0] = None;
        removed.push(handle);
        debug!("Removed {} and {} attached wire(s)", id, removed.len() - 1);
        Ok(removed)
    }

    /// Remove every selected element.
    pub fn remove_selected(&mut self) -> Vec<ElementHandle> {
        let selected: Vec<ElementHandle> = self
            .iter()
            .filter(|(_, element)| element.selected)
            .map(|(handle, _)| handle)
            .collect();

        let mut removed = Vec::new();
        for handle in selected {
            // may already be gone along with an owner removed earlier
            if self.get(handle).is_none() {
                continue;
            }
            if let Ok(mut gone) = self.remove(handle) {
                removed.append(&mut gone);
            }
        }
        removed
    }

    /// Check the connectivity invariants without changing anything.
    /// Returns one message per violation.
    pub fn verify(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for (_, element) in self.iter() {
            if element.is_wire() {
                if !element.edges.is_empty() {
                    problems.push(format!("{} is a wire but owns edges", element.id));
                }
                continue;
            }
            for edge in element.edges.iter() {
                match self.get(edge.wire) {
                    Some(wire) if wire.is_wire() => {}
                    Some(other) => problems.push(format!(
                        "{} has an edge to {}, which is not a wire",
                        element.id, other.id
                    )),
                    None => problems.push(format!("{} has a dangling edge", element.id)),
                }
            }
        }

        for (handle, element) in self.iter() {
            let Some(wire) = element.wire() else {
                continue;
            };
            let claims = self.claims(handle);
            for role in [WireRole::Start, WireRole::End] {
                let owners: Vec<ElementHandle> = claims
                    .iter()
                    .filter(|(_, r)| *r == role)
                    .map(|(owner, _)| *owner)
                    .collect();
                if owners.len() > 1 {
                    problems.push(format!(
                        "{} has {} owners at its {} end",
                        element.id,
                        owners.len(),
                        role.as_str()
                    ));
                }
                let recorded = match role {
                    WireRole::Start => wire.ends.start(),
                    WireRole::End => wire.ends.end(),
                };
                if recorded != owners.first().copied() {
                    problems.push(format!(
                        "{} {} end does not match its claims",
                        element.id,
                        role.as_str()
                    ));
                }
            }
        }

        problems
    }

    /// Owner of a wire end by geometry: the first non-wire element among
    /// `candidates` sitting at that end point.
    fn owner_at_end(
        &self,
        wire: ElementHandle,
        role: WireRole,
        candidates: &HashSet<ElementHandle>,
    ) -> Option<ElementHandle> {
        let (start, end) = self.get(wire)?.wire_points()?;
        let point = match role {
            WireRole::Start => start,
            WireRole::End => end,
        };
        self.iter()
            .find(|(handle, element)| {
                candidates.contains(handle)
                    && !element.is_wire()
                    && element.position.approx_eq(point)
            })
            .map(|(handle, _)| handle)
    }
}

impl ElementCreator for Canvas {
    fn create_element(&mut self, record: &ElementRecord, snap: bool) -> ElementHandle {
        let mut element = Element::from_record(record);
        if snap {
            let properties = self.properties;
            element.position = properties.snap_point(element.position);
            if let Some(wire) = element.wire_mut() {
                wire.end = properties.snap_point(wire.end);
            }
        }
        self.insert(element)
    }

    fn create_diagram(&mut self, properties: &Properties) {
        self.properties = *properties;
    }

    fn create_grid(&mut self, origin_x: f64, origin_y: f64, width: f64, height: f64, size: f64) {
        self.properties.grid_origin_x = origin_x;
        self.properties.grid_origin_y = origin_y;
        self.properties.grid_width = width;
        self.properties.grid_height = height;
        self.properties.grid_size = size;
    }

    fn update_connections(&mut self, dict: &ConnectionDict) -> Vec<ParseWarning> {
        let mut warnings = Vec::new();
        let registered: HashSet<ElementHandle> = dict.handles().collect();

        for claim in dict.claims() {
            let wire = dict
                .get(&claim.wire)
                .filter(|&handle| self.get(handle).is_some_and(Element::is_wire));
            let Some(wire) = wire else {
                warn!("line {}: dropping claim on unknown wire {}", claim.line, claim.wire);
                warnings.push(ParseWarning::new(
                    claim.line,
                    ErrorCode::UnknownWire,
                    claim.wire.to_string(),
                ));
                continue;
            };

            let owner = if claim.owner == wire {
                match self.owner_at_end(wire, claim.role, &registered) {
                    Some(owner) => owner,
                    None => {
                        warn!(
                            "line {}: nothing at the {} end of {}",
                            claim.line,
                            claim.role.as_str(),
                            claim.wire
                        );
                        warnings.push(ParseWarning::new(
                            claim.line,
                            ErrorCode::UnresolvedWireEnd,
                            format!("{} {}", claim.wire, claim.role.as_str()),
                        ));
                        continue;
                    }
                }
            } else {
                claim.owner
            };

            match self.add_edge(owner, wire, claim.role) {
                Ok(true) => {}
                Ok(false) => {
                    warn!(
                        "line {}: {} end of {} is already taken",
                        claim.line,
                        claim.role.as_str(),
                        claim.wire
                    );
                    warnings.push(ParseWarning::new(
                        claim.line,
                        ErrorCode::UnresolvedWireEnd,
                        format!("{} {} already taken", claim.wire, claim.role.as_str()),
                    ));
                }
                Err(err) => {
                    warn!("line {}: {}", claim.line, err);
                    warnings.push(ParseWarning::new(
                        claim.line,
                        err.code,
                        err.get_details().unwrap_or_else(|| claim.wire.to_string()),
                    ));
                }
            }
        }

        debug!(
            "Resolved {} claim(s) over {} element(s), {} warning(s)",
            dict.claims().len(),
            dict.len(),
            warnings.len()
        );
        warnings
    }

    fn append_ids(&mut self, counter: &mut IdCounter, elements: &[ElementHandle]) {
        for &handle in elements {
            if let Some(element) = self.get_mut(handle) {
                element.id = counter.next_element(element.kind());
            }
        }
    }

    fn insert_elements(
        &mut self,
        elements: &[ElementHandle],
        select: bool,
        offset_x: f64,
        offset_y: f64,
    ) {
        let offset = Point::new(offset_x, offset_y);
        for &handle in elements {
            if let Some(element) = self.get_mut(handle) {
                element.translate(offset);
                element.selected = select;
            }
        }
    }
}
