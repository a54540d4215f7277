// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Live canvas elements.
//!
//! Elements reference each other through [`ElementHandle`]s into the
//! owning [`Canvas`](super::Canvas) arena.  Ownable elements (pins, gates,
//! inputs and outputs) carry an ordered edge list; wires carry the pair of
//! owners they resolved to.

use smallvec::SmallVec;

use crate::datamodel::{Point, WireFlags, WireRole};
use crate::format::grammar::ElementRecord;
use crate::ids::{ElementId, ElementKind};

/// Index of an element in its canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementHandle(pub(crate) usize);

impl ElementHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// "This wire touches me as its Start/End."
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    pub wire: ElementHandle,
    pub role: WireRole,
}

impl Edge {
    pub fn new(wire: ElementHandle, role: WireRole) -> Self {
        Edge { wire, role }
    }

    /// The edge as a (wire, start owner, end owner) triple, exactly one
    /// owner being `owner`.
    pub fn as_triple(
        &self,
        owner: ElementHandle,
    ) -> (ElementHandle, Option<ElementHandle>, Option<ElementHandle>) {
        match self.role {
            WireRole::Start => (self.wire, Some(owner), None),
            WireRole::End => (self.wire, None, Some(owner)),
        }
    }
}

pub type Edges = SmallVec<[Edge; 4]>;

/// What a wire knows about the elements at its ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum WireEnds {
    #[default]
    Unconnected,
    Pending {
        owner: ElementHandle,
        role: WireRole,
    },
    Connected {
        start: ElementHandle,
        end: ElementHandle,
    },
}

impl WireEnds {
    /// Record `owner` at the `role` end.  Returns false, leaving the ends
    /// untouched, if that end is already taken.
    pub fn attach(&mut self, owner: ElementHandle, role: WireRole) -> bool {
        match *self {
            WireEnds::Unconnected => {
                *self = WireEnds::Pending { owner, role };
                true
            }
            WireEnds::Pending {
                owner: pending,
                role: pending_role,
            } if pending_role != role => {
                *self = match role {
                    WireRole::Start => WireEnds::Connected {
                        start: owner,
                        end: pending,
                    },
                    WireRole::End => WireEnds::Connected {
                        start: pending,
                        end: owner,
                    },
                };
                true
            }
            _ => false,
        }
    }

    /// Forget `owner` at the `role` end, downgrading the ends.
    pub fn detach(&mut self, owner: ElementHandle, role: WireRole) {
        *self = match *self {
            WireEnds::Pending {
                owner: pending,
                role: pending_role,
            } if pending == owner && pending_role == role => WireEnds::Unconnected,
            WireEnds::Connected { start, end } => match role {
                WireRole::Start if start == owner => WireEnds::Pending {
                    owner: end,
                    role: WireRole::End,
                },
                WireRole::End if end == owner => WireEnds::Pending {
                    owner: start,
                    role: WireRole::Start,
                },
                _ => *self,
            },
            ends => ends,
        }
    }

    pub fn start(&self) -> Option<ElementHandle> {
        match *self {
            WireEnds::Pending {
                owner,
                role: WireRole::Start,
            } => Some(owner),
            WireEnds::Connected { start, .. } => Some(start),
            _ => None,
        }
    }

    pub fn end(&self) -> Option<ElementHandle> {
        match *self {
            WireEnds::Pending {
                owner,
                role: WireRole::End,
            } => Some(owner),
            WireEnds::Connected { end, .. } => Some(end),
            _ => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, WireEnds::Connected { .. })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Wire {
    /// Absolute end point.  The start is the element position.
    pub end: Point,
    pub flags: WireFlags,
    pub ends: WireEnds,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Pin,
    Input { tag: Option<i32> },
    Output { tag: Option<i32> },
    AndGate,
    OrGate,
    Wire(Wire),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub id: ElementId,
    /// Position of the element; for wires, the start point.
    pub position: Point,
    pub selected: bool,
    pub shape: Shape,
    /// Wires attached to this element.  Always empty for wires.
    pub edges: Edges,
}

impl Element {
    pub fn new(id: ElementId, position: Point) -> Self {
        let shape = match id.kind {
            ElementKind::Pin => Shape::Pin,
            ElementKind::Input => Shape::Input { tag: None },
            ElementKind::Output => Shape::Output { tag: None },
            ElementKind::AndGate => Shape::AndGate,
            ElementKind::OrGate => Shape::OrGate,
            ElementKind::Wire => Shape::Wire(Wire {
                end: position,
                flags: WireFlags::default(),
                ends: WireEnds::Unconnected,
            }),
        };
        Element {
            id,
            position,
            selected: false,
            shape,
            edges: Edges::new(),
        }
    }

    pub fn from_record(record: &ElementRecord) -> Self {
        let mut element = Element::new(record.id(), record.position());
        match (record, &mut element.shape) {
            (ElementRecord::Input { tag, .. }, Shape::Input { tag: t })
            | (ElementRecord::Output { tag, .. }, Shape::Output { tag: t }) => *t = *tag,
            (
                ElementRecord::Wire {
                    end, flags, ..
                },
                Shape::Wire(wire),
            ) => {
                wire.end = *end;
                wire.flags = *flags;
            }
            _ => {}
        }
        element
    }

    /// The record this element serializes to.
    pub fn to_record(&self) -> ElementRecord {
        let id = self.id.number;
        let position = self.position;
        match &self.shape {
            Shape::Pin => ElementRecord::Pin { id, position },
            Shape::Input { tag } => ElementRecord::Input {
                id,
                position,
                tag: *tag,
            },
            Shape::Output { tag } => ElementRecord::Output {
                id,
                position,
                tag: *tag,
            },
            Shape::AndGate => ElementRecord::AndGate { id, position },
            Shape::OrGate => ElementRecord::OrGate { id, position },
            Shape::Wire(wire) => ElementRecord::Wire {
                id,
                start: position,
                end: wire.end,
                flags: wire.flags,
            },
        }
    }

    pub fn kind(&self) -> ElementKind {
        self.id.kind
    }

    pub fn is_wire(&self) -> bool {
        matches!(self.shape, Shape::Wire(_))
    }

    pub fn wire(&self) -> Option<&Wire> {
        match &self.shape {
            Shape::Wire(wire) => Some(wire),
            _ => None,
        }
    }

    pub fn wire_mut(&mut self) -> Option<&mut Wire> {
        match &mut self.shape {
            Shape::Wire(wire) => Some(wire),
            _ => None,
        }
    }

    /// Start and end point of a wire.
    pub fn wire_points(&self) -> Option<(Point, Point)> {
        self.wire().map(|wire| (self.position, wire.end))
    }

    /// End point of a wire relative to its start.
    pub fn wire_offset(&self) -> Option<Point> {
        self.wire().map(|wire| wire.end - self.position)
    }

    /// Move the element by `by`; wires move both ends.
    pub fn translate(&mut self, by: Point) {
        self.position = self.position + by;
        if let Some(wire) = self.wire_mut() {
            wire.end = wire.end + by;
        }
    }

    /// Tag reference of an input or output.
    pub fn tag(&self) -> Option<i32> {
        match self.shape {
            Shape::Input { tag } | Shape::Output { tag } => tag,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(i: usize) -> ElementHandle {
        ElementHandle(i)
    }

    #[test]
    fn test_attach_start_then_end() {
        let mut ends = WireEnds::default();
        assert!(ends.attach(h(1), WireRole::Start));
        assert_eq!(
            WireEnds::Pending {
                owner: h(1),
                role: WireRole::Start
            },
            ends
        );
        assert!(ends.attach(h(2), WireRole::End));
        assert_eq!(
            WireEnds::Connected {
                start: h(1),
                end: h(2)
            },
            ends
        );
        assert_eq!(Some(h(1)), ends.start());
        assert_eq!(Some(h(2)), ends.end());
    }

    #[test]
    fn test_attach_end_first_keeps_order() {
        let mut ends = WireEnds::default();
        assert!(ends.attach(h(7), WireRole::End));
        assert_eq!(None, ends.start());
        assert!(ends.attach(h(3), WireRole::Start));
        assert_eq!(
            WireEnds::Connected {
                start: h(3),
                end: h(7)
            },
            ends
        );
    }

    #[test]
    fn test_attach_conflicts() {
        let mut ends = WireEnds::default();
        assert!(ends.attach(h(1), WireRole::Start));
        assert!(!ends.attach(h(2), WireRole::Start));
        assert!(ends.attach(h(2), WireRole::End));
        assert!(!ends.attach(h(3), WireRole::End));
        assert!(ends.is_connected());
    }

    #[test]
    fn test_detach() {
        let mut ends = WireEnds::Connected {
            start: h(1),
            end: h(2),
        };
        ends.detach(h(1), WireRole::Start);
        assert_eq!(
            WireEnds::Pending {
                owner: h(2),
                role: WireRole::End
            },
            ends
        );
        // detaching an owner that isn't there does nothing
        ends.detach(h(9), WireRole::End);
        assert_eq!(Some(h(2)), ends.end());
        ends.detach(h(2), WireRole::End);
        assert_eq!(WireEnds::Unconnected, ends);
    }

    #[test]
    fn test_edge_triple() {
        let edge = Edge::new(h(4), WireRole::End);
        assert_eq!((h(4), None, Some(h(1))), edge.as_triple(h(1)));
        let edge = Edge::new(h(4), WireRole::Start);
        assert_eq!((h(4), Some(h(1)), None), edge.as_triple(h(1)));
    }

    #[test]
    fn test_wire_record_conversion() {
        let record = ElementRecord::Wire {
            id: 3,
            start: Point::new(10.0, 20.0),
            end: Point::new(50.0, 25.0),
            flags: WireFlags {
                start_visible: true,
                end_visible: false,
                start_io: true,
                end_io: false,
            },
        };
        let element = Element::from_record(&record);
        assert!(element.is_wire());
        assert_eq!("Wire|3", element.id.to_string());
        assert_eq!(Point::new(50.0, 25.0), element.wire().unwrap().end);
        assert_eq!(Some(Point::new(40.0, 5.0)), element.wire_offset());
        assert_eq!(
            Some((Point::new(10.0, 20.0), Point::new(50.0, 25.0))),
            element.wire_points()
        );
        assert_eq!(record, element.to_record());
    }

    #[test]
    fn test_wire_end_kept_exactly() {
        for (start, end) in [(0.7, 0.1), (0.3, 0.001), (-12.25, 1e-9)] {
            let record = ElementRecord::Wire {
                id: 0,
                start: Point::new(start, 0.0),
                end: Point::new(end, 0.0),
                flags: WireFlags::default(),
            };
            assert_eq!(record, Element::from_record(&record).to_record());
        }
    }

    #[test]
    fn test_io_record_conversion() {
        let record = ElementRecord::Output {
            id: 1,
            position: Point::new(1.0, 2.0),
            tag: Some(5),
        };
        let element = Element::from_record(&record);
        assert_eq!(Some(5), element.tag());
        assert!(element.edges.is_empty());
        assert_eq!(record, element.to_record());
    }
}
