// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use tracing::debug;

use crate::common::Result;
use crate::datamodel::{Point, WireFlags, WireRole};
use crate::graph::canvas::Canvas;
use crate::graph::connect::Connection;
use crate::graph::element::{Element, ElementHandle};
use crate::graph_err;
use crate::ids::{ElementKind, IdCounter};

/// The pieces a wire was cut into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Split {
    pub pin: ElementHandle,
    /// From the original start owner to the pin.
    pub first: ElementHandle,
    /// From the pin to the original end owner.
    pub second: ElementHandle,
}

/// Cut `wire` in two at `point`, joining the halves with a new pin.
///
/// The wire must be claimed exactly twice, once at each end; otherwise
/// nothing is changed and an error is returned.
pub fn split_wire(
    canvas: &mut Canvas,
    counter: &mut IdCounter,
    wire: ElementHandle,
    point: Point,
    snap: bool,
) -> Result<Split> {
    let element = canvas.element(wire)?;
    let id = element.id;
    let (Some(w), Some((start, end))) = (element.wire(), element.wire_points()) else {
        return graph_err!(UnknownWire, format!("{id} is not a wire"));
    };
    let flags = w.flags;

    let claims = canvas.claims(wire);
    if claims.len() != 2 {
        return graph_err!(
            SplitConnectionCount,
            format!("{id} has {} connections", claims.len())
        );
    }
    let owner = |role| {
        claims
            .iter()
            .find(|(_, r)| *r == role)
            .map(|(owner, _)| *owner)
    };
    let (Some(start_owner), Some(end_owner)) = (owner(WireRole::Start), owner(WireRole::End)) else {
        return graph_err!(
            SplitUnresolvedEnds,
            format!("{id} needs one Start and one End connection")
        );
    };

    let point = if snap {
        canvas.properties().snap_point(point)
    } else {
        point
    };
    let pin = canvas.insert(Element::new(counter.next_element(ElementKind::Pin), point));

    canvas.disconnect_wire(wire)?;
    canvas.remove(wire)?;

    let mut connection = Connection::Idle;
    connection.start(canvas, counter, start_owner, start)?;
    let first = connection.finish(canvas, pin, point)?;
    connection.start(canvas, counter, pin, point)?;
    let second = connection.finish(canvas, end_owner, end)?;

    set_flags(
        canvas,
        first,
        WireFlags {
            start_visible: flags.start_visible,
            start_io: flags.start_io,
            ..Default::default()
        },
    )?;
    set_flags(
        canvas,
        second,
        WireFlags {
            end_visible: flags.end_visible,
            end_io: flags.end_io,
            ..Default::default()
        },
    )?;

    debug!("Split {} at ({}, {})", id, point.x, point.y);
    Ok(Split { pin, first, second })
}

fn set_flags(canvas: &mut Canvas, wire: ElementHandle, flags: WireFlags) -> Result<()> {
    if let Some(w) = canvas.element_mut(wire)?.wire_mut() {
        w.flags = flags;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ErrorCode;
    use crate::graph::element::WireEnds;

    struct Fixture {
        canvas: Canvas,
        counter: IdCounter,
        a: ElementHandle,
        b: ElementHandle,
        wire: ElementHandle,
    }

    fn fixture() -> Fixture {
        let mut canvas = Canvas::default();
        let mut counter = IdCounter::new();
        let a = canvas.insert(Element::new(
            counter.next_element(ElementKind::Input),
            Point::new(0.0, 0.0),
        ));
        let b = canvas.insert(Element::new(
            counter.next_element(ElementKind::Output),
            Point::new(90.0, 60.0),
        ));
        let mut connection = Connection::Idle;
        connection
            .start(&mut canvas, &mut counter, a, Point::new(0.0, 0.0))
            .unwrap();
        let wire = connection
            .finish(&mut canvas, b, Point::new(90.0, 60.0))
            .unwrap();
        canvas.get_mut(wire).unwrap().wire_mut().unwrap().flags = WireFlags {
            start_visible: true,
            end_visible: true,
            start_io: true,
            end_io: true,
        };
        Fixture {
            canvas,
            counter,
            a,
            b,
            wire,
        }
    }

    #[test]
    fn test_split_preserves_endpoints() {
        let Fixture {
            mut canvas,
            mut counter,
            a,
            b,
            wire,
        } = fixture();
        let q = Point::new(45.0, 30.0);
        let split = split_wire(&mut canvas, &mut counter, wire, q, false).unwrap();

        assert!(canvas.get(wire).is_none());
        let pins: Vec<_> = canvas
            .iter()
            .filter(|(_, e)| e.kind() == ElementKind::Pin)
            .collect();
        assert_eq!(1, pins.len());
        assert_eq!(q, canvas.get(split.pin).unwrap().position);

        let first = canvas.get(split.first).unwrap();
        assert_eq!(
            Some((Point::new(0.0, 0.0), q)),
            first.wire_points()
        );
        let first = first.wire().unwrap();
        assert_eq!(
            WireEnds::Connected {
                start: a,
                end: split.pin
            },
            first.ends
        );
        assert!(first.flags.start_visible && first.flags.start_io);
        assert!(!first.flags.end_visible && !first.flags.end_io);

        let second = canvas.get(split.second).unwrap();
        assert_eq!(Some((q, Point::new(90.0, 60.0))), second.wire_points());
        let second = second.wire().unwrap();
        assert_eq!(
            WireEnds::Connected {
                start: split.pin,
                end: b
            },
            second.ends
        );
        assert!(!second.flags.start_visible && !second.flags.start_io);
        assert!(second.flags.end_visible && second.flags.end_io);

        assert_eq!(2, canvas.get(split.pin).unwrap().edges.len());
        assert!(canvas.verify().is_empty());
    }

    #[test]
    fn test_split_snaps_point() {
        let Fixture {
            mut canvas,
            mut counter,
            wire,
            ..
        } = fixture();
        let split = split_wire(&mut canvas, &mut counter, wire, Point::new(44.0, 31.0), true).unwrap();
        let position = canvas.get(split.pin).unwrap().position;
        assert!(position.approx_eq(Point::new(45.0, 30.0)));
    }

    #[test]
    fn test_split_rejects_single_claim() {
        let Fixture {
            mut canvas,
            mut counter,
            b,
            wire,
            ..
        } = fixture();
        canvas.get_mut(b).unwrap().edges.clear();
        let before = canvas.clone();
        let counter_before = counter;

        let err = split_wire(&mut canvas, &mut counter, wire, Point::new(1.0, 1.0), false)
            .unwrap_err();
        assert_eq!(ErrorCode::SplitConnectionCount, err.code);
        assert_eq!(before.handles(), canvas.handles());
        assert_eq!(counter_before, counter);
    }

    #[test]
    fn test_split_rejects_three_claims() {
        let Fixture {
            mut canvas,
            mut counter,
            wire,
            ..
        } = fixture();
        let extra = canvas.insert(Element::new(
            counter.next_element(ElementKind::Pin),
            Point::new(5.0, 5.0),
        ));
        canvas.add_edge(extra, wire, WireRole::End).unwrap();
        let handles = canvas.handles();

        let err = split_wire(&mut canvas, &mut counter, wire, Point::new(1.0, 1.0), false)
            .unwrap_err();
        assert_eq!(ErrorCode::SplitConnectionCount, err.code);
        assert_eq!(handles, canvas.handles());
        assert_eq!(3, canvas.claims(wire).len());
    }

    #[test]
    fn test_split_rejects_same_roles() {
        let Fixture {
            mut canvas,
            mut counter,
            a,
            b,
            wire,
        } = fixture();
        canvas.get_mut(b).unwrap().edges.clear();
        canvas.get_mut(a).unwrap().edges.push(crate::graph::element::Edge::new(wire, WireRole::Start));

        let err = split_wire(&mut canvas, &mut counter, wire, Point::new(1.0, 1.0), false)
            .unwrap_err();
        assert_eq!(ErrorCode::SplitUnresolvedEnds, err.code);
    }
}
