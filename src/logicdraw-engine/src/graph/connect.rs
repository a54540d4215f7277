// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Interactive wire drawing.
//!
//! A wire is drawn in two steps: the first endpoint creates a provisional
//! wire owned at its Start by the element clicked, the second endpoint
//! stretches it to the second element and claims the End.

use tracing::debug;

use crate::common::Result;
use crate::datamodel::{Point, WireRole};
use crate::graph::canvas::Canvas;
use crate::graph::element::{Element, ElementHandle};
use crate::graph_err;
use crate::ids::{ElementKind, IdCounter};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Connection {
    #[default]
    Idle,
    Drawing {
        wire: ElementHandle,
        root: ElementHandle,
    },
}

/// What a call to [`Connection::connect`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectStep {
    Started(ElementHandle),
    Finished(ElementHandle),
}

impl Connection {
    pub fn is_drawing(&self) -> bool {
        matches!(self, Connection::Drawing { .. })
    }

    /// Start a wire when idle, finish the provisional one otherwise.
    pub fn connect(
        &mut self,
        canvas: &mut Canvas,
        counter: &mut IdCounter,
        root: ElementHandle,
        point: Point,
    ) -> Result<ConnectStep> {
        if self.is_drawing() {
            self.finish(canvas, root, point).map(ConnectStep::Finished)
        } else {
            self.start(canvas, counter, root, point).map(ConnectStep::Started)
        }
    }

    /// First endpoint: a new zero-length wire at `point`, with `root` as
    /// its Start.  A wire already being drawn is cancelled first.
    pub fn start(
        &mut self,
        canvas: &mut Canvas,
        counter: &mut IdCounter,
        root: ElementHandle,
        point: Point,
    ) -> Result<ElementHandle> {
        let root_kind = connection_root(canvas, root)?;
        if self.is_drawing() {
            self.cancel(canvas)?;
        }

        let mut element = Element::new(counter.next_element(ElementKind::Wire), point);
        if let Some(wire) = element.wire_mut() {
            wire.flags.start_io = root_kind.is_io();
        }
        let id = element.id;
        let wire = canvas.insert(element);
        canvas.add_edge(root, wire, WireRole::Start)?;

        debug!("Started {} at ({}, {})", id, point.x, point.y);
        *self = Connection::Drawing { wire, root };
        Ok(wire)
    }

    /// Second endpoint: stretch the provisional wire to `point` and make
    /// `root` its End.
    pub fn finish(
        &mut self,
        canvas: &mut Canvas,
        root: ElementHandle,
        point: Point,
    ) -> Result<ElementHandle> {
        let Connection::Drawing { wire, .. } = *self else {
            return graph_err!(NotDrawing, "no wire is being drawn".to_owned());
        };
        let root_kind = connection_root(canvas, root)?;

        let element = canvas.element_mut(wire)?;
        if let Some(w) = element.wire_mut() {
            w.end = point;
            w.flags.end_io = root_kind.is_io();
        }
        canvas.add_edge(root, wire, WireRole::End)?;

        *self = Connection::Idle;
        Ok(wire)
    }

    /// Drop the provisional wire together with its Start claim.
    pub fn cancel(&mut self, canvas: &mut Canvas) -> Result<()> {
        if let Connection::Drawing { wire, .. } = *self {
            *self = Connection::Idle;
            canvas.remove(wire)?;
        }
        Ok(())
    }
}

fn connection_root(canvas: &Canvas, root: ElementHandle) -> Result<ElementKind> {
    let element = canvas.element(root)?;
    if element.is_wire() {
        return graph_err!(
            BadConnectionRoot,
            format!("{} cannot own a wire end", element.id)
        );
    }
    Ok(element.kind())
}
