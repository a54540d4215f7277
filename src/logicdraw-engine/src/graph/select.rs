// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::HashSet;

use crate::common::Result;
use crate::graph::canvas::Canvas;
use crate::graph::element::ElementHandle;

impl Canvas {
    /// Select everything reachable from `from` through wires.
    ///
    /// Returns the number of non-wire elements visited.
    pub fn select_connected(&mut self, from: ElementHandle) -> Result<usize> {
        let start = self.element(from)?;
        // starting on a wire floods from both of its owners
        let roots: Vec<ElementHandle> = match start.wire() {
            Some(wire) => {
                let roots = [wire.ends.start(), wire.ends.end()];
                self.element_mut(from)?.selected = true;
                roots.into_iter().flatten().collect()
            }
            None => vec![from],
        };

        let mut visited: HashSet<ElementHandle> = HashSet::new();
        let mut stack: Vec<(ElementHandle, Option<ElementHandle>)> =
            roots.into_iter().rev().map(|root| (root, None)).collect();

        while let Some((current, came_from)) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            let Some(element) = self.get_mut(current) else {
                continue;
            };
            element.selected = true;
            let wires: Vec<ElementHandle> = element.edges.iter().map(|edge| edge.wire).collect();

            for wire in wires.into_iter().rev() {
                let Some(wire_element) = self.get_mut(wire) else {
                    continue;
                };
                wire_element.selected = true;
                let Some(w) = wire_element.wire() else {
                    continue;
                };
                for next in [w.ends.end(), w.ends.start()].into_iter().flatten() {
                    if next != current && Some(next) != came_from && !visited.contains(&next) {
                        stack.push((next, Some(current)));
                    }
                }
            }
        }

        Ok(visited.len())
    }

    pub fn select_all(&mut self) {
        for (_, element) in self.iter_mut() {
            element.selected = true;
        }
    }

    pub fn deselect_all(&mut self) {
        for (_, element) in self.iter_mut() {
            element.selected = false;
        }
    }

    /// Selected elements in canvas order.
    pub fn selected(&self) -> Vec<ElementHandle> {
        self.iter()
            .filter(|(_, element)| element.selected)
            .map(|(handle, _)| handle)
            .collect()
    }

    /// Select only the element following `cursor` in canvas order,
    /// wrapping around.  Returns the new cursor.
    pub fn select_next(&mut self, cursor: Option<usize>) -> Option<usize> {
        let handles = self.handles();
        if handles.is_empty() {
            return None;
        }
        let next = match cursor {
            Some(i) if i + 1 < handles.len() => i + 1,
            _ => 0,
        };
        self.deselect_all();
        if let Some(element) = self.get_mut(handles[next]) {
            element.selected = true;
        }
        Some(next)
    }
}
