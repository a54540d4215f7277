// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Serialization of live elements and the tree back to text.
//!
//! Output is canonical: one root record per element in canvas order, each
//! followed by one child record per edge, four spaces of indentation per
//! tree level, lines joined by `\n` and no trailing newline.

use std::collections::HashSet;
use std::fmt::Display;

use tracing::debug;

use crate::format::grammar::Record;
use crate::graph::{Canvas, ElementHandle};
use crate::tree::Solution;

pub const INDENT: &str = "    ";

/// Append one record line at `depth`.
pub(crate) fn push_record(text: &mut String, depth: usize, record: &dyn Display) {
    if !text.is_empty() {
        text.push('\n');
    }
    for _ in 0..depth {
        text.push_str(INDENT);
    }
    text.push_str(&record.to_string());
}

/// Append a block of already indented lines, shifted down by `depth`.
fn push_block(text: &mut String, depth: usize, block: &str) {
    for line in block.lines().filter(|line| !line.trim().is_empty()) {
        push_record(text, depth, &line);
    }
}

fn push_elements(text: &mut String, canvas: &Canvas, handles: &[ElementHandle], depth: usize) {
    let included: HashSet<ElementHandle> = handles.iter().copied().collect();
    for &handle in handles {
        let Some(element) = canvas.get(handle) else {
            continue;
        };
        push_record(text, depth, &Record::Element(element.to_record()));
        for edge in element.edges.iter() {
            // edges to wires left out of a partial copy would dangle
            if !included.contains(&edge.wire) {
                continue;
            }
            let Some(wire) = canvas.get(edge.wire) else {
                continue;
            };
            let record = Record::WireRole {
                wire: wire.id.name(),
                role: edge.role,
            };
            push_record(text, depth + 1, &record);
        }
    }
}

/// The given elements as a fragment, e.g. for the clipboard.
pub fn generate_elements(canvas: &Canvas, handles: &[ElementHandle]) -> String {
    let mut text = String::new();
    push_elements(&mut text, canvas, handles, 0);
    text
}

/// The selected elements as a fragment.
pub fn generate_selected(canvas: &Canvas) -> String {
    generate_elements(canvas, &canvas.selected())
}

/// A whole diagram: header followed by every element.
pub fn generate_diagram(number: u32, canvas: &Canvas) -> String {
    let mut text = String::new();
    let header = Record::Diagram {
        number,
        properties: *canvas.properties(),
    };
    push_record(&mut text, 0, &header);
    push_elements(&mut text, canvas, &canvas.handles(), 1);
    debug!("Generated Diagram|{} with {} element(s)", number, canvas.len());
    text
}

/// A whole solution.  Diagrams are written from their stored model text.
pub fn generate_solution(solution: &Solution) -> String {
    let mut text = String::new();
    push_record(&mut text, 0, &solution.record());
    for project in solution.projects.iter() {
        push_record(&mut text, 1, &project.record());
        for diagram in project.diagrams.iter() {
            push_block(&mut text, 2, &diagram.model);
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datamodel::{Point, Properties, WireFlags, WireRole};
    use crate::format::creator::ElementCreator;
    use crate::format::grammar::ElementRecord;
    use crate::tree::{DiagramNode, Project};

    fn canvas() -> (Canvas, ElementHandle, ElementHandle, ElementHandle) {
        let mut canvas = Canvas::new(Properties::default());
        let a = canvas.create_element(
            &ElementRecord::Input {
                id: 0,
                position: Point::new(10.0, 20.0),
                tag: Some(3),
            },
            false,
        );
        let b = canvas.create_element(
            &ElementRecord::AndGate {
                id: 0,
                position: Point::new(50.5, 20.0),
            },
            false,
        );
        let w = canvas.create_element(
            &ElementRecord::Wire {
                id: 2,
                start: Point::new(10.0, 20.0),
                end: Point::new(50.5, 20.0),
                flags: WireFlags {
                    start_io: true,
                    ..Default::default()
                },
            },
            false,
        );
        canvas.add_edge(a, w, WireRole::Start).unwrap();
        canvas.add_edge(b, w, WireRole::End).unwrap();
        (canvas, a, b, w)
    }

    #[test]
    fn test_generate_elements() {
        let (canvas, ..) = canvas();
        let expected = "+;Input|0;10;20;3\n\
                        \x20   -;Wire|2;Start\n\
                        +;AndGate|0;50.5;20\n\
                        \x20   -;Wire|2;End\n\
                        +;Wire|2;10;20;50.5;20;False;False;True;False";
        assert_eq!(expected, generate_elements(&canvas, &canvas.handles()));
    }

    #[test]
    fn test_partial_copy_drops_outside_edges() {
        let (mut canvas, a, b, _) = canvas();
        canvas.get_mut(a).unwrap().selected = true;
        canvas.get_mut(b).unwrap().selected = true;
        assert_eq!(
            "+;Input|0;10;20;3\n+;AndGate|0;50.5;20",
            generate_selected(&canvas)
        );
    }

    #[test]
    fn test_generate_diagram() {
        let (canvas, ..) = canvas();
        let text = generate_diagram(4, &canvas);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(6, lines.len());
        assert_eq!("+;Diagram|4;1260;891;330;31;600;750;30;15;15;0;0", lines[0]);
        assert_eq!("    +;Input|0;10;20;3", lines[1]);
        assert_eq!("        -;Wire|2;Start", lines[2]);
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_generate_solution() {
        let mut solution = Solution::new(0);
        solution.tag_file = Some("tags.csv".to_owned());
        let mut project = Project::new(0);
        project
            .diagrams
            .push(DiagramNode::new(0, Properties::default()));
        solution.projects.push(project);

        let expected = "+;Solution|0;tags.csv\n\
                        \x20   +;Project|0\n\
                        \x20       +;Diagram|0;1260;891;330;31;600;750;30;15;15;0;0";
        assert_eq!(expected, generate_solution(&solution));
    }

    #[test]
    fn test_empty_canvas() {
        let canvas = Canvas::default();
        assert_eq!("", generate_elements(&canvas, &canvas.handles()));
    }
}
