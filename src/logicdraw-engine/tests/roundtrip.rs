// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! End-to-end tests of the document format and the editing operations
//! built on it.
//!
//! These verify that:
//! 1. generate -> parse -> generate is byte-for-byte stable for arbitrary
//!    diagrams, and preserves ids, positions, flags and connectivity
//! 2. older layouts still load into the same graph
//! 3. split, undo/redo and selection behave on parsed documents

use proptest::prelude::*;

use logicdraw_engine::format::{ElementCreator, ElementRecord};
use logicdraw_engine::graph::{ConnectStep, WireEnds};
use logicdraw_engine::{
    Document, ElementHandle, ElementKind, ErrorCode, IdCounter, Point, Properties, WireFlags,
    WireRole, Workspace,
};

const LEGACY_EXAMPLE: &str = "+;Diagram|1;100;100;0;0;100;100;10;1;1;0;0
    +;Input|0;10;20;-1
    +;Output|0;50;20;-1
    +;Wire|0;10;20;50;20;True;True;True;True
        -;Wire|0;Start
        -;Wire|0;End";

#[derive(Clone, Debug)]
enum Node {
    Pin,
    Input(Option<i32>),
    Output(Option<i32>),
    AndGate,
    OrGate,
}

type Placed = (Node, f64, f64);
type WireSpec = (usize, usize, [bool; 4]);

fn node_strategy() -> impl Strategy<Value = Placed> {
    let node = prop_oneof![
        Just(Node::Pin),
        proptest::option::of(0..50i32).prop_map(Node::Input),
        proptest::option::of(0..50i32).prop_map(Node::Output),
        Just(Node::AndGate),
        Just(Node::OrGate),
    ];
    (node, -500.0..500.0f64, -500.0..500.0f64)
}

fn diagram_strategy() -> impl Strategy<Value = (Vec<Placed>, Vec<WireSpec>)> {
    prop::collection::vec(node_strategy(), 1..8).prop_flat_map(|nodes| {
        let n = nodes.len();
        let wires = prop::collection::vec((0..n, 0..n, any::<[bool; 4]>()), 0..8);
        (Just(nodes), wires)
    })
}

fn build(nodes: &[Placed], wires: &[WireSpec]) -> Document {
    let mut document = Document::new(0, Properties::default());
    let mut counter = IdCounter::new();
    let mut handles = Vec::new();

    for (node, x, y) in nodes {
        let position = Point::new(*x, *y);
        let (kind, tag) = match node {
            Node::Pin => (ElementKind::Pin, None),
            Node::Input(tag) => (ElementKind::Input, *tag),
            Node::Output(tag) => (ElementKind::Output, *tag),
            Node::AndGate => (ElementKind::AndGate, None),
            Node::OrGate => (ElementKind::OrGate, None),
        };
        let id = counter.next_element(kind).number;
        let record = match kind {
            ElementKind::Pin => ElementRecord::Pin { id, position },
            ElementKind::Input => ElementRecord::Input { id, position, tag },
            ElementKind::Output => ElementRecord::Output { id, position, tag },
            ElementKind::AndGate => ElementRecord::AndGate { id, position },
            _ => ElementRecord::OrGate { id, position },
        };
        handles.push(document.canvas.create_element(&record, false));
    }

    for &(from, to, [start_visible, end_visible, start_io, end_io]) in wires {
        let start = document.canvas.get(handles[from]).unwrap().position;
        let end = document.canvas.get(handles[to]).unwrap().position;
        let record = ElementRecord::Wire {
            id: counter.next_element(ElementKind::Wire).number,
            start,
            end,
            flags: WireFlags {
                start_visible,
                end_visible,
                start_io,
                end_io,
            },
        };
        let wire = document.canvas.create_element(&record, false);
        assert!(document.canvas.add_edge(handles[from], wire, WireRole::Start).unwrap());
        assert!(document.canvas.add_edge(handles[to], wire, WireRole::End).unwrap());
    }

    document.counter = counter;
    document
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn generate_parse_generate_is_stable((nodes, wires) in diagram_strategy()) {
        let original = build(&nodes, &wires);
        let text = original.snapshot();

        let mut copy = Document::new(0, Properties::default());
        let output = copy.load(&text);
        prop_assert!(output.is_clean(), "{:?}", output.warnings);
        prop_assert_eq!(&text, &copy.snapshot());
        for kind in [ElementKind::Pin, ElementKind::Wire, ElementKind::Input,
                     ElementKind::Output, ElementKind::AndGate, ElementKind::OrGate] {
            let type_name = kind.type_name();
            prop_assert_eq!(original.counter.get(type_name), copy.counter.get(type_name));
        }

        prop_assert_eq!(original.canvas.len(), copy.canvas.len());
        for ((_, a), (_, b)) in original.canvas.iter().zip(copy.canvas.iter()) {
            prop_assert_eq!(a.to_record(), b.to_record());
            let roles_a: Vec<WireRole> = a.edges.iter().map(|e| e.role).collect();
            let roles_b: Vec<WireRole> = b.edges.iter().map(|e| e.role).collect();
            prop_assert_eq!(roles_a, roles_b);
        }
        prop_assert!(copy.canvas.verify().is_empty());
    }

    #[test]
    fn observed_ids_never_collide(ids in prop::collection::vec(0..1000u32, 1..20)) {
        let text: Vec<String> = ids.iter().map(|id| format!("+;Pin|{id};0;0")).collect();
        let mut document = Document::new(0, Properties::default());
        document.load(&text.join("\n"));
        let max = ids.iter().copied().max().unwrap_or(0);
        prop_assert!(document.counter.pin > max);
    }
}

#[test]
fn fractional_wire_ends_survive_reload() {
    let text = "+;Diagram|0;100;100;0;0;100;100;10;1;1;0;0
    +;Wire|0;0.7;0;0.1;0;False;False;False;False
    +;Wire|1;0.3;0.001;2.5;0.001;False;False;False;False";
    let mut document = Document::new(0, Properties::default());
    assert!(document.load(text).is_clean());
    assert_eq!(text, document.snapshot());
}

#[test]
fn legacy_layout_connects_by_geometry() {
    let mut document = Document::new(1, Properties::default());
    let output = document.load(LEGACY_EXAMPLE);
    assert!(output.is_clean(), "{:?}", output.warnings);
    assert_eq!(1, output.totals.diagrams);
    assert_eq!(1, output.totals.inputs);
    assert_eq!(1, output.totals.outputs);
    assert_eq!(1, output.totals.wires);

    let find = |kind| {
        document
            .canvas
            .iter()
            .find(|(_, e)| e.kind() == kind)
            .map(|(h, _)| h)
            .unwrap()
    };
    let (input, output_element, wire) = (
        find(ElementKind::Input),
        find(ElementKind::Output),
        find(ElementKind::Wire),
    );
    assert_eq!(
        WireEnds::Connected {
            start: input,
            end: output_element
        },
        document.canvas.get(wire).unwrap().wire().unwrap().ends
    );

    let generated = document.snapshot();
    let mut again = Document::new(1, Properties::default());
    assert!(again.load(&generated).is_clean());
    assert_eq!(generated, again.snapshot());
    assert_eq!(
        "+;Diagram|1;100;100;0;0;100;100;10;1;1;0;0
    +;Input|0;10;20;-1
        -;Wire|0;Start
    +;Output|0;50;20;-1
        -;Wire|0;End
    +;Wire|0;10;20;50;20;True;True;True;True",
        generated
    );
}

#[test]
fn split_parsed_wire() {
    let mut document = Document::new(1, Properties::default());
    document.load(LEGACY_EXAMPLE);
    let wire = document
        .canvas
        .iter()
        .find(|(_, e)| e.is_wire())
        .map(|(h, _)| h)
        .unwrap();

    document.add_history(false);
    let q = Point::new(30.0, 20.0);
    let split = document.split_wire(wire, q, false).unwrap();

    let first = document.canvas.get(split.first).unwrap();
    let second = document.canvas.get(split.second).unwrap();
    assert_eq!(Some((Point::new(10.0, 20.0), q)), first.wire_points());
    assert_eq!(Some((q, Point::new(50.0, 20.0))), second.wire_points());
    assert_eq!("Pin|0", document.canvas.get(split.pin).unwrap().id.to_string());
    assert_eq!("Wire|1", first.id.to_string());
    assert_eq!("Wire|2", second.id.to_string());
    assert!(document.canvas.verify().is_empty());

    // the split survives a round trip through text
    let text = document.snapshot();
    let mut copy = Document::new(1, Properties::default());
    assert!(copy.load(&text).is_clean());
    assert_eq!(text, copy.snapshot());

    // and can be undone in one step
    assert!(document.undo());
    assert_eq!(3, document.canvas.len());
}

#[test]
fn split_rejects_bad_connection_counts() {
    let text = "+;Diagram|0;100;100;0;0;100;100;10;1;1;0;0
    +;Pin|0;0;0
        -;Wire|0;Start
    +;Wire|0;0;0;40;0;False;False;False;False";
    let mut document = Document::new(0, Properties::default());
    assert!(document.load(text).is_clean());
    let before = document.snapshot();
    let wire = document.canvas.handles()[1];

    let err = document
        .split_wire(wire, Point::new(20.0, 0.0), false)
        .unwrap_err();
    assert_eq!(ErrorCode::SplitConnectionCount, err.code);
    assert_eq!(before, document.snapshot());
}

#[test]
fn history_moves_one_snapshot_at_a_time() {
    let mut document = Document::new(0, Properties::default());
    let mut snapshots = Vec::new();
    for x in 0..3 {
        snapshots.push(document.snapshot());
        document.add_history(false);
        document.canvas.create_element(
            &ElementRecord::Pin {
                id: x,
                position: Point::new(f64::from(x) * 30.0, 0.0),
            },
            false,
        );
    }
    assert_eq!(3, document.history().undo_depth());
    assert_eq!(0, document.history().redo_depth());

    for expected in snapshots.iter().rev() {
        assert!(document.undo());
        assert_eq!(*expected, document.snapshot());
    }
    assert!(!document.undo());
    assert_eq!(3, document.history().redo_depth());

    assert!(document.redo());
    assert_eq!(1, document.canvas.len());
    document.add_history(false);
    assert_eq!(0, document.history().redo_depth());
}

#[test]
fn cyclic_selection_terminates() {
    let mut document = Document::new(0, Properties::default());
    let mut pins: Vec<ElementHandle> = Vec::new();
    for (id, x) in [(0, 0.0), (1, 60.0)] {
        pins.push(document.canvas.create_element(
            &ElementRecord::Pin {
                id,
                position: Point::new(x, 0.0),
            },
            false,
        ));
    }
    document.counter.pin = 2;
    let (a, b) = (pins[0], pins[1]);

    let mut wires = Vec::new();
    for (from, to) in [(a, b), (b, a)] {
        document.connect(from, Point::new(0.0, 0.0)).unwrap();
        match document.connect(to, Point::new(60.0, 0.0)).unwrap() {
            ConnectStep::Finished(wire) => wires.push(wire),
            ConnectStep::Started(_) => panic!("expected a finished wire"),
        }
    }

    // reload through text so the selection runs on a parsed graph
    let text = document.snapshot();
    document.load(&text);
    let a = document.canvas.handles()[0];
    assert_eq!(2, document.canvas.select_connected(a).unwrap());
    assert_eq!(4, document.canvas.selected().len());
}

#[test]
fn workspace_generate_parse_generate_is_stable() {
    let mut workspace = Workspace::new();
    let project = workspace.add_project();
    workspace.add_diagram(project).unwrap();
    workspace.open_diagram(0, 0).unwrap();
    {
        let document = workspace.document_mut().unwrap();
        document.load(LEGACY_EXAMPLE);
    }
    let text = workspace.generate();

    let (mut reopened, output) = Workspace::from_text(&text);
    assert!(output.is_clean());
    assert_eq!(text, reopened.generate());
    assert_eq!(workspace.counter.diagram, reopened.counter.diagram);
}
