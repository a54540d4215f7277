// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Single-pass document parser.
//!
//! The parser always rebuilds the tree skeleton.  When asked to create
//! elements it also hands every element record to an [`ElementCreator`],
//! collects wire claims in a [`ConnectionDict`] and resolves them once the
//! whole text has been read.

use serde::Serialize;
use tracing::{debug, warn};

use crate::common::{ErrorCode, ParseWarning};
use crate::config::ParseOptions;
use crate::datamodel::Properties;
use crate::format::creator::{Claim, ConnectionDict, ElementCreator};
use crate::format::generator::push_record;
use crate::format::grammar::{ElementRecord, Record, parse_record};
use crate::graph::ElementHandle;
use crate::ids::{ElementKind, IdCounter, Name, TypeName};
use crate::tree::{DiagramNode, Project, Solution};

/// How many records of each kind a parse read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RecordTotals {
    pub solutions: usize,
    pub projects: usize,
    pub diagrams: usize,
    pub pins: usize,
    pub wires: usize,
    pub inputs: usize,
    pub outputs: usize,
    pub and_gates: usize,
    pub or_gates: usize,
    pub wire_roles: usize,
    pub skipped: usize,
}

impl RecordTotals {
    fn count(&mut self, record: &Record) {
        let total = match record {
            Record::Solution { .. } => &mut self.solutions,
            Record::Project { .. } => &mut self.projects,
            Record::Diagram { .. } => &mut self.diagrams,
            Record::WireRole { .. } => &mut self.wire_roles,
            Record::Element(element) => match element.kind() {
                ElementKind::Pin => &mut self.pins,
                ElementKind::Wire => &mut self.wires,
                ElementKind::Input => &mut self.inputs,
                ElementKind::Output => &mut self.outputs,
                ElementKind::AndGate => &mut self.and_gates,
                ElementKind::OrGate => &mut self.or_gates,
            },
        };
        *total += 1;
    }

    pub fn elements(&self) -> usize {
        self.pins + self.wires + self.inputs + self.outputs + self.and_gates + self.or_gates
    }
}

/// Everything a parse produced.
#[derive(Clone, Debug, Default)]
pub struct ParseOutput {
    pub solutions: Vec<Solution>,
    /// Projects outside any solution.
    pub projects: Vec<Project>,
    /// Diagrams outside any project, e.g. a snapshot.
    pub diagrams: Vec<DiagramNode>,
    /// Properties of the last diagram header read.
    pub properties: Option<Properties>,
    /// Created elements, in file order.
    pub elements: Vec<ElementHandle>,
    /// Ids seen in the text.
    pub counter: IdCounter,
    pub totals: RecordTotals,
    pub warnings: Vec<ParseWarning>,
}

impl ParseOutput {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Read the tree skeleton only.
pub fn parse(text: &str) -> ParseOutput {
    let options = ParseOptions::tree_only();
    DocumentParser::new(&options, None).run(text)
}

/// Read `text`, materializing elements through `creator` as `options`
/// say.  `counter` is the authoritative id counter of the receiving
/// document.
pub fn parse_into(
    text: &str,
    options: &ParseOptions,
    creator: &mut dyn ElementCreator,
    counter: &mut IdCounter,
) -> ParseOutput {
    let mut output = DocumentParser::new(options, Some(&mut *creator)).run(text);

    if options.create_elements {
        let elements = output.elements.clone();
        if options.append_ids {
            creator.append_ids(counter, &elements);
        } else if options.update_ids {
            creator.update_counter(counter, &output.counter);
        }
        creator.insert_elements(&elements, options.select, options.offset.x, options.offset.y);
    }
    output.warnings.sort_by_key(|warning| warning.line);
    output
}

/// Where the open project or diagram lives in the output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    InParent,
    TopLevel,
}

/// The root record child records attach to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LastRoot {
    Nothing,
    TreeNode,
    Element(Option<ElementHandle>),
}

struct DocumentParser<'a> {
    options: &'a ParseOptions,
    creator: Option<&'a mut dyn ElementCreator>,
    output: ParseOutput,
    dict: ConnectionDict,
    last_root: LastRoot,
    in_solution: bool,
    project: Option<Slot>,
    diagram: Option<Slot>,
}

impl<'a> DocumentParser<'a> {
    fn new(options: &'a ParseOptions, creator: Option<&'a mut dyn ElementCreator>) -> Self {
        let creator = if options.create_elements { creator } else { None };
        DocumentParser {
            options,
            creator,
            output: ParseOutput::default(),
            dict: ConnectionDict::new(),
            last_root: LastRoot::Nothing,
            in_solution: false,
            project: None,
            diagram: None,
        }
    }

    fn run(mut self, text: &str) -> ParseOutput {
        for (i, line) in text.lines().enumerate() {
            let line_no = i + 1;
            match parse_record(line) {
                Ok(None) => {}
                Ok(Some(record)) => self.record(line_no, record),
                Err(code) => self.skip(line_no, code, line.trim()),
            }
        }

        if let Some(creator) = self.creator.as_mut() {
            let warnings = creator.update_connections(&self.dict);
            self.output.warnings.extend(warnings);
        }

        let totals = &self.output.totals;
        debug!(
            "Parsed {} diagram(s), {} element(s), {} claim(s), {} skipped",
            totals.diagrams,
            totals.elements(),
            totals.wire_roles,
            totals.skipped
        );
        self.output
    }

    fn skip(&mut self, line_no: usize, code: ErrorCode, line: &str) {
        warn!("line {}: skipping record ({}): {}", line_no, code, line);
        self.output.totals.skipped += 1;
        self.output
            .warnings
            .push(ParseWarning::new(line_no, code, line));
    }

    fn record(&mut self, line_no: usize, record: Record) {
        match record {
            Record::Solution {
                number,
                ref tag_file,
                ref table_file,
            } => {
                self.output.counter.observe(Name::new(TypeName::Solution, number));
                let mut solution = Solution::new(number);
                solution.tag_file = tag_file.clone();
                solution.table_file = table_file.clone();
                self.output.solutions.push(solution);
                self.in_solution = true;
                self.project = None;
                self.diagram = None;
                self.last_root = LastRoot::TreeNode;
            }
            Record::Project { number } => {
                self.output.counter.observe(Name::new(TypeName::Project, number));
                let project = Project::new(number);
                match self.output.solutions.last_mut() {
                    Some(solution) if self.in_solution => {
                        solution.projects.push(project);
                        self.project = Some(Slot::InParent);
                    }
                    _ => {
                        self.output.projects.push(project);
                        self.project = Some(Slot::TopLevel);
                    }
                }
                self.diagram = None;
                self.last_root = LastRoot::TreeNode;
            }
            Record::Diagram { number, properties } => {
                self.output.counter.observe(Name::new(TypeName::Diagram, number));
                let node = DiagramNode::new(number, properties);
                match self.current_project() {
                    Some(project) => {
                        project.diagrams.push(node);
                        self.diagram = Some(Slot::InParent);
                    }
                    None => {
                        self.output.diagrams.push(node);
                        self.diagram = Some(Slot::TopLevel);
                    }
                }
                self.output.properties = Some(properties);
                if let Some(creator) = self.creator.as_mut() {
                    creator.create_diagram(&properties);
                    let (x, y, width, height, size) = properties.grid();
                    creator.create_grid(x, y, width, height, size);
                }
                self.last_root = LastRoot::TreeNode;
            }
            Record::Element(ref element) => {
                let name = element.id().name();
                self.output.counter.observe(name);
                let handle = self.create(line_no, name, element);
                self.append_model(line_no, 1, &record);
                self.last_root = LastRoot::Element(handle);
            }
            Record::WireRole { wire, role } => {
                let LastRoot::Element(owner) = self.last_root else {
                    self.skip(line_no, ErrorCode::OrphanChildRecord, &record.to_string());
                    return;
                };
                if let Some(owner) = owner {
                    self.dict.claim(Claim {
                        wire,
                        owner,
                        role,
                        line: line_no,
                    });
                }
                self.append_model(line_no, 2, &record);
            }
        }
        self.output.totals.count(&record);
    }

    fn create(&mut self, line_no: usize, name: Name, element: &ElementRecord) -> Option<ElementHandle> {
        let creator = self.creator.as_mut()?;
        let handle = creator.create_element(element, self.options.snap);
        if self.dict.register(name, handle).is_some() {
            warn!("line {}: {} appears more than once", line_no, name);
        }
        self.output.elements.push(handle);
        Some(handle)
    }

    fn current_project(&mut self) -> Option<&mut Project> {
        match self.project? {
            Slot::InParent => self.output.solutions.last_mut()?.projects.last_mut(),
            Slot::TopLevel => self.output.projects.last_mut(),
        }
    }

    fn current_diagram(&mut self) -> Option<&mut DiagramNode> {
        match self.diagram? {
            Slot::InParent => self.current_project()?.diagrams.last_mut(),
            Slot::TopLevel => self.output.diagrams.last_mut(),
        }
    }

    /// Keep the record in the open diagram's model text.  Without a live
    /// canvas, a record outside any diagram has nowhere to go.
    fn append_model(&mut self, line_no: usize, depth: usize, record: &Record) {
        if let Some(diagram) = self.current_diagram() {
            push_record(&mut diagram.model, depth, record);
        } else if self.creator.is_none() {
            warn!("line {}: {} is outside any diagram", line_no, record);
            self.output.warnings.push(ParseWarning::new(
                line_no,
                ErrorCode::OrphanChildRecord,
                record.to_string(),
            ));
        }
    }
}
