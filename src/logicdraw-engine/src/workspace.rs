// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use tracing::{debug, warn};

use crate::common::Result;
use crate::config::HistoryConfig;
use crate::datamodel::Properties;
use crate::document::Document;
use crate::format::{ParseOutput, generate_solution, parse};
use crate::graph_err;
use crate::ids::{IdCounter, TypeName};
use crate::tags::TagTable;
use crate::tree::{DiagramNode, Project, Solution};

#[derive(Debug)]
struct OpenDiagram {
    project: u32,
    document: Document,
}

/// A solution being edited: its tree, the id counter every tree node and
/// the open diagram draw from, its tags, and at most one open diagram.
#[derive(Debug)]
pub struct Workspace {
    pub solution: Solution,
    pub counter: IdCounter,
    pub tags: TagTable,
    config: HistoryConfig,
    open: Option<OpenDiagram>,
}

impl Default for Workspace {
    fn default() -> Self {
        Workspace::new()
    }
}

impl Workspace {
    /// A solution with one project holding one empty diagram.
    pub fn new() -> Self {
        let mut counter = IdCounter::new();
        let mut solution = Solution::new(counter.next(TypeName::Solution));
        let mut project = Project::new(counter.next(TypeName::Project));
        project.diagrams.push(DiagramNode::new(
            counter.next(TypeName::Diagram),
            Properties::default(),
        ));
        solution.projects.push(project);

        Workspace {
            solution,
            counter,
            tags: TagTable::new(),
            config: HistoryConfig::default(),
            open: None,
        }
    }

    /// Build a workspace from document text.  Projects and diagrams
    /// outside any solution are adopted into a new one.
    pub fn from_text(text: &str) -> (Workspace, ParseOutput) {
        let output = parse(text);
        let mut counter = output.counter;

        let mut solutions = output.solutions.iter().cloned();
        let mut solution = match solutions.next() {
            Some(solution) => solution,
            None => Solution::new(counter.next(TypeName::Solution)),
        };
        if solutions.next().is_some() {
            warn!(
                "text holds {} solutions, only Solution|{} is kept",
                output.solutions.len(),
                solution.number
            );
        }

        solution.projects.extend(output.projects.iter().cloned());
        if !output.diagrams.is_empty() {
            let mut project = Project::new(counter.next(TypeName::Project));
            project.diagrams.extend(output.diagrams.iter().cloned());
            solution.projects.push(project);
        }

        let workspace = Workspace {
            solution,
            counter,
            tags: TagTable::new(),
            config: HistoryConfig::default(),
            open: None,
        };
        (workspace, output)
    }

    pub fn set_history_config(&mut self, config: HistoryConfig) {
        if let Some(open) = self.open.as_mut() {
            open.document.set_history_config(config.clone());
        }
        self.config = config;
    }

    pub fn add_project(&mut self) -> u32 {
        let number = self.counter.next(TypeName::Project);
        self.solution.projects.push(Project::new(number));
        debug!("Added Project|{}", number);
        number
    }

    /// Add an empty diagram with default properties to `project`.
    pub fn add_diagram(&mut self, project: u32) -> Result<u32> {
        let number = self.counter.next(TypeName::Diagram);
        let Some(p) = self.solution.project_mut(project) else {
            return graph_err!(DoesNotExist, format!("Project|{project}"));
        };
        p.diagrams
            .push(DiagramNode::new(number, Properties::default()));
        debug!("Added Diagram|{} to Project|{}", number, project);
        Ok(number)
    }

    pub fn remove_project(&mut self, project: u32) -> Result<()> {
        let Some(i) = self.solution.projects.iter().position(|p| p.number == project) else {
            return graph_err!(DoesNotExist, format!("Project|{project}"));
        };
        if self.open.as_ref().is_some_and(|open| open.project == project) {
            self.open = None;
        }
        self.solution.projects.remove(i);
        Ok(())
    }

    pub fn remove_diagram(&mut self, project: u32, diagram: u32) -> Result<()> {
        let Some(p) = self.solution.project_mut(project) else {
            return graph_err!(DoesNotExist, format!("Project|{project}"));
        };
        let Some(i) = p.diagrams.iter().position(|d| d.number == diagram) else {
            return graph_err!(DoesNotExist, format!("Diagram|{diagram}"));
        };
        p.diagrams.remove(i);
        if self
            .open
            .as_ref()
            .is_some_and(|open| open.project == project && open.document.number() == diagram)
        {
            self.open = None;
        }
        Ok(())
    }

    /// Materialize a diagram for editing.  Whatever was open before is
    /// stored back into its node first.
    pub fn open_diagram(&mut self, project: u32, diagram: u32) -> Result<ParseOutput> {
        if self.open.is_some() {
            self.close_diagram()?;
        }

        let mut counter = self.counter;
        counter.reset_diagram();
        let config = self.config.clone();

        let node = self.node_mut(project, diagram)?;
        let mut document = Document::new(diagram, node.properties);
        document.counter = counter;
        document.set_history_config(config);
        document.set_history(node.history.take());
        let output = document.load(&node.model);

        debug!(
            "Opened Diagram|{} with {} element(s)",
            diagram,
            document.canvas.len()
        );
        self.open = Some(OpenDiagram { project, document });
        Ok(output)
    }

    pub fn document(&self) -> Option<&Document> {
        self.open.as_ref().map(|open| &open.document)
    }

    pub fn document_mut(&mut self) -> Option<&mut Document> {
        self.open.as_mut().map(|open| &mut open.document)
    }

    /// Store the open diagram back into its node.
    pub fn sync(&mut self) -> Result<()> {
        let Some(open) = self.open.as_ref() else {
            return graph_err!(NoOpenDiagram);
        };
        let (project, number) = (open.project, open.document.number());
        let model = open.document.snapshot();
        let properties = *open.document.canvas.properties();
        let counter = open.document.counter;

        let node = self.node_mut(project, number)?;
        node.model = model;
        node.properties = properties;
        self.counter.merge(&counter);
        Ok(())
    }

    /// Sync and drop the open diagram, parking its history in the node.
    pub fn close_diagram(&mut self) -> Result<()> {
        self.sync()?;
        if let Some(mut open) = self.open.take() {
            let history = open.document.take_history();
            let node = self.node_mut(open.project, open.document.number())?;
            node.history = history;
        }
        Ok(())
    }

    /// The whole solution as text, including unsaved edits of the open
    /// diagram.
    pub fn generate(&mut self) -> String {
        if self.open.is_some()
            && let Err(err) = self.sync()
        {
            warn!("open diagram could not be stored: {}", err);
        }
        generate_solution(&self.solution)
    }

    /// Start over with a fresh solution; all ids restart from zero.
    pub fn clear(&mut self) {
        let config = self.config.clone();
        *self = Workspace::new();
        self.config = config;
    }

    fn node_mut(&mut self, project: u32, diagram: u32) -> Result<&mut DiagramNode> {
        let Some(p) = self.solution.project_mut(project) else {
            return graph_err!(DoesNotExist, format!("Project|{project}"));
        };
        match p.diagram_mut(diagram) {
            Some(node) => Ok(node),
            None => graph_err!(DoesNotExist, format!("Diagram|{diagram}")),
        }
    }
}

#[cfg(feature = "file_io")]
mod file {
    use std::path::Path;

    use tracing::warn;

    use super::Workspace;
    use crate::common::{ErrorCode, ParseWarning, Result};
    use crate::format::ParseOutput;
    use crate::io;
    use crate::tags::TagTable;

    impl Workspace {
        /// Open a solution file, loading its tag file when it names one.
        /// A missing or broken tag file is reported as a warning.
        pub fn open_file(path: &Path) -> Result<(Workspace, ParseOutput)> {
            let text = io::open(path)?;
            let (mut workspace, mut output) = Workspace::from_text(&text);

            if let Some(tag_file) = workspace.solution.tag_file.clone() {
                let tag_path = path
                    .parent()
                    .map(|dir| dir.join(&tag_file))
                    .unwrap_or_else(|| tag_file.clone().into());
                match TagTable::load(&tag_path) {
                    Ok(tags) => workspace.tags = tags,
                    Err(err) => {
                        warn!("tags not loaded: {}", err);
                        output.warnings.push(ParseWarning::new(
                            0,
                            ErrorCode::TagFile,
                            err.get_details().unwrap_or(tag_file),
                        ));
                    }
                }
            }
            Ok((workspace, output))
        }

        pub fn save_file(&mut self, path: &Path) -> Result<()> {
            let text = self.generate();
            io::save(path, &text)
        }
    }
}
