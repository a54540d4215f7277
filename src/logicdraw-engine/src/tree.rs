// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The Solution / Project / Diagram skeleton of a document.
//!
//! Diagrams that are not open hold their content as canonical record text
//! (`model`), one record per line, indented relative to the diagram
//! header.  Only the open diagram is materialized into a [`Canvas`].
//!
//! [`Canvas`]: crate::graph::Canvas

use crate::datamodel::Properties;
use crate::format::grammar::Record;
use crate::history::History;

#[derive(Clone, Debug)]
pub struct Solution {
    pub number: u32,
    pub tag_file: Option<String>,
    pub table_file: Option<String>,
    pub projects: Vec<Project>,
}

#[derive(Clone, Debug)]
pub struct Project {
    pub number: u32,
    pub diagrams: Vec<DiagramNode>,
}

#[derive(Clone, Debug)]
pub struct DiagramNode {
    pub number: u32,
    pub properties: Properties,
    /// Canonical record text of the diagram, header included.
    pub model: String,
    /// Undo state parked while the diagram is closed.
    pub history: Option<History>,
}

impl Solution {
    pub fn new(number: u32) -> Self {
        Solution {
            number,
            tag_file: None,
            table_file: None,
            projects: Vec::new(),
        }
    }

    pub fn record(&self) -> Record {
        Record::Solution {
            number: self.number,
            tag_file: self.tag_file.clone(),
            table_file: self.table_file.clone(),
        }
    }

    pub fn project(&self, number: u32) -> Option<&Project> {
        self.projects.iter().find(|p| p.number == number)
    }

    pub fn project_mut(&mut self, number: u32) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.number == number)
    }

    pub fn diagram_count(&self) -> usize {
        self.projects.iter().map(|p| p.diagrams.len()).sum()
    }
}

impl Project {
    pub fn new(number: u32) -> Self {
        Project {
            number,
            diagrams: Vec::new(),
        }
    }

    pub fn record(&self) -> Record {
        Record::Project {
            number: self.number,
        }
    }

    pub fn diagram(&self, number: u32) -> Option<&DiagramNode> {
        self.diagrams.iter().find(|d| d.number == number)
    }

    pub fn diagram_mut(&mut self, number: u32) -> Option<&mut DiagramNode> {
        self.diagrams.iter_mut().find(|d| d.number == number)
    }
}

impl DiagramNode {
    /// An empty diagram: just its header.
    pub fn new(number: u32, properties: Properties) -> Self {
        let mut node = DiagramNode {
            number,
            properties,
            model: String::new(),
            history: None,
        };
        node.model = node.record().to_string();
        node
    }

    pub fn record(&self) -> Record {
        Record::Diagram {
            number: self.number,
            properties: self.properties,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_diagram_has_header() {
        let node = DiagramNode::new(2, Properties::default());
        assert_eq!(
            "+;Diagram|2;1260;891;330;31;600;750;30;15;15;0;0",
            node.model
        );
    }

    #[test]
    fn test_lookup() {
        let mut solution = Solution::new(0);
        let mut project = Project::new(3);
        project
            .diagrams
            .push(DiagramNode::new(1, Properties::default()));
        solution.projects.push(project);

        assert!(solution.project(0).is_none());
        assert!(solution.project(3).unwrap().diagram(1).is_some());
        assert_eq!(1, solution.diagram_count());
        solution.project_mut(3).unwrap().diagrams.clear();
        assert_eq!(0, solution.diagram_count());
    }
}
