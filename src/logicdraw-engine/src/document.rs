// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use tracing::{debug, warn};

use crate::common::Result;
use crate::config::{HistoryConfig, ParseOptions};
use crate::datamodel::{Point, Properties};
use crate::format::{ParseOutput, generate_diagram, generate_selected, parse_into};
use crate::graph::{Canvas, ConnectStep, Connection, ElementHandle, Split, split_wire};
use crate::history::History;
use crate::ids::IdCounter;

/// One open diagram: its live elements, the id counter they draw from,
/// and their undo history.
///
/// Callers record history with [`Document::add_history`] *before* each
/// mutation they want to be undoable.
#[derive(Debug)]
pub struct Document {
    number: u32,
    pub canvas: Canvas,
    pub counter: IdCounter,
    config: HistoryConfig,
    history: Option<History>,
    connection: Connection,
    cursor: Option<usize>,
}

impl Document {
    pub fn new(number: u32, properties: Properties) -> Self {
        Document {
            number,
            canvas: Canvas::new(properties),
            counter: IdCounter::new(),
            config: HistoryConfig::default(),
            history: None,
            connection: Connection::Idle,
            cursor: None,
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn history_config(&self) -> &HistoryConfig {
        &self.config
    }

    pub fn set_history_config(&mut self, config: HistoryConfig) {
        self.config = config;
    }

    /// The undo/redo stacks, created on first use.
    pub fn history(&mut self) -> &mut History {
        self.history.get_or_insert_with(History::new)
    }

    pub(crate) fn take_history(&mut self) -> Option<History> {
        self.history.take()
    }

    pub(crate) fn set_history(&mut self, history: Option<History>) {
        self.history = history;
    }

    /// The whole diagram as text.
    pub fn snapshot(&self) -> String {
        generate_diagram(self.number, &self.canvas)
    }

    /// Replace the content with `text`.
    pub fn load(&mut self, text: &str) -> ParseOutput {
        self.reset_interaction();
        self.canvas.clear();
        parse_into(text, &ParseOptions::load(), &mut self.canvas, &mut self.counter)
    }

    /// Insert `text` under fresh ids, moved by `offset`.  Only the pasted
    /// elements end up selected.
    pub fn paste(&mut self, text: &str, offset: Point) -> ParseOutput {
        self.canvas.deselect_all();
        parse_into(
            text,
            &ParseOptions::paste(offset),
            &mut self.canvas,
            &mut self.counter,
        )
    }

    pub fn copy_selected(&self) -> String {
        generate_selected(&self.canvas)
    }

    /// Drop every element and restart element ids from zero.
    pub fn clear(&mut self) {
        self.reset_interaction();
        self.canvas.clear();
        self.counter.reset_diagram();
    }

    /// Push the current state for undo and forget the redo stack.
    pub fn add_history(&mut self, reset_selection: bool) {
        if !self.config.enabled {
            return;
        }
        let snapshot = self.snapshot();
        let limit = self.config.limit;
        self.history().record(snapshot, limit);
        if reset_selection {
            self.cursor = None;
        }
    }

    /// Step back one snapshot.  Returns false when there was nothing to
    /// undo or history is disabled.
    pub fn undo(&mut self) -> bool {
        if !self.config.enabled || self.history().undo_depth() == 0 {
            return false;
        }
        let current = self.config.keep_redo.then(|| self.snapshot());
        let Some(snapshot) = self.history().pop_undo() else {
            return false;
        };
        if let Some(current) = current {
            self.history().push_redo(current);
        }
        self.restore(&snapshot);
        debug!("Undo on Diagram|{}", self.number);
        true
    }

    /// Re-apply the last undone snapshot.
    pub fn redo(&mut self) -> bool {
        if !self.config.enabled || self.history().redo_depth() == 0 {
            return false;
        }
        let current = self.config.keep_redo.then(|| self.snapshot());
        let Some(snapshot) = self.history().pop_redo() else {
            return false;
        };
        if let Some(current) = current {
            self.history().push_undo(current);
        }
        self.restore(&snapshot);
        debug!("Redo on Diagram|{}", self.number);
        true
    }

    fn restore(&mut self, snapshot: &str) {
        let output = self.load(snapshot);
        if !output.is_clean() {
            warn!(
                "Diagram|{} snapshot restored with {} warning(s)",
                self.number,
                output.warnings.len()
            );
        }
    }

    fn reset_interaction(&mut self) {
        self.connection = Connection::Idle;
        self.cursor = None;
    }

    pub fn connection(&self) -> Connection {
        self.connection
    }

    /// Feed one wire endpoint to the connection state machine.
    pub fn connect(&mut self, root: ElementHandle, point: Point) -> Result<ConnectStep> {
        self.connection
            .connect(&mut self.canvas, &mut self.counter, root, point)
    }

    pub fn cancel_connection(&mut self) -> Result<()> {
        self.connection.cancel(&mut self.canvas)
    }

    pub fn split_wire(&mut self, wire: ElementHandle, point: Point, snap: bool) -> Result<Split> {
        split_wire(&mut self.canvas, &mut self.counter, wire, point, snap)
    }

    /// Move the single selection to the next element in canvas order.
    pub fn select_next(&mut self) -> Option<ElementHandle> {
        self.cursor = self.canvas.select_next(self.cursor);
        let cursor = self.cursor?;
        self.canvas.handles().get(cursor).copied()
    }

    /// Remove the selected elements (and wires attached to them).  A wire
    /// being drawn that goes with them ends the drawing.
    pub fn delete_selected(&mut self) -> Vec<ElementHandle> {
        self.cursor = None;
        let removed = self.canvas.remove_selected();
        if let Connection::Drawing { wire, .. } = self.connection
            && self.canvas.get(wire).is_none()
        {
            debug!("Drawing of a deleted wire abandoned");
            self.connection = Connection::Idle;
        }
        removed
    }
}
