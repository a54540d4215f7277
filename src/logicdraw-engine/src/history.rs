// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Undo/redo stacks of whole-diagram snapshots.
//!
//! A snapshot is the generator's text for the diagram, so restoring one is
//! an ordinary parse.  The stacks themselves know nothing about documents;
//! [`Document`](crate::Document) drives them.

use std::fmt;
use std::rc::Rc;

/// Stack depths handed to change listeners.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HistoryStatus {
    pub undo_depth: usize,
    pub redo_depth: usize,
}

impl HistoryStatus {
    pub fn can_undo(&self) -> bool {
        self.undo_depth > 0
    }

    pub fn can_redo(&self) -> bool {
        self.redo_depth > 0
    }
}

pub type HistoryListener = Rc<dyn Fn(HistoryStatus)>;

#[derive(Clone, Default)]
pub struct History {
    undo: Vec<String>,
    redo: Vec<String>,
    listeners: Vec<HistoryListener>,
}

impl fmt::Debug for History {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("History")
            .field("undo", &self.undo.len())
            .field("redo", &self.redo.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl History {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn status(&self) -> HistoryStatus {
        HistoryStatus {
            undo_depth: self.undo.len(),
            redo_depth: self.redo.len(),
        }
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    /// Register a callback fired whenever the stacks change.
    pub fn subscribe(&mut self, listener: HistoryListener) {
        self.listeners.push(listener);
    }

    /// Record a new state: push it for undo and forget everything that
    /// could have been redone.  With a `limit`, the oldest snapshots beyond
    /// it are dropped.
    pub fn record(&mut self, snapshot: String, limit: Option<usize>) {
        self.undo.push(snapshot);
        self.redo.clear();
        if let Some(limit) = limit
            && self.undo.len() > limit
        {
            let excess = self.undo.len() - limit;
            self.undo.drain(..excess);
        }
        self.notify();
    }

    pub fn pop_undo(&mut self) -> Option<String> {
        let snapshot = self.undo.pop();
        if snapshot.is_some() {
            self.notify();
        }
        snapshot
    }

    pub fn pop_redo(&mut self) -> Option<String> {
        let snapshot = self.redo.pop();
        if snapshot.is_some() {
            self.notify();
        }
        snapshot
    }

    /// Push onto `undo` without touching `redo`, used when redoing.
    pub fn push_undo(&mut self, snapshot: String) {
        self.undo.push(snapshot);
        self.notify();
    }

    pub fn push_redo(&mut self, snapshot: String) {
        self.redo.push(snapshot);
        self.notify();
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.notify();
    }

    fn notify(&self) {
        let status = self.status();
        for listener in self.listeners.iter() {
            listener(status);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_record_clears_redo() {
        let mut history = History::new();
        history.record("a".to_owned(), None);
        history.push_redo("b".to_owned());
        assert_eq!(1, history.redo_depth());

        history.record("c".to_owned(), None);
        assert_eq!(2, history.undo_depth());
        assert_eq!(0, history.redo_depth());
        assert_eq!(Some("c".to_owned()), history.pop_undo());
        assert_eq!(Some("a".to_owned()), history.pop_undo());
        assert_eq!(None, history.pop_undo());
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::new();
        for snapshot in ["1", "2", "3", "4"] {
            history.record(snapshot.to_owned(), Some(2));
        }
        assert_eq!(2, history.undo_depth());
        assert_eq!(Some("4".to_owned()), history.pop_undo());
        assert_eq!(Some("3".to_owned()), history.pop_undo());
        assert!(!history.status().can_undo());
    }

    #[test]
    fn test_listeners_see_depths() {
        let seen: Rc<RefCell<Vec<HistoryStatus>>> = Rc::new(RefCell::new(Vec::new()));
        let mut history = History::new();
        let sink = seen.clone();
        history.subscribe(Rc::new(move |status| sink.borrow_mut().push(status)));

        history.record("a".to_owned(), None);
        history.pop_undo();
        // popping an empty stack is not a change
        history.pop_undo();
        history.push_redo("a".to_owned());

        let seen = seen.borrow();
        assert_eq!(3, seen.len());
        assert_eq!(1, seen[0].undo_depth);
        assert_eq!(0, seen[1].undo_depth);
        assert!(seen[2].can_redo());
    }
}
