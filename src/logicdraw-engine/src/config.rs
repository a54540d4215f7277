// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use crate::datamodel::{Point, Properties};

impl Default for Properties {
    fn default() -> Self {
        Self {
            page_width: 1260.0,
            page_height: 891.0,
            grid_origin_x: 330.0,
            grid_origin_y: 31.0,
            grid_width: 600.0,
            grid_height: 750.0,
            grid_size: 30.0,
            snap_x: 15.0,
            snap_y: 15.0,
            snap_offset_x: 0.0,
            snap_offset_y: 0.0,
        }
    }
}

/// How a parse materializes what it reads.
#[derive(Clone, Debug, Default)]
pub struct ParseOptions {
    /// Instantiate live elements and edges through the creator.
    pub create_elements: bool,
    /// Added to every absolute coordinate of created elements
    /// (paste-at-cursor, diagram composition).
    pub offset: Point,
    /// Rename created elements with fresh ids from the authoritative
    /// counter, so pasted content never collides with existing ids.
    pub append_ids: bool,
    /// Merge the ids seen into the authoritative counter without renaming;
    /// used when the parsed text becomes the new truth.
    pub update_ids: bool,
    /// Select created elements as they are inserted.
    pub select: bool,
    /// Snap created positions to the diagram's snap grid.
    pub snap: bool,
}

impl ParseOptions {
    /// Tree skeleton only, no live elements.
    pub fn tree_only() -> Self {
        Default::default()
    }

    /// Load text that replaces the current document (open, undo, redo).
    pub fn load() -> Self {
        ParseOptions {
            create_elements: true,
            update_ids: true,
            ..Default::default()
        }
    }

    /// Insert text next to existing content under fresh ids.
    pub fn paste(offset: Point) -> Self {
        ParseOptions {
            create_elements: true,
            offset,
            append_ids: true,
            select: true,
            ..Default::default()
        }
    }
}

/// Undo/redo behaviour of a document.
#[derive(Clone, Debug)]
pub struct HistoryConfig {
    /// When false, `add`, `undo` and `redo` are silent no-ops.
    pub enabled: bool,
    /// Oldest snapshots are dropped once `undo` grows past this depth.
    pub limit: Option<usize>,
    /// Whether undo pushes the current state for redo (and vice versa).
    pub keep_redo: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            limit: None,
            keep_redo: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_properties() {
        let properties = Properties::default();
        assert!((properties.page_width - 1260.0).abs() < f64::EPSILON);
        assert!((properties.page_height - 891.0).abs() < f64::EPSILON);
        assert!((properties.grid_size - 30.0).abs() < f64::EPSILON);
        assert!((properties.snap_x - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_option_presets() {
        let load = ParseOptions::load();
        assert!(load.create_elements && load.update_ids);
        assert!(!load.append_ids && !load.select);

        let paste = ParseOptions::paste(Point::new(5.0, 6.0));
        assert!(paste.create_elements && paste.append_ids && paste.select);
        assert!(!paste.update_ids);
        assert_eq!(Point::new(5.0, 6.0), paste.offset);

        assert!(!ParseOptions::tree_only().create_elements);
    }

    #[test]
    fn test_default_history_config() {
        let config = HistoryConfig::default();
        assert!(config.enabled);
        assert!(config.keep_redo);
        assert!(config.limit.is_none());
    }
}
