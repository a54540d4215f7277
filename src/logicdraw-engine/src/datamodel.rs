// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::ops::{Add, Sub};

use float_cmp::approx_eq;
use serde::{Deserialize, Serialize};

/// 2D canvas coordinate.
#[derive(Clone, Copy, PartialEq, Default, Debug, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Equality within float tolerance, used when matching geometry.
    pub fn approx_eq(self, other: Self) -> bool {
        approx_eq!(f64, self.x, other.x, epsilon = 1e-6)
            && approx_eq!(f64, self.y, other.y, epsilon = 1e-6)
    }
}

impl Add for Point {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Point {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

/// Which end of a wire an owner element sits on.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum WireRole {
    Start,
    End,
}

impl WireRole {
    pub fn as_str(self) -> &'static str {
        match self {
            WireRole::Start => "Start",
            WireRole::End => "End",
        }
    }

    pub fn from_field(field: &str) -> Option<WireRole> {
        match field {
            "Start" => Some(WireRole::Start),
            "End" => Some(WireRole::End),
            _ => None,
        }
    }

    pub fn opposite(self) -> WireRole {
        match self {
            WireRole::Start => WireRole::End,
            WireRole::End => WireRole::Start,
        }
    }
}

/// Marker visibility and IO attachment of both wire ends.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Serialize, Deserialize)]
pub struct WireFlags {
    pub start_visible: bool,
    pub end_visible: bool,
    pub start_io: bool,
    pub end_io: bool,
}

/// Page, grid and snap settings of a diagram.
///
/// These are the positional fields of a `Diagram` record, in order.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct Properties {
    pub page_width: f64,
    pub page_height: f64,
    pub grid_origin_x: f64,
    pub grid_origin_y: f64,
    pub grid_width: f64,
    pub grid_height: f64,
    pub grid_size: f64,
    pub snap_x: f64,
    pub snap_y: f64,
    pub snap_offset_x: f64,
    pub snap_offset_y: f64,
}

impl Properties {
    /// Round `point` to the nearest snap position.  A non-positive snap
    /// step leaves that axis untouched.
    pub fn snap_point(&self, point: Point) -> Point {
        Point::new(
            snap(point.x, self.snap_x, self.snap_offset_x),
            snap(point.y, self.snap_y, self.snap_offset_y),
        )
    }

    /// The grid rectangle as (origin x, origin y, width, height, size).
    pub fn grid(&self) -> (f64, f64, f64, f64, f64) {
        (
            self.grid_origin_x,
            self.grid_origin_y,
            self.grid_width,
            self.grid_height,
            self.grid_size,
        )
    }
}

fn snap(value: f64, step: f64, offset: f64) -> f64 {
    if step <= 0.0 {
        return value;
    }
    ((value - offset) / step).round() * step + offset
}
