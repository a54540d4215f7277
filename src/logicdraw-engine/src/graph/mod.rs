// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The connectivity graph of one diagram.

mod canvas;
mod connect;
mod element;
mod select;
mod split;

pub use self::canvas::Canvas;
pub use self::connect::{ConnectStep, Connection};
pub use self::element::{Edge, Edges, Element, ElementHandle, Shape, Wire, WireEnds};
pub use self::split::{Split, split_wire};
