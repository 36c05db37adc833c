use crate::ir::{Axis, Node};
use serde::Serialize;
use std::collections::BTreeMap;

/// Axis-aligned rectangle in canvas space (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Negative sizes are clamped to zero instead of being rejected.
    pub fn of(node: &Node) -> Self {
        Self::new(node.x, node.y, node.width.max(0.0), node.height.max(0.0))
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Inclusive containment: `other` lies fully inside `self`.
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// True when the rectangles come closer than `gap` on both axes.
    pub fn overlaps(&self, other: &Rect, gap: f64) -> bool {
        !(self.right() + gap <= other.x
            || other.right() + gap <= self.x
            || self.bottom() + gap <= other.y
            || other.bottom() + gap <= self.y)
    }

    pub fn leading(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn trailing(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.right(),
            Axis::Y => self.bottom(),
        }
    }

    pub fn translate(&mut self, axis: Axis, delta: f64) {
        match axis {
            Axis::X => self.x += delta,
            Axis::Y => self.y += delta,
        }
    }
}

/// Running min/max accumulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_rect(rect: &Rect) -> Self {
        Self {
            min_x: rect.x,
            min_y: rect.y,
            max_x: rect.right(),
            max_y: rect.bottom(),
        }
    }

    pub fn include(&mut self, rect: &Rect) {
        self.min_x = self.min_x.min(rect.x);
        self.min_y = self.min_y.min(rect.y);
        self.max_x = self.max_x.max(rect.right());
        self.max_y = self.max_y.max(rect.bottom());
    }

    pub fn enclosing<'a>(rects: impl IntoIterator<Item = &'a Rect>) -> Option<Self> {
        let mut iter = rects.into_iter();
        let mut bounds = Self::from_rect(iter.next()?);
        for rect in iter {
            bounds.include(rect);
        }
        Some(bounds)
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(
            self.min_x,
            self.min_y,
            self.max_x - self.min_x,
            self.max_y - self.min_y,
        )
    }
}

/// Group membership and nesting captured from the pre-layout geometry.
///
/// Membership is frozen once built; later stages only read it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupSnapshot {
    /// group id -> plain nodes inside it, in document order
    pub child_nodes: BTreeMap<String, Vec<String>>,
    /// group id -> other groups inside it, in document order
    pub child_groups: BTreeMap<String, Vec<String>>,
    /// group id -> smallest enclosing group, if any
    pub parents: BTreeMap<String, Option<String>>,
    /// group id -> nesting depth, 0 for top-level groups
    pub depth: BTreeMap<String, usize>,
}

impl GroupSnapshot {
    pub fn group_count(&self) -> usize {
        self.depth.len()
    }

    /// Group ids with the deepest first. Equal depths keep `order`.
    pub fn deepest_first(&self, order: &[String]) -> Vec<String> {
        let mut ids: Vec<String> = order
            .iter()
            .filter(|id| self.depth.contains_key(*id))
            .cloned()
            .collect();
        ids.sort_by(|a, b| self.depth[b].cmp(&self.depth[a]));
        ids
    }
}

/// Component id for every node, plain and group alike.
pub type ComponentMap = BTreeMap<String, usize>;
