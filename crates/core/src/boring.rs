//! Shelf-pin boring positions for side panels.
//!
//! Two generators live here:
//!
//! - [`BoringPositionCalculator`] places three holes (front, centre, back) at
//!   the Y of every shelf and horizontal carcass board actually produced by
//!   the layout, so holes always line up with real boards.
//! - [`ShelfPinPattern`] is the regular 32 mm system grid drilled into a side
//!   panel for adjustable shelves, independent of the current shelf layout.

use nalgebra::{Point3, Vector3};

use crate::config::LayoutConfig;
use crate::content::ContentItem;
use crate::depth::ResolvedSection;
use crate::geometry::{PanelBox, PanelRole};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Position of a hole along the panel depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HoleRow {
    /// Near the front edge.
    Front,
    /// Midway between front and back.
    Center,
    /// Near the rear edge.
    Back,
}

impl HoleRow {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Center => "center",
            Self::Back => "back",
        }
    }
}

/// A boring hole at one board level.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoringHole {
    /// Y of the hole (mm from the module bottom).
    pub y: f64,
    /// Z of the hole.
    pub z: f64,
    /// Row along the depth.
    pub row: HoleRow,
    /// Hole diameter (mm).
    pub diameter: f64,
}

impl BoringHole {
    /// Marker box for visualisation at side panel position `x`.
    pub fn to_panel_box(&self, index: usize, x: f64) -> PanelBox {
        PanelBox::new(
            format!("boring-{}-{}", index, self.row.as_str()),
            PanelRole::BoringHole,
            Vector3::new(self.diameter, self.diameter, self.diameter),
            Point3::new(x, self.y, self.z),
        )
    }
}

/// Derives boring holes from resolved panels and content.
#[derive(Debug, Clone, Copy)]
pub struct BoringPositionCalculator<'a> {
    config: &'a LayoutConfig,
}

impl<'a> BoringPositionCalculator<'a> {
    /// Creates a calculator using the given constants.
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }

    /// Sorted, de-duplicated Y of every shelf and every top, bottom, divider
    /// and shared shelf board.
    pub fn positions(&self, panels: &[PanelBox], content: &[ContentItem]) -> Vec<f64> {
        let mut levels: Vec<f64> = panels
            .iter()
            .filter(|p| matches!(
                    p.role,
                    PanelRole::Top | PanelRole::Bottom | PanelRole::Divider | PanelRole::Shelf
                ))
            .map(|p| p.position.y)
            .chain(content.iter().filter_map(ContentItem::shelf_y))
            .collect();

        levels.sort_by(f64::total_cmp);
        levels.dedup_by(|a, b| (*a - *b).abs() <= self.config.tolerance);
        levels
    }

    /// Front, centre and back holes for every level.
    ///
    /// Each level uses the depth of the section containing it; levels outside
    /// every section (the top and bottom boards) use the nearest section.
    pub fn holes(
        &self,
        levels: &[f64],
        sections: &[ResolvedSection],
        module_depth: f64,
        panel_thickness: f64,
    ) -> Vec<BoringHole> {
        let offset = self.config.boring.edge_offset;
        let diameter = self.config.boring.hole_diameter;

        levels
            .iter()
            .flat_map(|&y| {
                let (depth, z_offset) = section_at(sections, y)
                    .map(|s| (s.depth, s.z_offset))
                    .unwrap_or((module_depth, 0.0));
                let front = z_offset + depth / 2.0 - offset;
                let back = z_offset - depth / 2.0 + panel_thickness + offset;

                [
                    (HoleRow::Front, front),
                    (HoleRow::Center, (front + back) / 2.0),
                    (HoleRow::Back, back),
                ]
                .into_iter()
                .map(move |(row, z)| BoringHole {
                    y,
                    z,
                    row,
                    diameter,
                })
            })
            .collect()
    }
}

fn section_at(sections: &[ResolvedSection], y: f64) -> Option<&ResolvedSection> {
    sections
        .iter()
        .find(|s| s.contains_y(y))
        .or_else(|| match sections.first() {
            Some(first) if y < first.bottom_y => Some(first),
            _ => sections.last(),
        })
}

/// Number of vertical hole rows in a 32 mm grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PinRows {
    /// Front and back rows.
    #[default]
    Two,
    /// Front and back rows plus two inner rows two pitches in.
    Four,
}

/// One hole of a shelf-pin grid, in panel-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinHole {
    /// Height above the panel's bottom edge.
    pub y: f64,
    /// Distance from the panel's front edge.
    pub from_front: f64,
    /// Hole diameter.
    pub diameter: f64,
    /// Drilling depth.
    pub depth: f64,
}

/// 32 mm system shelf-pin grid.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ShelfPinPattern {
    /// Vertical pitch.
    pub pitch: f64,
    /// Height of the first hole.
    pub start_height: f64,
    /// Minimum distance of the last hole from the top edge.
    pub end_margin: f64,
    /// Distance of the front row from the front edge.
    pub front_row: f64,
    /// Distance of the back row from the rear edge.
    pub back_row: f64,
    /// Row layout.
    pub rows: PinRows,
    /// Hole diameter.
    pub diameter: f64,
    /// Drilling depth.
    pub depth: f64,
}

impl Default for ShelfPinPattern {
    fn default() -> Self {
        Self {
            pitch: 32.0,
            start_height: 37.0,
            end_margin: 37.0,
            front_row: 37.0,
            back_row: 37.0,
            rows: PinRows::Two,
            diameter: 5.0,
            depth: 12.0,
        }
    }
}

impl ShelfPinPattern {
    /// Creates the default two-row pattern.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the row layout.
    pub fn with_rows(mut self, rows: PinRows) -> Self {
        self.rows = rows;
        self
    }

    /// Heights of the hole levels for a panel of the given height.
    pub fn levels(&self, panel_height: f64) -> Vec<f64> {
        if self.pitch <= 0.0 {
            return Vec::new();
        }
        let end = panel_height - self.end_margin;
        (0..)
            .map(|k| self.start_height + k as f64 * self.pitch)
            .take_while(|&y| y <= end)
            .collect()
    }

    /// Distances of the rows from the front edge.
    pub fn row_offsets(&self, panel_depth: f64) -> Vec<f64> {
        let back = panel_depth - self.back_row;
        match self.rows {
            PinRows::Two => vec![self.front_row, back],
            PinRows::Four => vec![
                self.front_row,
                self.front_row + 2.0 * self.pitch,
                back - 2.0 * self.pitch,
                back,
            ],
        }
    }

    /// Full grid, row by row.
    pub fn holes(&self, panel_height: f64, panel_depth: f64) -> Vec<PinHole> {
        let levels = self.levels(panel_height);
        self.row_offsets(panel_depth)
            .into_iter()
            .flat_map(|from_front| {
                levels.iter().map(move |&y| PinHole {
                    y,
                    from_front,
                    diameter: self.diameter,
                    depth: self.depth,
                })
            })
            .collect()
    }

    /// Hole centres in module coordinates for a side panel.
    pub fn drill(&self, panel: &PanelBox) -> Vec<Point3<f64>> {
        self.holes(panel.height(), panel.depth())
            .into_iter()
            .map(|h| {
                Point3::new(
                    panel.position.x,
                    panel.bottom() + h.y,
                    panel.front() - h.from_front,
                )
            })
            .collect()
    }
}
