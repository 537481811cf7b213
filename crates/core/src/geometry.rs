//! Output primitives of the layout engine.
//!
//! All coordinates share one frame: X from the module's vertical centre plane
//! (+ right), Y up from the module's outer bottom face, Z from the module's
//! depth centre (+ towards the front, front face at `+depth / 2`).

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Structural or content role of a panel box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PanelRole {
    /// Left/right carcass side.
    Side,
    /// Top carcass board.
    Top,
    /// Bottom carcass board.
    Bottom,
    /// Board between two vertically adjacent sections, or a shared
    /// vertical divider of a dual module.
    Divider,
    /// Back panel.
    Back,
    /// Shelf, finish panel or safety shelf.
    Shelf,
    /// Board of a drawer box.
    DrawerPart,
    /// Hanging rod or rod bracket.
    Rod,
    /// Shelf-pin hole marker.
    BoringHole,
}

impl PanelRole {
    /// Returns true for boards that end up in a fabrication cut list.
    pub fn is_cut_part(&self) -> bool {
        !matches!(self, Self::Rod | Self::BoringHole)
    }
}

/// An axis-aligned box describing one physical part.
///
/// Panels are plain values produced fresh on every resolution.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelBox {
    /// Descriptive name, unique within one resolution.
    pub name: String,
    /// Extent along X, Y and Z (width, height, depth) in mm.
    pub size: Vector3<f64>,
    /// Centre of the box in mm.
    pub position: Point3<f64>,
    /// Role of the part.
    pub role: PanelRole,
}

impl PanelBox {
    /// Creates a new panel box from its size and centre.
    pub fn new(
        name: impl Into<String>,
        role: PanelRole,
        size: Vector3<f64>,
        position: Point3<f64>,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            position,
            role,
        }
    }

    /// Width (X extent).
    pub fn width(&self) -> f64 {
        self.size.x
    }

    /// Height (Y extent).
    pub fn height(&self) -> f64 {
        self.size.y
    }

    /// Depth (Z extent).
    pub fn depth(&self) -> f64 {
        self.size.z
    }

    /// Y of the bottom face.
    pub fn bottom(&self) -> f64 {
        self.position.y - self.size.y / 2.0
    }

    /// Y of the top face.
    pub fn top(&self) -> f64 {
        self.position.y + self.size.y / 2.0
    }

    /// Z of the front face.
    pub fn front(&self) -> f64 {
        self.position.z + self.size.z / 2.0
    }

    /// Z of the rear face.
    pub fn rear(&self) -> f64 {
        self.position.z - self.size.z / 2.0
    }

    /// Volume in mm³.
    pub fn volume(&self) -> f64 {
        self.size.x * self.size.y * self.size.z
    }

    /// Returns a copy moved by the given offset.
    pub fn translated(&self, offset: Vector3<f64>) -> Self {
        Self {
            position: self.position + offset,
            ..self.clone()
        }
    }

    /// Returns a copy with the name prefixed (used for dual module sides).
    pub fn prefixed(mut self, prefix: &str) -> Self {
        self.name = format!("{}-{}", prefix, self.name);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_faces() {
        let panel = PanelBox::new(
            "shelf",
            PanelRole::Shelf,
            Vector3::new(564.0, 18.0, 574.0),
            Point3::new(0.0, 500.0, 13.0),
        );

        assert_eq!(panel.width(), 564.0);
        assert_eq!(panel.bottom(), 491.0);
        assert_eq!(panel.top(), 509.0);
        assert_eq!(panel.front(), 300.0);
        assert_eq!(panel.rear(), -274.0);
    }

    #[test]
    fn test_translated_and_prefixed() {
        let panel = PanelBox::new(
            "divider-0",
            PanelRole::Divider,
            Vector3::new(100.0, 18.0, 100.0),
            Point3::new(0.0, 0.0, 0.0),
        )
        .translated(Vector3::new(-209.0, 0.0, 0.0))
        .prefixed("left");

        assert_eq!(panel.position.x, -209.0);
        assert_eq!(panel.name, "left-divider-0");
    }

    #[test]
    fn test_cut_part_roles() {
        assert!(PanelRole::Side.is_cut_part());
        assert!(PanelRole::DrawerPart.is_cut_part());
        assert!(!PanelRole::Rod.is_cut_part());
        assert!(!PanelRole::BoringHole.is_cut_part());
    }
}
