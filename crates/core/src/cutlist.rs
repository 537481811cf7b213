//! Fabrication cut list.
//!
//! Groups identical boards by role and rounded dimensions. Rods and boring
//! markers are hardware, not boards, and are left out.

use std::collections::BTreeMap;

use crate::geometry::{PanelBox, PanelRole};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One line of a cut list.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CutListEntry {
    /// Role shared by the boards.
    pub role: PanelRole,
    /// Longest dimension (mm).
    pub length: f64,
    /// Middle dimension (mm).
    pub width: f64,
    /// Shortest dimension (mm).
    pub thickness: f64,
    /// Number of identical boards.
    pub quantity: usize,
    /// Names of the boards.
    pub names: Vec<String>,
}

impl CutListEntry {
    /// Face area of one board (mm²).
    pub fn area(&self) -> f64 {
        self.length * self.width
    }
}

/// Boards grouped into cut list entries.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CutList {
    /// Entries ordered by role, then by dimensions.
    pub entries: Vec<CutListEntry>,
}

/// Dimensions are grouped at 0.1 mm.
fn tenths(value: f64) -> i64 {
    (value * 10.0).round() as i64
}

impl CutList {
    /// Builds a cut list from any panels; non-board roles are skipped.
    pub fn from_panels<'p>(panels: impl IntoIterator<Item = &'p PanelBox>) -> Self {
        let mut groups: BTreeMap<(PanelRole, i64, i64, i64), CutListEntry> = BTreeMap::new();

        for panel in panels {
            if !panel.role.is_cut_part() {
                continue;
            }
            let mut dims = [panel.size.x, panel.size.y, panel.size.z];
            dims.sort_by(|a, b| b.total_cmp(a));
            let [length, width, thickness] = dims;
            let key = (panel.role, tenths(length), tenths(width), tenths(thickness));

            groups
                .entry(key)
                .and_modify(|e| {
                    e.quantity += 1;
                    e.names.push(panel.name.clone());
                })
                .or_insert_with(|| CutListEntry {
                    role: panel.role,
                    length,
                    width,
                    thickness,
                    quantity: 1,
                    names: vec![panel.name.clone()],
                });
        }

        Self {
            entries: groups.into_values().collect(),
        }
    }

    /// Total number of boards.
    pub fn total_parts(&self) -> usize {
        self.entries.iter().map(|e| e.quantity).sum()
    }

    /// Total face area of all boards (mm²).
    pub fn total_area(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.area() * e.quantity as f64)
            .sum()
    }

    /// Entries of one role.
    pub fn by_role(&self, role: PanelRole) -> impl Iterator<Item = &CutListEntry> {
        self.entries.iter().filter(move |e| e.role == role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Vector3};

    fn panel(name: &str, role: PanelRole, size: (f64, f64, f64)) -> PanelBox {
        PanelBox::new(
            name,
            role,
            Vector3::new(size.0, size.1, size.2),
            Point3::origin(),
        )
    }

    #[test]
    fn test_identical_boards_are_grouped() {
        let panels = vec![
            panel("side-left", PanelRole::Side, (18.0, 2400.0, 600.0)),
            panel("side-right", PanelRole::Side, (18.0, 2400.0, 600.0)),
            panel("top", PanelRole::Top, (563.0, 18.0, 574.0)),
        ];
        let list = CutList::from_panels(&panels);

        assert_eq!(list.entries.len(), 2);
        let sides: Vec<_> = list.by_role(PanelRole::Side).collect();
        assert_eq!(sides[0].quantity, 2);
        assert_eq!(sides[0].length, 2400.0);
        assert_eq!(sides[0].width, 600.0);
        assert_eq!(sides[0].thickness, 18.0);
        assert_eq!(list.total_parts(), 3);
    }

    #[test]
    fn test_hardware_is_skipped() {
        let panels = vec![
            panel("rod-0", PanelRole::Rod, (564.0, 30.0, 10.0)),
            panel("boring-0-front", PanelRole::BoringHole, (3.0, 3.0, 3.0)),
        ];
        let list = CutList::from_panels(&panels);
        assert!(list.entries.is_empty());
        assert_eq!(list.total_area(), 0.0);
    }

    #[test]
    fn test_same_size_different_role() {
        let panels = vec![
            panel("top", PanelRole::Top, (563.0, 18.0, 574.0)),
            panel("bottom", PanelRole::Bottom, (563.0, 18.0, 574.0)),
        ];
        let list = CutList::from_panels(&panels);
        assert_eq!(list.entries.len(), 2);
        assert_eq!(list.total_area(), 2.0 * 574.0 * 563.0);
    }
}
