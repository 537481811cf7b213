//! Fabrication constants used by the layout engine.
//!
//! Every millimetre value here comes from the cabinet fabrication drawings.
//! They are domain constants, not derived values: generated cut lists are only
//! correct when they are reproduced exactly.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for section layout resolution.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutConfig {
    /// Total width removed from top/bottom panels and dividers (mm).
    pub width_trim: f64,

    /// Depth removed at the rear of horizontal boards so they seat against
    /// the back panel (mm).
    pub rear_trim: f64,

    /// Gap between the two boards of a divider (mm). Visual only.
    pub divider_gap: f64,

    /// Back panel extension above and below the section (mm, per edge).
    pub back_panel_vertical_extension: f64,

    /// Back panel extension across the interior width (mm, total).
    pub back_panel_side_extension: f64,

    /// Standoff of the back panel from the section's rear edge (mm).
    pub back_inset: f64,

    /// Drawer construction constants.
    pub drawer: DrawerConfig,

    /// Hanging rod constants.
    pub rod: RodConfig,

    /// Side panel boring constants.
    pub boring: BoringConfig,

    /// Tolerance for floating point comparisons (mm).
    pub tolerance: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width_trim: 1.0,
            rear_trim: 26.0,
            divider_gap: 0.05,
            back_panel_vertical_extension: 13.0,
            back_panel_side_extension: 10.0,
            back_inset: 17.0,
            drawer: DrawerConfig::default(),
            rod: RodConfig::default(),
            boring: BoringConfig::default(),
            tolerance: 1e-6,
        }
    }
}

impl LayoutConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the top/bottom width trim.
    pub fn with_width_trim(mut self, trim: f64) -> Self {
        self.width_trim = trim;
        self
    }

    /// Sets the rear trim of horizontal boards.
    pub fn with_rear_trim(mut self, trim: f64) -> Self {
        self.rear_trim = trim;
        self
    }

    /// Sets the divider micro gap.
    pub fn with_divider_gap(mut self, gap: f64) -> Self {
        self.divider_gap = gap.max(0.0);
        self
    }

    /// Sets the back panel standoff from the rear edge.
    pub fn with_back_inset(mut self, inset: f64) -> Self {
        self.back_inset = inset;
        self
    }

    /// Sets the drawer construction constants.
    pub fn with_drawer(mut self, drawer: DrawerConfig) -> Self {
        self.drawer = drawer;
        self
    }

    /// Sets the hanging rod constants.
    pub fn with_rod(mut self, rod: RodConfig) -> Self {
        self.rod = rod;
        self
    }

    /// Sets the boring constants.
    pub fn with_boring(mut self, boring: BoringConfig) -> Self {
        self.boring = boring;
        self
    }

    /// Sets the comparison tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance.abs();
        self
    }
}

/// Drawer box construction constants.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DrawerConfig {
    /// Interior width minus drawer width (12 mm each side).
    pub side_clearance: f64,
    /// Depth lost front and back combined (30 mm front setback + 17 mm rear).
    pub depth_reduction: f64,
    /// Thickness of the drawer face plate.
    pub face_thickness: f64,
    /// Width reduction of the drawer body relative to the face (38 mm per side).
    pub body_inset: f64,
    /// Additional width/depth reduction of the drawer bottom.
    pub bottom_inset: f64,
    /// Thickness of the drawer bottom board.
    pub bottom_thickness: f64,
    /// Lift of the drawer bottom above the box floor.
    pub bottom_lift: f64,
    /// Height difference between the face plate and the body boards.
    pub body_height_reduction: f64,
}

impl Default for DrawerConfig {
    fn default() -> Self {
        Self {
            side_clearance: 24.0,
            depth_reduction: 47.0,
            face_thickness: 20.0,
            body_inset: 76.0,
            bottom_inset: 26.0,
            bottom_thickness: 5.0,
            bottom_lift: 15.0,
            body_height_reduction: 30.0,
        }
    }
}

/// Hanging rod constants.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RodConfig {
    /// Height of a rod bracket.
    pub bracket_height: f64,
    /// Bracket width and depth (square section).
    pub bracket_size: f64,
    /// Rod cross-section height.
    pub rod_height: f64,
    /// Rod cross-section depth.
    pub rod_depth: f64,
    /// Rod lift above the bracket's bottom face.
    pub rod_lift: f64,
}

impl Default for RodConfig {
    fn default() -> Self {
        Self {
            bracket_height: 75.0,
            bracket_size: 12.0,
            rod_height: 30.0,
            rod_depth: 10.0,
            rod_lift: 5.0,
        }
    }
}

/// Side panel shelf-pin boring constants.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BoringConfig {
    /// Distance of the front and back holes from the panel edges.
    pub edge_offset: f64,
    /// Hole diameter.
    pub hole_diameter: f64,
}

impl Default for BoringConfig {
    fn default() -> Self {
        Self {
            edge_offset: 50.0,
            hole_diameter: 3.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LayoutConfig::default();
        assert_eq!(config.width_trim, 1.0);
        assert_eq!(config.rear_trim, 26.0);
        assert_eq!(config.divider_gap, 0.05);
        assert_eq!(config.back_panel_vertical_extension, 13.0);
        assert_eq!(config.back_panel_side_extension, 10.0);
        assert_eq!(config.back_inset, 17.0);
        assert_eq!(config.drawer.depth_reduction, 47.0);
        assert_eq!(config.drawer.face_thickness, 20.0);
        assert_eq!(config.drawer.body_inset, 76.0);
        assert_eq!(config.rod.bracket_height, 75.0);
        assert_eq!(config.boring.hole_diameter, 3.0);
    }

    #[test]
    fn test_builder() {
        let config = LayoutConfig::new()
            .with_rear_trim(20.0)
            .with_back_inset(12.0)
            .with_tolerance(-1e-3);

        assert_eq!(config.rear_trim, 20.0);
        assert_eq!(config.back_inset, 12.0);
        assert_eq!(config.tolerance, 1e-3);
    }

    #[test]
    fn test_divider_gap_not_negative() {
        let config = LayoutConfig::new().with_divider_gap(-1.0);
        assert_eq!(config.divider_gap, 0.0);
    }
}
