//! Module and section specifications.
//!
//! A [`ModuleSpec`] is the immutable, user-authored description of a cabinet
//! module. It is resolved into geometry by [`crate::LayoutEngine`]; nothing in
//! this module performs layout math beyond simple derived dimensions.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default carcass board thickness (mm).
pub const DEFAULT_PANEL_THICKNESS: f64 = 18.0;

/// Default back panel thickness (mm).
pub const DEFAULT_BACK_PANEL_THICKNESS: f64 = 9.0;

/// Content type of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SectionKind {
    /// Shelf bank.
    Shelf,
    /// Hanging section with a clothing rod.
    Hanging,
    /// Drawer stack.
    Drawer,
}

impl SectionKind {
    /// Returns the lowercase name used in ids and panel names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shelf => "shelf",
            Self::Hanging => "hanging",
            Self::Drawer => "drawer",
        }
    }
}

/// How a section's height is declared.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "mode", content = "value", rename_all = "lowercase")
)]
pub enum SectionHeight {
    /// Share of the height left over by absolute sections (0-100).
    Percentage(f64),
    /// Fixed height in millimetres.
    Absolute(f64),
}

impl SectionHeight {
    /// Returns the declared value (percent or mm).
    pub fn value(&self) -> f64 {
        match self {
            Self::Percentage(v) | Self::Absolute(v) => *v,
        }
    }

    /// Returns true for absolute (fixed) heights.
    pub fn is_absolute(&self) -> bool {
        matches!(self, Self::Absolute(_))
    }
}

/// Specification of one vertical section, ordered bottom to top.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SectionSpec {
    /// Content type.
    pub kind: SectionKind,

    /// Declared height.
    pub height: SectionHeight,

    /// Depth of this section if shallower than the module (mm).
    #[cfg_attr(feature = "serde", serde(default))]
    pub depth_override: Option<f64>,

    /// Number of evenly spaced shelves (shelf and hanging sections).
    #[cfg_attr(feature = "serde", serde(default))]
    pub shelf_count: Option<usize>,

    /// Explicit shelf centre positions, mm from the section bottom.
    #[cfg_attr(feature = "serde", serde(default))]
    pub shelf_positions: Option<Vec<f64>>,

    /// Places a single non-structural cap at the top of the section.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_top_finish_panel: bool,

    /// Number of drawers (drawer sections).
    #[cfg_attr(feature = "serde", serde(default))]
    pub drawer_count: usize,

    /// Explicit drawer heights, bottom to top (mm).
    #[cfg_attr(feature = "serde", serde(default))]
    pub drawer_heights: Option<Vec<f64>>,

    /// Gap between drawers and at both ends of the stack (mm).
    #[cfg_attr(feature = "serde", serde(default))]
    pub gap_height: Option<f64>,
}

impl SectionSpec {
    /// Creates a section of the given kind with no content options.
    pub fn new(kind: SectionKind, height: SectionHeight) -> Self {
        Self {
            kind,
            height,
            depth_override: None,
            shelf_count: None,
            shelf_positions: None,
            is_top_finish_panel: false,
            drawer_count: 0,
            drawer_heights: None,
            gap_height: None,
        }
    }

    /// Creates a shelf section.
    pub fn shelf(height: SectionHeight) -> Self {
        Self::new(SectionKind::Shelf, height)
    }

    /// Creates a hanging section.
    pub fn hanging(height: SectionHeight) -> Self {
        Self::new(SectionKind::Hanging, height)
    }

    /// Creates a drawer section with `count` uniform drawers.
    pub fn drawer(height: SectionHeight, count: usize) -> Self {
        Self {
            drawer_count: count,
            ..Self::new(SectionKind::Drawer, height)
        }
    }

    /// Sets the per-section depth.
    pub fn with_depth(mut self, depth: f64) -> Self {
        self.depth_override = Some(depth);
        self
    }

    /// Sets the number of evenly spaced shelves.
    pub fn with_shelf_count(mut self, count: usize) -> Self {
        self.shelf_count = Some(count);
        self
    }

    /// Sets explicit shelf positions (mm from the section bottom).
    pub fn with_shelf_positions(mut self, positions: Vec<f64>) -> Self {
        self.shelf_count = Some(positions.len());
        self.shelf_positions = Some(positions);
        self
    }

    /// Caps the section with a single finish panel.
    pub fn with_top_finish_panel(mut self) -> Self {
        self.is_top_finish_panel = true;
        self
    }

    /// Sets explicit drawer heights and the gap between them.
    pub fn with_drawer_heights(mut self, heights: Vec<f64>, gap: f64) -> Self {
        self.drawer_count = heights.len();
        self.drawer_heights = Some(heights);
        self.gap_height = Some(gap);
        self
    }

    /// Returns the safety shelf position if this is a hanging section with one.
    pub fn safety_shelf_position(&self) -> Option<f64> {
        if self.kind != SectionKind::Hanging {
            return None;
        }
        self.shelf_positions
            .as_ref()
            .and_then(|positions| positions.iter().copied().find(|&p| p > 0.0))
    }

    /// Validates everything that does not depend on the resolved height.
    pub fn validate(&self, index: usize) -> Result<()> {
        let value = self.height.value();
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::invalid_section(
                index,
                format!("height must be positive, got {}", value),
            ));
        }
        if let SectionHeight::Percentage(p) = self.height {
            if p > 100.0 {
                return Err(Error::invalid_section(
                    index,
                    format!("percentage {} exceeds 100", p),
                ));
            }
        }

        if let Some(depth) = self.depth_override {
            if !depth.is_finite() || depth <= 0.0 {
                return Err(Error::invalid_section(
                    index,
                    format!("depth override must be positive, got {}", depth),
                ));
            }
        }

        if let Some(positions) = &self.shelf_positions {
            if let Some(count) = self.shelf_count {
                if count != positions.len() {
                    return Err(Error::invalid_section(
                        index,
                        format!(
                            "shelf count {} does not match {} shelf positions",
                            count,
                            positions.len()
                        ),
                    ));
                }
            }
            if let Some(p) = positions.iter().find(|p| !p.is_finite() || **p < 0.0) {
                return Err(Error::invalid_section(
                    index,
                    format!("shelf position {} is below the section bottom", p),
                ));
            }
        }

        if self.kind == SectionKind::Drawer {
            if self.drawer_count == 0 {
                return Err(Error::invalid_section(index, "drawer count must be at least 1"));
            }
            if let Some(heights) = &self.drawer_heights {
                if heights.len() != self.drawer_count {
                    return Err(Error::invalid_section(
                        index,
                        format!(
                            "{} drawer heights given for {} drawers",
                            heights.len(),
                            self.drawer_count
                        ),
                    ));
                }
                if let Some(h) = heights.iter().find(|h| !h.is_finite() || **h <= 0.0) {
                    return Err(Error::invalid_section(
                        index,
                        format!("drawer height must be positive, got {}", h),
                    ));
                }
            }
            if let Some(gap) = self.gap_height {
                if !gap.is_finite() || gap < 0.0 {
                    return Err(Error::invalid_section(
                        index,
                        format!("gap height must not be negative, got {}", gap),
                    ));
                }
            }
        }

        Ok(())
    }

    fn hash_into<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.height.is_absolute().hash(state);
        self.height.value().to_bits().hash(state);
        self.depth_override.map(f64::to_bits).hash(state);
        self.shelf_count.hash(state);
        self.shelf_positions
            .as_ref()
            .map(|v| v.iter().map(|p| p.to_bits()).collect::<Vec<_>>())
            .hash(state);
        self.is_top_finish_panel.hash(state);
        self.drawer_count.hash(state);
        self.drawer_heights
            .as_ref()
            .map(|v| v.iter().map(|h| h.to_bits()).collect::<Vec<_>>())
            .hash(state);
        self.gap_height.map(f64::to_bits).hash(state);
    }
}

/// Whether side panels are one full-height pair or split per section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SidePanelPolicy {
    /// Split when there are two or more sections and any drawer or hanging
    /// section (drawer/wardrobe composites).
    #[default]
    Auto,
    /// Always a single full-height pair.
    Whole,
    /// One pair per section whenever there are two or more sections.
    Split,
}

impl SidePanelPolicy {
    /// Returns true if side panels should be split for these sections.
    pub fn splits(&self, sections: &[SectionSpec]) -> bool {
        if sections.len() < 2 {
            return false;
        }
        match self {
            Self::Whole => false,
            Self::Split => true,
            Self::Auto => sections
                .iter()
                .any(|s| matches!(s.kind, SectionKind::Drawer | SectionKind::Hanging)),
        }
    }
}

/// How the interior width of an asymmetric module is shared.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WidthSplit {
    /// Equal halves after removing the shared divider.
    Even,
    /// Left share of the width left after the divider (0-1).
    Ratio(f64),
    /// Fixed right interior width; the left side takes the rest.
    RightAbsolute(f64),
    /// Both interior widths given explicitly.
    Explicit {
        /// Left interior width (mm).
        left: f64,
        /// Right interior width (mm).
        right: f64,
    },
}

impl Default for WidthSplit {
    fn default() -> Self {
        Self::Even
    }
}

/// Left/right section trees of a dual module.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AsymmetricSpec {
    /// Sections of the left compartment, bottom to top.
    pub left_sections: Vec<SectionSpec>,
    /// Sections of the right compartment, bottom to top.
    pub right_sections: Vec<SectionSpec>,
    /// Width split between the compartments.
    #[cfg_attr(feature = "serde", serde(default))]
    pub split: WidthSplit,
    /// Height of a full-width middle panel, mm above the interior bottom.
    #[cfg_attr(feature = "serde", serde(default))]
    pub shared_middle_panel_height: Option<f64>,
    /// Height of a full-width safety shelf, mm above the interior bottom.
    #[cfg_attr(feature = "serde", serde(default))]
    pub shared_safety_shelf_height: Option<f64>,
}

impl AsymmetricSpec {
    /// Creates an evenly split asymmetric layout.
    pub fn new(left_sections: Vec<SectionSpec>, right_sections: Vec<SectionSpec>) -> Self {
        Self {
            left_sections,
            right_sections,
            split: WidthSplit::Even,
            shared_middle_panel_height: None,
            shared_safety_shelf_height: None,
        }
    }

    /// Sets the width split.
    pub fn with_split(mut self, split: WidthSplit) -> Self {
        self.split = split;
        self
    }

    /// Adds a shared middle panel.
    pub fn with_shared_middle_panel(mut self, height: f64) -> Self {
        self.shared_middle_panel_height = Some(height);
        self
    }

    /// Adds a shared safety shelf.
    pub fn with_shared_safety_shelf(mut self, height: f64) -> Self {
        self.shared_safety_shelf_height = Some(height);
        self
    }
}

/// Immutable description of a cabinet module.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModuleSpec {
    /// Outer width (mm).
    pub width: f64,
    /// Outer height (mm).
    pub height: f64,
    /// Outer depth (mm).
    pub depth: f64,
    /// Carcass board thickness (mm).
    #[cfg_attr(feature = "serde", serde(default = "default_panel_thickness"))]
    pub panel_thickness: f64,
    /// Back panel thickness (mm).
    #[cfg_attr(feature = "serde", serde(default = "default_back_panel_thickness"))]
    pub back_panel_thickness: f64,
    /// Sections, bottom to top. Ignored when `asymmetric` is set.
    #[cfg_attr(feature = "serde", serde(default))]
    pub sections: Vec<SectionSpec>,
    /// Side panel policy.
    #[cfg_attr(feature = "serde", serde(default))]
    pub side_panels: SidePanelPolicy,
    /// Left/right composition for dual modules.
    #[cfg_attr(feature = "serde", serde(default))]
    pub asymmetric: Option<AsymmetricSpec>,
}

#[cfg(feature = "serde")]
fn default_panel_thickness() -> f64 {
    DEFAULT_PANEL_THICKNESS
}

#[cfg(feature = "serde")]
fn default_back_panel_thickness() -> f64 {
    DEFAULT_BACK_PANEL_THICKNESS
}

impl ModuleSpec {
    /// Creates a module with default board thicknesses and no sections.
    pub fn new(width: f64, height: f64, depth: f64) -> Self {
        Self {
            width,
            height,
            depth,
            panel_thickness: DEFAULT_PANEL_THICKNESS,
            back_panel_thickness: DEFAULT_BACK_PANEL_THICKNESS,
            sections: Vec::new(),
            side_panels: SidePanelPolicy::Auto,
            asymmetric: None,
        }
    }

    /// Sets the carcass board thickness.
    pub fn with_panel_thickness(mut self, thickness: f64) -> Self {
        self.panel_thickness = thickness;
        self
    }

    /// Sets the back panel thickness.
    pub fn with_back_panel_thickness(mut self, thickness: f64) -> Self {
        self.back_panel_thickness = thickness;
        self
    }

    /// Replaces the section list.
    pub fn with_sections(mut self, sections: Vec<SectionSpec>) -> Self {
        self.sections = sections;
        self
    }

    /// Appends a section on top of the existing ones.
    pub fn with_section(mut self, section: SectionSpec) -> Self {
        self.sections.push(section);
        self
    }

    /// Sets the side panel policy.
    pub fn with_side_panels(mut self, policy: SidePanelPolicy) -> Self {
        self.side_panels = policy;
        self
    }

    /// Makes this a dual module with independent left/right sections.
    pub fn with_asymmetric(mut self, asymmetric: AsymmetricSpec) -> Self {
        self.asymmetric = Some(asymmetric);
        self
    }

    /// Width between the side panels.
    pub fn interior_width(&self) -> f64 {
        self.width - 2.0 * self.panel_thickness
    }

    /// Height between the top and bottom panels.
    pub fn available_height(&self) -> f64 {
        self.height - 2.0 * self.panel_thickness
    }

    /// Returns true if this module composes two section trees.
    pub fn is_asymmetric(&self) -> bool {
        self.asymmetric.is_some()
    }

    /// Validates module-level dimensions.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("depth", self.depth),
            ("panel thickness", self.panel_thickness),
            ("back panel thickness", self.back_panel_thickness),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidModule(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if self.available_height() <= 0.0 {
            return Err(Error::InvalidModule(format!(
                "height {} leaves no interior with {} mm panels",
                self.height, self.panel_thickness
            )));
        }
        if self.interior_width() <= 0.0 {
            return Err(Error::InvalidModule(format!(
                "width {} leaves no interior with {} mm panels",
                self.width, self.panel_thickness
            )));
        }
        Ok(())
    }

    /// Stable hash of the spec for external memoisation.
    ///
    /// Floats are hashed by bit pattern, so `0.0` and `-0.0` differ.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for value in [
            self.width,
            self.height,
            self.depth,
            self.panel_thickness,
            self.back_panel_thickness,
        ] {
            value.to_bits().hash(&mut hasher);
        }
        self.side_panels.hash(&mut hasher);
        hash_sections(&self.sections, &mut hasher);
        match &self.asymmetric {
            None => 0u8.hash(&mut hasher),
            Some(asym) => {
                1u8.hash(&mut hasher);
                hash_sections(&asym.left_sections, &mut hasher);
                hash_sections(&asym.right_sections, &mut hasher);
                match asym.split {
                    WidthSplit::Even => 0u8.hash(&mut hasher),
                    WidthSplit::Ratio(r) => (1u8, r.to_bits()).hash(&mut hasher),
                    WidthSplit::RightAbsolute(w) => (2u8, w.to_bits()).hash(&mut hasher),
                    WidthSplit::Explicit { left, right } => {
                        (3u8, left.to_bits(), right.to_bits()).hash(&mut hasher)
                    }
                }
                asym.shared_middle_panel_height
                    .map(f64::to_bits)
                    .hash(&mut hasher);
                asym.shared_safety_shelf_height
                    .map(f64::to_bits)
                    .hash(&mut hasher);
            }
        }
        hasher.finish()
    }
}

fn hash_sections<H: Hasher>(sections: &[SectionSpec], state: &mut H) {
    sections.len().hash(state);
    for section in sections {
        section.hash_into(state);
    }
}

/// Caller-side placement overrides merged into a spec before resolution.
///
/// Float placement is not part of this: it only translates the resolved
/// geometry (see [`crate::ResolvedLayout::elevated`]).
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacementOverrides {
    /// User-chosen width (mm).
    pub custom_width: Option<f64>,
    /// User-chosen height (mm).
    pub custom_height: Option<f64>,
    /// User-chosen depth (mm).
    pub custom_depth: Option<f64>,
    /// Width reduced to avoid an obstruction such as a column (mm).
    /// Takes precedence over `custom_width`.
    pub adjusted_width: Option<f64>,
}

impl PlacementOverrides {
    /// Creates empty overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the custom width.
    pub fn with_width(mut self, width: f64) -> Self {
        self.custom_width = Some(width);
        self
    }

    /// Sets the custom height.
    pub fn with_height(mut self, height: f64) -> Self {
        self.custom_height = Some(height);
        self
    }

    /// Sets the custom depth.
    pub fn with_depth(mut self, depth: f64) -> Self {
        self.custom_depth = Some(depth);
        self
    }

    /// Sets the obstruction-adjusted width.
    pub fn with_adjusted_width(mut self, width: f64) -> Self {
        self.adjusted_width = Some(width);
        self
    }

    /// Returns a copy of `spec` with the overrides applied.
    pub fn apply(&self, spec: &ModuleSpec) -> ModuleSpec {
        let mut merged = spec.clone();
        if let Some(width) = self.adjusted_width.or(self.custom_width) {
            merged.width = width;
        }
        if let Some(height) = self.custom_height {
            merged.height = height;
        }
        if let Some(depth) = self.custom_depth {
            merged.depth = depth;
        }
        merged
    }
}
