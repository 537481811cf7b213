//! Built-in wardrobe module catalog.
//!
//! Each [`ModuleArchetype`] knows how to build its [`ModuleSpec`] for a given
//! width and height. Ids have the form `{prefix}-{width}` and parse back with
//! [`ModuleArchetype::from_id`].

use crate::content::DrawerStack;
use crate::model::{
    AsymmetricSpec, ModuleSpec, SectionHeight, SectionKind, SectionSpec, WidthSplit,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default module depth (mm).
pub const DEFAULT_DEPTH: f64 = 600.0;

/// Drawer section height of the 2-drawer archetypes (mm).
pub const TWO_DRAWER_SECTION_HEIGHT: f64 = 600.0;

/// Drawer section height of the 4-drawer archetypes (mm).
pub const FOUR_DRAWER_SECTION_HEIGHT: f64 = 1000.0;

/// Lower section height of the two-tier wardrobe (mm).
pub const TWO_TIER_BOTTOM_HEIGHT: f64 = 1025.0;

/// Drop of the two-tier wardrobe's shelf below its section top (mm).
pub const TWO_TIER_SHELF_DROP: f64 = 27.0;

/// Drawer heights of a 2-drawer stack, bottom first (mm).
pub const TWO_DRAWER_HEIGHTS: [f64; 2] = [255.0, 255.0];

/// Drawer heights of a 4-drawer stack, bottom first (mm).
pub const FOUR_DRAWER_HEIGHTS: [f64; 4] = [255.0, 255.0, 176.0, 176.0];

/// Right interior width of the styler module (mm).
pub const STYLER_WIDTH: f64 = 694.0;

/// Depth of the styler module; its left side stays at [`DEFAULT_DEPTH`] (mm).
pub const STYLER_DEPTH: f64 = 660.0;

/// Right interior width of the pants hanger module (mm).
pub const PANTS_HANGER_WIDTH: f64 = 564.0;

/// Safety shelf level above the interior bottom (mm).
pub const SAFETY_SHELF_POSITION: f64 = 2050.0;

/// Modules taller than this get a safety shelf (mm).
pub const SAFETY_SHELF_THRESHOLD: f64 = 2300.0;

/// Catalog module archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ModuleArchetype {
    /// Two drawers under a wardrobe, one column wide.
    TwoDrawerWardrobe,
    /// Short wardrobe under a long wardrobe, one column wide.
    TwoTierWardrobe,
    /// Four drawers under a wardrobe, one column wide.
    FourDrawerWardrobe,
    /// [`Self::TwoDrawerWardrobe`] two columns wide.
    DualTwoDrawerWardrobe,
    /// [`Self::TwoTierWardrobe`] two columns wide.
    DualTwoTierWardrobe,
    /// [`Self::FourDrawerWardrobe`] two columns wide.
    DualFourDrawerWardrobe,
    /// Drawers and wardrobe on the left, a deeper full-height styler bay on
    /// the right.
    DualDrawerStyler,
    /// Four drawers and wardrobe on the left, pants hanger and wardrobe on
    /// the right, with a shared middle panel.
    DualDrawerPantsHanger,
}

impl ModuleArchetype {
    /// Every archetype, single-column ones first.
    pub const ALL: [ModuleArchetype; 8] = [
        Self::TwoDrawerWardrobe,
        Self::TwoTierWardrobe,
        Self::FourDrawerWardrobe,
        Self::DualTwoDrawerWardrobe,
        Self::DualTwoTierWardrobe,
        Self::DualFourDrawerWardrobe,
        Self::DualDrawerStyler,
        Self::DualDrawerPantsHanger,
    ];

    /// Id prefix.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::TwoDrawerWardrobe => "single-2drawer-hanging",
            Self::TwoTierWardrobe => "single-2hanging",
            Self::FourDrawerWardrobe => "single-4drawer-hanging",
            Self::DualTwoDrawerWardrobe => "dual-2drawer-hanging",
            Self::DualTwoTierWardrobe => "dual-2hanging",
            Self::DualFourDrawerWardrobe => "dual-4drawer-hanging",
            Self::DualDrawerStyler => "dual-2drawer-styler",
            Self::DualDrawerPantsHanger => "dual-4drawer-pantshanger",
        }
    }

    /// Human readable name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::TwoDrawerWardrobe => "2-drawer + wardrobe",
            Self::TwoTierWardrobe => "2-tier wardrobe",
            Self::FourDrawerWardrobe => "4-drawer + wardrobe",
            Self::DualTwoDrawerWardrobe => "dual 2-drawer + wardrobe",
            Self::DualTwoTierWardrobe => "dual 2-tier wardrobe",
            Self::DualFourDrawerWardrobe => "dual 4-drawer + wardrobe",
            Self::DualDrawerStyler => "dual drawer + styler",
            Self::DualDrawerPantsHanger => "dual drawer + pants hanger",
        }
    }

    /// Returns true for two-column archetypes.
    pub fn is_dual(&self) -> bool {
        !matches!(
            self,
            Self::TwoDrawerWardrobe | Self::TwoTierWardrobe | Self::FourDrawerWardrobe
        )
    }

    /// Catalog id for a module of the given width.
    pub fn id(&self, width: f64) -> String {
        format!("{}-{}", self.prefix(), width)
    }

    /// Parses an id back into its archetype and width.
    pub fn from_id(id: &str) -> Option<(Self, f64)> {
        let (prefix, width) = id.rsplit_once('-')?;
        let width: f64 = width.parse().ok()?;
        Self::ALL
            .into_iter()
            .find(|a| a.prefix() == prefix)
            .map(|a| (a, width))
    }

    /// Builds the module spec for a width and outer height.
    pub fn spec(&self, width: f64, height: f64) -> ModuleSpec {
        match self {
            Self::TwoDrawerWardrobe | Self::DualTwoDrawerWardrobe => {
                ModuleSpec::new(width, height, DEFAULT_DEPTH).with_sections(drawer_wardrobe(
                    &TWO_DRAWER_HEIGHTS,
                    TWO_DRAWER_SECTION_HEIGHT,
                    height,
                ))
            }
            Self::FourDrawerWardrobe | Self::DualFourDrawerWardrobe => {
                ModuleSpec::new(width, height, DEFAULT_DEPTH).with_sections(drawer_wardrobe(
                    &FOUR_DRAWER_HEIGHTS,
                    FOUR_DRAWER_SECTION_HEIGHT,
                    height,
                ))
            }
            Self::TwoTierWardrobe | Self::DualTwoTierWardrobe => {
                ModuleSpec::new(width, height, DEFAULT_DEPTH).with_sections(two_tier(height))
            }
            Self::DualDrawerStyler => {
                let left = drawer_wardrobe(&TWO_DRAWER_HEIGHTS, TWO_DRAWER_SECTION_HEIGHT, height)
                    .into_iter()
                    .map(|s| s.with_depth(DEFAULT_DEPTH))
                    .collect();
                let right = apply_safety_shelf(
                    vec![SectionSpec::hanging(SectionHeight::Absolute(height))],
                    height,
                );
                ModuleSpec::new(width, height, STYLER_DEPTH).with_asymmetric(
                    AsymmetricSpec::new(left, right)
                        .with_split(WidthSplit::RightAbsolute(STYLER_WIDTH)),
                )
            }
            Self::DualDrawerPantsHanger => {
                let upper = height - FOUR_DRAWER_SECTION_HEIGHT;
                let left = vec![
                    drawer_section(&FOUR_DRAWER_HEIGHTS, FOUR_DRAWER_SECTION_HEIGHT),
                    SectionSpec::hanging(SectionHeight::Absolute(upper)),
                ];
                let right = vec![
                    SectionSpec::hanging(SectionHeight::Absolute(FOUR_DRAWER_SECTION_HEIGHT)),
                    SectionSpec::hanging(SectionHeight::Absolute(upper)),
                ];
                let mut asym = AsymmetricSpec::new(left, right)
                    .with_split(WidthSplit::RightAbsolute(PANTS_HANGER_WIDTH))
                    .with_shared_middle_panel(FOUR_DRAWER_SECTION_HEIGHT);
                if height > SAFETY_SHELF_THRESHOLD {
                    asym = asym.with_shared_safety_shelf(SAFETY_SHELF_POSITION);
                }
                ModuleSpec::new(width, height, DEFAULT_DEPTH).with_asymmetric(asym)
            }
        }
    }
}

/// Drawer section whose gap closes the stack exactly.
fn drawer_section(heights: &[f64], section_height: f64) -> SectionSpec {
    let section = SectionSpec::drawer(SectionHeight::Absolute(section_height), heights.len());
    match DrawerStack::fitted(section_height, heights.to_vec()) {
        Some(stack) => stack.apply_to(section),
        None => section,
    }
}

fn drawer_wardrobe(heights: &[f64], drawer_height: f64, height: f64) -> Vec<SectionSpec> {
    apply_safety_shelf(
        vec![
            drawer_section(heights, drawer_height),
            SectionSpec::hanging(SectionHeight::Absolute(height - drawer_height)),
        ],
        height,
    )
}

fn two_tier(height: f64) -> Vec<SectionSpec> {
    apply_safety_shelf(
        vec![
            SectionSpec::shelf(SectionHeight::Absolute(TWO_TIER_BOTTOM_HEIGHT))
                .with_shelf_positions(vec![TWO_TIER_BOTTOM_HEIGHT - TWO_TIER_SHELF_DROP]),
            SectionSpec::hanging(SectionHeight::Absolute(height - TWO_TIER_BOTTOM_HEIGHT)),
        ],
        height,
    )
}

/// Adds a safety shelf to the hanging section spanning
/// [`SAFETY_SHELF_POSITION`] when the module is taller than
/// [`SAFETY_SHELF_THRESHOLD`].
///
/// Levels are accumulated over declared absolute heights; a percentage
/// section ends the scan since its height is not known yet.
pub fn apply_safety_shelf(sections: Vec<SectionSpec>, module_height: f64) -> Vec<SectionSpec> {
    if module_height <= SAFETY_SHELF_THRESHOLD {
        return sections;
    }

    let mut start = Some(0.0);
    sections
        .into_iter()
        .map(|section| {
            let (Some(bottom), SectionHeight::Absolute(h)) = (start, section.height) else {
                start = None;
                return section;
            };
            start = Some(bottom + h);
            let spans = SAFETY_SHELF_POSITION >= bottom && SAFETY_SHELF_POSITION < bottom + h;
            if section.kind == SectionKind::Hanging && spans {
                section.with_shelf_positions(vec![SAFETY_SHELF_POSITION - bottom])
            } else {
                section
            }
        })
        .collect()
}

/// Parameters of a catalog generation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CatalogRequest {
    /// Width of one column (mm).
    pub column_width: f64,
    /// Number of columns in the space.
    pub column_count: usize,
    /// Height available in the space (mm).
    pub height: f64,
    /// Float placement offset subtracted from the height (mm).
    pub float_height: f64,
}

impl CatalogRequest {
    /// Creates a request without float placement.
    pub fn new(column_width: f64, column_count: usize, height: f64) -> Self {
        Self {
            column_width,
            column_count,
            height,
            float_height: 0.0,
        }
    }

    /// Sets the float placement offset.
    pub fn with_float_height(mut self, float_height: f64) -> Self {
        self.float_height = float_height.max(0.0);
        self
    }

    /// Module height after float placement.
    pub fn module_height(&self) -> f64 {
        self.height - self.float_height
    }
}

/// One generated catalog module.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CatalogEntry {
    /// Catalog id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Category tag.
    pub category: String,
    /// Archetype the entry was built from.
    pub archetype: ModuleArchetype,
    /// Default spec.
    pub spec: ModuleSpec,
}

/// Module catalog generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Catalog;

impl Catalog {
    /// Builds one entry.
    pub fn entry(archetype: ModuleArchetype, width: f64, height: f64) -> CatalogEntry {
        CatalogEntry {
            id: archetype.id(width),
            name: format!("{} {}mm", archetype.label(), width),
            category: "full".to_string(),
            archetype,
            spec: archetype.spec(width, height),
        }
    }

    /// Generates every archetype that fits the request. Dual archetypes
    /// need two or more columns and are two columns wide.
    pub fn generate(request: &CatalogRequest) -> Vec<CatalogEntry> {
        let height = request.module_height();
        if request.column_count < 2 {
            log::warn!(
                "{} column(s) available, skipping dual modules",
                request.column_count
            );
        }

        ModuleArchetype::ALL
            .into_iter()
            .filter(|a| !a.is_dual() || request.column_count >= 2)
            .map(|a| {
                let width = if a.is_dual() {
                    request.column_width * 2.0
                } else {
                    request.column_width
                };
                Self::entry(a, width, height)
            })
            .collect()
    }

    /// Rebuilds an entry from its id.
    pub fn from_id(id: &str, height: f64) -> Option<CatalogEntry> {
        ModuleArchetype::from_id(id).map(|(archetype, width)| Self::entry(archetype, width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::LayoutEngine;

    #[test]
    fn test_generate_single_column() {
        let entries = Catalog::generate(&CatalogRequest::new(600.0, 1, 2400.0));
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| !e.archetype.is_dual()));
        assert_eq!(entries[0].id, "single-2drawer-hanging-600");
    }

    #[test]
    fn test_generate_dual_columns() {
        let entries = Catalog::generate(&CatalogRequest::new(600.0, 3, 2400.0));
        assert_eq!(entries.len(), 8);
        let styler = entries
            .iter()
            .find(|e| e.archetype == ModuleArchetype::DualDrawerStyler)
            .unwrap();
        assert_eq!(styler.spec.width, 1200.0);
        assert_eq!(styler.id, "dual-2drawer-styler-1200");
    }

    #[test]
    fn test_float_height_reduces_module() {
        let request = CatalogRequest::new(600.0, 1, 2400.0).with_float_height(150.0);
        let entries = Catalog::generate(&request);
        assert!(entries.iter().all(|e| e.spec.height == 2250.0));
    }

    #[test]
    fn test_id_round_trip() {
        for archetype in ModuleArchetype::ALL {
            let id = archetype.id(1200.0);
            assert_eq!(ModuleArchetype::from_id(&id), Some((archetype, 1200.0)));
        }
        assert_eq!(ModuleArchetype::from_id("unknown-600"), None);
        assert_eq!(ModuleArchetype::from_id("single-2hanging-wide"), None);
    }

    #[test]
    fn test_safety_shelf_rule() {
        let sections = apply_safety_shelf(
            vec![
                SectionSpec::drawer(SectionHeight::Absolute(600.0), 2),
                SectionSpec::hanging(SectionHeight::Absolute(1800.0)),
            ],
            2400.0,
        );
        assert_eq!(sections[1].shelf_positions, Some(vec![1450.0]));
        assert_eq!(sections[0].shelf_positions, None);

        let low = apply_safety_shelf(
            vec![SectionSpec::hanging(SectionHeight::Absolute(2300.0))],
            2300.0,
        );
        assert_eq!(low[0].shelf_positions, None);
    }

    #[test]
    fn test_drawer_stacks_are_fitted() {
        let spec = ModuleArchetype::FourDrawerWardrobe.spec(600.0, 2400.0);
        let drawer = &spec.sections[0];
        let gap = drawer.gap_height.unwrap();
        assert!((gap - 27.6).abs() < 1e-9);
        assert_eq!(drawer.drawer_heights.as_deref(), Some(&FOUR_DRAWER_HEIGHTS[..]));
    }

    #[test]
    fn test_every_archetype_resolves() {
        let engine = LayoutEngine::default();
        for entry in Catalog::generate(&CatalogRequest::new(600.0, 2, 2400.0)) {
            let layout = engine.resolve(&entry.spec);
            assert!(layout.is_ok(), "{}: {:?}", entry.id, layout.err());
        }
    }

    #[test]
    fn test_styler_depths() {
        let spec = ModuleArchetype::DualDrawerStyler.spec(1200.0, 2400.0);
        let layout = LayoutEngine::default().resolve(&spec).unwrap();
        let left = &layout.compartments[0];
        let right = &layout.compartments[1];

        assert!(left.sections.iter().all(|s| s.depth == 600.0 && s.z_offset == 30.0));
        assert_eq!(right.sections[0].depth, 660.0);
        assert_eq!(layout.widths.map(|w| w.right), Some(694.0));
    }

    #[test]
    fn test_pants_hanger_shared_panels() {
        let spec = ModuleArchetype::DualDrawerPantsHanger.spec(1200.0, 2400.0);
        let layout = LayoutEngine::default().resolve(&spec).unwrap();

        let middle = layout.panels.iter().find(|p| p.name == "shared-middle-panel").unwrap();
        assert_eq!(middle.position.y, 1018.0);
        assert_eq!(middle.width(), 1164.0);
        assert!(layout.panels.iter().any(|p| p.name == "shared-safety-shelf-0"));
        assert!(!layout.panels.iter().any(|p| p.name == "left-divider-0-lower"));
    }
}
