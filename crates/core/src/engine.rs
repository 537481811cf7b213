//! Layout engine facade and resolved output.

use nalgebra::Vector3;

use crate::asymmetric::{AsymmetricCompositionLayer, WidthAllocation};
use crate::boring::{BoringHole, BoringPositionCalculator};
use crate::config::LayoutConfig;
use crate::content::{ContentItem, SectionContentLayout, SectionContext};
use crate::cutlist::CutList;
use crate::depth::{DepthResolver, ResolvedSection};
use crate::error::Result;
use crate::geometry::{PanelBox, PanelRole};
use crate::height::HeightResolver;
use crate::model::{ModuleSpec, SectionKind, SectionSpec};
use crate::panel::{InteriorFrame, PanelLayoutBuilder};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which part of the module a compartment occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CompartmentSide {
    /// The whole interior of a plain module.
    Full,
    /// Left compartment of a dual module.
    Left,
    /// Right compartment of a dual module.
    Right,
}

impl CompartmentSide {
    /// Prefix added to panel names, if any.
    pub fn prefix(&self) -> Option<&'static str> {
        match self {
            Self::Full => None,
            Self::Left => Some("left"),
            Self::Right => Some("right"),
        }
    }
}

/// Full-width levels shared by both compartments of a dual module.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SharedLevels {
    /// Y of the shared middle panel centre.
    pub middle_panel: Option<f64>,
    /// Y of shared safety shelf centres.
    pub safety_shelves: Vec<f64>,
}

/// One resolved section stack.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Compartment {
    /// Placement of the compartment.
    pub side: CompartmentSide,
    /// Interior box of the compartment.
    pub frame: InteriorFrame,
    /// Resolved sections, bottom to top.
    pub sections: Vec<ResolvedSection>,
    /// Content type of each section.
    pub kinds: Vec<SectionKind>,
    /// Y of the board centre above each section.
    pub caps: Vec<f64>,
    /// Y of the board centre below each section.
    pub floors: Vec<f64>,
    /// Boring levels on this compartment's side panels.
    pub boring_positions: Vec<f64>,
    /// Boring holes on this compartment's side panels.
    pub boring_holes: Vec<BoringHole>,
}

impl Compartment {
    fn elevate(&mut self, dy: f64) {
        self.frame.bottom_y += dy;
        self.frame.top_y += dy;
        for s in &mut self.sections {
            s.bottom_y += dy;
            s.top_y += dy;
            s.center_y += dy;
        }
        for y in self
            .caps
            .iter_mut()
            .chain(self.floors.iter_mut())
            .chain(self.boring_positions.iter_mut())
        {
            *y += dy;
        }
        for hole in &mut self.boring_holes {
            hole.y += dy;
        }
    }
}

/// Compartment plus the panels and content it produced.
#[derive(Debug, Clone)]
pub struct CompartmentOutput {
    /// The compartment.
    pub compartment: Compartment,
    /// Dividers and back panels.
    pub panels: Vec<PanelBox>,
    /// Shelves, drawers and rods.
    pub content: Vec<ContentItem>,
}

/// Clear opening of one section between the boards above and below it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SectionClearance {
    /// Compartment of the section.
    pub side: CompartmentSide,
    /// Section index.
    pub index: usize,
    /// Content type.
    pub kind: SectionKind,
    /// Resolved section height.
    pub height: f64,
    /// Distance between the board faces above and below.
    pub clearance: f64,
}

/// Counts over a resolved layout.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayoutSummary {
    /// Number of compartments (1 or 2).
    pub compartments: usize,
    /// Number of sections over all compartments.
    pub sections: usize,
    /// Number of structural panels.
    pub structural_panels: usize,
    /// Number of shelves, safety shelves and finish panels.
    pub shelves: usize,
    /// Number of drawers.
    pub drawers: usize,
    /// Number of hanging rods.
    pub rods: usize,
    /// Number of distinct boring levels.
    pub boring_levels: usize,
    /// Number of boring holes.
    pub boring_holes: usize,
    /// Number of parts in the cut list.
    pub cut_parts: usize,
}

impl From<&ResolvedLayout> for LayoutSummary {
    fn from(layout: &ResolvedLayout) -> Self {
        let count = |f: fn(&ContentItem) -> bool| layout.content.iter().filter(|c| f(c)).count();
        Self {
            compartments: layout.compartments.len(),
            sections: layout.compartments.iter().map(|c| c.sections.len()).sum(),
            structural_panels: layout.panels.len(),
            shelves: count(|c| matches!(c, ContentItem::Shelf(_))),
            drawers: count(|c| matches!(c, ContentItem::Drawer(_))),
            rods: count(|c| matches!(c, ContentItem::Rod(_))),
            boring_levels: layout.boring_positions.len(),
            boring_holes: layout.boring_holes.len(),
            cut_parts: layout.cut_list().total_parts(),
        }
    }
}

/// Fully resolved geometry of a module.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResolvedLayout {
    /// One compartment for a plain module, left and right for a dual one.
    pub compartments: Vec<Compartment>,
    /// Width split of a dual module.
    pub widths: Option<WidthAllocation>,
    /// Structural panels: sides, top, bottom, dividers, backs and shared
    /// panels.
    pub panels: Vec<PanelBox>,
    /// Shelves, drawers and rods.
    pub content: Vec<ContentItem>,
    /// Sorted boring levels over all compartments.
    pub boring_positions: Vec<f64>,
    /// Boring holes over all compartments.
    pub boring_holes: Vec<BoringHole>,
}

impl ResolvedLayout {
    /// Sections of every compartment, left before right.
    pub fn sections(&self) -> impl Iterator<Item = &ResolvedSection> {
        self.compartments.iter().flat_map(|c| c.sections.iter())
    }

    /// Compartment on the given side.
    pub fn compartment(&self, side: CompartmentSide) -> Option<&Compartment> {
        self.compartments.iter().find(|c| c.side == side)
    }

    /// Height of every section, left before right.
    pub fn section_heights(&self) -> Vec<f64> {
        self.sections().map(|s| s.height).collect()
    }

    /// Clear opening of every section, for dimension annotations and door
    /// sizing.
    pub fn internal_clearances(&self) -> Vec<SectionClearance> {
        self.compartments
            .iter()
            .flat_map(|c| {
                let t = c.frame.panel_thickness;
                c.sections.iter().map(move |s| SectionClearance {
                    side: c.side,
                    index: s.index,
                    kind: c.kinds[s.index],
                    height: s.height,
                    clearance: (c.caps[s.index] - t / 2.0) - (c.floors[s.index] + t / 2.0),
                })
            })
            .collect()
    }

    /// Structural panels followed by every content part.
    pub fn all_panels(&self) -> impl Iterator<Item = &PanelBox> {
        self.panels
            .iter()
            .chain(self.content.iter().flat_map(|c| c.panels().iter()))
    }

    /// Panels of one role, structural or content.
    pub fn panels_with_role(&self, role: PanelRole) -> impl Iterator<Item = &PanelBox> {
        self.all_panels().filter(move |p| p.role == role)
    }

    /// Boring holes as marker boxes on both side panels of each compartment.
    pub fn boring_markers(&self) -> Vec<PanelBox> {
        let mut markers = Vec::new();
        for c in &self.compartments {
            let t = c.frame.panel_thickness;
            let half = c.frame.width / 2.0 + t / 2.0;
            let prefix = c.side.prefix();
            for (i, hole) in c.boring_holes.iter().enumerate() {
                for (side, x) in [("left", c.frame.center_x - half), ("right", c.frame.center_x + half)] {
                    let marker = hole.to_panel_box(i, x).prefixed(side);
                    markers.push(match prefix {
                        Some(p) => marker.prefixed(p),
                        None => marker,
                    });
                }
            }
        }
        markers
    }

    /// Counts over the layout.
    pub fn summary(&self) -> LayoutSummary {
        LayoutSummary::from(self)
    }

    /// Fabrication cut list of structural and drawer panels.
    pub fn cut_list(&self) -> CutList {
        CutList::from_panels(self.all_panels())
    }

    /// Returns a copy raised by `offset` mm for float placement.
    pub fn elevated(&self, offset: f64) -> Self {
        let shift = Vector3::new(0.0, offset, 0.0);
        let mut layout = self.clone();
        for c in &mut layout.compartments {
            c.elevate(offset);
        }
        layout.panels = layout.panels.iter().map(|p| p.translated(shift)).collect();
        for item in &mut layout.content {
            item.translate(shift);
        }
        for y in &mut layout.boring_positions {
            *y += offset;
        }
        for hole in &mut layout.boring_holes {
            hole.y += offset;
        }
        layout
    }
}

/// Resolves module specs into geometry.
///
/// The engine holds only its configuration; every call is independent.
///
/// # Example
///
/// ```rust
/// use u_cabinet_core::{LayoutEngine, ModuleSpec, SectionHeight, SectionSpec};
///
/// let spec = ModuleSpec::new(600.0, 2400.0, 600.0)
///     .with_section(SectionSpec::drawer(SectionHeight::Absolute(1000.0), 4))
///     .with_section(SectionSpec::hanging(SectionHeight::Percentage(100.0)));
///
/// let layout = LayoutEngine::default().resolve(&spec).unwrap();
/// assert_eq!(layout.section_heights(), vec![1000.0, 1364.0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    /// Creates an engine with the given constants.
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Returns the engine's constants.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Resolves a module into panels, content and boring holes.
    pub fn resolve(&self, spec: &ModuleSpec) -> Result<ResolvedLayout> {
        spec.validate()?;

        let layout = match &spec.asymmetric {
            Some(asym) => {
                let composition = AsymmetricCompositionLayer::new(self).compose(spec, asym)?;
                self.assemble(
                    composition.compartments,
                    Some(composition.widths),
                    composition.panels,
                    composition.content,
                )
            }
            None => self.resolve_plain(spec)?,
        };

        log::debug!(
            "resolved {}x{}x{} module: {} sections, {} panels, {} content items",
            spec.width,
            spec.height,
            spec.depth,
            layout.sections().count(),
            layout.panels.len(),
            layout.content.len()
        );
        Ok(layout)
    }

    fn resolve_plain(&self, spec: &ModuleSpec) -> Result<ResolvedLayout> {
        let builder = PanelLayoutBuilder::new(&self.config);
        let frame = InteriorFrame::of_module(spec);
        let split = spec.side_panels.splits(&spec.sections);
        let carcass = builder.top_and_bottom(spec);

        let output = self.resolve_compartment(
            CompartmentSide::Full,
            frame,
            &spec.sections,
            split,
            &SharedLevels::default(),
            &carcass,
        )?;

        let mut panels = builder.side_panels(spec, &output.compartment.sections, split);
        panels.extend(carcass);
        panels.extend(output.panels);

        Ok(self.assemble(vec![output.compartment], None, panels, output.content))
    }

    fn assemble(
        &self,
        compartments: Vec<Compartment>,
        widths: Option<WidthAllocation>,
        panels: Vec<PanelBox>,
        content: Vec<ContentItem>,
    ) -> ResolvedLayout {
        let mut boring_positions: Vec<f64> = compartments
            .iter()
            .flat_map(|c| c.boring_positions.iter().copied())
            .collect();
        boring_positions.sort_by(f64::total_cmp);
        boring_positions.dedup_by(|a, b| (*a - *b).abs() <= self.config.tolerance);
        let boring_holes = compartments
            .iter()
            .flat_map(|c| c.boring_holes.iter().copied())
            .collect();

        ResolvedLayout {
            compartments,
            widths,
            panels,
            content,
            boring_positions,
            boring_holes,
        }
    }

    /// Runs the section pipeline for one compartment: heights, depths,
    /// dividers and back panels, content, then boring.
    ///
    /// `boards` are horizontal boards outside the compartment (carcass top
    /// and bottom, shared panels) whose levels are bored as well.
    pub fn resolve_compartment(
        &self,
        side: CompartmentSide,
        frame: InteriorFrame,
        specs: &[SectionSpec],
        split_sides: bool,
        shared: &SharedLevels,
        boards: &[PanelBox],
    ) -> Result<CompartmentOutput> {
        let bounds = HeightResolver::new(frame.height())
            .with_origin(frame.bottom_y)
            .with_tolerance(self.config.tolerance)
            .resolve(specs)?;
        let sections = DepthResolver::new(frame.depth).apply(specs, &bounds)?;

        let builder = PanelLayoutBuilder::new(&self.config);
        let mut panels = builder.dividers(&frame, &sections, shared.middle_panel);
        panels.extend(builder.back_panels(&frame, &sections, split_sides));

        let near = |y: f64, level: Option<f64>| {
            level.filter(|m| (m - y).abs() <= frame.panel_thickness / 2.0 + self.config.tolerance)
        };
        let last = sections.len().saturating_sub(1);
        let caps: Vec<f64> = sections
            .iter()
            .map(|s| match near(s.top_y, shared.middle_panel) {
                Some(m) if s.index < last => m,
                _ => builder.cap_y(&frame, &sections, s.index),
            })
            .collect();
        let floors: Vec<f64> = sections
            .iter()
            .map(|s| match near(s.bottom_y, shared.middle_panel) {
                Some(m) if s.index > 0 => m,
                _ => builder.floor_y(&frame, &sections, s.index),
            })
            .collect();

        let layout = SectionContentLayout::new(&self.config);
        let mut content = Vec::new();
        for (section, spec) in sections.iter().zip(specs) {
            let ctx = SectionContext::new(frame, caps[section.index])
                .with_shared_shelves(shared.safety_shelves.clone());
            content.extend(layout.layout(section, spec, &ctx)?);
        }

        let calculator = BoringPositionCalculator::new(&self.config);
        let bored: Vec<PanelBox> = boards.iter().chain(panels.iter()).cloned().collect();
        let boring_positions = calculator.positions(&bored, &content);
        let boring_holes = calculator.holes(
            &boring_positions,
            &sections,
            frame.depth,
            frame.panel_thickness,
        );

        if let Some(prefix) = side.prefix() {
            panels = panels.into_iter().map(|p| p.prefixed(prefix)).collect();
            for item in &mut content {
                item.prefix(prefix);
            }
        }

        Ok(CompartmentOutput {
            compartment: Compartment {
                side,
                frame,
                kinds: specs.iter().map(|s| s.kind).collect(),
                sections,
                caps,
                floors,
                boring_positions,
                boring_holes,
            },
            panels,
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{AsymmetricSpec, SectionHeight, WidthSplit};

    fn wardrobe() -> ModuleSpec {
        ModuleSpec::new(600.0, 2400.0, 600.0)
            .with_section(SectionSpec::drawer(SectionHeight::Absolute(1000.0), 4))
            .with_section(SectionSpec::hanging(SectionHeight::Percentage(100.0)))
    }

    #[test]
    fn test_resolve_wardrobe() {
        let layout = LayoutEngine::default().resolve(&wardrobe()).unwrap();
        let summary = layout.summary();

        assert_eq!(layout.section_heights(), vec![1000.0, 1364.0]);
        assert_eq!(summary.compartments, 1);
        assert_eq!(summary.drawers, 4);
        assert_eq!(summary.rods, 1);
        assert_eq!(layout.panels_with_role(PanelRole::Side).count(), 4);
        assert_eq!(layout.panels_with_role(PanelRole::Back).count(), 2);
        assert_eq!(layout.panels_with_role(PanelRole::Divider).count(), 2);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let engine = LayoutEngine::default();
        let a = engine.resolve(&wardrobe()).unwrap();
        let b = engine.resolve(&wardrobe()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_module_is_rejected() {
        let spec = ModuleSpec::new(600.0, 0.0, 600.0);
        let err = LayoutEngine::default().resolve(&spec).unwrap_err();
        assert!(matches!(err, Error::InvalidModule(_)));
    }

    #[test]
    fn test_internal_clearances() {
        let layout = LayoutEngine::default().resolve(&wardrobe()).unwrap();
        let clearances = layout.internal_clearances();

        assert_eq!(clearances.len(), 2);
        // Drawer section: bottom board face at 18, lower divider board face at
        // 1018 - 18 - 0.025.
        assert!((clearances[0].clearance - (1000.0 - 18.025)).abs() < 1e-9);
        assert!((clearances[1].clearance - (1364.0 - 18.025)).abs() < 1e-9);
        assert_eq!(clearances[1].kind, SectionKind::Hanging);
    }

    #[test]
    fn test_elevated_moves_only_y() {
        let layout = LayoutEngine::default().resolve(&wardrobe()).unwrap();
        let raised = layout.elevated(100.0);

        assert_eq!(raised.panels.len(), layout.panels.len());
        for (a, b) in layout.panels.iter().zip(&raised.panels) {
            assert!((b.position.y - a.position.y - 100.0).abs() < 1e-9);
            assert_eq!(a.position.x, b.position.x);
            assert_eq!(a.size, b.size);
        }
        assert_eq!(raised.section_heights(), layout.section_heights());
        assert!((raised.boring_positions[0] - layout.boring_positions[0] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_boring_markers_on_both_sides() {
        let spec = ModuleSpec::new(600.0, 1200.0, 600.0)
            .with_section(SectionSpec::shelf(SectionHeight::Percentage(100.0)).with_shelf_count(1));
        let layout = LayoutEngine::default().resolve(&spec).unwrap();
        let markers = layout.boring_markers();

        assert_eq!(markers.len(), layout.boring_holes.len() * 2);
        assert!(markers.iter().any(|m| m.position.x == -291.0));
        assert!(markers.iter().any(|m| m.position.x == 291.0));
    }

    #[test]
    fn test_dual_module_prefixes_names() {
        let spec = ModuleSpec::new(1200.0, 2400.0, 600.0).with_asymmetric(
            AsymmetricSpec::new(
                vec![SectionSpec::hanging(SectionHeight::Percentage(100.0))],
                vec![
                    SectionSpec::drawer(SectionHeight::Absolute(600.0), 2),
                    SectionSpec::shelf(SectionHeight::Percentage(100.0)).with_shelf_count(3),
                ],
            )
            .with_split(WidthSplit::RightAbsolute(400.0)),
        );
        let layout = LayoutEngine::default().resolve(&spec).unwrap();

        assert_eq!(layout.compartments.len(), 2);
        assert!(layout.all_panels().any(|p| p.name == "left-rod-0"));
        assert!(layout.all_panels().any(|p| p.name == "right-divider-0-lower"));
        assert!(layout.all_panels().any(|p| p.name == "shared-divider"));
        assert_eq!(layout.widths.map(|w| w.right), Some(400.0));
    }
}
