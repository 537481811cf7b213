//! Structural panel generation.
//!
//! Builds the carcass of a module from its resolved sections: side panels,
//! top and bottom boards, the two-board dividers between sections and the
//! back panels. Content (shelves, drawers, rods) is handled by
//! [`crate::content`].
//!
//! # Divider boards
//!
//! A divider at boundary `b` is two boards: the top of the lower section and
//! the bottom of the upper section. They sit at `b ∓ (t/2 + gap/2)` where the
//! gap is a visual micro gap only.

use nalgebra::{Point3, Vector3};

use crate::config::LayoutConfig;
use crate::depth::ResolvedSection;
use crate::geometry::{PanelBox, PanelRole};
use crate::model::ModuleSpec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Interior box a section stack is laid out in.
///
/// For a plain module this is the space between the four carcass boards; a
/// dual module has one frame per compartment.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InteriorFrame {
    /// Interior width (mm).
    pub width: f64,
    /// X of the frame's vertical centre plane.
    pub center_x: f64,
    /// Y of the interior bottom (top face of the bottom board).
    pub bottom_y: f64,
    /// Y of the interior top (bottom face of the top board).
    pub top_y: f64,
    /// Module depth (mm).
    pub depth: f64,
    /// Carcass board thickness (mm).
    pub panel_thickness: f64,
    /// Back panel thickness (mm).
    pub back_panel_thickness: f64,
}

impl InteriorFrame {
    /// Full interior of a module.
    pub fn of_module(spec: &ModuleSpec) -> Self {
        let t = spec.panel_thickness;
        Self {
            width: spec.interior_width(),
            center_x: 0.0,
            bottom_y: t,
            top_y: spec.height - t,
            depth: spec.depth,
            panel_thickness: t,
            back_panel_thickness: spec.back_panel_thickness,
        }
    }

    /// Returns a narrower frame centred at `center_x`.
    pub fn with_width(mut self, width: f64, center_x: f64) -> Self {
        self.width = width;
        self.center_x = center_x;
        self
    }

    /// Interior height.
    pub fn height(&self) -> f64 {
        self.top_y - self.bottom_y
    }
}

/// Builds structural panels.
#[derive(Debug, Clone, Copy)]
pub struct PanelLayoutBuilder<'a> {
    config: &'a LayoutConfig,
}

impl<'a> PanelLayoutBuilder<'a> {
    /// Creates a builder using the given constants.
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }

    /// Builds every structural panel of a plain module.
    pub fn build(&self, spec: &ModuleSpec, sections: &[ResolvedSection]) -> Vec<PanelBox> {
        let frame = InteriorFrame::of_module(spec);
        let split = spec.side_panels.splits(&spec.sections);

        let mut panels = self.side_panels(spec, sections, split);
        panels.extend(self.top_and_bottom(spec));
        panels.extend(self.dividers(&frame, sections, None));
        panels.extend(self.back_panels(&frame, sections, split));
        panels
    }

    /// Left and right side panels, either one full-height pair or one pair
    /// per section.
    ///
    /// Split pieces follow each section's depth. The lowest piece reaches
    /// down past the bottom board and the highest up past the top board so
    /// the pieces together span the module height.
    pub fn side_panels(
        &self,
        spec: &ModuleSpec,
        sections: &[ResolvedSection],
        split: bool,
    ) -> Vec<PanelBox> {
        let t = spec.panel_thickness;
        let x = spec.width / 2.0 - t / 2.0;

        if !split || sections.len() < 2 {
            let size = Vector3::new(t, spec.height, spec.depth);
            let y = spec.height / 2.0;
            return vec![
                PanelBox::new("side-left", PanelRole::Side, size, Point3::new(-x, y, 0.0)),
                PanelBox::new("side-right", PanelRole::Side, size, Point3::new(x, y, 0.0)),
            ];
        }

        let last = sections.len() - 1;
        let mut panels = Vec::with_capacity(sections.len() * 2);
        for section in sections {
            let below = if section.index == 0 { t } else { 0.0 };
            let above = if section.index == last { t } else { 0.0 };
            let height = section.height + below + above;
            let y = section.bottom_y - below + height / 2.0;
            let size = Vector3::new(t, height, section.depth);

            for (side, sign) in [("left", -1.0), ("right", 1.0)] {
                panels.push(PanelBox::new(
                    format!("side-{}-{}", side, section.index),
                    PanelRole::Side,
                    size,
                    Point3::new(sign * x, y, section.z_offset),
                ));
            }
        }
        panels
    }

    /// Top and bottom carcass boards, seated against the back panel.
    pub fn top_and_bottom(&self, spec: &ModuleSpec) -> Vec<PanelBox> {
        let t = spec.panel_thickness;
        let size = Vector3::new(
            spec.interior_width() - self.config.width_trim,
            t,
            spec.depth - self.config.rear_trim,
        );
        let z = self.config.rear_trim / 2.0;

        vec![
            PanelBox::new("bottom", PanelRole::Bottom, size, Point3::new(0.0, t / 2.0, z)),
            PanelBox::new(
                "top",
                PanelRole::Top,
                size,
                Point3::new(0.0, spec.height - t / 2.0, z),
            ),
        ]
    }

    /// Two-board dividers at every internal section boundary.
    ///
    /// A boundary within tolerance of `shared_y` is skipped: a full-width
    /// shared panel already closes it.
    pub fn dividers(
        &self,
        frame: &InteriorFrame,
        sections: &[ResolvedSection],
        shared_y: Option<f64>,
    ) -> Vec<PanelBox> {
        let t = frame.panel_thickness;
        let offset = t / 2.0 + self.config.divider_gap / 2.0;

        let mut panels = Vec::new();
        for pair in sections.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            let boundary = lower.top_y;
            if shared_y.is_some_and(|y| (y - boundary).abs() <= t / 2.0 + self.config.tolerance) {
                continue;
            }

            let depth = lower.depth.min(upper.depth) - self.config.rear_trim;
            let z = lower.front_z() - depth / 2.0;
            let size = Vector3::new(frame.width, t, depth);

            panels.push(PanelBox::new(
                format!("divider-{}-lower", lower.index),
                PanelRole::Divider,
                size,
                Point3::new(frame.center_x, boundary - offset, z),
            ));
            panels.push(PanelBox::new(
                format!("divider-{}-upper", lower.index),
                PanelRole::Divider,
                size,
                Point3::new(frame.center_x, boundary + offset, z),
            ));
        }
        panels
    }

    /// Back panels: one per section when depths differ or the sides are
    /// split, otherwise a single panel over the whole interior.
    pub fn back_panels(
        &self,
        frame: &InteriorFrame,
        sections: &[ResolvedSection],
        split: bool,
    ) -> Vec<PanelBox> {
        let width = frame.width + self.config.back_panel_side_extension;
        let extension = 2.0 * self.config.back_panel_vertical_extension;
        let bpt = frame.back_panel_thickness;

        let depths_differ = sections
            .windows(2)
            .any(|pair| (pair[0].depth - pair[1].depth).abs() > self.config.tolerance);

        if sections.len() >= 2 && (depths_differ || split) {
            return sections
                .iter()
                .map(|section| {
                    PanelBox::new(
                        format!("back-{}", section.index),
                        PanelRole::Back,
                        Vector3::new(width, section.height + extension, bpt),
                        Point3::new(
                            frame.center_x,
                            section.center_y,
                            section.back_panel_z(bpt, self.config.back_inset),
                        ),
                    )
                })
                .collect();
        }

        let z = match sections.first() {
            Some(section) => section.back_panel_z(bpt, self.config.back_inset),
            None => -frame.depth / 2.0 + bpt / 2.0 + self.config.back_inset,
        };
        vec![PanelBox::new(
            "back",
            PanelRole::Back,
            Vector3::new(width, frame.height() + extension, bpt),
            Point3::new(frame.center_x, (frame.bottom_y + frame.top_y) / 2.0, z),
        )]
    }

    /// Y of the centre of the board capping section `index` from above.
    pub fn cap_y(&self, frame: &InteriorFrame, sections: &[ResolvedSection], index: usize) -> f64 {
        let t = frame.panel_thickness;
        if index + 1 >= sections.len() {
            frame.top_y + t / 2.0
        } else {
            sections[index].top_y - t / 2.0 - self.config.divider_gap / 2.0
        }
    }

    /// Y of the centre of the board below section `index`.
    pub fn floor_y(
        &self,
        frame: &InteriorFrame,
        sections: &[ResolvedSection],
        index: usize,
    ) -> f64 {
        let t = frame.panel_thickness;
        if index == 0 || index >= sections.len() {
            frame.bottom_y - t / 2.0
        } else {
            sections[index].bottom_y + t / 2.0 + self.config.divider_gap / 2.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::DepthResolver;
    use crate::height::HeightResolver;
    use crate::model::{SectionHeight, SectionSpec, SidePanelPolicy};

    fn resolve(spec: &ModuleSpec) -> Vec<ResolvedSection> {
        let bounds = HeightResolver::new(spec.available_height())
            .with_origin(spec.panel_thickness)
            .resolve(&spec.sections)
            .unwrap();
        DepthResolver::new(spec.depth)
            .apply(&spec.sections, &bounds)
            .unwrap()
    }

    fn two_shelves() -> ModuleSpec {
        ModuleSpec::new(600.0, 1200.0, 600.0)
            .with_section(SectionSpec::shelf(SectionHeight::Percentage(50.0)))
            .with_section(SectionSpec::shelf(SectionHeight::Percentage(50.0)))
    }

    fn find<'p>(panels: &'p [PanelBox], name: &str) -> &'p PanelBox {
        panels.iter().find(|p| p.name == name).unwrap()
    }

    #[test]
    fn test_whole_side_panels() {
        let spec = two_shelves();
        let sections = resolve(&spec);
        let config = LayoutConfig::default();
        let panels = PanelLayoutBuilder::new(&config).build(&spec, &sections);

        let left = find(&panels, "side-left");
        assert_eq!(left.height(), 1200.0);
        assert_eq!(left.position.x, -291.0);
        assert_eq!(left.position.y, 600.0);
        assert_eq!(panels.iter().filter(|p| p.role == PanelRole::Side).count(), 2);
    }

    #[test]
    fn test_split_side_panels_cover_module_height() {
        let spec = ModuleSpec::new(600.0, 2400.0, 600.0)
            .with_section(SectionSpec::drawer(SectionHeight::Absolute(1000.0), 4))
            .with_section(SectionSpec::hanging(SectionHeight::Percentage(100.0)));
        let sections = resolve(&spec);
        let config = LayoutConfig::default();
        let panels = PanelLayoutBuilder::new(&config).build(&spec, &sections);

        let lower = find(&panels, "side-left-0");
        let upper = find(&panels, "side-left-1");
        assert_eq!(lower.bottom(), 0.0);
        assert_eq!(lower.top(), upper.bottom());
        assert_eq!(upper.top(), 2400.0);
        assert_eq!(lower.height(), 1018.0);
    }

    #[test]
    fn test_whole_policy_overrides_auto_split() {
        let spec = ModuleSpec::new(600.0, 2400.0, 600.0)
            .with_section(SectionSpec::drawer(SectionHeight::Absolute(1000.0), 4))
            .with_section(SectionSpec::hanging(SectionHeight::Percentage(100.0)))
            .with_side_panels(SidePanelPolicy::Whole);
        let sections = resolve(&spec);
        let config = LayoutConfig::default();
        let panels = PanelLayoutBuilder::new(&config).build(&spec, &sections);

        assert!(panels.iter().any(|p| p.name == "side-left"));
        assert_eq!(panels.iter().filter(|p| p.role == PanelRole::Back).count(), 1);
    }

    #[test]
    fn test_top_and_bottom_trims() {
        let spec = two_shelves();
        let config = LayoutConfig::default();
        let panels = PanelLayoutBuilder::new(&config).top_and_bottom(&spec);

        let top = find(&panels, "top");
        assert_eq!(top.width(), 563.0);
        assert_eq!(top.depth(), 574.0);
        assert_eq!(top.position.y, 1191.0);
        assert_eq!(top.front(), 300.0);
        assert_eq!(find(&panels, "bottom").position.y, 9.0);
    }

    #[test]
    fn test_divider_boards_straddle_boundary() {
        let spec = two_shelves();
        let sections = resolve(&spec);
        let config = LayoutConfig::default();
        let frame = InteriorFrame::of_module(&spec);
        let panels = PanelLayoutBuilder::new(&config).dividers(&frame, &sections, None);

        assert_eq!(panels.len(), 2);
        let lower = find(&panels, "divider-0-lower");
        let upper = find(&panels, "divider-0-upper");
        assert!((lower.position.y - (600.0 - 9.025)).abs() < 1e-9);
        assert!((upper.position.y - (600.0 + 9.025)).abs() < 1e-9);
        assert!(((lower.position.y + upper.position.y) / 2.0 - 600.0).abs() < 1e-9);
        assert_eq!(lower.width(), 564.0);
        assert_eq!(lower.depth(), 574.0);
    }

    #[test]
    fn test_divider_uses_shallower_depth() {
        let spec = ModuleSpec::new(600.0, 1200.0, 600.0)
            .with_section(SectionSpec::shelf(SectionHeight::Percentage(50.0)))
            .with_section(SectionSpec::shelf(SectionHeight::Percentage(50.0)).with_depth(560.0));
        let sections = resolve(&spec);
        let config = LayoutConfig::default();
        let frame = InteriorFrame::of_module(&spec);
        let panels = PanelLayoutBuilder::new(&config).dividers(&frame, &sections, None);

        assert_eq!(panels[0].depth(), 534.0);
        assert_eq!(panels[0].front(), 300.0);
    }

    #[test]
    fn test_shared_boundary_skips_divider() {
        let spec = two_shelves();
        let sections = resolve(&spec);
        let config = LayoutConfig::default();
        let frame = InteriorFrame::of_module(&spec);
        let panels = PanelLayoutBuilder::new(&config).dividers(&frame, &sections, Some(600.0));

        assert!(panels.is_empty());
    }

    #[test]
    fn test_single_back_panel() {
        let spec = two_shelves();
        let sections = resolve(&spec);
        let config = LayoutConfig::default();
        let frame = InteriorFrame::of_module(&spec);
        let panels = PanelLayoutBuilder::new(&config).back_panels(&frame, &sections, false);

        assert_eq!(panels.len(), 1);
        assert_eq!(panels[0].height(), 1164.0 + 26.0);
        assert_eq!(panels[0].width(), 574.0);
        assert_eq!(panels[0].position.z, -278.5);
    }

    #[test]
    fn test_back_panel_per_section_when_depths_differ() {
        let spec = ModuleSpec::new(600.0, 1200.0, 600.0)
            .with_section(SectionSpec::shelf(SectionHeight::Percentage(50.0)))
            .with_section(SectionSpec::shelf(SectionHeight::Percentage(50.0)).with_depth(560.0));
        let sections = resolve(&spec);
        let config = LayoutConfig::default();
        let frame = InteriorFrame::of_module(&spec);
        let panels = PanelLayoutBuilder::new(&config).back_panels(&frame, &sections, false);

        assert_eq!(panels.len(), 2);
        assert_eq!(panels[0].height(), 582.0 + 26.0);
        assert_eq!(panels[1].position.z - panels[0].position.z, 40.0);
    }

    #[test]
    fn test_cap_and_floor() {
        let spec = two_shelves();
        let sections = resolve(&spec);
        let config = LayoutConfig::default();
        let frame = InteriorFrame::of_module(&spec);
        let builder = PanelLayoutBuilder::new(&config);

        assert_eq!(builder.cap_y(&frame, &sections, 1), 1191.0);
        assert_eq!(builder.floor_y(&frame, &sections, 0), 9.0);
        assert!((builder.cap_y(&frame, &sections, 0) - 590.975).abs() < 1e-9);
        assert!((builder.floor_y(&frame, &sections, 1) - 609.025).abs() < 1e-9);
    }
}
