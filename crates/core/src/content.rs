//! Section content: shelves, drawer stacks and hanging rods.
//!
//! Content is derived from a [`ResolvedSection`] and its [`SectionSpec`]. Y
//! values are absolute (module frame); shelf positions in a [`SectionSpec`] are
//! relative to the section bottom.

use nalgebra::{Point3, Vector3};

use crate::config::LayoutConfig;
use crate::depth::ResolvedSection;
use crate::error::{Error, Result};
use crate::geometry::{PanelBox, PanelRole};
use crate::model::{SectionKind, SectionSpec};
use crate::panel::InteriorFrame;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Kind of a horizontal content board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ShelfKind {
    /// Ordinary adjustable shelf.
    Regular,
    /// Fixed load-bearing shelf inside a hanging section.
    Safety,
    /// Non-structural cap at the top of a section.
    Finish,
}

/// A shelf board.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShelfItem {
    /// Owning section index.
    pub section: usize,
    /// Shelf kind.
    pub kind: ShelfKind,
    /// Y of the board centre.
    pub y: f64,
    /// The board.
    pub panel: PanelBox,
}

/// One drawer of a stack.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DrawerItem {
    /// Owning section index.
    pub section: usize,
    /// Position in the stack, bottom first.
    pub index: usize,
    /// Y of the drawer slot bottom.
    pub bottom_y: f64,
    /// Slot height.
    pub height: f64,
    /// Y of the drawer centre.
    pub center_y: f64,
    /// Box boards and face plate.
    pub parts: Vec<PanelBox>,
}

/// A hanging rod with its two brackets.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RodItem {
    /// Owning section index.
    pub section: usize,
    /// Y of the bracket centre.
    pub y: f64,
    /// Y of the board centre the brackets hang from.
    pub cap_y: f64,
    /// Brackets and rod.
    pub parts: Vec<PanelBox>,
}

/// Content derived for one section.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum ContentItem {
    /// Shelf, safety shelf or finish panel.
    Shelf(ShelfItem),
    /// Drawer of a stack.
    Drawer(DrawerItem),
    /// Hanging rod.
    Rod(RodItem),
}

impl ContentItem {
    /// Owning section index.
    pub fn section(&self) -> usize {
        match self {
            Self::Shelf(s) => s.section,
            Self::Drawer(d) => d.section,
            Self::Rod(r) => r.section,
        }
    }

    /// Panel boxes making up this item.
    pub fn panels(&self) -> &[PanelBox] {
        match self {
            Self::Shelf(s) => std::slice::from_ref(&s.panel),
            Self::Drawer(d) => &d.parts,
            Self::Rod(r) => &r.parts,
        }
    }

    /// Y of the board centre for shelves.
    pub fn shelf_y(&self) -> Option<f64> {
        match self {
            Self::Shelf(s) => Some(s.y),
            _ => None,
        }
    }

    /// Moves every part of the item.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        match self {
            Self::Shelf(s) => {
                s.y += offset.y;
                s.panel = s.panel.translated(offset);
            }
            Self::Drawer(d) => {
                d.bottom_y += offset.y;
                d.center_y += offset.y;
                d.parts = d.parts.iter().map(|p| p.translated(offset)).collect();
            }
            Self::Rod(r) => {
                r.y += offset.y;
                r.cap_y += offset.y;
                r.parts = r.parts.iter().map(|p| p.translated(offset)).collect();
            }
        }
    }

    /// Prefixes every part name.
    pub fn prefix(&mut self, prefix: &str) {
        let rename = |p: &PanelBox| p.clone().prefixed(prefix);
        match self {
            Self::Shelf(s) => s.panel = rename(&s.panel),
            Self::Drawer(d) => d.parts = d.parts.iter().map(rename).collect(),
            Self::Rod(r) => r.parts = r.parts.iter().map(rename).collect(),
        }
    }
}

/// Placement context of a section inside its frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionContext {
    /// Interior the section belongs to.
    pub frame: InteriorFrame,
    /// Y of the centre of the board capping the section.
    pub cap_y: f64,
    /// Y of full-width shared shelves crossing the frame.
    pub shared_shelves: Vec<f64>,
}

impl SectionContext {
    /// Creates a context with no shared shelves.
    pub fn new(frame: InteriorFrame, cap_y: f64) -> Self {
        Self {
            frame,
            cap_y,
            shared_shelves: Vec::new(),
        }
    }

    /// Adds shared shelves.
    pub fn with_shared_shelves(mut self, shelves: Vec<f64>) -> Self {
        self.shared_shelves = shelves;
        self
    }
}

/// Drawer heights with the gap that closes the stack exactly.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DrawerStack {
    /// Drawer heights, bottom first.
    pub heights: Vec<f64>,
    /// Gap below, between and above the drawers.
    pub gap: f64,
}

impl DrawerStack {
    /// Creates a stack from explicit heights and gap.
    pub fn new(heights: Vec<f64>, gap: f64) -> Self {
        Self { heights, gap }
    }

    /// Derives the gap so the stack fills `section_height` exactly.
    ///
    /// Returns `None` if there are no drawers or they do not fit.
    pub fn fitted(section_height: f64, heights: Vec<f64>) -> Option<Self> {
        if heights.is_empty() {
            return None;
        }
        let total: f64 = heights.iter().sum();
        let gap = (section_height - total) / (heights.len() + 1) as f64;
        if gap < 0.0 {
            return None;
        }
        Some(Self { heights, gap })
    }

    /// Total height the stack occupies including all gaps.
    pub fn total_height(&self) -> f64 {
        self.heights.iter().sum::<f64>() + (self.heights.len() + 1) as f64 * self.gap
    }

    /// Bottom offsets of each drawer from the section bottom.
    pub fn offsets(&self) -> Vec<f64> {
        let mut cursor = self.gap;
        self.heights
            .iter()
            .map(|h| {
                let bottom = cursor;
                cursor += h + self.gap;
                bottom
            })
            .collect()
    }

    /// Writes the stack into a drawer section.
    pub fn apply_to(self, section: SectionSpec) -> SectionSpec {
        section.with_drawer_heights(self.heights, self.gap)
    }
}

/// Lays out the content of resolved sections.
#[derive(Debug, Clone, Copy)]
pub struct SectionContentLayout<'a> {
    config: &'a LayoutConfig,
}

impl<'a> SectionContentLayout<'a> {
    /// Creates a layout using the given constants.
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }

    /// Computes the content of one section.
    pub fn layout(
        &self,
        section: &ResolvedSection,
        spec: &SectionSpec,
        ctx: &SectionContext,
    ) -> Result<Vec<ContentItem>> {
        self.check_shelf_positions(section, spec)?;

        match spec.kind {
            SectionKind::Shelf => Ok(self.shelves(section, spec, ctx)),
            SectionKind::Hanging => Ok(self.hanging(section, spec, ctx)),
            SectionKind::Drawer => self.drawers(section, spec, ctx),
        }
    }

    fn check_shelf_positions(&self, section: &ResolvedSection, spec: &SectionSpec) -> Result<()> {
        if let Some(positions) = &spec.shelf_positions {
            let limit = section.height + self.config.tolerance;
            if let Some(p) = positions.iter().find(|&&p| p < 0.0 || p > limit) {
                return Err(Error::invalid_section(
                    section.index,
                    format!(
                        "shelf position {} outside section height {}",
                        p, section.height
                    ),
                ));
            }
        }
        Ok(())
    }

    fn shelves(
        &self,
        section: &ResolvedSection,
        spec: &SectionSpec,
        ctx: &SectionContext,
    ) -> Vec<ContentItem> {
        let offsets: Vec<f64> = match (&spec.shelf_positions, spec.shelf_count) {
            (Some(positions), _) => positions.clone(),
            (None, Some(count)) if count > 0 => {
                let spacing = section.height / (count + 1) as f64;
                (1..=count).map(|k| spacing * k as f64).collect()
            }
            _ => Vec::new(),
        };

        let mut items: Vec<ContentItem> = offsets
            .iter()
            .enumerate()
            .map(|(k, offset)| {
                self.shelf(
                    ctx,
                    section,
                    ShelfKind::Regular,
                    format!("shelf-{}-{}", section.index, k),
                    section.bottom_y + offset,
                )
            })
            .collect();
        if spec.is_top_finish_panel {
            items.push(self.finish_panel(section, ctx));
        }
        items
    }

    fn hanging(
        &self,
        section: &ResolvedSection,
        spec: &SectionSpec,
        ctx: &SectionContext,
    ) -> Vec<ContentItem> {
        let mut items: Vec<ContentItem> = spec
            .shelf_positions
            .iter()
            .flatten()
            .filter(|&&p| p > 0.0)
            .enumerate()
            .map(|(k, offset)| {
                self.shelf(
                    ctx,
                    section,
                    ShelfKind::Safety,
                    format!("safety-shelf-{}-{}", section.index, k),
                    section.bottom_y + offset,
                )
            })
            .collect();
        if spec.is_top_finish_panel {
            items.push(self.finish_panel(section, ctx));
        }

        let cap_y = items
            .iter()
            .filter_map(ContentItem::shelf_y)
            .chain(
                ctx.shared_shelves
                    .iter()
                    .copied()
                    .filter(|&y| y > section.bottom_y && y < section.top_y),
            )
            .fold(ctx.cap_y, f64::min);
        items.push(self.rod(section, ctx, cap_y));
        items
    }

    fn drawers(
        &self,
        section: &ResolvedSection,
        spec: &SectionSpec,
        ctx: &SectionContext,
    ) -> Result<Vec<ContentItem>> {
        let slots: Vec<(f64, f64)> = match &spec.drawer_heights {
            Some(heights) => {
                let stack = DrawerStack::new(heights.clone(), spec.gap_height.unwrap_or(0.0));
                let total = stack.total_height();
                if (total - section.height).abs() > self.config.tolerance {
                    return Err(Error::invalid_section(
                        section.index,
                        format!(
                            "drawer stack height {} does not close section height {}",
                            total, section.height
                        ),
                    ));
                }
                stack
                    .offsets()
                    .into_iter()
                    .zip(heights.iter().copied())
                    .map(|(offset, h)| (section.bottom_y + offset, h))
                    .collect()
            }
            None => {
                let count = spec.drawer_count;
                let h = section.height / count as f64;
                (0..count)
                    .map(|k| (section.bottom_y + k as f64 * h, h))
                    .collect()
            }
        };
        self.check_drawer_fit(section, &ctx.frame, &slots)?;

        Ok(slots
            .into_iter()
            .enumerate()
            .map(|(k, (bottom_y, height))| {
                let center_y = bottom_y + height / 2.0;
                ContentItem::Drawer(DrawerItem {
                    section: section.index,
                    index: k,
                    bottom_y,
                    height,
                    center_y,
                    parts: self.drawer_parts(
                        &format!("drawer-{}-{}", section.index, k),
                        &ctx.frame,
                        section,
                        center_y,
                        height,
                    ),
                })
            })
            .collect())
    }

    fn shelf(
        &self,
        ctx: &SectionContext,
        section: &ResolvedSection,
        kind: ShelfKind,
        name: String,
        y: f64,
    ) -> ContentItem {
        let rear_trim = self.config.rear_trim;
        let panel = PanelBox::new(
            name,
            PanelRole::Shelf,
            Vector3::new(
                ctx.frame.width,
                ctx.frame.panel_thickness,
                section.depth - rear_trim,
            ),
            Point3::new(ctx.frame.center_x, y, section.z_offset + rear_trim / 2.0),
        );
        ContentItem::Shelf(ShelfItem {
            section: section.index,
            kind,
            y,
            panel,
        })
    }

    fn finish_panel(&self, section: &ResolvedSection, ctx: &SectionContext) -> ContentItem {
        self.shelf(
            ctx,
            section,
            ShelfKind::Finish,
            format!("finish-panel-{}", section.index),
            section.top_y - ctx.frame.panel_thickness / 2.0,
        )
    }

    /// Hangs the rod brackets so their top face meets the underside of the
    /// board centred at `cap_y`, half a board thickness below it.
    fn rod(&self, section: &ResolvedSection, ctx: &SectionContext, cap_y: f64) -> ContentItem {
        let rod = &self.config.rod;
        let frame = &ctx.frame;
        let y = cap_y - frame.panel_thickness / 2.0 - rod.bracket_height / 2.0;
        let z = section.z_offset;
        let bracket_x = frame.width / 2.0 - rod.bracket_size / 2.0;
        let bracket = Vector3::new(rod.bracket_size, rod.bracket_height, rod.bracket_size);
        let name = format!("rod-{}", section.index);

        let parts = vec![
            PanelBox::new(
                format!("{}-bracket-left", name),
                PanelRole::Rod,
                bracket,
                Point3::new(frame.center_x - bracket_x, y, z),
            ),
            PanelBox::new(
                format!("{}-bracket-right", name),
                PanelRole::Rod,
                bracket,
                Point3::new(frame.center_x + bracket_x, y, z),
            ),
            PanelBox::new(
                name,
                PanelRole::Rod,
                Vector3::new(frame.width, rod.rod_height, rod.rod_depth),
                Point3::new(
                    frame.center_x,
                    y - rod.bracket_height / 2.0 + rod.rod_lift + rod.rod_height / 2.0,
                    z - 1.0,
                ),
            ),
        ];
        ContentItem::Rod(RodItem {
            section: section.index,
            y,
            cap_y,
            parts,
        })
    }

    /// Rejects slots and frames too small to hold a drawer box with
    /// positive board sizes.
    fn check_drawer_fit(
        &self,
        section: &ResolvedSection,
        frame: &InteriorFrame,
        slots: &[(f64, f64)],
    ) -> Result<()> {
        let d = &self.config.drawer;
        let t = frame.panel_thickness;

        let bottom_width = frame.width - d.side_clearance - d.body_inset - d.bottom_inset;
        if bottom_width <= 0.0 {
            return Err(Error::invalid_section(
                section.index,
                format!("interior width {} is too narrow for a drawer", frame.width),
            ));
        }
        let body_depth = section.depth - t - d.depth_reduction - d.face_thickness;
        if body_depth - d.bottom_inset.max(2.0 * t) <= 0.0 {
            return Err(Error::invalid_section(
                section.index,
                format!("section depth {} is too shallow for a drawer", section.depth),
            ));
        }
        let min_slot = t / 2.0 + d.body_height_reduction;
        if let Some((k, &(_, h))) = slots.iter().enumerate().find(|(_, (_, h))| *h <= min_slot) {
            return Err(Error::invalid_section(
                section.index,
                format!(
                    "drawer {} slot height {} must exceed {} to hold a drawer box",
                    k, h, min_slot
                ),
            ));
        }
        Ok(())
    }

    /// Decomposes one drawer into its bottom, front, back, sides and face.
    fn drawer_parts(
        &self,
        name: &str,
        frame: &InteriorFrame,
        section: &ResolvedSection,
        center_y: f64,
        slot_height: f64,
    ) -> Vec<PanelBox> {
        let d = &self.config.drawer;
        let t = frame.panel_thickness;
        let cx = frame.center_x;

        let width = frame.width - d.side_clearance;
        let height = slot_height - t / 2.0;
        let box_depth = section.depth - t - d.depth_reduction;
        let body_depth = box_depth - d.face_thickness;
        let center_z = section.z_offset + t / 2.0;
        let body_z = center_z - d.face_thickness / 2.0;
        let board_height = height - d.body_height_reduction;
        let board_width = width - d.body_inset;

        let part = |suffix: &str, size: Vector3<f64>, position: Point3<f64>| {
            PanelBox::new(format!("{}-{}", name, suffix), PanelRole::DrawerPart, size, position)
        };

        let side_x = width / 2.0 - t / 2.0 - d.body_inset / 2.0;
        let side = Vector3::new(t, board_height, body_depth - 2.0 * t);
        let board = Vector3::new(board_width, board_height, t);

        vec![
            part(
                "bottom",
                Vector3::new(
                    board_width - d.bottom_inset,
                    d.bottom_thickness,
                    body_depth - d.bottom_inset,
                ),
                Point3::new(
                    cx,
                    center_y - height / 2.0 + t + d.bottom_lift + d.bottom_thickness / 2.0,
                    body_z,
                ),
            ),
            part(
                "front",
                board,
                Point3::new(cx, center_y, body_z + body_depth / 2.0 - t / 2.0),
            ),
            part(
                "back",
                board,
                Point3::new(cx, center_y, body_z - body_depth / 2.0 + t / 2.0),
            ),
            part("side-left", side, Point3::new(cx - side_x, center_y, body_z)),
            part("side-right", side, Point3::new(cx + side_x, center_y, body_z)),
            part(
                "face",
                Vector3::new(width, height, d.face_thickness),
                Point3::new(cx, center_y, center_z + box_depth / 2.0 - d.face_thickness / 2.0),
            ),
        ]
    }
}
