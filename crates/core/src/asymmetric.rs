//! Dual (left/right) module composition.
//!
//! The interior width is split into two compartments separated by a shared
//! vertical divider. Each compartment runs the regular section pipeline with
//! its own frame. Full-width shared panels are resolved once, before either
//! side, and both sides refer to the same Y.

use nalgebra::{Point3, Vector3};

use crate::content::ContentItem;
use crate::engine::{Compartment, CompartmentSide, LayoutEngine, SharedLevels};
use crate::error::{Error, Result};
use crate::geometry::{PanelBox, PanelRole};
use crate::model::{AsymmetricSpec, ModuleSpec, WidthSplit};
use crate::panel::{InteriorFrame, PanelLayoutBuilder};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Interior widths and centre offsets of the two compartments.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WidthAllocation {
    /// Left interior width.
    pub left: f64,
    /// Right interior width.
    pub right: f64,
    /// Shared divider thickness.
    pub divider: f64,
    /// X of the left compartment centre.
    pub left_x: f64,
    /// X of the right compartment centre.
    pub right_x: f64,
}

impl WidthAllocation {
    /// Splits `interior` according to `split`, leaving room for a divider of
    /// thickness `divider`.
    pub fn allocate(split: WidthSplit, interior: f64, divider: f64, tolerance: f64) -> Result<Self> {
        let usable = interior - divider;
        let (left, right) = match split {
            WidthSplit::Even => (usable / 2.0, usable / 2.0),
            WidthSplit::Ratio(ratio) => (usable * ratio, usable * (1.0 - ratio)),
            WidthSplit::RightAbsolute(right) => (interior - right - divider, right),
            WidthSplit::Explicit { left, right } => (left, right),
        };

        let mismatch = (left + right + divider - interior).abs() > tolerance;
        if mismatch || left <= 0.0 || right <= 0.0 {
            return Err(Error::AsymmetricWidthMismatch {
                left,
                right,
                divider,
                interior,
            });
        }

        Ok(Self {
            left,
            right,
            divider,
            left_x: -(right + divider) / 2.0,
            right_x: (left + divider) / 2.0,
        })
    }

    /// X of the shared divider centre.
    pub fn divider_x(&self) -> f64 {
        self.left_x + self.left / 2.0 + self.divider / 2.0
    }
}

/// Resolved dual module.
#[derive(Debug, Clone)]
pub struct Composition {
    /// Width split used.
    pub widths: WidthAllocation,
    /// Left and right compartments.
    pub compartments: Vec<Compartment>,
    /// Carcass, shared and per-side structural panels.
    pub panels: Vec<PanelBox>,
    /// Content of both sides.
    pub content: Vec<ContentItem>,
}

/// Composes two section trees into one dual module.
#[derive(Debug, Clone, Copy)]
pub struct AsymmetricCompositionLayer<'a> {
    engine: &'a LayoutEngine,
}

impl<'a> AsymmetricCompositionLayer<'a> {
    /// Creates a layer that runs `engine`'s pipeline per side.
    pub fn new(engine: &'a LayoutEngine) -> Self {
        Self { engine }
    }

    /// Resolves both sides and the shared panels.
    pub fn compose(&self, spec: &ModuleSpec, asym: &AsymmetricSpec) -> Result<Composition> {
        let config = self.engine.config();
        let t = spec.panel_thickness;
        let module = InteriorFrame::of_module(spec);
        let widths = WidthAllocation::allocate(asym.split, module.width, t, config.tolerance)?;

        let shared = SharedLevels {
            middle_panel: self.shared_y(&module, asym.shared_middle_panel_height, "middle panel")?,
            safety_shelves: self
                .shared_y(&module, asym.shared_safety_shelf_height, "safety shelf")?
                .into_iter()
                .collect(),
        };

        let builder = PanelLayoutBuilder::new(config);
        let mut boards = builder.top_and_bottom(spec);
        let board = Vector3::new(module.width, t, spec.depth - config.rear_trim);
        let z = config.rear_trim / 2.0;
        if let Some(y) = shared.middle_panel {
            boards.push(PanelBox::new(
                "shared-middle-panel",
                PanelRole::Divider,
                board,
                Point3::new(module.center_x, y, z),
            ));
        }
        for (k, &y) in shared.safety_shelves.iter().enumerate() {
            boards.push(PanelBox::new(
                format!("shared-safety-shelf-{}", k),
                PanelRole::Shelf,
                board,
                Point3::new(module.center_x, y, z),
            ));
        }

        let mut compartments = Vec::with_capacity(2);
        let mut side_panels = Vec::new();
        let mut content = Vec::new();
        for (side, sections, width, x) in [
            (CompartmentSide::Left, &asym.left_sections, widths.left, widths.left_x),
            (CompartmentSide::Right, &asym.right_sections, widths.right, widths.right_x),
        ] {
            let output = self.engine.resolve_compartment(
                side,
                module.with_width(width, x),
                sections,
                false,
                &shared,
                &boards,
            )?;
            compartments.push(output.compartment);
            side_panels.extend(output.panels);
            content.extend(output.content);
        }

        let mut panels = builder.side_panels(spec, &[], false);
        panels.extend(boards);
        panels.push(self.vertical_divider(spec, &module, &widths, &shared, &compartments));
        panels.extend(side_panels);

        log::debug!(
            "dual module: left {:.1} mm at x={:.1}, right {:.1} mm at x={:.1}",
            widths.left,
            widths.left_x,
            widths.right,
            widths.right_x
        );

        Ok(Composition {
            widths,
            compartments,
            panels,
            content,
        })
    }

    /// Converts a height above the interior bottom into a module Y.
    fn shared_y(&self, frame: &InteriorFrame, height: Option<f64>, what: &str) -> Result<Option<f64>> {
        match height {
            None => Ok(None),
            Some(h) if h.is_finite() && h > 0.0 && h < frame.height() => Ok(Some(frame.bottom_y + h)),
            Some(h) => Err(Error::InvalidModule(format!(
                "shared {} at {} mm is outside the interior height {}",
                what,
                h,
                frame.height()
            ))),
        }
    }

    /// Full-height vertical board between the compartments. It stops under
    /// the lowest shared full-width board, middle panel or safety shelf.
    fn vertical_divider(
        &self,
        spec: &ModuleSpec,
        module: &InteriorFrame,
        widths: &WidthAllocation,
        shared: &SharedLevels,
        compartments: &[Compartment],
    ) -> PanelBox {
        let t = spec.panel_thickness;
        let top = shared
            .middle_panel
            .iter()
            .chain(&shared.safety_shelves)
            .map(|y| y - t / 2.0)
            .fold(module.top_y, f64::min);
        let depth = compartments
            .iter()
            .flat_map(|c| c.sections.iter().map(|s| s.depth))
            .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |a| a.max(d))))
            .unwrap_or(spec.depth);
        let height = top - module.bottom_y;

        PanelBox::new(
            "shared-divider",
            PanelRole::Divider,
            Vector3::new(t, height, depth),
            Point3::new(
                widths.divider_x(),
                module.bottom_y + height / 2.0,
                spec.depth / 2.0 - depth / 2.0,
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_right_absolute_split() {
        let widths =
            WidthAllocation::allocate(WidthSplit::RightAbsolute(400.0), 1164.0, 18.0, 1e-6).unwrap();

        assert_eq!(widths.left, 746.0);
        assert_eq!(widths.right, 400.0);
        assert_eq!(widths.left_x, -209.0);
        assert_eq!(widths.right_x, 382.0);
        assert_eq!(widths.divider_x(), 173.0);
    }

    #[test]
    fn test_even_split() {
        let widths = WidthAllocation::allocate(WidthSplit::Even, 1164.0, 18.0, 1e-6).unwrap();

        assert_eq!(widths.left, 573.0);
        assert_eq!(widths.right, 573.0);
        assert_eq!(widths.divider_x(), 0.0);
    }

    #[test]
    fn test_ratio_split() {
        let widths = WidthAllocation::allocate(WidthSplit::Ratio(0.25), 1018.0, 18.0, 1e-6).unwrap();

        assert_eq!(widths.left, 250.0);
        assert_eq!(widths.right, 750.0);
    }

    #[test]
    fn test_explicit_split_must_sum() {
        let ok = WidthAllocation::allocate(
            WidthSplit::Explicit {
                left: 746.0,
                right: 400.0,
            },
            1164.0,
            18.0,
            1e-6,
        );
        assert!(ok.is_ok());

        let err = WidthAllocation::allocate(
            WidthSplit::Explicit {
                left: 700.0,
                right: 400.0,
            },
            1164.0,
            18.0,
            1e-6,
        )
        .unwrap_err();
        assert_eq!(
            err,
            Error::AsymmetricWidthMismatch {
                left: 700.0,
                right: 400.0,
                divider: 18.0,
                interior: 1164.0
            }
        );
    }

    #[test]
    fn test_right_wider_than_interior() {
        let err =
            WidthAllocation::allocate(WidthSplit::RightAbsolute(1200.0), 1164.0, 18.0, 1e-6)
                .unwrap_err();
        assert!(matches!(err, Error::AsymmetricWidthMismatch { .. }));
    }
}
