//! Section depth resolution with front-face alignment.
//!
//! Every section shares the module's front plane. A shallower section only
//! recedes at the back: its centre moves forward by half the depth deficit.

use crate::error::{Error, Result};
use crate::height::SectionBounds;
use crate::model::SectionSpec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Effective depth of a section and the Z shift of its centre.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SectionDepth {
    /// Effective depth (mm).
    pub depth: f64,
    /// Forward shift of the section centre relative to the module centre (mm).
    pub z_offset: f64,
}

/// A section with resolved height and depth.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResolvedSection {
    /// Section index, bottom to top.
    pub index: usize,
    /// Y of the section bottom (mm).
    pub bottom_y: f64,
    /// Y of the section top (mm).
    pub top_y: f64,
    /// Y of the section centre (mm).
    pub center_y: f64,
    /// Section height (mm).
    pub height: f64,
    /// Effective depth (mm).
    pub depth: f64,
    /// Forward shift of the section centre (mm).
    pub z_offset: f64,
}

impl ResolvedSection {
    /// Combines height bounds and depth into a resolved section.
    pub fn from_parts(bounds: SectionBounds, depth: SectionDepth) -> Self {
        Self {
            index: bounds.index,
            bottom_y: bounds.bottom_y,
            top_y: bounds.top_y,
            center_y: bounds.center_y,
            height: bounds.height,
            depth: depth.depth,
            z_offset: depth.z_offset,
        }
    }

    /// Z of the section's front face.
    pub fn front_z(&self) -> f64 {
        self.z_offset + self.depth / 2.0
    }

    /// Z of the section's rear edge.
    pub fn rear_z(&self) -> f64 {
        self.z_offset - self.depth / 2.0
    }

    /// Z of the back panel centre: the section's own rear edge plus half the
    /// back panel thickness plus the standoff.
    pub fn back_panel_z(&self, back_panel_thickness: f64, back_inset: f64) -> f64 {
        self.rear_z() + back_panel_thickness / 2.0 + back_inset
    }

    /// Returns true if `y` lies within the section (bounds inclusive).
    pub fn contains_y(&self, y: f64) -> bool {
        y >= self.bottom_y && y <= self.top_y
    }
}

/// Resolves per-section depths against the module depth.
#[derive(Debug, Clone, Copy)]
pub struct DepthResolver {
    module_depth: f64,
}

impl DepthResolver {
    /// Creates a resolver for the given module depth.
    pub fn new(module_depth: f64) -> Self {
        Self { module_depth }
    }

    /// Returns the depth and Z offset of every section.
    pub fn resolve(&self, sections: &[SectionSpec]) -> Result<Vec<SectionDepth>> {
        sections
            .iter()
            .enumerate()
            .map(|(i, section)| self.resolve_one(i, section))
            .collect()
    }

    /// Resolves depths and merges them with height bounds.
    pub fn apply(
        &self,
        sections: &[SectionSpec],
        bounds: &[SectionBounds],
    ) -> Result<Vec<ResolvedSection>> {
        let depths = self.resolve(sections)?;
        Ok(bounds
            .iter()
            .zip(depths)
            .map(|(b, d)| ResolvedSection::from_parts(*b, d))
            .collect())
    }

    fn resolve_one(&self, index: usize, section: &SectionSpec) -> Result<SectionDepth> {
        let depth = section.depth_override.unwrap_or(self.module_depth);
        if depth > self.module_depth {
            return Err(Error::DepthExceedsModule {
                section: index,
                depth,
                module_depth: self.module_depth,
            });
        }
        Ok(SectionDepth {
            depth,
            z_offset: (self.module_depth - depth) / 2.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SectionHeight;

    #[test]
    fn test_default_depth() {
        let sections = vec![SectionSpec::shelf(SectionHeight::Percentage(100.0))];
        let depths = DepthResolver::new(600.0).resolve(&sections).unwrap();

        assert_eq!(depths[0].depth, 600.0);
        assert_eq!(depths[0].z_offset, 0.0);
    }

    #[test]
    fn test_depth_override_keeps_front_flush() {
        let sections = vec![
            SectionSpec::shelf(SectionHeight::Percentage(50.0)),
            SectionSpec::shelf(SectionHeight::Percentage(50.0)).with_depth(560.0),
        ];
        let depths = DepthResolver::new(600.0).resolve(&sections).unwrap();

        assert_eq!(depths[1].depth, 560.0);
        assert_eq!(depths[1].z_offset, 20.0);

        let front_full = depths[0].z_offset + depths[0].depth / 2.0;
        let front_shallow = depths[1].z_offset + depths[1].depth / 2.0;
        assert_eq!(front_full, front_shallow);
    }

    #[test]
    fn test_depth_exceeds_module() {
        let sections = vec![SectionSpec::shelf(SectionHeight::Percentage(100.0)).with_depth(650.0)];
        let err = DepthResolver::new(600.0).resolve(&sections).unwrap_err();

        assert_eq!(
            err,
            Error::DepthExceedsModule {
                section: 0,
                depth: 650.0,
                module_depth: 600.0
            }
        );
    }

    #[test]
    fn test_apply_merges_bounds() {
        let sections = vec![SectionSpec::shelf(SectionHeight::Percentage(100.0)).with_depth(500.0)];
        let bounds = vec![SectionBounds {
            index: 0,
            bottom_y: 18.0,
            top_y: 1182.0,
            center_y: 600.0,
            height: 1164.0,
        }];
        let resolved = DepthResolver::new(600.0).apply(&sections, &bounds).unwrap();

        assert_eq!(resolved[0].height, 1164.0);
        assert_eq!(resolved[0].depth, 500.0);
        assert_eq!(resolved[0].front_z(), 300.0);
        assert_eq!(resolved[0].rear_z(), -200.0);
        assert!(resolved[0].contains_y(600.0));
    }

    #[test]
    fn test_back_panel_follows_section_rear() {
        let sections = vec![
            SectionSpec::shelf(SectionHeight::Percentage(50.0)),
            SectionSpec::shelf(SectionHeight::Percentage(50.0)).with_depth(560.0),
        ];
        let bounds = vec![
            SectionBounds {
                index: 0,
                bottom_y: 18.0,
                top_y: 600.0,
                center_y: 309.0,
                height: 582.0,
            },
            SectionBounds {
                index: 1,
                bottom_y: 600.0,
                top_y: 1182.0,
                center_y: 891.0,
                height: 582.0,
            },
        ];
        let resolved = DepthResolver::new(600.0).apply(&sections, &bounds).unwrap();

        let full = resolved[0].back_panel_z(9.0, 17.0);
        let shallow = resolved[1].back_panel_z(9.0, 17.0);
        assert_eq!(full, -278.5);
        assert_eq!(shallow, -238.5);
        assert_eq!(resolved[1].z_offset, 20.0);
    }
}
