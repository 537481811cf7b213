//! Section height resolution.
//!
//! Converts percentage/absolute section heights into contiguous millimetre
//! bounds that exactly fill the interior height of a module.
//!
//! # Algorithm
//!
//! 1. Absolute sections take their declared height, each clamped to the
//!    available height.
//! 2. Percentage sections share what is left, proportionally to their declared
//!    percentages (the percentages do not need to sum to 100).
//! 3. When there are no percentage sections the topmost section is the
//!    "remaining height" section: it stretches or shrinks to fill the interior.
//! 4. The topmost section always absorbs the floating point remainder, so the
//!    heights sum to the available height bit for bit.

use crate::error::{Error, Result};
use crate::model::{SectionHeight, SectionSpec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Vertical bounds of one section, in module coordinates (mm).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SectionBounds {
    /// Section index, bottom to top.
    pub index: usize,
    /// Y of the section bottom.
    pub bottom_y: f64,
    /// Y of the section top.
    pub top_y: f64,
    /// Y of the section centre.
    pub center_y: f64,
    /// Section height (`top_y - bottom_y`).
    pub height: f64,
}

/// Resolves section heights against an available interior height.
#[derive(Debug, Clone, Copy)]
pub struct HeightResolver {
    available_height: f64,
    origin: f64,
    tolerance: f64,
}

impl HeightResolver {
    /// Creates a resolver for the given interior height, starting at Y = 0.
    pub fn new(available_height: f64) -> Self {
        Self {
            available_height,
            origin: 0.0,
            tolerance: 1e-6,
        }
    }

    /// Sets the Y of the interior bottom (the top face of the bottom panel).
    pub fn with_origin(mut self, origin: f64) -> Self {
        self.origin = origin;
        self
    }

    /// Sets the comparison tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Returns the available interior height.
    pub fn available_height(&self) -> f64 {
        self.available_height
    }

    /// Resolves `sections` (bottom to top) into contiguous bounds.
    pub fn resolve(&self, sections: &[SectionSpec]) -> Result<Vec<SectionBounds>> {
        for (i, section) in sections.iter().enumerate() {
            section.validate(i)?;
        }
        if sections.is_empty() {
            return Ok(Vec::new());
        }

        let heights = self.section_heights(sections)?;

        let mut bounds = Vec::with_capacity(heights.len());
        let mut cursor = self.origin;
        for (index, height) in heights.into_iter().enumerate() {
            let top_y = cursor + height;
            log::trace!(
                "section {}: {:.3} mm ({:.3}..{:.3})",
                index,
                height,
                cursor,
                top_y
            );
            bounds.push(SectionBounds {
                index,
                bottom_y: cursor,
                top_y,
                center_y: cursor + height / 2.0,
                height,
            });
            cursor = top_y;
        }
        Ok(bounds)
    }

    /// Computes the millimetre height of every section.
    fn section_heights(&self, sections: &[SectionSpec]) -> Result<Vec<f64>> {
        let available = self.available_height;
        let last = sections.len() - 1;

        let clamped = |s: &SectionSpec| match s.height {
            SectionHeight::Absolute(mm) => Some(mm.min(available)),
            SectionHeight::Percentage(_) => None,
        };

        let percentage_total: f64 = sections
            .iter()
            .filter_map(|s| match s.height {
                SectionHeight::Percentage(p) => Some(p),
                SectionHeight::Absolute(_) => None,
            })
            .sum();
        let has_flexible = sections.iter().any(|s| !s.height.is_absolute());

        let mut heights: Vec<f64> = if has_flexible {
            let fixed_total: f64 = sections.iter().filter_map(clamped).sum();
            if fixed_total > available - self.tolerance {
                return Err(Error::OverconstrainedLayout {
                    fixed: fixed_total,
                    available,
                });
            }
            let remaining = available - fixed_total;
            sections
                .iter()
                .map(|s| match s.height {
                    SectionHeight::Absolute(mm) => mm.min(available),
                    SectionHeight::Percentage(p) => remaining * p / percentage_total,
                })
                .collect()
        } else {
            // No flexible section: the topmost one takes the remaining height.
            let below: f64 = sections[..last].iter().filter_map(clamped).sum();
            if below > available - self.tolerance {
                return Err(Error::OverconstrainedLayout {
                    fixed: below,
                    available,
                });
            }
            sections.iter().filter_map(clamped).collect()
        };

        let below_last: f64 = heights[..last].iter().sum();
        heights[last] = available - below_last;
        if heights[last] <= self.tolerance {
            return Err(Error::OverconstrainedLayout {
                fixed: below_last,
                available,
            });
        }
        Ok(heights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn abs(mm: f64) -> SectionHeight {
        SectionHeight::Absolute(mm)
    }

    fn pct(p: f64) -> SectionHeight {
        SectionHeight::Percentage(p)
    }

    #[test]
    fn test_absolute_then_percentage() {
        let sections = vec![
            SectionSpec::drawer(abs(1000.0), 4),
            SectionSpec::hanging(pct(100.0)),
        ];
        let bounds = HeightResolver::new(2364.0).resolve(&sections).unwrap();

        assert_eq!(bounds.len(), 2);
        assert_eq!(bounds[0].height, 1000.0);
        assert_eq!(bounds[1].height, 1364.0);
        assert_eq!(bounds[0].top_y, 1000.0);
        assert_eq!(bounds[1].bottom_y, bounds[0].top_y);
    }

    #[test]
    fn test_even_percentages() {
        let sections = vec![
            SectionSpec::shelf(pct(50.0)),
            SectionSpec::shelf(pct(50.0)),
        ];
        let bounds = HeightResolver::new(1164.0)
            .with_origin(18.0)
            .resolve(&sections)
            .unwrap();

        assert_eq!(bounds[0].height, 582.0);
        assert_eq!(bounds[1].height, 582.0);
        assert_eq!(bounds[0].bottom_y, 18.0);
        assert_eq!(bounds[0].top_y, 600.0);
        assert_eq!(bounds[1].top_y, 1182.0);
    }

    #[test]
    fn test_percentages_are_normalised() {
        let sections = vec![
            SectionSpec::shelf(pct(30.0)),
            SectionSpec::shelf(pct(30.0)),
        ];
        let bounds = HeightResolver::new(1000.0).resolve(&sections).unwrap();

        assert_relative_eq!(bounds[0].height, 500.0);
        assert_relative_eq!(bounds[1].height, 500.0);
    }

    #[test]
    fn test_last_section_absorbs_remainder() {
        let sections = vec![
            SectionSpec::shelf(pct(1.0)),
            SectionSpec::shelf(pct(1.0)),
            SectionSpec::shelf(pct(1.0)),
        ];
        let bounds = HeightResolver::new(1000.0).resolve(&sections).unwrap();
        let sum: f64 = bounds.iter().map(|b| b.height).sum();

        assert_relative_eq!(bounds[2].top_y, 1000.0, epsilon = 1e-9);
        assert!((sum - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_absolute_only_top_section_fills_remaining() {
        // Catalog style: the hanging part is declared from the outer height.
        let sections = vec![
            SectionSpec::drawer(abs(1000.0), 4),
            SectionSpec::hanging(abs(1400.0)),
        ];
        let bounds = HeightResolver::new(2364.0).resolve(&sections).unwrap();

        assert_eq!(bounds[0].height, 1000.0);
        assert_eq!(bounds[1].height, 1364.0);
    }

    #[test]
    fn test_overconstrained_with_flexible_section() {
        let sections = vec![
            SectionSpec::shelf(abs(800.0)),
            SectionSpec::shelf(abs(800.0)),
            SectionSpec::hanging(pct(100.0)),
        ];
        let err = HeightResolver::new(1500.0).resolve(&sections).unwrap_err();

        assert_eq!(
            err,
            Error::OverconstrainedLayout {
                fixed: 1600.0,
                available: 1500.0
            }
        );
    }

    #[test]
    fn test_overconstrained_absolute_only() {
        let sections = vec![
            SectionSpec::drawer(abs(2000.0), 4),
            SectionSpec::hanging(abs(500.0)),
        ];
        let err = HeightResolver::new(1500.0).resolve(&sections).unwrap_err();
        assert!(matches!(err, Error::OverconstrainedLayout { .. }));
    }

    #[test]
    fn test_single_absolute_section_is_clamped() {
        let sections = vec![SectionSpec::shelf(abs(5000.0))];
        let bounds = HeightResolver::new(1164.0).resolve(&sections).unwrap();
        assert_eq!(bounds[0].height, 1164.0);
    }

    #[test]
    fn test_invalid_section_is_reported() {
        let sections = vec![
            SectionSpec::shelf(pct(50.0)),
            SectionSpec::shelf(pct(-10.0)),
        ];
        let err = HeightResolver::new(1000.0).resolve(&sections).unwrap_err();
        assert!(matches!(err, Error::InvalidSectionSpec { section: 1, .. }));
    }

    #[test]
    fn test_empty_sections() {
        let bounds = HeightResolver::new(1000.0).resolve(&[]).unwrap();
        assert!(bounds.is_empty());
    }
}
