//! # U-Cabinet Core
//!
//! Section-layout resolution engine for parametric cabinet modules.
//!
//! A [`ModuleSpec`] describes a carcass (outer width, height, depth, board
//! thickness) and a stack of sections (shelves, hanging space, drawers). The
//! [`LayoutEngine`] turns it into positioned boxes: carcass panels, dividers,
//! back panels, shelves, drawer parts, clothing rods and boring holes.
//!
//! ## Pipeline
//!
//! | Stage | Type | Output |
//! |-------|------|--------|
//! | Heights | [`HeightResolver`] | Contiguous section bounds |
//! | Depths | [`DepthResolver`] | Front-aligned section depths |
//! | Panels | [`PanelLayoutBuilder`] | Sides, top, bottom, dividers, backs |
//! | Content | [`SectionContentLayout`] | Shelves, drawers, rods |
//! | Boring | [`BoringPositionCalculator`] | Hole levels and positions |
//! | Dual modules | [`AsymmetricCompositionLayer`] | Two compartments, shared panels |
//!
//! ## Coordinates
//!
//! Millimetres. X from the module centre (+ right), Y from the outer bottom
//! (+ up), Z from the depth centre (+ front). Every [`PanelBox`] carries its
//! centre and full size.
//!
//! ## Example
//!
//! ```rust
//! use u_cabinet_core::{LayoutEngine, ModuleSpec, SectionHeight, SectionSpec};
//!
//! let spec = ModuleSpec::new(600.0, 2400.0, 600.0)
//!     .with_section(SectionSpec::drawer(SectionHeight::Absolute(600.0), 2))
//!     .with_section(SectionSpec::hanging(SectionHeight::Percentage(100.0)));
//!
//! let layout = LayoutEngine::default().resolve(&spec).unwrap();
//! assert_eq!(layout.summary().drawers, 2);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod asymmetric;
pub mod boring;
pub mod catalog;
pub mod config;
pub mod content;
pub mod cutlist;
pub mod depth;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod height;
pub mod model;
pub mod panel;

// Re-exports
pub use asymmetric::{AsymmetricCompositionLayer, Composition, WidthAllocation};
pub use boring::{
    BoringHole, BoringPositionCalculator, HoleRow, PinHole, PinRows, ShelfPinPattern,
};
pub use catalog::{Catalog, CatalogEntry, CatalogRequest, ModuleArchetype};
pub use config::{BoringConfig, DrawerConfig, LayoutConfig, RodConfig};
pub use content::{
    ContentItem, DrawerItem, DrawerStack, RodItem, SectionContentLayout, SectionContext,
    ShelfItem, ShelfKind,
};
pub use cutlist::{CutList, CutListEntry};
pub use depth::{DepthResolver, ResolvedSection, SectionDepth};
pub use engine::{
    Compartment, CompartmentOutput, CompartmentSide, LayoutEngine, LayoutSummary,
    ResolvedLayout, SectionClearance, SharedLevels,
};
pub use error::{Error, Result};
pub use geometry::{PanelBox, PanelRole};
pub use height::{HeightResolver, SectionBounds};
pub use model::{
    AsymmetricSpec, ModuleSpec, PlacementOverrides, SectionHeight, SectionKind, SectionSpec,
    SidePanelPolicy, WidthSplit,
};
pub use panel::{InteriorFrame, PanelLayoutBuilder};
