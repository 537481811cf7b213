//! Cabinet layout CLI

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use u_cabinet_core::{
    Catalog, CatalogRequest, LayoutConfig, LayoutEngine, ModuleSpec, PanelRole,
    PlacementOverrides, PinRows, ResolvedLayout, ShelfPinPattern,
};

#[derive(Parser)]
#[command(name = "cabinet-layout")]
#[command(about = "Resolves parametric cabinet modules into panels, content and boring holes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a module and print the full layout as JSON
    Resolve {
        #[command(flatten)]
        module: ModuleArgs,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print section heights, clearances and part counts
    Summary {
        #[command(flatten)]
        module: ModuleArgs,
    },

    /// Print boring levels and the shelf-pin grid of every side panel
    Borings {
        #[command(flatten)]
        module: ModuleArgs,

        /// Shelf-pin row layout
        #[arg(long, value_enum, default_value = "two")]
        pins: PinRowsArg,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the fabrication cut list
    CutList {
        #[command(flatten)]
        module: ModuleArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List catalog modules for a space
    Catalog {
        /// Width of one column (mm)
        #[arg(short = 'w', long, default_value = "600")]
        column_width: f64,

        /// Number of columns in the space
        #[arg(short, long, default_value = "1")]
        columns: usize,

        /// Height of the space (mm)
        #[arg(long, default_value = "2400")]
        height: f64,

        /// Float placement offset (mm)
        #[arg(short, long, default_value = "0")]
        float_height: f64,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

/// Where the module comes from and how it is placed.
#[derive(Args)]
struct ModuleArgs {
    /// Module spec JSON file, `-` for stdin
    #[arg(conflicts_with = "id")]
    spec: Option<PathBuf>,

    /// Catalog module id (e.g. single-4drawer-hanging-600)
    #[arg(long)]
    id: Option<String>,

    /// Module height for catalog ids (mm)
    #[arg(long, default_value = "2400")]
    height: f64,

    /// Layout constants JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the module width (mm)
    #[arg(long)]
    width: Option<f64>,

    /// Override the module depth (mm)
    #[arg(long)]
    depth: Option<f64>,

    /// Raise the resolved module by this much (mm)
    #[arg(short, long, default_value = "0")]
    float_height: f64,
}

#[derive(Clone, Copy, ValueEnum)]
enum PinRowsArg {
    /// Front and back rows
    Two,
    /// Four rows
    Four,
}

impl From<PinRowsArg> for PinRows {
    fn from(arg: PinRowsArg) -> Self {
        match arg {
            PinRowsArg::Two => PinRows::Two,
            PinRowsArg::Four => PinRows::Four,
        }
    }
}

#[derive(Serialize)]
struct SidePanelDrilling {
    panel: String,
    holes: Vec<[f64; 3]>,
}

#[derive(Serialize)]
struct BoringReport {
    levels: Vec<f64>,
    holes: Vec<u_cabinet_core::BoringHole>,
    pin_grid: Vec<SidePanelDrilling>,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

impl ModuleArgs {
    fn spec(&self) -> anyhow::Result<ModuleSpec> {
        let spec = match (&self.spec, &self.id) {
            (Some(path), _) => read_json(path)?,
            (None, Some(id)) => {
                Catalog::from_id(id, self.height)
                    .with_context(|| format!("unknown catalog id: {}", id))?
                    .spec
            }
            (None, None) => anyhow::bail!("either a spec file or --id is required"),
        };

        let mut overrides = PlacementOverrides::new();
        if let Some(width) = self.width {
            overrides = overrides.with_width(width);
        }
        if let Some(depth) = self.depth {
            overrides = overrides.with_depth(depth);
        }
        Ok(overrides.apply(&spec))
    }

    fn engine(&self) -> anyhow::Result<LayoutEngine> {
        let config = match &self.config {
            Some(path) => read_json(path)?,
            None => LayoutConfig::default(),
        };
        Ok(LayoutEngine::new(config))
    }

    fn resolve(&self) -> anyhow::Result<(ModuleSpec, ResolvedLayout)> {
        let spec = self.spec()?;
        log::info!(
            "resolving {}x{}x{} module ({} fingerprint {:016x})",
            spec.width,
            spec.height,
            spec.depth,
            if spec.is_asymmetric() { "dual" } else { "plain" },
            spec.fingerprint()
        );
        let layout = self.engine()?.resolve(&spec)?;
        let layout = if self.float_height > 0.0 {
            layout.elevated(self.float_height)
        } else {
            layout
        };
        Ok((spec, layout))
    }
}

fn print_summary(spec: &ModuleSpec, layout: &ResolvedLayout) {
    println!(
        "Module {} x {} x {} mm (interior {} x {} mm)",
        spec.width,
        spec.height,
        spec.depth,
        spec.interior_width(),
        spec.available_height()
    );
    println!("{:-<60}", "");
    for c in layout.internal_clearances() {
        let side = c.side.prefix().unwrap_or("-");
        println!(
            "  {:<6} #{:<2} {:<8} height={:>8.1} clearance={:>8.1}",
            side,
            c.index,
            c.kind.as_str(),
            c.height,
            c.clearance
        );
    }
    let summary = layout.summary();
    println!("{:-<60}", "");
    println!("  Structural panels: {}", summary.structural_panels);
    println!("  Shelves:           {}", summary.shelves);
    println!("  Drawers:           {}", summary.drawers);
    println!("  Rods:              {}", summary.rods);
    println!(
        "  Boring:            {} levels, {} holes",
        summary.boring_levels, summary.boring_holes
    );
    println!("  Cut parts:         {}", summary.cut_parts);
}

fn boring_report(layout: &ResolvedLayout, rows: PinRows) -> BoringReport {
    let pattern = ShelfPinPattern::new().with_rows(rows);
    let pin_grid = layout
        .panels_with_role(PanelRole::Side)
        .map(|panel| SidePanelDrilling {
            panel: panel.name.clone(),
            holes: pattern
                .drill(panel)
                .into_iter()
                .map(|p| [p.x, p.y, p.z])
                .collect(),
        })
        .collect();

    BoringReport {
        levels: layout.boring_positions.clone(),
        holes: layout.boring_holes.clone(),
        pin_grid,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve { module, output } => {
            let (_, layout) = module.resolve()?;
            let json = serde_json::to_string_pretty(&layout)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("Layout saved to: {}", path.display());
                }
                None => println!("{}", json),
            }
        }

        Commands::Summary { module } => {
            let (spec, layout) = module.resolve()?;
            print_summary(&spec, &layout);
        }

        Commands::Borings { module, pins, json } => {
            let (_, layout) = module.resolve()?;
            let report = boring_report(&layout, pins.into());
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Boring levels:");
                for y in &report.levels {
                    println!("  y={:.2}", y);
                }
                println!("\nShelf-pin grid:");
                for side in &report.pin_grid {
                    println!("  {:<20} {} holes", side.panel, side.holes.len());
                }
            }
        }

        Commands::CutList { module, json } => {
            let (_, layout) = module.resolve()?;
            let cut_list = layout.cut_list();
            if json {
                println!("{}", serde_json::to_string_pretty(&cut_list)?);
            } else {
                println!(
                    "{:<12} {:>9} {:>9} {:>6} {:>4}",
                    "role", "length", "width", "thick", "qty"
                );
                println!("{:-<44}", "");
                for entry in &cut_list.entries {
                    println!(
                        "{:<12} {:>9.1} {:>9.1} {:>6.1} {:>4}",
                        format!("{:?}", entry.role),
                        entry.length,
                        entry.width,
                        entry.thickness,
                        entry.quantity
                    );
                }
                println!(
                    "\nTotal: {} parts, {:.3} m2",
                    cut_list.total_parts(),
                    cut_list.total_area() / 1e6
                );
            }
        }

        Commands::Catalog {
            column_width,
            columns,
            height,
            float_height,
            json,
        } => {
            let request =
                CatalogRequest::new(column_width, columns, height).with_float_height(float_height);
            let entries = Catalog::generate(&request);
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                println!("Catalog modules ({} mm high):", request.module_height());
                println!("{:-<60}", "");
                for entry in &entries {
                    println!("  {:<32} {}", entry.id, entry.name);
                }
            }
        }
    }

    Ok(())
}
