//! Command-line interface implementation

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::definition::DrawPart;
use crate::look::parse_look;
use crate::manager::{AvatarsManager, LookOptions};

/// Exit codes
const EXIT_SUCCESS: u8 = 0;
const EXIT_ERROR: u8 = 1;
const EXIT_INVALID_ARGS: u8 = 2;

/// Figura - compile avatar looks into renderable draw definitions
#[derive(Parser)]
#[command(name = "figc")]
#[command(about = "Figura - compile avatar looks into renderable draw definitions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compose a look into its ordered draw-part list (JSON on stdout)
    Compose {
        /// Resource directory holding the data tables and bundles
        #[arg(short, long)]
        resources: PathBuf,

        /// The look string, e.g. "hd-180-1.hr-828-45.ch-210-66"
        #[arg(short, long)]
        look: String,

        /// Active action id; may be given multiple times
        #[arg(short, long = "action")]
        actions: Vec<String>,

        /// Body direction octant
        #[arg(short, long, default_value = "0")]
        direction: i32,

        /// Head direction octant (defaults to the body direction)
        #[arg(long)]
        head_direction: Option<i32>,

        /// Held item id
        #[arg(long)]
        item: Option<i32>,

        /// Effect id
        #[arg(long)]
        effect: Option<String>,

        /// Flatten to one positioned sprite per part at this frame number
        #[arg(long)]
        frame: Option<usize>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the asset libraries a look requires
    Libraries {
        /// Resource directory holding the data tables and bundles
        #[arg(short, long)]
        resources: PathBuf,

        /// The look string
        #[arg(short, long)]
        look: String,
    },

    /// List the actions the data tables declare
    Actions {
        /// Resource directory holding the data tables and bundles
        #[arg(short, long)]
        resources: PathBuf,

        /// Only list actions that drive animations
        #[arg(long)]
        animations: bool,
    },
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compose {
            resources,
            look,
            actions,
            direction,
            head_direction,
            item,
            effect,
            frame,
            pretty,
        } => run_compose(
            &resources,
            &look,
            actions,
            direction,
            head_direction.unwrap_or(direction),
            item,
            effect,
            frame,
            pretty,
        ),
        Commands::Libraries { resources, look } => run_libraries(&resources, &look),
        Commands::Actions { resources, animations } => run_actions(&resources, animations),
    }
}

fn load_manager(resources: &Path) -> Result<AvatarsManager, ExitCode> {
    if !resources.is_dir() {
        eprintln!("Error: resource directory '{}' not found", resources.display());
        return Err(ExitCode::from(EXIT_INVALID_ARGS));
    }

    AvatarsManager::from_dir(resources).map_err(|e| {
        eprintln!("Error: {e}");
        ExitCode::from(EXIT_ERROR)
    })
}

/// A sprite as the view layer consumes it, flattened from a draw part.
/// This is the single place the draw-part union is matched exhaustively.
#[derive(serde::Serialize)]
struct SpriteOut {
    kind: &'static str,
    file_id: String,
    x: f32,
    y: f32,
    mirrored: bool,
    color: Option<u32>,
    ink: Option<i32>,
    addition: bool,
}

fn flatten(parts: &[DrawPart], frame: usize) -> Vec<SpriteOut> {
    parts
        .iter()
        .filter_map(|part| match part {
            DrawPart::Avatar(avatar) => {
                let asset = avatar.assets.get(frame % avatar.assets.len().max(1))?;
                Some(SpriteOut {
                    kind: "avatar",
                    file_id: asset.file_id.clone(),
                    x: asset.x,
                    y: asset.y,
                    mirrored: asset.mirrored,
                    color: match avatar.mode {
                        crate::definition::DrawMode::Colored => avatar.color,
                        crate::definition::DrawMode::JustImage => None,
                    },
                    ink: None,
                    addition: false,
                })
            }
            DrawPart::Effect(effect) => {
                let asset = effect.assets.get(frame % effect.assets.len().max(1))?;
                Some(SpriteOut {
                    kind: "effect",
                    file_id: asset.file_id.clone(),
                    x: asset.x,
                    y: asset.y,
                    mirrored: asset.mirrored,
                    color: None,
                    ink: effect.ink,
                    addition: effect.addition,
                })
            }
        })
        .collect()
}

fn run_compose(
    resources: &Path,
    look: &str,
    actions: Vec<String>,
    direction: i32,
    head_direction: i32,
    item: Option<i32>,
    effect: Option<String>,
    frame: Option<usize>,
    pretty: bool,
) -> ExitCode {
    let mut manager = match load_manager(resources) {
        Ok(manager) => manager,
        Err(code) => return code,
    };

    let options = LookOptions {
        look: look.to_string(),
        actions,
        direction,
        head_direction,
        item,
        effect,
    };

    let definition = match manager.get_draw_definition(&options) {
        Ok(definition) => definition,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let parts = match definition.draw_parts(manager.data(), manager.libraries()) {
        Ok(parts) => parts,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let json = match frame {
        Some(frame) => {
            let sprites = flatten(parts, frame);
            if pretty {
                serde_json::to_string_pretty(&sprites)
            } else {
                serde_json::to_string(&sprites)
            }
        }
        None if pretty => serde_json::to_string_pretty(parts),
        None => serde_json::to_string(parts),
    };

    match json {
        Ok(json) => {
            println!("{json}");
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run_libraries(resources: &Path, look: &str) -> ExitCode {
    let manager = match load_manager(resources) {
        Ok(manager) => manager,
        Err(code) => return code,
    };

    let mut libraries: Vec<String> =
        manager.libraries_for_look(&parse_look(look)).into_iter().collect();
    libraries.sort();

    for library in libraries {
        println!("{library}");
    }
    ExitCode::from(EXIT_SUCCESS)
}

fn run_actions(resources: &Path, animations: bool) -> ExitCode {
    let manager = match load_manager(resources) {
        Ok(manager) => manager,
        Err(code) => return code,
    };

    if animations {
        for id in manager.available_animations() {
            println!("{id}");
        }
    } else {
        for action in manager.data().actions.get_actions() {
            println!("{}\t{}\tprecedence={}", action.id, action.state, action.precedence);
        }
    }
    ExitCode::from(EXIT_SUCCESS)
}
