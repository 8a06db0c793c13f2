//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::core::Category;

/// kiln static asset pipeline CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: kiln.toml, searched upward from cwd)
    #[arg(short = 'C', long, global = true, default_value = "kiln.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Delete the build directory
    Clean,

    /// Clean, then run every step in parallel
    #[command(visible_alias = "b")]
    Build,

    /// Compile SCSS into prefixed, pretty and minified CSS
    Styles,

    /// Resolve includes, transpile and minify scripts
    Scripts,

    /// Copy fonts
    Fonts,

    /// Optimize images
    Images,

    /// Render view templates to HTML
    Views,

    /// Build, then rebuild on change and serve with live reload
    #[command(visible_alias = "w")]
    Watch {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

impl Commands {
    /// The single step this command runs, if it is a step command.
    pub const fn category(&self) -> Option<Category> {
        match self {
            Self::Styles => Some(Category::Styles),
            Self::Scripts => Some(Category::Scripts),
            Self::Fonts => Some(Category::Fonts),
            Self::Images => Some(Category::Images),
            Self::Views => Some(Category::Views),
            Self::Clean | Self::Build | Self::Watch { .. } => None,
        }
    }
}
