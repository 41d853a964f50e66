//! CLI argument parsing with clap

use bsqm_core::{Category, ToolId};
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// bsqm - Beat Saber Quest mod tooling
#[derive(Parser, Debug)]
#[command(name = "bsqm")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the settings file
    #[arg(short, long, global = true, env = "BSQM_CONFIG")]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Locate or install git, adb and the Android NDK
    Configure(ConfigureArgs),

    /// Create a new mod project from the template
    Create(CreateArgs),

    /// Build a mod project with ndk-build
    Build(BuildArgs),

    /// Show the state of the toolchain
    Doctor(DoctorArgs),

    /// Settings management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args, Debug)]
pub struct ConfigureArgs {
    /// Only resolve this tool
    #[arg(long, value_parser = parse_tool)]
    pub tool: Option<ToolId>,

    /// Never prompt; tools not on PATH are reported unavailable
    #[arg(long)]
    pub non_interactive: bool,
}

#[derive(Args, Debug, Default)]
pub struct CreateArgs {
    /// Empty project folder (prompted when omitted)
    pub dir: Option<Utf8PathBuf>,

    /// Mod identifier (letters, digits and hyphens)
    #[arg(long)]
    pub id: Option<String>,

    /// Display name
    #[arg(long)]
    pub name: Option<String>,

    /// Author
    #[arg(long)]
    pub author: Option<String>,

    /// Description
    #[arg(long)]
    pub description: Option<String>,

    /// Category (Gameplay, Saber or Other)
    #[arg(long, value_parser = parse_category)]
    pub category: Option<Category>,

    /// Game version the mod targets
    #[arg(long, value_parser = parse_version)]
    pub game_version: Option<semver::Version>,

    /// Output library name (lowercase letters)
    #[arg(long)]
    pub out: Option<String>,

    /// Project homepage
    #[arg(long)]
    pub url: Option<String>,

    /// Copy libil2cpp headers from this folder instead of downloading them
    #[arg(long)]
    pub libil2cpp: Option<Utf8PathBuf>,

    /// Skip repository initialization
    #[arg(long)]
    pub no_git: bool,

    /// Drive the project form over JSON lines on stdin/stdout
    #[arg(long, conflicts_with_all = ["dir", "id", "name", "author", "description"])]
    pub stdio: bool,
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Project folder
    #[arg(default_value = ".")]
    pub dir: Utf8PathBuf,
}

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Config commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show(ConfigShowArgs),

    /// Print the settings file location
    Path,

    /// Set a value (e.g. `tools.ndk /opt/ndk/ndk-build`)
    Set(ConfigSetArgs),

    /// Reset a value to its default
    Unset(ConfigUnsetArgs),
}

#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    pub key: String,
    pub value: String,
}

#[derive(Args, Debug)]
pub struct ConfigUnsetArgs {
    pub key: String,
}

fn parse_tool(s: &str) -> Result<ToolId, String> {
    s.parse()
}

fn parse_category(s: &str) -> Result<Category, String> {
    s.parse()
}

fn parse_version(s: &str) -> Result<semver::Version, String> {
    bsqm_core::types::parse_game_version(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create_flags() {
        let cli = Cli::try_parse_from([
            "bsqm",
            "create",
            "/tmp/proj",
            "--id",
            "coolmod",
            "--category",
            "saber",
            "--game-version",
            "1.8.0",
            "--no-git",
        ])
        .unwrap();

        let Commands::Create(args) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(args.dir.as_deref(), Some(camino::Utf8Path::new("/tmp/proj")));
        assert_eq!(args.category, Some(Category::Saber));
        assert_eq!(args.game_version, Some(semver::Version::new(1, 8, 0)));
        assert!(args.no_git);
    }

    #[test]
    fn test_stdio_conflicts_with_fields() {
        assert!(Cli::try_parse_from(["bsqm", "create", "--stdio", "--id", "x"]).is_err());
        assert!(Cli::try_parse_from(["bsqm", "create", "--stdio"]).is_ok());
    }

    #[test]
    fn test_configure_tool_accepts_ndk_build() {
        let cli = Cli::try_parse_from(["bsqm", "configure", "--tool", "ndk-build"]).unwrap();
        let Commands::Configure(args) = cli.command else {
            panic!("expected configure");
        };
        assert_eq!(args.tool, Some(ToolId::Ndk));
    }

    #[test]
    fn test_rejects_bad_category() {
        assert!(Cli::try_parse_from(["bsqm", "create", "--category", "weapons"]).is_err());
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
