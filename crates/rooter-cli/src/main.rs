//! Rooter CLI
//!
//! Resolve, find and load modules relative to a root directory from the
//! command line. Logging is controlled by `ROOTER_LOG` (e.g. `ROOTER_LOG=debug`).

use clap::{Parser, Subcommand};
use rooter::{find_config, Module, Rooter, RooterConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rooter")]
#[command(about = "Root-relative path resolution and module loading", long_about = None)]
#[command(version)]
struct Cli {
    /// Root directory (overrides rooter.toml)
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    /// Config file (default: nearest rooter.toml above the current directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Join path fragments under the root
    Resolve {
        /// Path fragments
        fragments: Vec<String>,
    },
    /// List files matching glob patterns under the root
    Find {
        /// Glob patterns
        #[arg(required = true)]
        patterns: Vec<String>,
    },
    /// Load a module through the cache
    Require {
        /// Path fragments
        #[arg(required = true)]
        fragments: Vec<String>,
    },
    /// Load a module fresh from disk
    Execute {
        /// Path fragments
        #[arg(required = true)]
        fragments: Vec<String>,
    },
    /// Load every module matching the patterns through the cache
    FindRequire {
        /// Glob patterns
        #[arg(required = true)]
        patterns: Vec<String>,
    },
    /// Load every module matching the patterns fresh from disk
    FindExecute {
        /// Glob patterns
        #[arg(required = true)]
        patterns: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("ROOTER_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let rooter = build_rooter(&cli)?;
    tracing::debug!(root = %rooter.root().display(), "rooter ready");

    match cli.command {
        Commands::Resolve { fragments } => {
            let path = rooter.resolve(&fragments)?;
            print_paths(&[path], cli.json)?;
        }
        Commands::Find { patterns } => {
            let paths = rooter.find(patterns)?;
            print_paths(&paths, cli.json)?;
        }
        Commands::Require { fragments } => {
            let module = rooter.require(&fragments)?;
            print_modules(&[module], cli.json)?;
        }
        Commands::Execute { fragments } => {
            let module = rooter.execute(&fragments)?;
            print_modules(&[module], cli.json)?;
        }
        Commands::FindRequire { patterns } => {
            let modules = rooter.find_and_require(patterns)?;
            print_modules(&modules, cli.json)?;
        }
        Commands::FindExecute { patterns } => {
            let modules = rooter.find_and_execute(patterns)?;
            print_modules(&modules, cli.json)?;
        }
    }

    Ok(())
}

fn build_rooter(cli: &Cli) -> anyhow::Result<Rooter> {
    let cwd = std::env::current_dir()?;
    let config = load_config(cli.root.as_deref(), cli.config.as_deref(), &cwd)?;
    Ok(Rooter::from_config(&config)?)
}

/// `--root` wins; otherwise the config file (explicit or discovered from
/// `cwd`) decides, falling back to `cwd` itself. Relative flag values are
/// taken relative to `cwd`.
fn load_config(
    root: Option<&Path>,
    config: Option<&Path>,
    cwd: &Path,
) -> anyhow::Result<RooterConfig> {
    let config_path = match config {
        Some(path) => Some(cwd.join(path)),
        None => find_config(cwd),
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(config = %path.display(), "loading config");
            RooterConfig::from_file(&path)?
        }
        None => RooterConfig {
            base_dir: Some(cwd.to_path_buf()),
            ..RooterConfig::default()
        },
    };

    if let Some(root) = root {
        config.root = Some(cwd.join(root));
    }

    Ok(config)
}

fn print_paths(paths: &[PathBuf], json: bool) -> anyhow::Result<()> {
    if json {
        let paths: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
        println!("{}", serde_json::to_string_pretty(&paths)?);
    } else {
        for path in paths {
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn print_modules(modules: &[Arc<Module>], json: bool) -> anyhow::Result<()> {
    if json {
        let entries: Vec<serde_json::Value> = modules
            .iter()
            .map(|m| {
                serde_json::json!({
                    "path": m.path().display().to_string(),
                    "exports": m.exports(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for module in modules {
            println!("{}: {}", module.path().display(), module.exports());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project(config: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("rooter.toml"), config).unwrap();
        temp
    }

    fn root_of(config: &RooterConfig) -> PathBuf {
        Rooter::from_config(config).unwrap().root().to_path_buf()
    }

    #[test]
    fn test_root_flag_overrides_config_root() {
        let temp = project("root = \"mods\"\n");
        let cwd = temp.path();

        let config = load_config(Some(Path::new("other")), None, cwd).unwrap();
        assert_eq!(root_of(&config), rooter::path::normalize(&cwd.join("other")));

        let config = load_config(None, None, cwd).unwrap();
        assert_eq!(root_of(&config), rooter::path::normalize(&cwd.join("mods")));
    }

    #[test]
    fn test_discovered_config_root() {
        let temp = project("root = \"mods\"\n");
        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let config = load_config(None, None, &nested).unwrap();
        assert_eq!(config.base_dir.as_deref(), Some(temp.path()));
        assert!(root_of(&config).ends_with("mods"));
        assert!(!root_of(&config).starts_with(&nested));
    }

    #[test]
    fn test_explicit_relative_config() {
        let temp = project("[glob]\ncase_sensitive = false\n");
        fs::create_dir_all(temp.path().join("conf")).unwrap();
        fs::write(temp.path().join("conf").join("alt.toml"), "root = \"data\"\n").unwrap();

        let config = load_config(None, Some(Path::new("conf/alt.toml")), temp.path()).unwrap();
        assert_eq!(config.root, Some(PathBuf::from("data")));
        assert!(root_of(&config).ends_with("conf/data"));

        let config = load_config(None, Some(Path::new("rooter.toml")), temp.path()).unwrap();
        assert!(!config.glob.case_sensitive);
        assert_eq!(root_of(&config), rooter::path::normalize(temp.path()));
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let temp = TempDir::new().unwrap();
        assert!(load_config(None, Some(Path::new("absent.toml")), temp.path()).is_err());
    }
}
