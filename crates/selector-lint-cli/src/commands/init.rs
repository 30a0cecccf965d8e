//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# selector-lint configuration

# Exit with a failure status when a violation reaches this severity
fail_on = "error"

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./src"

# Glob patterns to exclude from analysis
exclude = [
    "**/bin/**",
    "**/obj/**",
]

# Glob patterns to include (empty: every .cs file)
# include = ["src/**"]

# Respect .gitignore files
respect_gitignore = true

# Worker threads (default: available parallelism)
# parallelism = 4

# Additional watched methods, e.g. the same methods on another type
# [[methods]]
# name = "Ignore"
# declaring_type = "MyMapExtensions"
# receiver_parameter = "map"
# parameters = ["selector"]

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.incorrect-link-and-ignore]
enabled = true
# severity = "warning"  # Override default severity
max_chain_depth = 1

[rules.incorrect-ignore-expression]
enabled = true
max_chain_depth = 1
"#;

/// Name of the generated configuration file.
const CONFIG_FILE: &str = "selector-lint.toml";

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new(CONFIG_FILE), force)?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to configure rules");
    println!("  2. Run: selector-lint check");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;
    Ok(())
}
