use anyhow::{bail, Context, Result};

use crate::args::ConfigCmd;
use crate::config::{config_file_path, load_config, save_config, Config};

pub fn handle_config(cmd: ConfigCmd) -> Result<()> {
    match cmd {
        ConfigCmd::Show => {
            let config = load_config()?;
            let text = toml::to_string_pretty(&config).context("failed to serialize config")?;
            println!("# {}", config_file_path().display());
            print!("{text}");
        }
        ConfigCmd::Init { force } => {
            let path = config_file_path();
            if path.exists() && !force {
                bail!(
                    "{} already exists, pass --force to overwrite it",
                    path.display()
                );
            }
            save_config(&Config::default())?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}
