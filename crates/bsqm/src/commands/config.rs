//! `bsqm config` - inspect and edit settings

use anyhow::Result;
use bsqm_core::Settings;
use camino::Utf8Path;

use super::load_store;
use crate::cli::{ConfigCommands, ConfigSetArgs, ConfigShowArgs, ConfigUnsetArgs};
use crate::output;

pub fn run(cmd: ConfigCommands, config: Option<&Utf8Path>) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => show(args, config),
        ConfigCommands::Path => {
            let store = load_store(config)?;
            println!("{}", store.path());
            Ok(())
        }
        ConfigCommands::Set(args) => set(args, config),
        ConfigCommands::Unset(args) => unset(args, config),
    }
}

fn show(args: ConfigShowArgs, config: Option<&Utf8Path>) -> Result<()> {
    let store = load_store(config)?;
    let settings = store.settings();

    if args.json {
        println!("{}", serde_json::to_string_pretty(settings)?);
    } else {
        output::header(&format!("Settings ({})", store.path()));
        for key in Settings::keys() {
            let value = settings.get(key)?.unwrap_or_else(|| "-".to_string());
            output::kv(key, &value);
        }
        output::kv("template.fallback-fill", &settings.template.fallback_fill.join(", "));
    }
    Ok(())
}

fn set(args: ConfigSetArgs, config: Option<&Utf8Path>) -> Result<()> {
    let mut store = load_store(config)?;
    store.set(&args.key, Some(&args.value))?;
    store.save()?;
    output::success(&format!("Set {} = {}", args.key, args.value));
    Ok(())
}

fn unset(args: ConfigUnsetArgs, config: Option<&Utf8Path>) -> Result<()> {
    let mut store = load_store(config)?;
    store.set(&args.key, None)?;
    store.save()?;
    output::success(&format!("Reset {}", args.key));
    Ok(())
}
