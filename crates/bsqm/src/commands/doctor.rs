//! `bsqm doctor` - report on the toolchain without changing anything

use anyhow::Result;
use bsqm_core::Platform;
use bsqm_doctor::{check_tools, format_human, WhichLocator};
use camino::Utf8Path;

use super::load_store;
use crate::cli::DoctorArgs;

pub fn run(args: DoctorArgs, config: Option<&Utf8Path>) -> Result<()> {
    let store = load_store(config)?;
    let platform = Platform::current();
    let reports = check_tools(store.settings(), &WhichLocator, platform);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print!("{}", format_human(&reports, platform));
    }
    Ok(())
}
