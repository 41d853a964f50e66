//! Interactive project form
//!
//! Fields given on the command line are validated as-is; the rest are
//! asked for, re-prompting until the answer passes its format rule.

use anyhow::{anyhow, Result};
use bsqm_core::types::{
    derive_out, parse_game_version, validate_description, validate_id, validate_out,
    validate_single_line, validate_url,
};
use bsqm_core::{Category, ProjectMetadata, Settings, ToolId};
use dialoguer::{Input, Select};

use crate::cli::CreateArgs;

type Validator = fn(&str) -> std::result::Result<(), String>;

/// Build project metadata from flags, prompting for missing fields
pub(crate) fn collect(args: &CreateArgs, settings: &Settings) -> Result<ProjectMetadata> {
    let id = field(args.id.as_deref(), "ID", None, validate_id)?;
    let name = field(args.name.as_deref(), "Name", None, validate_single_line)?;
    let author = field(args.author.as_deref(), "Author", None, validate_single_line)?;
    let description = field(
        args.description.as_deref(),
        "Description",
        None,
        validate_description,
    )?;

    let category = match args.category {
        Some(category) => category,
        None => {
            let labels: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
            let index = Select::new()
                .with_prompt("Category")
                .items(&labels)
                .default(labels.len() - 1)
                .interact()?;
            Category::ALL[index]
        }
    };

    let game_version = match &args.game_version {
        Some(version) => version.clone(),
        None => {
            let answer = field(
                None,
                "Game version",
                Some(&settings.project.game_version),
                |s| parse_game_version(s).map(|_| ()),
            )?;
            parse_game_version(&answer).map_err(|m| anyhow!(m))?
        }
    };

    let out = field(args.out.as_deref(), "Output file", Some(&derive_out(&id)), validate_out)?;
    let url = optional_field(args.url.as_deref(), "URL", validate_url)?;

    let metadata = ProjectMetadata {
        id,
        name,
        author,
        description,
        category,
        game_version,
        out,
        url,
        ndk_path: settings.tool_path(ToolId::Ndk).map(|p| p.to_path_buf()),
    };
    metadata.validate()?;
    Ok(metadata)
}

fn field(given: Option<&str>, prompt: &str, default: Option<&str>, validate: Validator) -> Result<String> {
    if let Some(value) = given {
        validate(value).map_err(|m| anyhow!("Invalid {}: {}", prompt.to_lowercase(), m))?;
        return Ok(value.to_string());
    }

    let mut input = Input::<String>::new()
        .with_prompt(prompt)
        .validate_with(move |s: &String| validate(s));
    if let Some(default) = default {
        input = input.default(default.to_string());
    }
    Ok(input.interact_text()?)
}

fn optional_field(given: Option<&str>, prompt: &str, validate: Validator) -> Result<Option<String>> {
    if let Some(value) = given {
        validate(value).map_err(|m| anyhow!("Invalid {}: {}", prompt.to_lowercase(), m))?;
        return Ok(Some(value.to_string()));
    }

    let answer = Input::<String>::new()
        .with_prompt(format!("{} (optional)", prompt))
        .allow_empty(true)
        .validate_with(move |s: &String| if s.is_empty() { Ok(()) } else { validate(s) })
        .interact_text()?;
    Ok(Some(answer).filter(|a| !a.is_empty()))
}
