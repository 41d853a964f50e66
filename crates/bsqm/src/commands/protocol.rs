//! JSON line protocol for `bsqm create --stdio`
//!
//! An editor front end drives the project form by writing one JSON message
//! per line on stdin and reading one reply per line on stdout:
//!
//! ```text
//! -> {"type": "browse", "payload": {}}
//! <- {"type": "browse", "payload": "/home/me/mods/cool"}
//! -> {"type": "submit", "payload": {"id": "coolmod", ...}}
//! <- {"type": "submit", "payload": "/home/me/mods/cool"}
//! ```
//!
//! Chooser replies omit `payload` when the chooser was dismissed. A failed
//! submission is answered with `{"type": "error", "payload": <message>}`.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bsqm_core::prompt::TerminalPrompter;
use bsqm_core::types::{derive_out, parse_game_version};
use bsqm_core::{prompt_path, Category, ChooserRequest, Platform, ProjectMetadata, Settings, ToolId};
use bsqm_doctor::ToolRegistry;
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use super::create::{
    create_project, progress_sink, project_folder_is_usable, CreateRequest, Progress,
};

/// Messages sent by the front end
#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub(crate) enum FormMessage {
    Browse(EmptyPayload),
    Libil2cpp(EmptyPayload),
    Ndkbundle(EmptyPayload),
    Submit(SubmitPayload),
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct EmptyPayload {}

/// Fields of a submitted form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubmitPayload {
    pub id: String,
    pub name: String,
    pub author: String,
    pub description: String,
    #[serde(default)]
    pub project_folder: String,
    pub category: Option<String>,
    pub game_version: Option<String>,
    pub out: Option<String>,
    pub url: Option<String>,
    pub libil2cpp: Option<Utf8PathBuf>,
    pub ndk_bundle: Option<Utf8PathBuf>,
}

/// One reply line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct FormReply {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

impl FormReply {
    fn chooser(kind: &'static str, path: Option<&Utf8PathBuf>) -> Self {
        Self {
            kind,
            payload: path.map(|p| p.to_string()),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: "error",
            payload: Some(message.into()),
        }
    }
}

/// Folder choosers the form can open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormField {
    ProjectFolder,
    Libil2cpp,
    NdkBundle,
}

/// Folders picked so far; each chooser reply replaces the previous value
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct FormState {
    pub project_folder: Option<Utf8PathBuf>,
    pub libil2cpp: Option<Utf8PathBuf>,
    pub ndk_bundle: Option<Utf8PathBuf>,
}

/// What the protocol needs from its host
#[async_trait(?Send)]
pub(crate) trait FormBackend {
    fn choose_folder(&mut self, field: FormField) -> Result<Option<Utf8PathBuf>>;

    async fn submit(&mut self, request: CreateRequest) -> Result<Utf8PathBuf>;
}

/// Turn a submitted form into a creation request
///
/// Fields the form does not carry are derived: the output name from the
/// id, the category as `Other`, the game version from the settings.
pub(crate) fn build_request(
    payload: SubmitPayload,
    state: &FormState,
    settings: &Settings,
    platform: Platform,
) -> Result<CreateRequest> {
    let project_dir = if payload.project_folder.trim().is_empty() {
        state.project_folder.clone()
    } else {
        Some(Utf8PathBuf::from(payload.project_folder.trim()))
    }
    .ok_or_else(|| anyhow!("Missing required field: projectFolder"))?;
    project_folder_is_usable(&project_dir).map_err(|m| anyhow!("{} ({})", m, project_dir))?;

    let category = match payload.category.as_deref() {
        Some(c) => c.parse::<Category>().map_err(|m| anyhow!("Invalid category: {}", m))?,
        None => Category::Other,
    };
    let game_version = parse_game_version(
        payload
            .game_version
            .as_deref()
            .unwrap_or(&settings.project.game_version),
    )
    .map_err(|m| anyhow!("Invalid game version: {}", m))?;
    let out = payload.out.unwrap_or_else(|| derive_out(&payload.id));
    let url = payload.url.filter(|u| !u.trim().is_empty());

    let ndk_path = match payload.ndk_bundle.or_else(|| state.ndk_bundle.clone()) {
        Some(bundle) => Some(bundle.join(ToolRegistry::get(ToolId::Ndk).executable_for(platform))),
        None => settings.tool_path(ToolId::Ndk).map(|p| p.to_path_buf()),
    };

    let metadata = ProjectMetadata {
        id: payload.id,
        name: payload.name,
        author: payload.author,
        description: payload.description,
        category,
        game_version,
        out,
        url,
        ndk_path,
    };
    metadata.validate()?;

    Ok(CreateRequest {
        project_dir,
        metadata,
        libil2cpp: payload.libil2cpp.or_else(|| state.libil2cpp.clone()),
        init_git: true,
    })
}

/// Answer messages from `reader` until it closes
pub(crate) async fn serve<R, W, B>(
    reader: R,
    mut writer: W,
    backend: &mut B,
    settings: &Settings,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    B: FormBackend + ?Sized,
{
    let mut lines = reader.lines();
    let mut state = FormState::default();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        debug!("<- {}", line);

        let reply = match serde_json::from_str::<FormMessage>(&line) {
            Err(e) => FormReply::error(format!("Invalid message: {}", e)),
            Ok(FormMessage::Browse(_)) => {
                choose(backend, FormField::ProjectFolder, &mut state.project_folder, "browse")
            }
            Ok(FormMessage::Libil2cpp(_)) => {
                choose(backend, FormField::Libil2cpp, &mut state.libil2cpp, "libil2cpp")
            }
            Ok(FormMessage::Ndkbundle(_)) => {
                choose(backend, FormField::NdkBundle, &mut state.ndk_bundle, "ndkbundle")
            }
            Ok(FormMessage::Submit(payload)) => {
                let result = match build_request(payload, &state, settings, Platform::current()) {
                    Ok(request) => backend.submit(request).await,
                    Err(e) => Err(e),
                };
                match result {
                    Ok(dir) => FormReply {
                        kind: "submit",
                        payload: Some(dir.to_string()),
                    },
                    Err(e) => FormReply::error(format!("{:#}", e)),
                }
            }
        };

        let mut encoded = serde_json::to_string(&reply)?;
        debug!("-> {}", encoded);
        encoded.push('\n');
        writer.write_all(encoded.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}

fn choose<B: FormBackend + ?Sized>(
    backend: &mut B,
    field: FormField,
    slot: &mut Option<Utf8PathBuf>,
    kind: &'static str,
) -> FormReply {
    match backend.choose_folder(field) {
        Ok(chosen) => {
            *slot = chosen;
            FormReply::chooser(kind, slot.as_ref())
        }
        Err(e) => FormReply::error(format!("{:#}", e)),
    }
}

/// Backend answering choosers on the terminal and running the real pipeline
struct TerminalBackend<'a> {
    settings: &'a Settings,
    prompter: TerminalPrompter,
}

#[async_trait(?Send)]
impl FormBackend for TerminalBackend<'_> {
    fn choose_folder(&mut self, field: FormField) -> Result<Option<Utf8PathBuf>> {
        let chosen = match field {
            FormField::ProjectFolder => prompt_path(
                &mut self.prompter,
                &ChooserRequest::folder("Select empty project folder"),
                project_folder_is_usable,
            )?,
            FormField::Libil2cpp => prompt_path(
                &mut self.prompter,
                &ChooserRequest::folder("Select libil2cpp folder"),
                |p| if p.is_dir() { Ok(()) } else { Err("Folder does not exist.".to_string()) },
            )?,
            FormField::NdkBundle => prompt_path(
                &mut self.prompter,
                &ChooserRequest::folder("Select Android NDK folder"),
                |p| if p.is_dir() { Ok(()) } else { Err("Folder does not exist.".to_string()) },
            )?,
        };
        Ok(chosen)
    }

    async fn submit(&mut self, request: CreateRequest) -> Result<Utf8PathBuf> {
        let sink = progress_sink(|progress| match progress {
            Progress::Phase(message) => info!("{}", message),
            Progress::Output(line) => info!("  {}", line),
        });
        create_project(self.settings, &request, &sink).await
    }
}

/// Serve the protocol on the process's stdin and stdout
pub(crate) async fn serve_stdio(settings: &Settings) -> Result<()> {
    let mut backend = TerminalBackend {
        settings,
        prompter: TerminalPrompter::new(),
    };
    serve(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        &mut backend,
        settings,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use tempfile::TempDir;

    #[derive(Default)]
    struct FakeBackend {
        folders: VecDeque<Option<Utf8PathBuf>>,
        submitted: Vec<CreateRequest>,
        fail_submit: bool,
    }

    #[async_trait(?Send)]
    impl FormBackend for FakeBackend {
        fn choose_folder(&mut self, _field: FormField) -> Result<Option<Utf8PathBuf>> {
            Ok(self.folders.pop_front().flatten())
        }

        async fn submit(&mut self, request: CreateRequest) -> Result<Utf8PathBuf> {
            let dir = request.project_dir.clone();
            self.submitted.push(request);
            if self.fail_submit {
                Err(anyhow!("Git repository initialisation failed"))
            } else {
                Ok(dir)
            }
        }
    }

    async fn exchange(backend: &mut FakeBackend, input: &str) -> Vec<serde_json::Value> {
        let mut out = Vec::new();
        serve(input.as_bytes(), &mut out, backend, &Settings::default())
            .await
            .unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    fn submit_line(folder: &str) -> String {
        serde_json::json!({
            "type": "submit",
            "payload": {
                "id": "coolmod",
                "name": "Cool Mod",
                "author": "Jane",
                "description": "does stuff",
                "projectFolder": folder,
            }
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_browse_reply_omits_payload_when_dismissed() {
        let mut backend = FakeBackend {
            folders: [Some(Utf8PathBuf::from("/mods/cool")), None].into(),
            ..Default::default()
        };
        let input = "{\"type\":\"browse\",\"payload\":{}}\n{\"type\":\"browse\",\"payload\":{}}\n";
        let replies = exchange(&mut backend, input).await;

        assert_eq!(replies[0], serde_json::json!({"type": "browse", "payload": "/mods/cool"}));
        assert_eq!(replies[1], serde_json::json!({"type": "browse"}));
    }

    #[tokio::test]
    async fn test_submit_uses_browsed_folder_and_derivations() {
        let temp = TempDir::new().unwrap();
        let folder = Utf8PathBuf::from_path_buf(temp.path().join("cool")).unwrap();
        let mut backend = FakeBackend {
            folders: [Some(folder.clone()), Some(Utf8PathBuf::from("/headers"))].into(),
            ..Default::default()
        };
        let input = format!(
            "{}\n{}\n{}\n",
            r#"{"type":"browse","payload":{}}"#,
            r#"{"type":"libil2cpp","payload":{}}"#,
            submit_line("")
        );
        let replies = exchange(&mut backend, &input).await;

        assert_eq!(
            replies[2],
            serde_json::json!({"type": "submit", "payload": folder.as_str()})
        );
        let request = &backend.submitted[0];
        assert_eq!(request.project_dir, folder);
        assert_eq!(request.metadata.out, "coolmod");
        assert_eq!(request.metadata.category, Category::Other);
        assert_eq!(request.metadata.game_version, semver::Version::new(1, 7, 0));
        assert_eq!(request.libil2cpp.as_deref(), Some(camino::Utf8Path::new("/headers")));
        assert!(request.init_git);
    }

    #[tokio::test]
    async fn test_dismissed_chooser_clears_previous_choice() {
        let mut backend = FakeBackend {
            folders: [Some(Utf8PathBuf::from("/mods/cool")), None].into(),
            ..Default::default()
        };
        let input = format!(
            "{}\n{}\n{}\n",
            r#"{"type":"browse","payload":{}}"#,
            r#"{"type":"browse","payload":{}}"#,
            submit_line("")
        );
        let replies = exchange(&mut backend, &input).await;

        assert_eq!(
            replies[2],
            serde_json::json!({"type": "error", "payload": "Missing required field: projectFolder"})
        );
        assert!(backend.submitted.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_field_is_reported_not_submitted() {
        let temp = TempDir::new().unwrap();
        let folder = temp.path().join("p");
        let mut backend = FakeBackend::default();
        let line = submit_line(folder.to_str().unwrap()).replace("coolmod", "cool mod");
        let replies = exchange(&mut backend, &format!("{}\n", line)).await;

        assert_eq!(replies[0]["type"], "error");
        assert!(replies[0]["payload"].as_str().unwrap().contains("Invalid id"));
        assert!(backend.submitted.is_empty());
    }

    #[tokio::test]
    async fn test_pipeline_failure_becomes_error_reply() {
        let temp = TempDir::new().unwrap();
        let folder = temp.path().join("p");
        let mut backend = FakeBackend {
            fail_submit: true,
            ..Default::default()
        };
        let replies =
            exchange(&mut backend, &format!("{}\n", submit_line(folder.to_str().unwrap()))).await;

        assert_eq!(
            replies[0],
            serde_json::json!({"type": "error", "payload": "Git repository initialisation failed"})
        );
    }

    #[tokio::test]
    async fn test_garbage_line_gets_error_and_session_continues() {
        let mut backend = FakeBackend {
            folders: [Some(Utf8PathBuf::from("/x"))].into(),
            ..Default::default()
        };
        let input = "not json\n{\"type\":\"ndkbundle\",\"payload\":{}}\n";
        let replies = exchange(&mut backend, input).await;

        assert_eq!(replies[0]["type"], "error");
        assert_eq!(replies[1], serde_json::json!({"type": "ndkbundle", "payload": "/x"}));
    }

    #[test]
    fn test_ndk_bundle_sets_ndk_path() {
        let temp = TempDir::new().unwrap();
        let folder = Utf8PathBuf::from_path_buf(temp.path().join("p")).unwrap();
        let payload = SubmitPayload {
            id: "coolmod".to_string(),
            name: "Cool Mod".to_string(),
            author: "Jane".to_string(),
            description: "does stuff".to_string(),
            project_folder: folder.to_string(),
            ndk_bundle: Some(Utf8PathBuf::from("/opt/android-ndk-r20")),
            category: Some("saber".to_string()),
            ..Default::default()
        };

        let request =
            build_request(payload, &FormState::default(), &Settings::default(), Platform::Linux)
                .unwrap();
        assert_eq!(
            request.metadata.ndk_path.as_deref(),
            Some(camino::Utf8Path::new("/opt/android-ndk-r20/ndk-build"))
        );
        assert_eq!(request.metadata.category, Category::Saber);
    }
}
