//! Tool resolver tests with scripted prompts, PATH lookups and downloads

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use bsqm_core::config::SettingsStore;
use bsqm_core::{ChooserRequest, Notice, Platform, Prompter, ToolId};
use bsqm_doctor::{Locator, ToolResolver, ToolSource};
use bsqm_download::ArchiveFetcher;
use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

#[derive(Default)]
struct ScriptedPrompter {
    choices: VecDeque<Option<Utf8PathBuf>>,
    answers: VecDeque<bool>,
    questions: Vec<String>,
    requests: Vec<ChooserRequest>,
    notices: Vec<(Notice, String)>,
}

impl Prompter for ScriptedPrompter {
    fn choose_path(&mut self, request: &ChooserRequest) -> bsqm_core::Result<Option<Utf8PathBuf>> {
        self.requests.push(request.clone());
        Ok(self.choices.pop_front().flatten())
    }

    fn confirm(&mut self, question: &str) -> bsqm_core::Result<bool> {
        self.questions.push(question.to_string());
        Ok(self.answers.pop_front().unwrap_or(false))
    }

    fn notify(&mut self, level: Notice, message: &str) {
        self.notices.push((level, message.to_string()));
    }
}

struct FixedLocator(Option<Utf8PathBuf>);

impl Locator for FixedLocator {
    fn find(&self, _executable: &str) -> Option<Utf8PathBuf> {
        self.0.clone()
    }
}

/// Writes the NDK layout instead of downloading it
#[derive(Default)]
struct FakeFetcher {
    urls: Mutex<Vec<String>>,
}

impl FakeFetcher {
    fn calls(&self) -> usize {
        self.urls.lock().unwrap().len()
    }
}

#[async_trait]
impl ArchiveFetcher for FakeFetcher {
    async fn fetch_and_extract(&self, url: &str, destination: &Path) -> anyhow::Result<()> {
        self.urls.lock().unwrap().push(url.to_string());
        let dir = destination.join("android-ndk-r20");
        std::fs::create_dir_all(&dir)?;
        std::fs::write(dir.join("ndk-build"), "#!/bin/sh\n")?;
        Ok(())
    }
}

fn utf8(path: &Path) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(path.to_path_buf()).unwrap()
}

fn temp_store(dir: &TempDir) -> SettingsStore {
    SettingsStore::load_with_env(utf8(dir.path()).join("config.yaml"), |_| None).unwrap()
}

#[tokio::test]
async fn test_on_path_never_prompts_or_downloads() {
    let temp = TempDir::new().unwrap();
    let mut store = temp_store(&temp);
    let locator = FixedLocator(Some(Utf8PathBuf::from("/usr/bin/ndk-build")));
    let fetcher = FakeFetcher::default();
    let mut prompter = ScriptedPrompter::default();

    let resolver = ToolResolver::new(Platform::Linux, &locator, &fetcher);
    let resolved = resolver
        .resolve_and_store(&mut store, ToolId::Ndk, &mut prompter)
        .await
        .unwrap();

    assert!(resolved.available);
    assert_eq!(resolved.source, ToolSource::SearchPath);
    assert!(prompter.questions.is_empty());
    assert!(prompter.requests.is_empty());
    assert_eq!(fetcher.calls(), 0);
    assert_eq!(
        store.settings().tool_path(ToolId::Ndk),
        Some(Utf8Path::new("/usr/bin/ndk-build"))
    );
}

#[tokio::test]
async fn test_selects_existing_install_after_retry() {
    let temp = TempDir::new().unwrap();
    let mut store = temp_store(&temp);
    let script = utf8(temp.path()).join("ndk-build");
    std::fs::write(&script, "").unwrap();
    let wrong = utf8(temp.path()).join("readme.txt");
    std::fs::write(&wrong, "").unwrap();

    let fetcher = FakeFetcher::default();
    let mut prompter = ScriptedPrompter {
        choices: [Some(wrong), Some(script.clone())].into(),
        answers: [true, true].into(),
        ..Default::default()
    };

    let resolver = ToolResolver::new(Platform::Linux, &FixedLocator(None), &fetcher);
    let resolved = resolver
        .resolve_and_store(&mut store, ToolId::Ndk, &mut prompter)
        .await
        .unwrap();

    assert_eq!(resolved.source, ToolSource::Selected);
    assert_eq!(resolved.path.as_deref(), Some(script.as_path()));
    assert_eq!(prompter.requests.len(), 2);
    assert_eq!(fetcher.calls(), 0);
    assert_eq!(
        prompter.notices,
        vec![(
            Notice::Info,
            format!("Using Android NDK build script: {}", script)
        )]
    );

    let reloaded = temp_store(&temp);
    assert_eq!(reloaded.settings().tool_path(ToolId::Ndk), Some(script.as_path()));
}

#[tokio::test]
async fn test_windows_chooser_filters_cmd() {
    let fetcher = FakeFetcher::default();
    let mut prompter = ScriptedPrompter {
        choices: [None].into(),
        answers: [true, false].into(),
        ..Default::default()
    };

    let resolver = ToolResolver::new(Platform::Windows, &FixedLocator(None), &fetcher);
    let resolved = resolver.resolve(ToolId::Ndk, &mut prompter).await.unwrap();

    assert!(!resolved.available);
    assert_eq!(
        prompter.requests[0],
        ChooserRequest::file("Select ndk-build.cmd", &["cmd"])
    );
}

#[tokio::test]
async fn test_installs_into_empty_folder() {
    let temp = TempDir::new().unwrap();
    let mut store = temp_store(&temp);
    let install_dir = utf8(temp.path()).join("ndk");
    std::fs::create_dir(&install_dir).unwrap();

    let fetcher = FakeFetcher::default();
    let mut prompter = ScriptedPrompter {
        choices: [Some(install_dir.clone())].into(),
        // not installed, install it
        answers: [false, true].into(),
        ..Default::default()
    };

    let resolver = ToolResolver::new(Platform::Linux, &FixedLocator(None), &fetcher);
    let resolved = resolver
        .resolve_and_store(&mut store, ToolId::Ndk, &mut prompter)
        .await
        .unwrap();

    assert_eq!(resolved.source, ToolSource::Installed);
    assert_eq!(
        resolved.path,
        Some(install_dir.join("android-ndk-r20").join("ndk-build"))
    );
    assert_eq!(
        fetcher.urls.lock().unwrap().as_slice(),
        ["https://dl.google.com/android/repository/android-ndk-r20-linux-x86_64.zip"]
    );
}

#[tokio::test]
async fn test_non_empty_folder_declined_leaves_tool_unavailable() {
    let temp = TempDir::new().unwrap();
    let mut store = temp_store(&temp);
    store.set_tool_path(ToolId::Ndk, Some(Utf8PathBuf::from("/stale/ndk-build")));

    let occupied = utf8(temp.path()).join("occupied");
    std::fs::create_dir(&occupied).unwrap();
    std::fs::write(occupied.join("file"), "").unwrap();

    let fetcher = FakeFetcher::default();
    let mut prompter = ScriptedPrompter {
        choices: [Some(occupied)].into(),
        // not installed, install it, do not retry
        answers: [false, true, false].into(),
        ..Default::default()
    };

    let resolver = ToolResolver::new(Platform::Linux, &FixedLocator(None), &fetcher);
    let resolved = resolver
        .resolve_and_store(&mut store, ToolId::Ndk, &mut prompter)
        .await
        .unwrap();

    assert!(!resolved.available);
    assert_eq!(resolved.source, ToolSource::NotFound);
    assert_eq!(fetcher.calls(), 0);
    assert_eq!(
        prompter.questions.last().map(String::as_str),
        Some("Folder must be empty. Do you wish to try again?")
    );
    assert!(store.settings().tool_path(ToolId::Ndk).is_none());
}

#[tokio::test]
async fn test_git_is_never_offered_for_install() {
    let fetcher = FakeFetcher::default();
    let mut prompter = ScriptedPrompter::default();

    let resolver = ToolResolver::new(Platform::Linux, &FixedLocator(None), &fetcher);
    let resolved = resolver.resolve(ToolId::Git, &mut prompter).await.unwrap();

    assert!(!resolved.available);
    assert_eq!(prompter.questions, vec!["Couldn't find Git. Is it installed?"]);
    assert!(matches!(prompter.notices.last(), Some((Notice::Error, _))));
}
