//! Common test utilities for skillsync integration tests

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A workspace root and a private storage root under one temp directory
#[allow(dead_code)]
pub struct TestWorkspace {
    /// Temporary directory
    pub temp: TempDir,
    /// Path to workspace root
    pub path: PathBuf,
    /// Storage root passed as `SKILLSYNC_HOME`
    pub home: PathBuf,
}

#[allow(dead_code)]
impl TestWorkspace {
    /// Create a new test workspace
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().join("project");
        let home = temp.path().join("home");
        std::fs::create_dir_all(&path).expect("Failed to create workspace directory");
        Self { temp, path, home }
    }

    /// `skillsync` bound to this workspace and storage root, never prompting
    #[allow(deprecated)]
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("skillsync").expect("skillsync binary");
        cmd.env("SKILLSYNC_HOME", &self.home)
            .env_remove("SKILLSYNC_WORKSPACE")
            .env_remove("SKILLSYNC_TOKEN")
            .env_remove("GITHUB_TOKEN")
            .env_remove("GH_TOKEN")
            .env_remove("RUST_LOG")
            .arg("--no-input")
            .arg("-w")
            .arg(&self.path);
        cmd
    }

    /// Create `<temp>/<name>/skills/<slug>/SKILL.md` for every slug
    pub fn create_skill_source(&self, name: &str, slugs: &[&str]) -> PathBuf {
        let root = self.temp.path().join(name);
        for slug in slugs {
            write(&root.join("skills").join(slug).join("SKILL.md"), &format!("# {slug}\n"));
        }
        root
    }

    /// Skills destination inside the workspace
    pub fn skills_dir(&self) -> PathBuf {
        self.path.join(".claude/skills")
    }

    /// Write a file in workspace
    pub fn write_file(&self, path: &str, content: &str) {
        write(&self.path.join(path), content);
    }

    /// Read a file from workspace
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    /// Check if a file exists in workspace
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }
}

/// Write `content` to `path`, creating parent directories
#[allow(dead_code)]
pub fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    std::fs::write(path, content).expect("Failed to write file");
}

/// Initialise a git repository at `path` with one commit holding `files`
#[allow(dead_code)]
pub fn init_git_repo(path: &Path, files: &[(&str, &str)]) -> git2::Repository {
    std::fs::create_dir_all(path).expect("Failed to create repository directory");
    let repo = git2::Repository::init(path).expect("Failed to init repository");
    commit_files(&repo, files, "initial");
    repo
}

/// Write `files` into the working tree and commit them on the current branch
#[allow(dead_code)]
pub fn commit_files(repo: &git2::Repository, files: &[(&str, &str)], message: &str) {
    let workdir = repo.workdir().expect("workdir").to_path_buf();
    let mut index = repo.index().expect("index");
    for (rel_path, content) in files {
        write(&workdir.join(rel_path), content);
        index.add_path(Path::new(rel_path)).expect("add path");
    }
    index.write().expect("write index");

    let tree_id = index.write_tree().expect("write tree");
    let tree = repo.find_tree(tree_id).expect("find tree");
    let sig = git2::Signature::now("Test", "test@test.com").expect("signature");
    let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .expect("commit");
}
