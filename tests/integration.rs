use std::path::Path;
use std::process::Command;

fn repolink_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_repolink"));
    cmd.current_dir(dir);
    cmd.env_remove("REPOLINK_LOG");
    return cmd;
}

fn fixture(name: &str) -> std::path::PathBuf {
    return Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name);
}

#[test]
fn rewrite_prints_linked_markdown() {
    let out = repolink_cmd(&fixture("basic"))
        .args(["rewrite", "docs/guide.md"])
        .output()
        .unwrap();
    assert!(out.status.success(), "rewrite failed: {}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8(out.stdout).unwrap();
    assert_eq!(
        stdout,
        "# Guide\n\
         \n\
         The entry point is [src/app.ts:10-20](https://github.com/o/r/blob/main/src/app.ts#L10-L20).\n\
         Helpers live in [helpers.ts:3](https://github.com/o/r/blob/main/src/util/helpers.ts#L3).\n\
         Missing [nowhere.rs]() stays put.\n"
    );

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Linked 2 of 3 markers"), "unexpected summary: {stderr}");
}

#[test]
fn rewrite_in_place_only_touches_resolved_markers() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("src")).unwrap();
    std::fs::write(dir.path().join("src/lib.rs"), "pub fn f() {}\n").unwrap();
    std::fs::write(
        dir.path().join(".repolink.toml"),
        "repo_url = \"https://gitlab.com/g/p\"\nbranch = \"dev\"\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("README.md"), "See [lib.rs:1-2]() and [gone.rs]().\n").unwrap();

    let out = repolink_cmd(dir.path())
        .args(["rewrite", "--in-place", "README.md"])
        .output()
        .unwrap();
    assert!(out.status.success(), "rewrite failed: {}", String::from_utf8_lossy(&out.stderr));
    assert!(out.stdout.is_empty());

    let updated = std::fs::read_to_string(dir.path().join("README.md")).unwrap();
    assert_eq!(
        updated,
        "See [lib.rs:1-2](https://gitlab.com/g/p/-/blob/dev/src/lib.rs#L1-2) and [gone.rs]().\n"
    );
}

#[test]
fn resolve_uses_preferred_paths() {
    let out = repolink_cmd(&fixture("basic"))
        .args(["resolve", "helpers.ts"])
        .output()
        .unwrap();
    assert!(out.status.success(), "resolve failed: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "src/util/helpers.ts\n");
}

#[test]
fn resolve_reports_ambiguity() {
    let out = repolink_cmd(&fixture("basic"))
        .args(["resolve", "foo.cs", "--files", "ambiguous.txt"])
        .output()
        .unwrap();
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Ambiguous Path"), "unexpected stderr: {stderr}");
    assert!(stderr.contains("x/foo.cs"));
    assert!(stderr.contains("y/foo.cs"));
}

#[test]
fn resolve_json_shows_tier() {
    let out = repolink_cmd(&fixture("basic"))
        .args(["resolve", "util/helpers.ts", "--json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["status"], "resolved");
    assert_eq!(value["path"], "src/util/helpers.ts");
    assert_eq!(value["tier"], "suffix");
}

#[test]
fn url_honors_overrides() {
    let out = repolink_cmd(&fixture("basic"))
        .args([
            "url",
            "src/app.ts",
            "--start",
            "5",
            "--repo-url",
            "https://gitlab.com/g/p",
            "--provider",
            "gitlab",
        ])
        .output()
        .unwrap();
    assert!(out.status.success(), "url failed: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        String::from_utf8(out.stdout).unwrap(),
        "https://gitlab.com/g/p/-/blob/main/src/app.ts#L5\n"
    );
}

#[test]
fn url_without_repo_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = repolink_cmd(dir.path()).args(["url", "a.rs"]).output().unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("No Repository URL"));
}

#[test]
fn chunk_prints_line_ranges() {
    let out = repolink_cmd(&fixture("basic"))
        .args(["chunk", "src/app.ts", "--size", "4", "--overlap", "1"])
        .output()
        .unwrap();
    assert!(out.status.success(), "chunk failed: {}", String::from_utf8_lossy(&out.stderr));
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let chunks = value.as_array().unwrap();
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0]["start_line"], 1);
    assert_eq!(chunks[0]["end_line"], 4);
    assert_eq!(chunks[1]["start_line"], 4);
    assert_eq!(chunks[1]["end_line"], 5);
    assert_eq!(chunks[1]["file_path"], "src/app.ts");
}

#[test]
fn azure_json_includes_slug() {
    let out = repolink_cmd(&fixture("basic"))
        .args(["azure", "https://dev.azure.com/org/proj/_git/repo.git", "--json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["organization"], "org");
    assert_eq!(value["repository"], "repo");
    assert_eq!(value["slug"], "org_proj_repo");
}

#[test]
fn azure_file_prints_web_url() {
    let out = repolink_cmd(&fixture("basic"))
        .args([
            "azure",
            "https://dev.azure.com/org/proj/_git/repo",
            "--file",
            "src/my file.cs",
            "--branch",
            "dev",
            "--json",
        ])
        .output()
        .unwrap();
    assert!(out.status.success(), "azure failed: {}", String::from_utf8_lossy(&out.stderr));
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(
        value["file_url"],
        "https://dev.azure.com/org/proj/_git/repo?path=/src/my%20file.cs&version=GBdev"
    );
}

#[test]
fn check_lists_unresolved_markers_with_lines() {
    let out = repolink_cmd(&fixture("basic"))
        .args(["check", "docs/guide.md"])
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert_eq!(
        String::from_utf8(out.stdout).unwrap(),
        "docs/guide.md:5: [nowhere.rs]() not found\n1 of 3 markers unresolved\n"
    );
}

#[test]
fn check_reports_ambiguity_and_passes_when_clean() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("files.txt"), "x/foo.cs\ny/foo.cs\nsrc/a.rs\n").unwrap();
    std::fs::write(dir.path().join("bad.md"), "intro\n\nsee [foo.cs:3]()\n").unwrap();
    std::fs::write(dir.path().join("good.md"), "[a.rs]() and [src/a.rs:1-2]()\n").unwrap();

    let out = repolink_cmd(dir.path())
        .args(["check", "bad.md", "--files", "files.txt"])
        .output()
        .unwrap();
    assert!(!out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(
        stdout.starts_with("bad.md:3: [foo.cs:3]() ambiguous by path suffix: x/foo.cs, y/foo.cs\n"),
        "unexpected report: {stdout}"
    );

    let out = repolink_cmd(dir.path())
        .args(["check", "good.md", "--files", "files.txt"])
        .output()
        .unwrap();
    assert!(out.status.success(), "check failed: {}", String::from_utf8_lossy(&out.stdout));
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "All 2 markers resolve\n");
}

#[test]
fn blank_branch_flag_keeps_configured_branch() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".repolink.toml"),
        "repo_url = \"https://github.com/o/r\"\nbranch = \"release\"\n",
    )
    .unwrap();

    let out = repolink_cmd(dir.path())
        .args(["url", "src/app.ts", "--branch", ""])
        .output()
        .unwrap();
    assert!(out.status.success(), "url failed: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        String::from_utf8(out.stdout).unwrap(),
        "https://github.com/o/r/blob/release/src/app.ts\n"
    );
}
