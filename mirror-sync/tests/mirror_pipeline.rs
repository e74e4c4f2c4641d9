use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use httpmock::prelude::*;
use mirror_core::{Credentials, Slug};
use mirror_sync::{
    run, AddonOutcome, AssetCache, CatalogSource, GitGateway, GithubPublisher, Mirror,
    RepositoryGateway, RunOptions, SyncError,
};
use tempfile::TempDir;

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(["-c", "user.name=Seed", "-c", "user.email=seed@example.org"])
        .args(args)
        .current_dir(dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .expect("spawn git");
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Bare remote at `<remotes>/<slug>` with one untagged commit.
fn seed_remote(root: &Path, slug: &str) -> PathBuf {
    let seed = root.join("seed").join(slug);
    fs::create_dir_all(&seed).expect("seed dir");
    git(&seed, &["init", "--quiet"]);
    fs::write(seed.join("README.md"), format!("# {slug} mirror\n")).expect("readme");
    git(&seed, &["add", "README.md"]);
    git(&seed, &["commit", "--quiet", "-m", "init"]);

    let remotes = root.join("remotes");
    fs::create_dir_all(&remotes).expect("remotes dir");
    let remote = remotes.join(slug);
    git(
        root,
        &["clone", "--quiet", "--bare", &*seed.to_string_lossy(), &*remote.to_string_lossy()],
    );
    remote
}

fn remote_tags(remote: &Path) -> Vec<String> {
    git(remote, &["tag", "--list"])
        .lines()
        .map(str::to_string)
        .collect()
}

struct World {
    root: TempDir,
    server: MockServer,
}

impl World {
    fn new() -> Self {
        Self {
            root: TempDir::new().expect("root"),
            server: MockServer::start(),
        }
    }

    fn gateway(&self) -> GitGateway {
        GitGateway::new(
            self.root.path().join("work/repos"),
            format!("file://{}", self.root.path().join("remotes").display()),
        )
        .with_identity("Mirror Bot", "mirror@example.org")
    }

    fn sync(&self, options: &RunOptions) -> Vec<AddonOutcome> {
        let source = CatalogSource::new(self.server.url("/v1/addons"), "addon-mirror-test");
        let gateway = self.gateway();
        let cache = AssetCache::new(self.root.path().join("work/cache"));
        let publisher = GithubPublisher::new(
            self.server.base_url(),
            "ogri-la",
            "addon-mirror-test",
            Credentials::new("test-token"),
        );
        let mirror = Mirror {
            source: &source,
            gateway: &gateway,
            cache: &cache,
            publisher: &publisher,
        };
        run(&mirror, options).expect("mirror run")
    }
}

#[test]
fn new_version_is_tagged_pushed_and_released_once() {
    let world = World::new();
    let remote = seed_remote(world.root.path(), "elvui");
    let server = &world.server;

    let catalog = server.mock(|when, then| {
        when.method(GET).path("/v1/addons");
        then.status(200).json_body(serde_json::json!([{
            "slug": "elvui",
            "name": "ElvUI",
            "url": server.url("/downloads/elvui-13.33.zip"),
            "version": "13.33",
            "patch": ["10.1.5", "3.4.2", "1.14.4"]
        }]));
    });
    let download = server.mock(|when, then| {
        when.method(GET).path("/downloads/elvui-13.33.zip");
        then.status(200).body("PK\u{3}\u{4}elvui");
    });
    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/repos/ogri-la/elvui/releases")
            .json_body_partial(r#"{"tag_name":"13.33"}"#);
        then.status(201).json_body(serde_json::json!({
            "id": 42,
            "html_url": "https://github.com/ogri-la/elvui/releases/tag/13.33",
            "upload_url": format!("{}{{?name,label}}", server.url("/uploads/elvui/42/assets"))
        }));
    });
    let upload_zip = server.mock(|when, then| {
        when.method(POST)
            .path("/uploads/elvui/42/assets")
            .query_param("name", "elvui--13.33.zip");
        then.status(201);
    });
    let upload_json = server.mock(|when, then| {
        when.method(POST)
            .path("/uploads/elvui/42/assets")
            .query_param("name", "release.json");
        then.status(201);
    });

    let outcomes = world.sync(&RunOptions::default());

    match &outcomes[..] {
        [AddonOutcome::Published { slug, previous, version, release }] => {
            assert_eq!(slug, &Slug::from("elvui"));
            assert_eq!(previous, "");
            assert_eq!(version, "13.33");
            assert_eq!(release.id, 42);
            assert_eq!(release.assets, vec!["elvui--13.33.zip", "release.json"]);
        }
        other => panic!("unexpected outcomes: {other:?}"),
    }
    assert_eq!(remote_tags(&remote), vec!["13.33"]);

    let pushed: serde_json::Value =
        serde_json::from_str(&git(&remote, &["show", "13.33:release.json"])).expect("json");
    let release = &pushed["releases"][0];
    assert_eq!(release["filename"], "elvui--13.33.zip");
    assert_eq!(release["nolib"], false);
    assert_eq!(release["metadata"][0]["flavor"], "mainline");
    assert_eq!(release["metadata"][0]["interface"], 100_100);
    assert_eq!(release["metadata"][1]["flavor"], "classic-wotlk");
    assert_eq!(release["metadata"][2]["interface"], 11_400);

    let cached = world.root.path().join("work/cache/elvui--13.33.zip");
    assert_eq!(fs::read(&cached).expect("cached artifact"), b"PK\x03\x04elvui");

    // Same catalog again: nothing new to do.
    let again = world.sync(&RunOptions::default());
    assert!(matches!(&again[..], [AddonOutcome::UpToDate { version, .. }] if version == "13.33"));

    catalog.assert_hits(2);
    download.assert_hits(1);
    create.assert_hits(1);
    upload_zip.assert_hits(1);
    upload_json.assert_hits(1);
    assert_eq!(remote_tags(&remote), vec!["13.33"]);
}

#[test]
fn dry_run_leaves_remote_untouched() {
    let world = World::new();
    let remote = seed_remote(world.root.path(), "tukui");
    let server = &world.server;

    server.mock(|when, then| {
        when.method(GET).path("/v1/addons");
        then.status(200).json_body(serde_json::json!([{
            "slug": "tukui",
            "name": "Tukui",
            "url": server.url("/downloads/tukui.zip"),
            "version": "20.37",
            "patch": ["10.1.5"]
        }]));
    });
    let download = server.mock(|when, then| {
        when.path_contains("tukui.zip");
        then.status(500);
    });
    let create = server.mock(|when, then| {
        when.path_contains("/repos/");
        then.status(500);
    });

    let outcomes = world.sync(&RunOptions {
        dry_run: true,
        only: None,
    });

    assert!(matches!(
        &outcomes[..],
        [AddonOutcome::WouldPublish { previous, version, .. }] if previous.is_empty() && version == "20.37"
    ));
    assert_eq!(download.hits(), 0);
    assert_eq!(create.hits(), 0);
    assert!(remote_tags(&remote).is_empty());
}

#[test]
fn current_version_reads_latest_reachable_tag() {
    let root = TempDir::new().expect("root");
    let remote = seed_remote(root.path(), "bagnon");
    let gateway = GitGateway::new(
        root.path().join("repos"),
        format!("file://{}", root.path().join("remotes").display()),
    )
    .with_identity("Mirror Bot", "mirror@example.org");

    let repo = gateway.reset(&Slug::from("bagnon")).expect("clone");
    assert_eq!(gateway.current_version(&repo).expect("untagged"), "");

    fs::write(repo.join("release.json"), "{}\n").expect("write");
    gateway.commit_and_push(&repo, "1.0").expect("publish 1.0");
    fs::write(repo.join("release.json"), "{\"v\":2}\n").expect("write");
    gateway.commit_and_push(&repo, "1.1").expect("publish 1.1");

    let fresh = gateway.reset(&Slug::from("bagnon")).expect("re-clone");
    assert_eq!(fresh, repo);
    assert_eq!(gateway.current_version(&fresh).expect("tagged"), "1.1");
    assert_eq!(remote_tags(&remote), vec!["1.0", "1.1"]);
}

#[test]
fn empty_remote_reads_as_never_mirrored() {
    let root = TempDir::new().expect("root");
    let remotes = root.path().join("remotes");
    fs::create_dir_all(&remotes).expect("remotes");
    git(&remotes, &["init", "--quiet", "--bare", "fresh"]);

    let gateway = GitGateway::new(
        root.path().join("repos"),
        format!("file://{}", remotes.display()),
    );
    let repo = gateway.reset(&Slug::from("fresh")).expect("clone empty");
    assert_eq!(gateway.current_version(&repo).expect("unborn"), "");
}

#[test]
fn reset_discards_local_changes() {
    let root = TempDir::new().expect("root");
    seed_remote(root.path(), "dbm");
    let gateway = GitGateway::new(
        root.path().join("repos"),
        format!("file://{}", root.path().join("remotes").display()),
    );

    let repo = gateway.reset(&Slug::from("dbm")).expect("clone");
    fs::write(repo.join("stray.txt"), "left over").expect("write");

    let repo = gateway.reset(&Slug::from("dbm")).expect("re-clone");
    assert!(!repo.join("stray.txt").exists());
    assert!(repo.join("README.md").exists());
}

fn publish_step(err: SyncError) -> (String, String) {
    match err {
        SyncError::RepoPublishFailed { slug, step, .. } => (slug, step),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn vanished_remote_fails_at_push() {
    let root = TempDir::new().expect("root");
    let remote = seed_remote(root.path(), "weakauras");
    let gateway = GitGateway::new(
        root.path().join("repos"),
        format!("file://{}", root.path().join("remotes").display()),
    )
    .with_identity("Mirror Bot", "mirror@example.org");

    let repo = gateway.reset(&Slug::from("weakauras")).expect("clone");
    fs::remove_dir_all(&remote).expect("remove remote");
    fs::write(repo.join("release.json"), "{}\n").expect("write");

    let err = gateway.commit_and_push(&repo, "5.0").unwrap_err();
    assert!(err.to_string().contains("weakauras"), "got: {err}");
    assert_eq!(publish_step(err), ("weakauras".to_string(), "push".to_string()));
}

#[test]
fn existing_tag_fails_at_tag() {
    let root = TempDir::new().expect("root");
    let remote = seed_remote(root.path(), "details");
    let gateway = GitGateway::new(
        root.path().join("repos"),
        format!("file://{}", root.path().join("remotes").display()),
    )
    .with_identity("Mirror Bot", "mirror@example.org");

    let repo = gateway.reset(&Slug::from("details")).expect("clone");
    fs::write(repo.join("release.json"), "{}\n").expect("write");
    gateway.commit_and_push(&repo, "2.0").expect("first publish");

    let repo = gateway.reset(&Slug::from("details")).expect("re-clone");
    fs::write(repo.join("release.json"), "{\"again\":true}\n").expect("write");
    let err = gateway.commit_and_push(&repo, "2.0").unwrap_err();

    assert_eq!(publish_step(err), ("details".to_string(), "tag".to_string()));
    assert_eq!(remote_tags(&remote), vec!["2.0"]);
}
