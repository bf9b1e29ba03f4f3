use apppack::container::{ContainerReference, MAX_TAG_LEN, image_tag};
use apppack::entrypoint::Entrypoint;
use apppack::error::AppPackError;
use apppack::repo::{GitRepository, IdentityOverrides, RepoIdentity, parse_remote_url};
use std::path::{Path, PathBuf};

#[test]
fn test_parse_remote_urls() {
    assert_eq!(
        parse_remote_url("https://github.com/unity-sds/sample-algorithm.git"),
        Some((Some("unity-sds".to_string()), "sample-algorithm".to_string()))
    );
    assert_eq!(
        parse_remote_url("git@github.com:unity-sds/sample-algorithm.git"),
        Some((Some("unity-sds".to_string()), "sample-algorithm".to_string()))
    );
    assert_eq!(
        parse_remote_url("https://gitlab.example.org/group/sub/project/"),
        Some((Some("sub".to_string()), "project".to_string()))
    );
    assert_eq!(
        parse_remote_url("https://example.org/solo"),
        Some((None, "solo".to_string()))
    );
    assert_eq!(parse_remote_url(""), None);
}

#[test]
fn test_process_id_owner_optional() {
    let mut identity = RepoIdentity {
        owner: Some("unity-sds".to_string()),
        name: "sample".to_string(),
        commit_short_id: "abc1234".to_string(),
        commit_message: "msg".to_string(),
    };
    assert_eq!(identity.process_id(), "unity-sds.sample.abc1234");
    identity.owner = None;
    assert_eq!(identity.process_id(), "sample.abc1234");
    identity.owner = Some(String::new());
    assert_eq!(identity.process_id(), "sample.abc1234");
}

#[test]
fn test_container_reference_parts() {
    let reference: ContainerReference = "ghcr.io/unity-sds/algorithms:v1".parse().unwrap();
    assert_eq!(reference.namespace.as_deref(), Some("ghcr.io/unity-sds"));
    assert_eq!(reference.repository, "algorithms");
    assert_eq!(reference.tag.as_deref(), Some("v1"));
    assert_eq!(reference.to_string(), "ghcr.io/unity-sds/algorithms:v1");

    let with_port: ContainerReference = "localhost:5000/algorithms".parse().unwrap();
    assert_eq!(with_port.namespace.as_deref(), Some("localhost:5000"));
    assert_eq!(with_port.repository, "algorithms");
    assert_eq!(with_port.tag, None);

    let bare: ContainerReference = "algorithms".parse().unwrap();
    assert_eq!(bare, ContainerReference::new(None, "algorithms", None));

    assert!(matches!(
        "".parse::<ContainerReference>(),
        Err(AppPackError::Config(_))
    ));
    assert!("registry/:tag".parse::<ContainerReference>().is_err());
}

#[test]
fn test_image_tag_rules() {
    assert_eq!(
        image_tag(Some("Unity-SDS"), "Sample", "Main"),
        "unity-sds.sample.main"
    );
    assert_eq!(image_tag(None, "sample", "abc1234"), "sample.abc1234");
    assert_eq!(image_tag(Some("owner"), "", "v1"), "owner.v1");

    let long_name = "x".repeat(200);
    let tag = image_tag(Some("owner"), &long_name, "main");
    assert_eq!(tag.len(), MAX_TAG_LEN);
    assert!(tag.starts_with("owner.xxx"));
}

#[test]
fn test_entrypoint_classification() {
    assert_eq!(
        Entrypoint::classify(Path::new("process.ipynb")).unwrap(),
        Entrypoint::Notebook(PathBuf::from("process.ipynb"))
    );
    assert_eq!(
        Entrypoint::classify(Path::new("bin/run.sh")).unwrap(),
        Entrypoint::Script(PathBuf::from("bin/run.sh"))
    );
    assert!(matches!(
        Entrypoint::classify(Path::new("main.py")),
        Err(AppPackError::UnsupportedEntrypoint(_))
    ));
}

#[test]
fn test_entrypoint_resolution() {
    let repo = tempfile::tempdir().expect("Failed to create temp dir");
    std::fs::write(repo.path().join("run.sh"), "#!/bin/sh\n").unwrap();
    std::fs::write(repo.path().join("main.py"), "print()\n").unwrap();

    assert_eq!(
        Entrypoint::resolve(repo.path(), Some(Path::new("run.sh"))).unwrap(),
        Entrypoint::Script(PathBuf::from("run.sh"))
    );
    assert_eq!(
        Entrypoint::resolve(repo.path(), None).unwrap(),
        Entrypoint::Notebook(PathBuf::from("process.ipynb"))
    );
    assert!(matches!(
        Entrypoint::resolve(repo.path(), Some(Path::new("main.py"))),
        Err(AppPackError::UnsupportedEntrypoint(_))
    ));
}

fn full_overrides(owner: Option<&str>) -> IdentityOverrides {
    IdentityOverrides {
        owner: owner.map(String::from),
        name: Some("sample".to_string()),
        commit_short_id: Some("abc1234".to_string()),
        commit_message: Some("Add resolution sweep".to_string()),
    }
}

#[test]
fn test_complete_overrides_keep_remote_owner() {
    let identity = full_overrides(None)
        .without_checkout(Some("git@github.com:unity-sds/sample.git"))
        .expect("complete overrides");
    assert_eq!(identity.owner.as_deref(), Some("unity-sds"));
    assert_eq!(identity.process_id(), "unity-sds.sample.abc1234");

    let identity = full_overrides(Some("jpl"))
        .without_checkout(Some("https://github.com/unity-sds/sample"))
        .unwrap();
    assert_eq!(identity.process_id(), "jpl.sample.abc1234");

    let identity = full_overrides(None).without_checkout(None).unwrap();
    assert_eq!(identity.process_id(), "sample.abc1234");
}

#[test]
fn test_partial_overrides_need_checkout() {
    let overrides = IdentityOverrides {
        name: Some("renamed".to_string()),
        ..IdentityOverrides::default()
    };
    assert!(overrides.without_checkout(Some("https://github.com/o/n")).is_none());

    let read = RepoIdentity {
        owner: Some("unity-sds".to_string()),
        name: "sample".to_string(),
        commit_short_id: "abc1234".to_string(),
        commit_message: "msg".to_string(),
    };
    let merged = overrides.apply(read);
    assert_eq!(merged.process_id(), "unity-sds.renamed.abc1234");
    assert_eq!(merged.commit_message, "msg");
}

#[test]
fn test_resolve_identity_outside_a_checkout() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let repo = GitRepository::open(dir.path());
    let identity = repo
        .resolve_identity(&full_overrides(Some("unity-sds")))
        .expect("no git facts are needed");
    assert_eq!(identity.process_id(), "unity-sds.sample.abc1234");
    assert_eq!(repo.directory(), dir.path());
}
