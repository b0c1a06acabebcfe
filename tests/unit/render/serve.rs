use super::*;

#[test]
fn normalize_rel_path_cleans_separators_and_dots() {
    assert_eq!(normalize_rel_path("clip.mp4").unwrap(), "clip.mp4");
    assert_eq!(normalize_rel_path("./a//b\\c.mp4").unwrap(), "a/b/c.mp4");
}

#[test]
fn normalize_rel_path_rejects_escapes() {
    for bad in ["", "/etc/passwd", "../secret.mp4", "a/../../b.mp4", "./", "\\root.mp4"] {
        let err = normalize_rel_path(bad).unwrap_err();
        assert!(err.is_validation(), "{bad}: {err}");
    }
}

#[test]
fn static_files_resolve_under_public_dir() {
    let serve = ServeLocation::new(
        "build",
        "project/public",
        Arc::new(usvg::fontdb::Database::new()),
    );
    assert_eq!(
        serve.resolve_static("./videos/clip.mp4").unwrap(),
        PathBuf::from("project/public/videos/clip.mp4")
    );
    assert!(serve.resolve_static("../clip.mp4").is_err());
    assert_eq!(serve.bundle_dir(), Path::new("build"));
}
