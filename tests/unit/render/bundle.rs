use super::*;

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("reelcap-bundle-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn missing_entry_point_is_a_bundle_error() {
    let dir = scratch("missing");
    let err = AssetBundler {
        system_fonts: false,
    }
    .bundle(&dir.join("nope"), &dir.join("build"))
    .unwrap_err();
    assert!(matches!(err, CaptionError::Bundle(_)), "{err}");
}

#[test]
fn entry_point_without_public_dir_is_rejected() {
    let dir = scratch("nopublic");
    std::fs::create_dir_all(&dir).unwrap();
    let err = AssetBundler {
        system_fonts: false,
    }
    .bundle(&dir, &dir.join("build"))
    .unwrap_err();
    assert!(matches!(err, CaptionError::Bundle(_)));
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn bundle_writes_manifest_and_resolves_public_files() {
    let dir = scratch("ok");
    std::fs::create_dir_all(dir.join("public")).unwrap();
    let out = dir.join("build");

    let serve = AssetBundler {
        system_fonts: false,
    }
    .bundle(&dir, &out)
    .unwrap();

    assert_eq!(serve.bundle_dir(), out.as_path());
    assert_eq!(
        serve.resolve_static("clip.mp4").unwrap(),
        dir.join("public").join("clip.mp4")
    );

    let manifest: BundleManifest =
        serde_json::from_slice(&std::fs::read(out.join(MANIFEST_FILE)).unwrap()).unwrap();
    assert_eq!(manifest.compositions, vec!["CaptionedVideo".to_string()]);
    assert_eq!(manifest.styles.len(), 4);
    assert_eq!(manifest.font_faces, 0);

    std::fs::remove_dir_all(&dir).unwrap();
}
