//! End-to-end tests for the steps and the build.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, SystemTime};

use tempfile::TempDir;

use super::*;
use super::build::build_with;
use crate::config::test_config_at;

fn write(root: &Path, rel: &str, content: impl AsRef<[u8]>) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn pipeline_at(dir: &TempDir, toml: &str) -> Pipeline {
    Pipeline::new(Arc::new(test_config_at(dir.path(), toml)))
}

/// A small project touching every category.
fn scaffold(root: &Path) {
    write(root, "src/assets/sass/style.scss", "@import 'vars';\n.a { color: $c; }\n");
    write(root, "src/assets/sass/_vars.scss", "$c: #336699;\n");
    write(root, "src/assets/js/main.js", "//= lib/util.js\nvar main = util(1);\n");
    write(root, "src/assets/js/lib/util.js", "function util(x) { return x ?? 0; }\n");
    write(root, "src/assets/fonts/body/regular.woff2", b"wOF2 font bytes");
    write(root, "src/assets/images/icons/favicon.ico", b"\0\0\x01\0ico");
    write(
        root,
        "src/assets/images/logo.svg",
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10"><rect width="10" height="10"/></svg>"#,
    );
    write(root, "src/view/layout/base.jinja", "<body>{% block body %}{% endblock %}</body>\n");
    write(
        root,
        "src/view/index.jinja",
        "{% extends \"layout/base.jinja\" %}{% block body %}<h1>Home</h1>{% endblock %}",
    );
}

#[test]
fn test_build_end_to_end() {
    let dir = TempDir::new().unwrap();
    scaffold(dir.path());
    let pipeline = pipeline_at(&dir, "");
    let build_root = pipeline.config().build_dir().to_path_buf();

    let report = build(&pipeline, true).unwrap();
    assert_eq!(report.failures().count(), 0, "{report:?}");

    for rel in [
        "assets/css/style.css",
        "assets/css/style.min.css",
        "assets/js/main.js",
        "assets/js/main.min.js",
        "assets/fonts/body/regular.woff2",
        "assets/img/icons/favicon.ico",
        "assets/img/logo.svg",
        "index.html",
    ] {
        let path = build_root.join(rel);
        assert!(path.is_file(), "missing {rel}");
        assert!(fs::metadata(&path).unwrap().len() > 0, "empty {rel}");
    }

    // Partials and nested templates are inputs, not outputs.
    assert!(!build_root.join("assets/css/_vars.css").exists());
    assert!(!build_root.join("assets/js/lib").exists());
    assert!(!build_root.join("layout").exists());

    let html = fs::read_to_string(build_root.join("index.html")).unwrap();
    assert!(html.contains("<body><h1>Home</h1></body>"));

    let js = fs::read_to_string(build_root.join("assets/js/main.js")).unwrap();
    assert!(js.contains("function util"));
    assert!(!js.contains("??"));
}

#[test]
fn test_styles_outputs() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/assets/sass/style.scss", ".a { .b { margin: 0; } }\n");
    let pipeline = pipeline_at(&dir, "");

    let outputs = pipeline.run_step(Category::Styles).unwrap();
    let css_dir = pipeline.config().spec(Category::Styles).dest.clone();
    assert_eq!(
        outputs.written,
        vec![css_dir.join("style.css"), css_dir.join("style.min.css")]
    );

    let min = fs::read_to_string(css_dir.join("style.min.css")).unwrap();
    assert!(min.contains(".a .b{margin:0}"));
}

#[test]
fn test_styles_min_css_is_stable() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "src/assets/sass/style.scss",
        "/* header */\n.a { color: red; }\n.b { display: flex; }\n",
    );
    let pipeline = pipeline_at(&dir, "");
    let min = pipeline
        .config()
        .spec(Category::Styles)
        .dest
        .join("style.min.css");

    pipeline.run_step(Category::Styles).unwrap();
    let first = fs::read(&min).unwrap();
    pipeline.run_step(Category::Styles).unwrap();
    let second = fs::read(&min).unwrap();

    assert_eq!(first, second);
    assert!(!String::from_utf8(first).unwrap().contains("header"));
}

#[test]
fn test_malformed_source_fails_only_its_step() {
    let dir = TempDir::new().unwrap();
    scaffold(dir.path());
    write(dir.path(), "src/assets/sass/style.scss", ".a { color: red;\n");
    let pipeline = pipeline_at(&dir, "");

    let report = build(&pipeline, true).unwrap();

    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, Category::Styles);
    assert!(failures[0].1.is_transform());
    assert!(!report.has_io_failure());
    assert!(pipeline.config().build_dir().join("index.html").is_file());
}

#[test]
fn test_build_cleans_before_any_step() {
    let dir = TempDir::new().unwrap();
    let config = test_config_at(dir.path(), "");
    let stale = config.build_dir().join("stale.txt");
    write(dir.path(), "build/stale.txt", "old");

    let ran = AtomicUsize::new(0);
    let report = build_with(&config, true, |category| {
        assert!(!stale.exists(), "{category} ran before clean finished");
        ran.fetch_add(1, Ordering::SeqCst);
        Ok(StepOutputs {
            category,
            written: Vec::new(),
        })
    })
    .unwrap();

    assert_eq!(ran.load(Ordering::SeqCst), Category::ALL.len());
    let order: Vec<_> = report.results.iter().map(|(c, _)| *c).collect();
    assert_eq!(order, Category::ALL);
}

#[test]
fn test_build_reports_io_failure() {
    let dir = TempDir::new().unwrap();
    let config = test_config_at(dir.path(), "");

    let report = build_with(&config, true, |category| {
        if category == Category::Fonts {
            Err(StepError::io(Path::new("font.woff2"))(std::io::Error::other(
                "disk full",
            )))
        } else {
            Ok(StepOutputs {
                category,
                written: Vec::new(),
            })
        }
    })
    .unwrap();

    assert!(report.has_io_failure());
    assert_eq!(report.failures().count(), 1);
}

#[test]
fn test_fonts_second_run_copies_only_changes() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/assets/fonts/a.woff", b"a");
    write(dir.path(), "src/assets/fonts/b.woff", b"b");
    let pipeline = pipeline_at(&dir, "");

    let first = pipeline.run_step(Category::Fonts).unwrap();
    assert_eq!(first.written.len(), 2);

    let second = pipeline.run_step(Category::Fonts).unwrap();
    assert!(second.written.is_empty());

    let changed = dir.path().join("src/assets/fonts/b.woff");
    fs::File::options()
        .write(true)
        .open(&changed)
        .unwrap()
        .set_modified(SystemTime::now() + Duration::from_secs(60))
        .unwrap();

    let third = pipeline.run_step(Category::Fonts).unwrap();
    let dest = pipeline.config().spec(Category::Fonts).dest.clone();
    assert_eq!(third.written, vec![dest.join("b.woff")]);
}

#[test]
fn test_images_keep_smaller_and_copy_unknown() {
    let dir = TempDir::new().unwrap();
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 4 4"><circle cx="2" cy="2" r="2"/></svg>"#;
    write(dir.path(), "src/assets/images/dot.svg", svg);
    write(dir.path(), "src/assets/images/favicon.ico", b"\0\0\x01\0raw");
    write(dir.path(), "src/assets/images/notes.txt", "not an image");
    let pipeline = pipeline_at(&dir, "");

    let outputs = pipeline.run_step(Category::Images).unwrap();
    let dest = pipeline.config().spec(Category::Images).dest.clone();

    assert_eq!(outputs.written.len(), 2);
    assert_eq!(fs::read(dest.join("favicon.ico")).unwrap(), b"\0\0\x01\0raw");
    assert!(fs::metadata(dest.join("dot.svg")).unwrap().len() <= svg.len() as u64);
    assert!(!dest.join("notes.txt").exists());
}

#[test]
fn test_svg_with_text_written_intact() {
    let dir = TempDir::new().unwrap();
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 20"><text x="0" y="15">Hello Logo</text><rect width="100" height="2"/></svg>"#;
    let icon = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 20"><rect x="1" y="1" width="98" height="18"/></svg>"#;
    write(dir.path(), "src/assets/images/logo.svg", svg);
    write(dir.path(), "src/assets/images/bar.svg", icon);
    let pipeline = pipeline_at(&dir, "");

    pipeline.run_step(Category::Images).unwrap();
    let dest = pipeline.config().spec(Category::Images).dest.clone();

    assert_eq!(fs::read_to_string(dest.join("logo.svg")).unwrap(), svg);
    let bar = fs::read_to_string(dest.join("bar.svg")).unwrap();
    assert!(bar.contains(r#"viewBox="0 0 100 20""#), "{bar}");
}

#[test]
fn test_hidden_files_are_not_sources() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/assets/fonts/a.woff2", b"font");
    write(dir.path(), "src/assets/fonts/.gitkeep", "");
    write(dir.path(), "src/assets/fonts/.DS_Store", b"finder");
    write(dir.path(), "src/assets/images/.hidden/logo.ico", b"\0\0\x01\0ico");
    let pipeline = pipeline_at(&dir, "");

    let fonts = pipeline.run_step(Category::Fonts).unwrap();
    let dest = pipeline.config().spec(Category::Fonts).dest.clone();
    assert_eq!(fonts.written, vec![dest.join("a.woff2")]);
    assert!(!dest.join(".gitkeep").exists());
    assert!(!dest.join(".DS_Store").exists());

    let images = pipeline.run_step(Category::Images).unwrap();
    assert!(images.written.is_empty());
}

#[test]
fn test_corrupt_image_is_transform_error() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/assets/images/broken.png", b"definitely not a png");
    let pipeline = pipeline_at(&dir, "");

    let err = pipeline.run_step(Category::Images).unwrap_err();
    assert!(err.is_transform());
    assert!(err.to_string().contains("broken.png"));
}

#[test]
fn test_missing_include_is_transform_error() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/assets/js/main.js", "//= missing.js\n");
    let pipeline = pipeline_at(&dir, "");

    let err = pipeline.run_step(Category::Scripts).unwrap_err();
    assert!(err.is_transform());
    assert!(err.to_string().contains("missing.js"));
}

#[test]
fn test_empty_sources_write_nothing() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline_at(&dir, "");

    for category in Category::ALL {
        let outputs = pipeline.run_step(category).unwrap();
        assert!(outputs.written.is_empty(), "{category}");
    }
    assert!(!pipeline.config().build_dir().exists());
}

#[test]
fn test_custom_paths() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "assets/scripts/app.js", "var app = 1;\n");
    let pipeline = pipeline_at(
        &dir,
        "[paths]\nbuild = \"dist\"\n[paths.scripts]\nsrc = [\"assets/scripts/*.js\"]\ndest = \"dist/js\"",
    );

    let outputs = pipeline.run_step(Category::Scripts).unwrap();
    let root = &pipeline.config().root;
    assert_eq!(
        outputs.written,
        vec![root.join("dist/js/app.js"), root.join("dist/js/app.min.js")]
    );
}

#[test]
fn test_views_context_globals() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/view/about.jinja", "<title>{{ site }}</title>\n");
    let pipeline = pipeline_at(&dir, "[views.context]\nsite = \"Kiln\"");

    pipeline.run_step(Category::Views).unwrap();
    let html = fs::read_to_string(pipeline.config().build_dir().join("about.html")).unwrap();
    assert_eq!(html, "<title>Kiln</title>\n");
}

#[test]
fn test_min_path() {
    assert_eq!(
        min_path(Path::new("/b/assets/css/style.css"), "css"),
        Path::new("/b/assets/css/style.min.css")
    );
}
