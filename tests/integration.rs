use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_classdoc")))
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

const WIDGET: &str = r#"<?php
namespace Acme;

/**
 * A widget.
 *
 * @example examples/basic.txt Basic use
 */
class Widget
{
    const SIZE = 10;

    /** @var int Current width */
    public $width = 0;

    /**
     * Resize the widget.
     *
     * @param int $width New width
     * @param int $height New height
     * @return bool Whether anything changed
     */
    public function resize(int $width, int $height = 0): bool
    {
        return true;
    }

    /** Internal bookkeeping. */
    private function secret()
    {
    }
}
"#;

/// Project with a single documented class and one example root.
fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/Acme/Widget.php", WIDGET);
    write(dir.path(), "docs/examples/basic.txt", "$w = new Widget();\n");
    dir
}

fn generate(dir: &Path, extra: &[&str]) -> assert_cmd::assert::Assert {
    cmd()
        .arg("-p")
        .arg(dir)
        .args(["-o", "out", "-s", "src", "-e", "docs"])
        .args(extra)
        .current_dir(dir)
        .assert()
}

// -- markdown --

#[test]
fn documents_class_with_example() {
    let dir = project();
    generate(dir.path(), &[]).success();

    let page = read(dir.path(), "out/acme.widget.class.md");
    assert!(page.starts_with("# Acme\\Widget\n\n"));
    assert!(page.contains("A widget."));
    assert!(page.contains("**Example #1 Basic use**"));
    assert!(page.contains("```php\n$w = new Widget();\n```"));
    assert!(page.contains("Location: ~/docs/examples/basic.txt"));
    assert!(page.contains("Location: ~/src/Acme/Widget.php"));
    assert!(page.contains("[back to index](index.md)"));

    let index = read(dir.path(), "out/index.md");
    assert!(index.starts_with("## Classes\n\n"));
    assert!(index.contains("### [Acme\\Widget](acme.widget.class.md)"));
}

#[test]
fn single_line_comment_carries_inline_tags() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "src/Widget.php",
        "<?php\nnamespace Acme;\n/** A widget. @example examples/basic.txt Basic use */\nclass Widget {}\n",
    );
    write(dir.path(), "ex/examples/basic.txt", "$w = new Widget();");
    cmd()
        .arg("-p")
        .arg(dir.path())
        .current_dir(dir.path())
        .args(["-o", "out", "-s", "src", "-e", "ex"])
        .assert()
        .success();

    let page = read(dir.path(), "out/acme.widget.class.md");
    assert!(page.contains("A widget.\n\n"));
    assert!(page.contains("## Examples"));
    assert!(page.contains("**Example #1 Basic use**"));
    assert!(page.contains("$w = new Widget();"));
    assert!(read(dir.path(), "out/index.md").contains("(acme.widget.class.md)"));
}

#[test]
fn public_methods_get_their_own_page() {
    let dir = project();
    generate(dir.path(), &[]).success();

    let page = read(dir.path(), "out/acme.widget.class.md");
    assert!(page.contains("[resize](acme.widget.resize.method.md)"));

    let method = read(dir.path(), "out/acme.widget.resize.method.md");
    assert!(method.starts_with("# Acme\\Widget::resize\n\n"));
    assert!(method.contains("Resize the widget."));
    assert!(method.contains("## Parameters"));
    assert!(method.contains("New height"));
    assert!(method.contains("## Returns"));
    assert!(method.contains("Whether anything changed"));
}

#[test]
fn private_members_hidden_by_default() {
    let dir = project();
    generate(dir.path(), &[]).success();

    let page = read(dir.path(), "out/acme.widget.class.md");
    assert!(!page.contains("secret"));
    assert!(!dir.path().join("out/acme.widget.secret.method.md").exists());
}

#[test]
fn show_private_lists_private_members() {
    let dir = project();
    generate(dir.path(), &["--show-private"]).success();

    let page = read(dir.path(), "out/acme.widget.class.md");
    assert!(page.contains("secret"));
    assert!(dir.path().join("out/acme.widget.secret.method.md").exists());
}

#[test]
fn show_protected_lists_protected_members() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "src/Engine.php",
        "<?php\n/** An engine. */\nclass Engine\n{\n    /** Warm up. */\n    protected function warmUp() {}\n}\n",
    );
    let run = |extra: &[&str]| {
        cmd()
            .arg("-p")
            .arg(dir.path())
            .current_dir(dir.path())
            .args(["-o", "out", "-s", "src"])
            .args(extra)
            .assert()
            .success();
    };

    run(&[]);
    assert!(!read(dir.path(), "out/engine.class.md").contains("warmUp"));
    assert!(!dir.path().join("out/engine.warmup.method.md").exists());

    run(&["--show-protected"]);
    let page = read(dir.path(), "out/engine.class.md");
    assert!(page.contains("protected"));
    assert!(page.contains("[warmUp](engine.warmup.method.md)"));
    assert!(dir.path().join("out/engine.warmup.method.md").exists());
}

#[test]
fn internal_types_get_no_page() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "src/Acme/Secret.php",
        "<?php\nnamespace Acme;\n/**\n * Plumbing.\n * @internal\n */\nclass Secret\n{\n    public function run() {}\n}\n",
    );
    write(
        dir.path(),
        "src/Acme/Open.php",
        "<?php\nnamespace Acme;\n/** Public face. */\nclass Open extends Secret {}\n",
    );
    cmd()
        .arg("-p")
        .arg(dir.path())
        .current_dir(dir.path())
        .args(["-o", "out", "-s", "src"])
        .assert()
        .success();

    assert!(!dir.path().join("out/acme.secret.class.md").exists());
    assert!(!dir.path().join("out/acme.secret.run.method.md").exists());
    let index = read(dir.path(), "out/index.md");
    assert!(index.contains("acme.open.class.md"));
    assert!(!index.contains("Secret"));
    assert!(!read(dir.path(), "out/acme.open.class.md").contains("acme.secret.class.md"));
}

#[test]
fn inherited_constants_and_case_distinct_properties() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "src/A.php",
        "<?php\n/** Base. */\nclass A\n{\n    const MAX = 1;\n    public $Name;\n}\n",
    );
    write(
        dir.path(),
        "src/B.php",
        "<?php\n/** Child. */\nclass B extends A\n{\n    public $name;\n}\n",
    );
    cmd()
        .arg("-p")
        .arg(dir.path())
        .current_dir(dir.path())
        .args(["-o", "out", "-s", "src"])
        .assert()
        .success();

    let page = read(dir.path(), "out/b.class.md");
    assert!(page.contains("##### const int MAX = 1"));
    assert!(page.contains("Inherited from [A](a.class.md)"));
    assert!(page.contains("##### public $name"));
    assert!(page.contains("##### public $Name"));
}

#[test]
fn unresolved_see_renders_as_text() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "src/Gadget.php",
        "<?php\n/**\n * A gadget.\n * @see OtherType::doThing() Does the thing\n */\nclass Gadget {}\n",
    );
    cmd()
        .arg("-p")
        .arg(dir.path())
        .current_dir(dir.path())
        .args(["-o", "out", "-s", "src"])
        .assert()
        .success();

    let page = read(dir.path(), "out/gadget.class.md");
    assert!(page.contains("## See also"));
    assert!(page.contains("##### OtherType::doThing()"));
    assert!(page.contains("Does the thing"));
    assert!(!page.contains("](othertype"));
}

#[test]
fn inherited_members_link_to_parent() {
    let dir = project();
    write(
        dir.path(),
        "src/Acme/Button.php",
        "<?php\nnamespace Acme;\n/** A button. */\nclass Button extends Widget\n{\n    public function press() {}\n}\n",
    );
    generate(dir.path(), &[]).success();

    let page = read(dir.path(), "out/acme.button.class.md");
    assert!(page.contains("[Acme\\Widget](acme.widget.class.md)"));
    assert!(page.contains("Inherited from [Acme\\Widget](acme.widget.class.md)"));
    assert!(page.contains("[resize](acme.widget.resize.method.md)"));
    assert!(!dir.path().join("out/acme.button.resize.method.md").exists());

    let index = read(dir.path(), "out/index.md");
    let button = index.find("acme.button.class.md").unwrap();
    let widget = index.find("acme.widget.class.md").unwrap();
    assert!(button < widget);
}

#[test]
fn library_types_resolve_but_are_not_documented() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "vendor/Lib/Base.php",
        "<?php\nnamespace Lib;\nclass Base\n{\n    /** Say hello. */\n    public function hello() {}\n}\n",
    );
    write(
        dir.path(),
        "src/App.php",
        "<?php\nuse Lib\\Base;\n/** The app. */\nclass App extends Base {}\n",
    );
    cmd()
        .arg("-p")
        .arg(dir.path())
        .current_dir(dir.path())
        .args(["-o", "out", "-s", "src", "-l", "vendor"])
        .assert()
        .success();

    let page = read(dir.path(), "out/app.class.md");
    assert!(page.contains("Lib\\Base"));
    assert!(page.contains("hello"));
    assert!(!dir.path().join("out/lib.base.class.md").exists());
}

#[test]
fn rerun_produces_identical_output() {
    let dir = project();
    generate(dir.path(), &[]).success();
    let first = read(dir.path(), "out/acme.widget.class.md");
    let first_index = read(dir.path(), "out/index.md");

    generate(dir.path(), &[]).success();
    assert_eq!(read(dir.path(), "out/acme.widget.class.md"), first);
    assert_eq!(read(dir.path(), "out/index.md"), first_index);
}

// -- output formats --

#[test]
fn html_format() {
    let dir = project();
    generate(dir.path(), &["-f", "html"]).success();

    let page = read(dir.path(), "out/acme.widget.class.html");
    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains("<a href=\"acme.widget.resize.method.html\">resize</a>"));
    assert!(page.contains("$w = new Widget();"));
    assert!(dir.path().join("out/index.html").exists());
    assert!(!dir.path().join("out/index.md").exists());
}

#[test]
fn invalid_format_fails() {
    let dir = project();
    generate(dir.path(), &["-f", "json"])
        .failure()
        .stderr(predicate::str::contains("unknown format: json"));
    assert!(!dir.path().join("out").exists());
}

// -- configuration errors --

#[test]
fn missing_source_root_fails_before_writing() {
    let dir = project();
    cmd()
        .arg("-p")
        .arg(dir.path())
        .current_dir(dir.path())
        .args(["-o", "out", "-s", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("source root not found"));
    assert!(!dir.path().join("out/index.md").exists());
}

#[test]
fn missing_example_root_fails() {
    let dir = project();
    cmd()
        .arg("-p")
        .arg(dir.path())
        .current_dir(dir.path())
        .args(["-o", "out", "-s", "src", "-e", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("examples root not found"));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn source_is_required() {
    cmd()
        .args(["-o", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--source"));
}
