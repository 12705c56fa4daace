mod common;

use common::{Project, nsflat};

#[test]
fn process_writes_flattened_tree() {
    let project = Project::new();
    project
        .file("src/Acme/Widget.php", "<?php\nnamespace Acme;\n\nclass Widget extends Base {}\n")
        .file("src/Acme/Base.php", "<?php\nnamespace Acme;\n\nabstract class Base {}\n");

    let output = nsflat()
        .current_dir(project.root())
        .args(["process", "src", "--output", "lib"])
        .output()
        .unwrap();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "nsflat failed: {stderr}");
    assert!(stderr.contains("flattened 2 file(s) into lib"), "{stderr}");
    assert_eq!(project.output_files(), vec!["Acme/Base.php", "Acme/Widget.php"]);
    assert_eq!(project.output("Acme/Widget.php"), "<?php\nclass Acme_Widget extends Acme_Base {}\n");
}

#[test]
fn default_output_is_lib() {
    let project = Project::new();
    project.file("src/A.php", "<?php\nnamespace Pkg;\nclass A {}\n");

    let output = nsflat().current_dir(project.root()).args(["process", "src/A.php"]).output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(project.output_files(), vec!["Pkg/A.php"]);
}

#[test]
fn missing_path_is_one_error_line() {
    let project = Project::new();

    let output = nsflat()
        .current_dir(project.root())
        .args(["process", "nowhere", "--output", "lib"])
        .env("NO_COLOR", "1")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<&str> = stderr.lines().collect();
    assert_eq!(lines.len(), 1, "{stderr}");
    assert!(lines[0].contains("error:"), "{stderr}");
    assert!(lines[0].contains("input path does not exist: nowhere"), "{stderr}");
    assert!(!project.path("lib").exists());
}

#[test]
fn output_inside_input_is_refused_before_clearing() {
    let project = Project::new();
    project.file("lib/Pkg/A.php", "<?php\nnamespace Pkg;\nclass A {}\n");

    let output = nsflat()
        .current_dir(project.root())
        .args(["process", "lib"])
        .env("NO_COLOR", "1")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot prepare output directory lib"), "{stderr}");
    assert!(stderr.contains("overlaps input path lib"), "{stderr}");
    assert_eq!(std::fs::read_to_string(project.path("lib/Pkg/A.php")).unwrap(), "<?php\nnamespace Pkg;\nclass A {}\n");
}

#[test]
fn per_file_failure_exits_nonzero_and_names_the_file() {
    let project = Project::new();
    project.file("src/broken.php", "<?php\nnamespace 42;\nclass A {}\n");

    let output = nsflat()
        .current_dir(project.root())
        .args(["process", "src"])
        .env("NO_COLOR", "1")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("broken.php"), "{stderr}");
    assert!(stderr.contains("unresolvable namespace"), "{stderr}");
    assert!(project.output_files().is_empty());
}

#[test]
fn quiet_suppresses_progress_logging() {
    let project = Project::new();
    project.file("src/A.php", "<?php\nnamespace Pkg;\nclass A {}\n");

    let output = nsflat()
        .current_dir(project.root())
        .args(["process", "src", "-q"])
        .env_remove("NSFLAT_LOG")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("INFO"), "{stderr}");
    assert!(stderr.contains("flattened 1 file(s)"), "{stderr}");
}

#[test]
fn subcommand_is_required() {
    let output = nsflat().output().unwrap();
    assert!(!output.status.success());
}
