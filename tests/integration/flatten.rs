mod common;

use common::Project;
use nsflat::diagnostics::FlattenError;
use nsflat::source::SourceFile;

#[test]
fn same_namespace_reference_is_flattened() {
    let project = Project::new();
    project
        .file(
            "src/Foo/Bar/Baz.php",
            "<?php\nnamespace Foo\\Bar;\n\nclass Baz\n{\n    function make() { return new Qux(); }\n}\n",
        )
        .file("src/Foo/Bar/Qux.php", "<?php\nnamespace Foo\\Bar;\n\nclass Qux {}\n");

    let summary = project.run();
    assert_eq!(summary.files(), 2);
    assert_eq!(project.output_files(), vec!["Foo/Bar/Baz.php", "Foo/Bar/Qux.php"]);

    let baz = project.output("Foo/Bar/Baz.php");
    assert_eq!(baz, "<?php\nclass Foo_Bar_Baz\n{\n    function make() { return new Foo_Bar_Qux(); }\n}\n");
    assert!(!baz.contains("namespace"));
    assert_eq!(project.output("Foo/Bar/Qux.php"), "<?php\nclass Foo_Bar_Qux {}\n");
}

#[test]
fn colliding_imports_get_distinct_aliases() {
    let service = "<?php\nnamespace App;\n\nuse One\\Helper;\nuse Two\\Helper;\n\nclass Service\n{\n    public function run(Helper $a, Two_Helper $b): Helper\n    {\n        return Two_Helper::wrap($a, $b);\n    }\n}\n";

    let file = SourceFile::parse(service).unwrap();
    let aliases: Vec<&str> = file.imports().entries().iter().map(|e| e.alias.as_str()).collect();
    assert_eq!(aliases, vec!["Helper", "Two_Helper"]);

    let project = Project::new();
    project
        .file("src/One/Helper.php", "<?php\nnamespace One;\nclass Helper {}\n")
        .file("src/Two/Helper.php", "<?php\nnamespace Two;\nclass Helper {}\n")
        .file("src/App/Service.php", service);
    project.run();

    let out = project.output("App/Service.php");
    assert!(out.contains("public function run(One_Helper $a, Two_Helper $b): One_Helper\n"), "{out}");
    assert!(out.contains("return Two_Helper::wrap($a, $b);"), "{out}");
    assert!(!out.contains("use "), "{out}");
    assert_eq!(project.output("One/Helper.php"), "<?php\nclass One_Helper {}\n");
    assert_eq!(project.output("Two/Helper.php"), "<?php\nclass Two_Helper {}\n");
}

#[test]
fn docblock_mentions_of_imports_are_flattened() {
    let project = Project::new();
    project.file(
        "src/App/Worker.php",
        "<?php\nnamespace App;\n\nuse Foo\\Bar;\n\nclass Worker\n{\n    /**\n     * @param Bar $x\n     */\n    public function handle($x) {}\n}\n",
    );
    project.run();

    let out = project.output("App/Worker.php");
    assert!(out.contains("\n     * @param Foo_Bar $x\n"), "{out}");
    assert!(!out.contains("@param Bar"), "{out}");
}

#[test]
fn docblocks_see_types_declared_in_other_files() {
    let project = Project::new();
    project
        .file(
            "src/a.php",
            "<?php\nnamespace Shop;\n\nclass Cart\n{\n    /** @var Item[] */\n    private $items;\n\n    /** @return Item|null */\n    public function first() {}\n}\n",
        )
        .file("src/b.php", "<?php\nnamespace Shop;\n\nclass Item {}\n");
    project.run();

    let cart = project.output("Shop/Cart.php");
    assert!(cart.contains("/** @var Shop_Item[] */"), "{cart}");
    assert!(cart.contains("/** @return Shop_Item|null */"), "{cart}");
}

#[test]
fn every_reference_position_is_rewritten() {
    let project = Project::new();
    project.file(
        "src/Http/Client.php",
        "<?php\nnamespace Http;\n\nuse Psr\\Log\\LoggerInterface;\nuse Http\\Exception\\Timeout as TimeoutError;\n\nfinal class Client extends Transport implements \\JsonSerializable, Sender\n{\n    public function __construct(private ?LoggerInterface $logger = null) {}\n\n    public function send(Request|string $request): Response\n    {\n        try {\n            $pipe = Pipe::open();\n            if ($request instanceof Request) {}\n            return new Response();\n        } catch (TimeoutError | \\RuntimeException $e) {\n            throw new Exception\\Failed($e);\n        }\n    }\n}\n",
    );
    project.run();

    let out = project.output("Http/Client.php");
    assert!(out.contains("final class Http_Client extends Http_Transport implements JsonSerializable, Http_Sender\n"), "{out}");
    assert!(out.contains("private ?Psr_Log_LoggerInterface $logger = null"), "{out}");
    assert!(out.contains("send(Http_Request|string $request): Http_Response\n"), "{out}");
    assert!(out.contains("$pipe = Http_Pipe::open();"), "{out}");
    assert!(out.contains("$request instanceof Http_Request"), "{out}");
    assert!(out.contains("return new Http_Response();"), "{out}");
    assert!(out.contains("catch (Http_Exception_Timeout | RuntimeException $e)"), "{out}");
    assert!(out.contains("throw new Http_Exception_Failed($e);"), "{out}");
}

#[test]
fn output_root_is_cleared_first() {
    let project = Project::new();
    project
        .file("lib/Stale/Thing.php", "<?php class Stale_Thing {}")
        .file("src/A.php", "<?php\nnamespace Pkg;\nclass A {}\n");
    project.run();
    assert_eq!(project.output_files(), vec!["Pkg/A.php"]);
}

#[test]
fn non_php_files_are_ignored() {
    let project = Project::new();
    project
        .file("src/README.md", "# not php")
        .file("src/Pkg/A.PHP", "<?php\nnamespace Pkg;\nclass A {}\n")
        .file("src/Pkg/notes.txt", "class Nope {}");
    let summary = project.run();
    assert_eq!(summary.files(), 1);
    assert_eq!(project.output_files(), vec!["Pkg/A.php"]);
}

#[test]
fn config_overrides_rename_and_relocate() {
    let project = Project::new();
    project
        .file(
            "nsflat.json",
            r#"{ "replacements": [ { "match": "/^Vendor_Package_/", "replace": "VP_" } ] }"#,
        )
        .file("src/Client.php", "<?php\nnamespace Vendor\\Package;\nclass Client extends Base {}\n");
    project.run();

    assert_eq!(project.output_files(), vec!["VP/Client.php"]);
    assert_eq!(project.output("VP/Client.php"), "<?php\nclass VP_Client extends VP_Base {}\n");
}

#[test]
fn malformed_config_is_ignored() {
    let project = Project::new();
    project
        .file("nsflat.json", "{ not json")
        .file("src/Client.php", "<?php\nnamespace Vendor\\Package;\nclass Client {}\n");
    project.run();
    assert_eq!(project.output_files(), vec!["Vendor/Package/Client.php"]);
}

#[test]
fn one_bad_file_fails_the_whole_batch() {
    let project = Project::new();
    project
        .file("src/a.php", "<?php\nnamespace Pkg;\nclass A {}\n")
        .file("src/b.php", "<?php\nnamespace Pkg;\nfunction helper() {}\n");

    let err = nsflat::run(&project.options()).unwrap_err();
    match &err {
        FlattenError::InFile { path, .. } => assert!(path.ends_with("b.php"), "{path:?}"),
        other => panic!("expected a per-file error, got {other:?}"),
    }
    assert!(matches!(err.root(), FlattenError::NoPrimaryTypeFound));
    assert!(project.output_files().is_empty());
}

#[test]
fn missing_input_performs_no_io() {
    let project = Project::new();
    let mut options = project.options();
    options.inputs = vec![project.path("src/missing.php")];

    let err = nsflat::run(&options).unwrap_err();
    assert!(matches!(err, FlattenError::MissingInputPath { .. }));
    assert!(!project.path("lib").exists());
}

#[test]
fn output_containing_the_input_is_refused() {
    let project = Project::new();
    project.file("src/Pkg/A.php", "<?php\nnamespace Pkg;\nclass A {}\n");
    let mut options = project.options();
    options.output = project.root().to_path_buf();

    let err = nsflat::run(&options).unwrap_err();
    assert!(matches!(err, FlattenError::OutputDirectoryUnwritable { .. }), "{err:?}");
    assert!(project.path("src/Pkg/A.php").is_file());
}

#[test]
fn flattened_output_flattens_to_itself() {
    let project = Project::new();
    project
        .file(
            "src/Foo/A.php",
            "<?php\nnamespace Foo;\n\nuse Bar\\C;\n\n/** Uses {@see C} */\nclass A extends B\n{\n    /** @return C */\n    public function build(): C { return C::make(); }\n}\n",
        )
        .file("src/Foo/B.php", "<?php\nnamespace Foo;\nabstract class B {}\n");
    project.run();

    let mut again = project.options();
    again.inputs = vec![project.path("lib")];
    again.output = project.path("lib2");
    nsflat::run(&again).unwrap();

    for rel in ["Foo/A.php", "Foo/B.php"] {
        let first = project.output(rel);
        let second = std::fs::read_to_string(project.path("lib2").join(rel)).unwrap();
        assert_eq!(first, second, "{rel}");
    }
}

#[test]
fn single_source_helper() {
    let out = nsflat::flatten_source("<?php\nnamespace A\\B;\ninterface C extends D {}\n").unwrap();
    assert_eq!(out.name, "A_B_C");
    assert_eq!(out.text, "<?php\ninterface A_B_C extends A_B_D {}\n");
}
