//! Session driver tests over on-disk fixtures and in-memory archives.

use std::fs;
use std::path::PathBuf;

use zscript::*;
use zscript_parser::{AstArena, NodeId};

fn fixture(name: &str) -> Archive {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_scripts").join(name);
    Archive::from_dir(&dir).unwrap_or_else(|e| panic!("failed to load {}: {e}", dir.display()))
}

fn session(archives: &ArchiveSet) -> Session<'_, DeclarationCompiler> {
    Session::new(archives, DeclarationCompiler::new(), SessionOptions::default())
}

fn core_with(manifest: &str, scripts: &[(&str, &str)]) -> ArchiveSet {
    let mut core = Archive::new("core").with_lump("zscript.txt", manifest);
    for (name, text) in scripts {
        core.add_lump(*name, *text);
    }
    ArchiveSet::new().with(core)
}

/// A compiler that only records what it was handed.
#[derive(Default)]
struct Recording {
    calls: Vec<(String, usize, bool)>,
}

impl Compiler for Recording {
    fn compile(
        &mut self,
        ast: &AstArena<'_>,
        top: Option<NodeId>,
        parent: Option<&SymbolTable>,
        local: &mut SymbolTable,
        _globals: &mut SymbolTable,
        _diags: &mut Diagnostics,
    ) {
        self.calls
            .push((local.name().to_owned(), ast.list(top).count(), parent.is_some()));
    }
}

// ============================================================================
// Fixtures
// ============================================================================

#[test]
fn core_scripts_parse_and_compile() {
    let archives = ArchiveSet::new().with(fixture("core"));
    let mut session = session(&archives);

    let reports = session.parse_scripts().unwrap();

    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert!(report.manifest.ends_with(":zscript.txt"), "{}", report.manifest);
    assert_eq!(report.entries, 2);
    assert_eq!(report.parsed, 2);
    assert_eq!(report.declarations, 8);
    assert!(report.nodes > 100);
    assert!(report.dump.is_none());

    assert!(session.diagnostics().is_empty(), "{}", session.diagnostics());
    let stats = session.compiler().stats();
    assert_eq!(stats.types, 5);
    assert_eq!(stats.constants, 3);
    assert_eq!(stats.enumerators, 8);
    for name in ["Thinker", "Actor", "EDamageFlags", "EMoveSpeed", "SpawnPoint"] {
        assert!(session.globals().contains(Name::new(name)), "missing {name}");
    }
}

#[test]
fn later_manifests_see_earlier_types() {
    let archives = ArchiveSet::new().with(fixture("core")).with(fixture("mod"));
    let mut session = session(&archives);

    let reports = session.parse_scripts().unwrap();

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[1].declarations, 2);
    assert_eq!(session.diagnostics().error_count(), 0);
    assert!(session.globals().contains(Name::new("Imp")));
    assert_eq!(session.compiler().stats().types, 6);
}

#[test]
fn dump_is_written_per_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let archives = ArchiveSet::new().with(fixture("core"));
    let options = SessionOptions {
        dump_ast: true,
        dump_dir: dir.path().to_path_buf(),
    };
    let mut session = Session::new(&archives, DeclarationCompiler::new(), options);

    let reports = session.parse_scripts().unwrap();

    let path = dir.path().join("zscript.ast");
    assert_eq!(reports[0].dump.as_deref(), Some(path.as_path()));
    let dump = fs::read_to_string(&path).unwrap().to_lowercase();
    assert!(dump.starts_with("(constant-def max_health"), "{dump}");
    assert!(dump.contains("(class thinker"));
    assert!(dump.contains("(func-declarator"));
}

#[test]
fn unwritable_dump_is_only_a_warning() {
    let dir = tempfile::tempdir().unwrap();
    let archives = core_with("a.zs", &[("a.zs", "const A = 1;")]);
    let options = SessionOptions {
        dump_ast: true,
        dump_dir: dir.path().join("missing"),
    };
    let mut session = Session::new(&archives, DeclarationCompiler::new(), options);

    let reports = session.parse_scripts().unwrap();

    assert!(reports[0].dump.is_none());
    assert_eq!(session.diagnostics().error_count(), 0);
    assert_eq!(session.diagnostics().warning_count(), 1);
    let warning = session.diagnostics().warnings().next().unwrap();
    assert!(warning.message.starts_with("Could not write"), "{}", warning.message);
}

#[test]
fn parse_errors_stop_before_compiling() {
    let archives = ArchiveSet::new().with(fixture("broken"));
    let mut session = session(&archives);

    let error = session.parse_scripts().unwrap_err();

    let SessionError::ParseFailed { errors, manifest } = &error else {
        panic!("expected a parse failure, got {error:?}");
    };
    assert!(*errors >= 2);
    assert_eq!(*errors, session.diagnostics().error_count());
    assert!(manifest.ends_with(":zscript.txt"));
    assert_eq!(error.to_string(), format!("{errors} errors while parsing {manifest}"));

    // The scripts after the broken one were still attempted.
    let diags = session.diagnostics();
    assert_eq!(diags.warning_count(), 1);
    let last = diags.iter().last().unwrap();
    assert_eq!(last.kind, DiagnosticKind::Warning);
    assert_eq!(last.message, "Could not find script lump 'zscript/missing.zs'");
    assert_eq!(session.compiler().stats().types, 0);
}

// ============================================================================
// Single scripts
// ============================================================================

#[test]
fn empty_script_builds_nothing() {
    let archives = core_with("empty.zs", &[("empty.zs", "")]);
    let mut session = session(&archives);

    let reports = session.parse_scripts().unwrap();

    assert_eq!(reports[0].parsed, 1);
    assert_eq!(reports[0].declarations, 0);
    assert_eq!(reports[0].nodes, 0);
    assert!(session.diagnostics().is_empty());
}

#[test]
fn invalid_token_is_an_error() {
    let archives = core_with("bad.zs", &[("bad.zs", "const A = 1;\n$ const B = 2;")]);
    let mut session = session(&archives);

    let error = session.parse_scripts().unwrap_err();

    assert!(matches!(error, SessionError::ParseFailed { errors: 1, .. }), "{error:?}");
    let diag = session.diagnostics().errors().next().unwrap();
    assert!(diag.message.starts_with("Unexpected token invalid token."), "{}", diag.message);
    assert_eq!(diag.section.as_deref(), Some("bad.zs"));
    assert_eq!(diag.line, 2);
}

#[test]
fn deeply_nested_expression_fails_cleanly() {
    let source = format!("const A = {}1{};", "(".repeat(5000), ")".repeat(5000));
    let archives = core_with("deep.zs", &[("deep.zs", source.as_str())]);
    let mut session = session(&archives);

    let error = session.parse_scripts().unwrap_err();

    assert!(matches!(error, SessionError::ParseFailed { errors: 1, .. }), "{error:?}");
    let diag = session.diagnostics().errors().next().unwrap();
    assert_eq!(diag.message, "Expression nested too deeply");
    assert_eq!(diag.section.as_deref(), Some("deep.zs"));
}

#[test]
fn second_script_is_parsed_after_an_error() {
    let archives = core_with(
        "a.zs\nb.zs",
        &[("a.zs", "const A = ;"), ("b.zs", "const B = 1;\nstop")],
    );
    let mut session = session(&archives);

    assert!(session.parse_scripts().is_err());

    let sections: Vec<_> = session
        .diagnostics()
        .errors()
        .map(|d| d.section.clone().unwrap_or_default())
        .collect();
    assert_eq!(sections, vec!["a.zs", "b.zs"]);
}

#[test]
fn missing_script_is_only_a_warning() {
    let archives = core_with("nowhere.zs", &[]);
    let mut session = session(&archives);

    let reports = session.parse_scripts().unwrap();

    assert_eq!(reports[0].entries, 1);
    assert_eq!(reports[0].parsed, 0);
    assert_eq!(reports[0].nodes, 0);
    assert_eq!(session.diagnostics().error_count(), 0);
    assert_eq!(session.diagnostics().warning_count(), 1);
}

#[test]
fn empty_manifest_still_compiles() {
    let archives = core_with("// nothing yet\n", &[]);
    let mut recording = Recording::default();
    {
        let mut session = Session::new(&archives, &mut recording, SessionOptions::default());
        let reports = session.parse_scripts().unwrap();
        assert_eq!(reports[0].entries, 0);
    }
    assert_eq!(recording.calls, vec![(LOCAL_TABLE_NAME.to_owned(), 0, false)]);
}

// ============================================================================
// Archives
// ============================================================================

#[test]
fn overriding_a_core_script_is_fatal() {
    let archives = ArchiveSet::new()
        .with(
            Archive::new("A")
                .with_lump("zscript.txt", "ok.zs\nX.zs")
                .with_lump("ok.zs", "const OK = 1;")
                .with_lump("X.zs", "class X { }"),
        )
        .with(Archive::new("B").with_lump("x.zs", "class X { int replaced; }"));
    let mut session = session(&archives);

    let error = session.parse_scripts().unwrap_err();

    assert_eq!(
        error,
        SessionError::CoreLumpOverridden {
            archive: "B".to_owned(),
            lump: "X.zs".to_owned(),
        }
    );
    assert_eq!(error.to_string(), "File B is overriding core lump X.zs.");
    assert!(session.diagnostics().is_empty());
    assert_eq!(session.compiler().stats().types, 0);
}

#[test]
fn mods_may_override_their_own_scripts() {
    let archives = ArchiveSet::new()
        .with(Archive::new("A").with_lump("x.zs", "class X { }"))
        .with(
            Archive::new("B")
                .with_lump("zscript", "x.zs")
                .with_lump("x.zs", "class Y { }"),
        );
    let mut session = session(&archives);

    let reports = session.parse_scripts().unwrap();

    assert_eq!(reports[0].manifest, "B:zscript");
    assert!(session.globals().contains(Name::new("Y")));
    assert!(!session.globals().contains(Name::new("X")));
}

// ============================================================================
// Compile gate
// ============================================================================

#[test]
fn compile_errors_fail_the_manifest() {
    let archives = core_with(
        "a.zs",
        &[("a.zs", "class Lost : Nowhere { }\nenum Hollow { }")],
    );
    let mut session = session(&archives);

    let error = session.parse_scripts().unwrap_err();

    assert_eq!(
        error,
        SessionError::CompileFailed {
            errors: 1,
            warnings: 1,
            manifest: "core:zscript.txt".to_owned(),
        }
    );
    assert_eq!(
        error.to_string(),
        "1 errors, 1 warnings while compiling core:zscript.txt"
    );
}

#[test]
fn compile_warnings_do_not_stop_the_session() {
    let archives = ArchiveSet::new()
        .with(Archive::new("core").with_lump("zscript.txt", "a.zs").with_lump("a.zs", "enum Hollow { }"))
        .with(Archive::new("mod").with_lump("zscript.txt", "b.zs").with_lump("b.zs", "struct Later { }"));
    let mut session = session(&archives);

    let reports = session.parse_scripts().unwrap();

    assert_eq!(reports.len(), 2);
    assert_eq!(session.diagnostics().warning_count(), 1);
    assert!(session.globals().contains(Name::new("Later")));
}
