use semdiff_engine::{
    options::{SyntaxDiffOptions, ToolOptions},
    Comparator, CompareOptions, Coupling, Options, ResultKind,
};
use std::{path::Path, time::Duration};
use tempfile::TempDir;

fn shell(name: &str, script: &str) -> ToolOptions {
    ToolOptions {
        exe: "sh".to_string(),
        flags: vec!["-c".to_string(), script.to_string(), name.to_string()],
    }
}

/// Simplifier reporting `f` and `g` as residual pairs of the given modules.
const SIMPLL: &str = r#"printf '{"first": "%s", "second": "%s", "functions": [[{"fun": "f", "file": "a.c"}, {"fun": "f", "file": "b.c"}], [{"fun": "g", "file": "a.c"}, {"fun": "g", "file": "b.c"}]]}' "$1" "$2""#;

fn options(couplings: &str, translator: &str, solver: &str) -> Options {
    Options {
        timeout_secs: 30,
        verbose: false,
        translator: shell("llreve", translator),
        solver: shell("z3", solver),
        simpll: shell("simpll", SIMPLL),
        couplings: shell("couplings", couplings),
        syntax_diff: SyntaxDiffOptions::default(),
    }
}

fn modules(dir: &TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
    let first = dir.path().join("old.ll");
    let second = dir.path().join("new.ll");
    std::fs::write(&first, "").unwrap();
    std::fs::write(&second, "").unwrap();
    (first, second)
}

#[tokio::test]
async fn test_escalation_through_external_tools() {
    let dir = TempDir::new().unwrap();
    let (first, second) = modules(&dir);
    // The formula is provable only once the couplings with diff 2 are assumed.
    let options = options(
        r#"echo '[{"first": "h", "second": "h", "diff": 0}, {"first": "i", "second": "j", "diff": 2}]'"#,
        r#"for arg in "$@"; do echo "$arg"; done"#,
        r#"if grep -q -- "--couple-functions=i,j"; then echo unsat; else echo unknown; fi"#,
    );
    let result = Comparator::from_options(&options)
        .compare(&first, &second, "main", "main", &CompareOptions::from(&options))
        .await;

    assert_eq!(result.kind, ResultKind::EqualUnderAssumptions);
    assert_eq!(result.children.len(), 2);
    for child in &result.children {
        assert_eq!(child.kind, ResultKind::EqualUnderAssumptions);
        assert_eq!(child.used_assumptions, vec![Coupling::new("i", "j", 2)]);
    }
    assert_eq!(
        result.render(),
        "main: EQUAL_UNDER_ASSUMPTIONS\n\
         \x20 f: EQUAL_UNDER_ASSUMPTIONS\n\
         \x20   Used assumptions:\n\
         \x20     Functions i and j are same\n\
         \x20 g: EQUAL_UNDER_ASSUMPTIONS\n\
         \x20   Used assumptions:\n\
         \x20     Functions i and j are same"
    );
}

#[tokio::test]
async fn test_timeout_of_one_pair() {
    let dir = TempDir::new().unwrap();
    let (first, second) = modules(&dir);
    // Comparing `g` never finishes.
    let options = options(
        "echo '[]'",
        r#"echo "$3""#,
        r#"if grep -q "fun=g"; then exec sleep 30; else echo unsat; fi"#,
    );
    let compare_options = CompareOptions {
        timeout: Duration::from_millis(500),
        ..CompareOptions::default()
    };
    let result = Comparator::from_options(&options)
        .compare(&first, &second, "main", "main", &compare_options)
        .await;

    assert_eq!(result.kind, ResultKind::Timeout);
    let kinds: Vec<ResultKind> = result.children.iter().map(|c| c.kind).collect();
    assert_eq!(kinds, vec![ResultKind::Equal, ResultKind::Timeout]);
}

#[tokio::test]
async fn test_simplifier_failure() {
    let dir = TempDir::new().unwrap();
    let options = Options {
        simpll: shell("simpll", "echo 'cannot parse module' >&2; exit 1"),
        ..options("echo '[]'", "true", "echo unsat")
    };
    let result = Comparator::from_options(&options)
        .compare(
            &dir.path().join("old.ll"),
            Path::new("new.ll"),
            "main",
            "main",
            &CompareOptions::default(),
        )
        .await;
    assert_eq!(result.kind, ResultKind::Error);
    assert!(result.children.is_empty());
}
