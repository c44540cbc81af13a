//! Error recovery, language version gating and cancellation

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use sharpen_core::cst::is_missing;
use sharpen_core::{
    ErrorCode, LanguageVersion, Parse, ParseOptions, Severity, SharpenError, SyntaxKind,
    parse, parse_with_cancellation,
};

fn codes(parse: &Parse) -> Vec<ErrorCode> {
    parse.diagnostics().iter().map(|d| d.code).collect()
}

fn kinds(parse: &Parse) -> Vec<SyntaxKind> {
    parse.syntax().descendants().map(|n| n.kind()).collect()
}

fn missing_kinds(parse: &Parse) -> Vec<SyntaxKind> {
    parse
        .syntax()
        .descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(is_missing)
        .map(|t| t.kind())
        .collect()
}

#[test]
fn test_extension_block_depends_on_language_version() {
    let source = "class C { extension(object o) { } }";

    let latest = parse(source, &ParseOptions::default());
    assert!(kinds(&latest).contains(&SyntaxKind::ExtensionBlockDeclaration));
    assert!(!kinds(&latest).contains(&SyntaxKind::ConstructorDeclaration));
    assert!(!codes(&latest).contains(&ErrorCode::ExtensionKeywordInOlderVersion));

    let older = parse(
        source,
        &ParseOptions::default().with_language_version(LanguageVersion::CSharp13),
    );
    assert!(kinds(&older).contains(&SyntaxKind::ConstructorDeclaration));
    assert!(!kinds(&older).contains(&SyntaxKind::ExtensionBlockDeclaration));
    assert_eq!(codes(&older), [ErrorCode::ExtensionKeywordInOlderVersion]);
    assert_eq!(older.diagnostics()[0].severity, Severity::Warning);
    assert!(!older.has_errors());

    assert_eq!(latest.full_text(), older.full_text());
}

#[test]
fn test_feature_gates_keep_the_tree_shape() {
    let source = "record R(int X);";
    let old = parse(
        source,
        &ParseOptions::default().with_language_version(LanguageVersion::CSharp8),
    );
    let new = parse(source, &ParseOptions::default());
    assert_eq!(kinds(&old), kinds(&new));
    assert_eq!(codes(&old), [ErrorCode::FeatureNotAvailable]);
    assert!(new.diagnostics().is_empty());

    let diagnostic = old
        .diagnostics()
        .iter()
        .find(|d| d.code == ErrorCode::FeatureNotAvailable)
        .unwrap();
    assert_eq!(diagnostic.args[1], "8.0");
    assert_eq!(diagnostic.args[2], "9.0");
}

#[test]
fn test_foreach_deconstruction_is_gated() {
    let csharp6 = ParseOptions::default().with_language_version(LanguageVersion::CSharp6);
    for header in ["(int a, int b)", "var (a, b)"] {
        let source = format!("class C {{ void M() {{ foreach ({header} in e) {{ }} }} }}");

        let old = parse(&source, &csharp6);
        assert!(kinds(&old).contains(&SyntaxKind::ForEachComponentStatement));
        let gate = old
            .diagnostics()
            .iter()
            .find(|d| d.code == ErrorCode::FeatureNotAvailable && d.args[0] == "deconstruction")
            .unwrap_or_else(|| panic!("no deconstruction gate for {header}"));
        let start = source.find(header).unwrap();
        assert_eq!(usize::from(gate.range.start()), start);
        assert_eq!(usize::from(gate.range.end()), start + header.len());

        let new = parse(&source, &ParseOptions::default());
        assert!(new.diagnostics().is_empty(), "{:?}", codes(&new));
        assert_eq!(kinds(&old), kinds(&new));
    }
}

#[test]
fn test_missing_close_brace_is_synthesized() {
    let parse = parse("class C { void M() { x(); }", &ParseOptions::default());
    assert_eq!(codes(&parse), [ErrorCode::CloseBraceExpected]);
    assert_eq!(missing_kinds(&parse), [SyntaxKind::RBrace]);
    assert!(kinds(&parse).contains(&SyntaxKind::MethodDeclaration));
}

#[test]
fn test_missing_semicolons_are_synthesized() {
    let source = "class C { void M() { int a = 1\n int b = 2\n } }";
    let parse = parse(source, &ParseOptions::default());
    assert_eq!(
        codes(&parse),
        [ErrorCode::SemicolonExpected, ErrorCode::SemicolonExpected]
    );
    assert_eq!(
        missing_kinds(&parse),
        [SyntaxKind::Semicolon, SyntaxKind::Semicolon]
    );
    assert_eq!(
        kinds(&parse)
            .iter()
            .filter(|k| **k == SyntaxKind::LocalDeclarationStatement)
            .count(),
        2
    );
}

#[test]
fn test_unexpected_tokens_are_kept_as_skipped_trivia() {
    let source = "class C { void M() { a(); ) ) b(); } }";
    let parse = parse(source, &ParseOptions::default());
    assert_eq!(codes(&parse), [ErrorCode::InvalidExprTerm]);
    let skipped: Vec<_> = parse
        .syntax()
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::SkippedTokensTrivia)
        .map(|n| n.text().to_string())
        .collect();
    assert_eq!(skipped, [") ) "]);
    assert_eq!(parse.full_text(), source);
}

#[test]
fn test_invalid_member_tokens_are_skipped() {
    let parse = parse("class C { 42 int x; }", &ParseOptions::default());
    assert_eq!(codes(&parse), [ErrorCode::InvalidMemberDecl]);
    assert!(kinds(&parse).contains(&SyntaxKind::FieldDeclaration));
}

#[test]
fn test_top_level_statement_after_type() {
    let parse = parse("class C { }\nx();\ny();\n", &ParseOptions::default());
    assert_eq!(codes(&parse), [ErrorCode::TopLevelStatementAfterNamespaceOrType]);
    assert_eq!(
        kinds(&parse)
            .iter()
            .filter(|k| **k == SyntaxKind::GlobalStatement)
            .count(),
        2
    );
}

#[test]
fn test_script_allows_statements_anywhere() {
    let parse = parse("class C { }\nx();\n", &ParseOptions::script());
    assert!(parse.diagnostics().is_empty());
}

#[test]
fn test_stray_close_brace_at_top_level() {
    let parse = parse("class C { } }", &ParseOptions::default());
    assert_eq!(codes(&parse), [ErrorCode::EofExpected]);
    assert_eq!(parse.full_text(), "class C { } }");
}

#[test]
fn test_unterminated_comment_is_reported_and_kept() {
    let source = "class C { } /* never closed";
    let parse = parse(source, &ParseOptions::default());
    assert!(parse.has_errors());
    assert_eq!(parse.full_text(), source);
    let last = parse.syntax().last_token().unwrap();
    assert_eq!(last.kind(), SyntaxKind::EndOfFile);
}

#[test]
fn test_deep_nesting_reports_insufficient_stack_once() {
    let handle = std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(|| {
            let source = format!("x = {}1{};", "(".repeat(400), ")".repeat(400));
            let parse = parse(&source, &ParseOptions::default());
            let reported = codes(&parse)
                .into_iter()
                .filter(|c| *c == ErrorCode::InsufficientStack)
                .count();
            (reported, parse.full_text() == source)
        })
        .unwrap();
    assert_eq!(handle.join().unwrap(), (1, true));
}

#[test]
fn test_cancellation_flag_stops_the_parse() {
    let flag = AtomicBool::new(true);
    let result = parse_with_cancellation("a(); b();", &ParseOptions::default(), &flag);
    assert!(matches!(result, Err(SharpenError::Cancelled)));
}

#[test]
fn test_cancellation_is_polled_during_the_parse() {
    let polls = AtomicUsize::new(0);
    let check = || polls.fetch_add(1, Ordering::Relaxed) >= 3;
    let source = "class C { void A() { } void B() { } void C2() { } void D() { } }";
    let result = parse_with_cancellation(source, &ParseOptions::default(), &check);
    assert!(matches!(result, Err(SharpenError::Cancelled)));
}

#[test]
fn test_uncancelled_parse_matches_plain_parse() {
    let source = "class C { void M() { } }";
    let flag = AtomicBool::new(false);
    let cancellable = parse_with_cancellation(source, &ParseOptions::default(), &flag).unwrap();
    assert_eq!(cancellable, parse(source, &ParseOptions::default()));
}
