//! Whole-parser properties that hold for every input
//!
//! - the tree text is the input, byte for byte
//! - parsing never panics and always ends in an end-of-file token
//! - the same input and options give the same tree and diagnostics

use sharpen_core::{LanguageVersion, ParseOptions, SyntaxKind, parse};

fn all_options() -> Vec<ParseOptions> {
    let versions = [
        LanguageVersion::CSharp1,
        LanguageVersion::CSharp7_3,
        LanguageVersion::CSharp9,
        LanguageVersion::CSharp13,
        LanguageVersion::LATEST,
        LanguageVersion::Preview,
    ];
    versions
        .into_iter()
        .flat_map(|v| {
            [
                ParseOptions::default().with_language_version(v),
                ParseOptions::script().with_language_version(v),
            ]
        })
        .collect()
}

const SAMPLES: &[&str] = &[
    "",
    " ",
    "\n\r\n",
    "/*",
    "/* unterminated",
    "//",
    "\"",
    "'",
    "@\"",
    "$\"{",
    "\"\"\"",
    "}",
    ")",
    "]",
    ">",
    ">>>=",
    "#",
    "#if DEBUG\nclass C {}\n#endif",
    "@",
    "\u{0}",
    "\u{feff}class C {}",
    "class",
    "class C",
    "class C {",
    "namespace",
    "namespace N;",
    "using",
    "using static",
    "global using X = Y;",
    "static class E { extension(object o) { void M() { } } }",
    "class C { extension(object o) { } }",
    "(x, y)? = M();",
    "((Int32 a, Int64 b), Int32 c) = foo;",
    "var (a, b) = foo;",
    "(x).ToString();",
    "U<T<S>>> 2;",
    "ImmutableDictionary<string, IImmutableDictionary<X, Y>> d;",
    "void M( { x = ; } ) ]",
    "if (x) else { } while",
    "switch (x) { case 1 when y: break; default }",
    "x = y switch { > 0 and < 10 => 1, _ => 2 };",
    "var f = async (a, b) => { await a; };",
    "int[] a = new int[3] { 1, 2, 3 };",
    "a ??= b ?? c?.d?[e]!;",
    "try { } catch (E e) when (e != null) { } finally { }",
    "foreach (var (k, v) in d) { }",
    "record R(int X) : B(X);",
    "[assembly: A] class C { [B] int P { get; init; } }",
    "unsafe { int* p = &x; fixed (byte* b = a) { } }",
    "class C { public static C operator +(C a, C b) => a; }",
    "x = $\"{a:N2} and {b}\";",
    "goto case 1; yield return 2; label: ;",
];

#[test]
fn test_round_trip_for_samples_under_all_options() {
    for options in all_options() {
        for source in SAMPLES {
            let parse = parse(source, &options);
            assert_eq!(parse.full_text(), *source, "options: {options:?}");
        }
    }
}

#[test]
fn test_tree_ends_in_end_of_file() {
    for options in all_options() {
        for source in SAMPLES {
            let root = parse(source, &options).syntax();
            assert_eq!(root.kind(), SyntaxKind::CompilationUnit);
            let last = root.last_token().unwrap();
            assert_eq!(last.kind(), SyntaxKind::EndOfFile, "source: {source:?}");
        }
    }
}

/// Every way of cutting a valid program short
#[test]
fn test_round_trip_for_every_prefix() {
    let program = r#"using System;
namespace Demo;

public static class Extensions
{
    extension<T>(IEnumerable<T> source) where T : class
    {
        public bool IsEmpty => !source.Any();
    }
}

public record Point(int X, int Y)
{
    public double Length() => Math.Sqrt(X * X + Y * Y);
}

class Program
{
    static async Task<int> Main(string[] args)
    {
        var (a, b) = (1, 2);
        (int x, var (y, z)) = (a, (b, 3));
        List<List<int>> nested = new() { new List<int> { x >> 1, y >>> 2 } };
        foreach (var item in nested) { if (item is { Count: > 0 } list) { Console.WriteLine(list[0]); } }
        return args.Length switch { 0 => 1, _ => 0 };
    }
}
"#;
    let options = ParseOptions::default();
    for (end, _) in program.char_indices() {
        let prefix = &program[..end];
        assert_eq!(parse(prefix, &options).full_text(), prefix);
    }
    assert_eq!(parse(program, &options).full_text(), program);
}

/// Deterministic byte soup from a fixed alphabet of C# punctuation and words
#[test]
fn test_round_trip_for_generated_noise() {
    let alphabet = [
        "(", ")", "{", "}", "[", "]", "<", ">", ",", ";", ":", "?", "=", "=>", ".", "!", "*",
        "&", "x", "int", "var", "class", "case", "is", "new", "\"s\"", "1", " ", "\n", "//c\n",
        "/*", "*/", "#", "extension", "async", "await", "record", "where", "this",
    ];
    let mut seed: u64 = 0x5eed;
    let mut next = || {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (seed >> 33) as usize
    };
    for _ in 0..300 {
        let len = next() % 40;
        let source: String = (0..len).map(|_| alphabet[next() % alphabet.len()]).collect();
        for options in [ParseOptions::default(), ParseOptions::script()] {
            let parse = parse(&source, &options);
            assert_eq!(parse.full_text(), source);
        }
    }
}

#[test]
fn test_parse_is_deterministic() {
    for options in all_options() {
        for source in SAMPLES {
            let first = parse(source, &options);
            let second = parse(source, &options);
            assert_eq!(first, second);
            assert_eq!(first.debug_tree(), second.debug_tree());
        }
    }
}

#[test]
fn test_diagnostics_are_sorted_and_in_bounds() {
    for source in SAMPLES {
        let parse = parse(source, &ParseOptions::default());
        let starts: Vec<_> = parse.diagnostics().iter().map(|d| d.range.start()).collect();
        let mut sorted = starts.clone();
        sorted.sort();
        assert_eq!(starts, sorted);
        for diagnostic in parse.diagnostics() {
            assert!(usize::from(diagnostic.range.end()) <= source.len());
        }
    }
}

#[test]
fn test_deep_nesting_is_total() {
    let handle = std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(|| {
            let sources = [
                format!("x = {}1{};", "(".repeat(1000), ")".repeat(1000)),
                format!("{}{}", "{".repeat(1000), "}".repeat(1000)),
                format!("class C {{ {} }}", "class D { ".repeat(500)),
                format!("List<{}int{}> x;", "List<".repeat(500), ">".repeat(500)),
                "if (a) ".repeat(800),
            ];
            sources
                .iter()
                .map(|s| parse(s, &ParseOptions::default()).full_text() == *s)
                .all(|ok| ok)
        })
        .unwrap();
    assert!(handle.join().unwrap());
}
