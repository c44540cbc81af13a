//! Debug printer for syntax trees
//!
//! Renders one line per node and token, indented two spaces per level:
//!
//! ```text
//! CompilationUnit@0..10
//!   GlobalStatement@0..10
//!     ExpressionStatement@0..10
//! ...
//!       Semicolon@9..9 <missing>
//! ```
//!
//! Token text is printed with Rust escaping so that line breaks and quotes
//! stay on one line. The output is what the snapshot tests compare against.

use std::fmt::Write;

use rowan::NodeOrToken;

use super::{SyntaxNode, SyntaxToken, is_missing};

/// Render `node` and everything below it
pub fn debug_tree(node: &SyntaxNode) -> String {
    let mut out = String::new();
    let mut depth = 0usize;
    for event in node.preorder_with_tokens() {
        match event {
            rowan::WalkEvent::Enter(element) => {
                match element {
                    NodeOrToken::Node(node) => {
                        let _ = writeln!(
                            out,
                            "{:indent$}{:?}@{:?}",
                            "",
                            node.kind(),
                            node.text_range(),
                            indent = depth * 2
                        );
                    }
                    NodeOrToken::Token(token) => write_token(&mut out, &token, depth),
                }
                depth += 1;
            }
            rowan::WalkEvent::Leave(_) => depth -= 1,
        }
    }
    out
}

fn write_token(out: &mut String, token: &SyntaxToken, depth: usize) {
    let _ = write!(
        out,
        "{:indent$}{:?}@{:?} ",
        "",
        token.kind(),
        token.text_range(),
        indent = depth * 2
    );
    if is_missing(token) {
        out.push_str("<missing>\n");
    } else {
        let _ = writeln!(out, "{:?}", token.text());
    }
}

#[cfg(test)]
mod tests {
    use crate::{ParseOptions, parse};

    #[test]
    fn test_tokens_are_indented_below_their_node() {
        let tree = parse("x;", &ParseOptions::default()).debug_tree();
        let lines: Vec<&str> = tree.lines().collect();
        assert_eq!(lines[0], "CompilationUnit@0..2");
        assert_eq!(lines[1], "  GlobalStatement@0..2");
        assert_eq!(lines[2], "    ExpressionStatement@0..2");
        assert_eq!(lines[3], "      IdentifierName@0..1");
        assert_eq!(lines[4], "        Ident@0..1 \"x\"");
        assert_eq!(lines[5], "      Semicolon@1..2 \";\"");
        assert_eq!(lines[6], "  EndOfFile@2..2 \"\"");
    }

    #[test]
    fn test_missing_token_marker() {
        let tree = parse("x", &ParseOptions::default()).debug_tree();
        assert!(tree.contains("Semicolon@1..1 <missing>"), "{tree}");
    }

    #[test]
    fn test_trivia_text_is_escaped() {
        let tree = parse("x;\n", &ParseOptions::default()).debug_tree();
        assert!(tree.contains("EndOfLine@2..3 \"\\n\""), "{tree}");
    }
}
