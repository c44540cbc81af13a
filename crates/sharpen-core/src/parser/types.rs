//! Type parsing: names, generic argument lists, arrays, nullable, pointer
//! and tuple types

use super::Parser;
use super::scan::ScanMode;
use crate::cst::SyntaxKind;
use crate::diagnostics::ErrorCode;
use crate::options::Feature;

/// Context a type is parsed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TypeMode {
    Normal,
    /// After `new`/`stackalloc`: array ranks carry sizes and are parsed by
    /// the creation expression
    NewExpression,
    /// In a pattern: `?` only before a terminator, no pointers
    Pattern,
}

impl Parser<'_> {
    /// Parse a type; a missing type becomes an `IdentifierName` with a
    /// missing identifier
    pub(crate) fn parse_type(&mut self, mode: TypeMode) {
        if !self.enter() {
            self.missing_name();
            return;
        }
        self.parse_type_core(mode);
        self.exit();
    }

    fn parse_type_core(&mut self, mode: TypeMode) {
        let checkpoint = self.checkpoint();
        match self.current() {
            SyntaxKind::RefKw => {
                self.start_node(SyntaxKind::RefType);
                self.bump();
                self.eat(SyntaxKind::ReadonlyKw);
                self.parse_type(mode);
                self.finish_node();
                return;
            }
            SyntaxKind::LParen => self.parse_tuple_type(),
            kind if kind.is_predefined_type() => {
                self.start_node(SyntaxKind::PredefinedType);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::Ident => self.parse_qualified_name(),
            _ => {
                let range = self.missing_range();
                self.missing_name();
                self.error_at(range, ErrorCode::TypeExpected, Vec::new());
                return;
            }
        }

        let nullable = match mode {
            TypeMode::Pattern => self.nullable_suffix_allowed(self.pos(), ScanMode::Pattern),
            TypeMode::Normal | TypeMode::NewExpression => true,
        };
        if nullable && self.at(SyntaxKind::Question) {
            self.start_node_at(checkpoint, SyntaxKind::NullableType);
            self.bump();
            self.finish_node();
        }

        loop {
            match self.current() {
                SyntaxKind::Star if mode != TypeMode::Pattern => {
                    self.start_node_at(checkpoint, SyntaxKind::PointerType);
                    self.bump();
                    self.finish_node();
                }
                SyntaxKind::LBracket
                    if mode != TypeMode::NewExpression
                        && matches!(self.nth(1), SyntaxKind::Comma | SyntaxKind::RBracket) =>
                {
                    self.start_node_at(checkpoint, SyntaxKind::ArrayType);
                    while self.at(SyntaxKind::LBracket)
                        && matches!(self.nth(1), SyntaxKind::Comma | SyntaxKind::RBracket)
                    {
                        self.parse_omitted_rank_specifier();
                    }
                    self.finish_node();
                }
                _ => break,
            }
        }
    }

    /// `IdentifierName` holding a missing identifier, no diagnostic
    pub(crate) fn missing_name(&mut self) {
        self.start_node(SyntaxKind::IdentifierName);
        self.missing(SyntaxKind::Ident);
        self.finish_node();
    }

    /// `[` `,`* `]` with empty size slots
    fn parse_omitted_rank_specifier(&mut self) {
        self.start_node(SyntaxKind::ArrayRankSpecifier);
        self.bump();
        self.omitted_node(SyntaxKind::OmittedArraySizeExpression);
        while self.at(SyntaxKind::Comma) {
            self.bump();
            self.omitted_node(SyntaxKind::OmittedArraySizeExpression);
        }
        self.expect(SyntaxKind::RBracket);
        self.finish_node();
    }

    /// An empty node standing for an omitted type argument or array size
    pub(crate) fn omitted_node(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.finish_node();
    }

    /// `alias::Name`, `A.B<C>.D`, ...
    pub(crate) fn parse_qualified_name(&mut self) {
        let checkpoint = self.checkpoint();
        if self.at(SyntaxKind::Ident) && self.nth(1) == SyntaxKind::ColonColon {
            self.start_node(SyntaxKind::AliasQualifiedName);
            self.parse_identifier_name();
            self.bump();
            self.parse_simple_name();
            self.finish_node();
        } else {
            self.parse_simple_name();
        }

        while self.at(SyntaxKind::Dot) {
            self.start_node_at(checkpoint, SyntaxKind::QualifiedName);
            self.bump();
            self.parse_simple_name();
            self.finish_node();
        }
    }

    /// `Name` or `Name<...>`; in type context `<` always opens an argument list
    pub(crate) fn parse_simple_name(&mut self) {
        if self.at(SyntaxKind::Ident) && self.nth(1) == SyntaxKind::Lt {
            self.start_node(SyntaxKind::GenericName);
            self.bump();
            self.parse_type_argument_list();
            self.finish_node();
        } else {
            self.parse_identifier_name();
        }
    }

    pub(crate) fn parse_identifier_name(&mut self) {
        self.start_node(SyntaxKind::IdentifierName);
        self.expect(SyntaxKind::Ident);
        self.finish_node();
    }

    /// `<` types `>`; `<,,>` yields empty `OmittedTypeArgument` nodes
    pub(crate) fn parse_type_argument_list(&mut self) {
        self.start_node(SyntaxKind::TypeArgumentList);
        self.bump();
        if matches!(self.current(), SyntaxKind::Comma | SyntaxKind::Gt) {
            self.omitted_node(SyntaxKind::OmittedTypeArgument);
            while self.at(SyntaxKind::Comma) {
                self.bump();
                self.omitted_node(SyntaxKind::OmittedTypeArgument);
            }
        } else {
            loop {
                self.parse_type(TypeMode::Normal);
                if !self.eat(SyntaxKind::Comma) {
                    break;
                }
            }
        }
        self.expect(SyntaxKind::Gt);
        self.finish_node();
    }

    /// `(` type name? (`,` type name?)* `)`
    fn parse_tuple_type(&mut self) {
        let start = self.pos();
        self.start_node(SyntaxKind::TupleType);
        self.bump();
        let mut count = 0;
        loop {
            self.start_node(SyntaxKind::TupleElement);
            self.parse_type(TypeMode::Normal);
            self.eat(SyntaxKind::Ident);
            self.finish_node();
            count += 1;
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        self.expect(SyntaxKind::RParen);
        self.finish_node();

        let range = self.token_range_from(start);
        self.check_feature(Feature::Tuples, range);
        if count < 2 {
            self.error_at(range, ErrorCode::TupleTooFewElements, Vec::new());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{node_kinds, parse_fragment};

    fn type_kinds(text: &str) -> (Vec<SyntaxKind>, Vec<ErrorCode>) {
        let parse = parse_fragment(text, |p| p.parse_type(TypeMode::Normal));
        let kinds = node_kinds(&parse.syntax()).into_iter().skip(1).collect();
        let codes = parse.diagnostics().iter().map(|d| d.code).collect();
        (kinds, codes)
    }

    #[test]
    fn test_nested_generic_closes_one_level_per_gt() {
        let (kinds, codes) = type_kinds("List<List<int>>");
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::GenericName,
                SyntaxKind::TypeArgumentList,
                SyntaxKind::GenericName,
                SyntaxKind::TypeArgumentList,
                SyntaxKind::PredefinedType,
            ]
        );
        assert!(codes.is_empty());
    }

    #[test]
    fn test_omitted_type_arguments_are_empty_nodes() {
        let (kinds, codes) = type_kinds("Goo<,,>");
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::GenericName,
                SyntaxKind::TypeArgumentList,
                SyntaxKind::OmittedTypeArgument,
                SyntaxKind::OmittedTypeArgument,
                SyntaxKind::OmittedTypeArgument,
            ]
        );
        assert!(codes.is_empty());
    }

    #[test]
    fn test_suffixes_wrap_in_order() {
        let (kinds, _) = type_kinds("int?[]");
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::ArrayType,
                SyntaxKind::NullableType,
                SyntaxKind::PredefinedType,
                SyntaxKind::ArrayRankSpecifier,
                SyntaxKind::OmittedArraySizeExpression,
            ]
        );
    }

    #[test]
    fn test_qualified_and_alias_names() {
        let (kinds, _) = type_kinds("global::System.Collections.List");
        assert_eq!(kinds[0], SyntaxKind::QualifiedName);
        assert!(kinds.contains(&SyntaxKind::AliasQualifiedName));
    }

    #[test]
    fn test_tuple_type_with_names() {
        let (kinds, codes) = type_kinds("(int a, string b)");
        assert_eq!(kinds[0], SyntaxKind::TupleType);
        assert_eq!(
            kinds.iter().filter(|k| **k == SyntaxKind::TupleElement).count(),
            2
        );
        assert!(codes.is_empty());
    }

    #[test]
    fn test_single_element_tuple_type_is_flagged() {
        let (_, codes) = type_kinds("(int a)");
        assert_eq!(codes, vec![ErrorCode::TupleTooFewElements]);
    }

    #[test]
    fn test_missing_type() {
        let parse = parse_fragment(";", |p| p.parse_type(TypeMode::Normal));
        assert_eq!(parse.diagnostics()[0].code, ErrorCode::TypeExpected);
        assert_eq!(parse.full_text(), ";");
    }
}
