// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Go source scanning
//!
//! Parses a file with the tree-sitter Go grammar and collects its package
//! clause and top-level function and method declarations. A file with any
//! syntax error, or without a package clause, is rejected.

use tree_sitter::{Node, Parser};

use crate::error::ScanError;

/// A top-level function or method declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    /// Declared name
    pub name: String,
    /// 1-based line of the `func` keyword
    pub line: usize,
    /// Whether the declaration has a receiver
    pub method: bool,
}

/// Declarations found in one Go source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Name from the package clause
    pub package: String,
    /// Top-level declarations in source order
    pub funcs: Vec<FuncDecl>,
}

impl SourceFile {
    /// The last declaration named `name`
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&FuncDecl> {
        self.funcs.iter().rev().find(|f| f.name == name)
    }
}

/// Parse Go source text for its package clause and top-level functions
///
/// # Errors
///
/// Returns a `ScanError` if the text is not syntactically valid Go or has no
/// package clause.
pub fn scan_source(source: &str) -> Result<SourceFile, ScanError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|e| ScanError {
            line: 0,
            message: e.to_string(),
        })?;
    let tree = parser.parse(source, None).ok_or_else(|| ScanError {
        line: 0,
        message: "parser produced no tree".to_string(),
    })?;
    let root = tree.root_node();

    if let Some(node) = first_error(root) {
        let message = if node.is_missing() {
            format!("missing {}", node.kind())
        } else {
            "syntax error".to_string()
        };
        return Err(ScanError {
            line: line_of(node),
            message,
        });
    }

    let mut package = None;
    let mut funcs = Vec::new();
    let mut cursor = root.walk();
    for node in root.named_children(&mut cursor) {
        let kind = node.kind();
        if kind == "comment" {
            continue;
        }
        if package.is_none() {
            if kind != "package_clause" {
                return Err(ScanError {
                    line: line_of(node),
                    message: "expected 'package'".to_string(),
                });
            }
            package = Some(package_name(node, source)?);
            continue;
        }
        match kind {
            "function_declaration" | "method_declaration" => {
                let Some(name) = node.child_by_field_name("name") else {
                    continue;
                };
                funcs.push(FuncDecl {
                    name: text(name, source)?.to_string(),
                    line: line_of(node),
                    method: kind == "method_declaration",
                });
            }
            "import_declaration" | "const_declaration" | "type_declaration" | "var_declaration" => {}
            _ => {
                return Err(ScanError {
                    line: line_of(node),
                    message: "non-declaration statement outside function body".to_string(),
                });
            }
        }
    }

    let package = package.ok_or_else(|| ScanError {
        line: 1,
        message: "expected 'package'".to_string(),
    })?;
    Ok(SourceFile { package, funcs })
}

/// First `ERROR` or missing node in document order
fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    if !root.has_error() {
        return None;
    }
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        let mut cursor = node.walk();
        let faulty: Vec<Node<'_>> = node
            .children(&mut cursor)
            .filter(|c| c.has_error() || c.is_missing())
            .collect();
        stack.extend(faulty.into_iter().rev());
    }
    Some(root)
}

fn package_name(clause: Node<'_>, source: &str) -> Result<String, ScanError> {
    let mut cursor = clause.walk();
    let name = clause
        .named_children(&mut cursor)
        .find(|c| c.kind() == "package_identifier")
        .ok_or_else(|| ScanError {
            line: line_of(clause),
            message: "package clause without a name".to_string(),
        })?;
    Ok(text(name, source)?.to_string())
}

fn text<'s>(node: Node<'_>, source: &'s str) -> Result<&'s str, ScanError> {
    node.utf8_text(source.as_bytes()).map_err(|e| ScanError {
        line: line_of(node),
        message: e.to_string(),
    })
}

fn line_of(node: Node<'_>) -> usize {
    node.start_position().row + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn names(file: &SourceFile) -> Vec<(&str, usize)> {
        file.funcs.iter().map(|f| (f.name.as_str(), f.line)).collect()
    }

    #[test]
    fn test_scan_simple_test_file() {
        let src = r#"package cart

import (
	"testing"
)

func TestAdd(t *testing.T) {
	if got := add(1, 2); got != 3 {
		t.Fatalf("got %d", got)
	}
}

func TestTotal(t *testing.T) {}
"#;
        let file = scan_source(src).expect("Should scan");
        assert_eq!(file.package, "cart");
        assert_eq!(names(&file), vec![("TestAdd", 7), ("TestTotal", 13)]);
    }

    #[test]
    fn test_methods_and_generics() {
        let src = "package list\n\ntype List[T any] struct{ items []T }\n\nfunc (l *List[T]) Len() int { return len(l.items) }\n\nfunc Map[T, U any](xs []T, f func(T) U) []U {\n\treturn nil\n}\n";
        let file = scan_source(src).expect("Should scan");
        assert_eq!(names(&file), vec![("Len", 5), ("Map", 7)]);
        assert!(file.funcs[0].method);
        assert!(!file.funcs[1].method);
    }

    #[test]
    fn test_function_literals_are_not_declarations() {
        let src = r#"package p

var helper = func(t int) int {
	return t
}

var (
	other = func() {}
)

func TestReal(t *testing.T) {
	run := func() {}
	run()
}
"#;
        let file = scan_source(src).expect("Should scan");
        assert_eq!(names(&file), vec![("TestReal", 11)]);
    }

    #[test]
    fn test_comments_and_literals_are_skipped() {
        let src = "package p\n\n// func TestComment(t *testing.T) {\n/* func TestBlock() {\n} */\nvar s = \"func TestString() {\"\nvar r = `func TestRaw() {\n}`\nvar c = '{'\n\nfunc TestAfter(t *testing.T) {}\n";
        let file = scan_source(src).expect("Should scan");
        assert_eq!(names(&file), vec![("TestAfter", 11)]);
    }

    #[test]
    fn test_doc_comment_does_not_shift_line() {
        let src = "package p\n\n// TestDoc does things.\n// More words.\nfunc TestDoc(t *testing.T) {}\n";
        let file = scan_source(src).expect("Should scan");
        assert_eq!(names(&file), vec![("TestDoc", 5)]);
    }

    #[test]
    fn test_explicit_semicolons() {
        let file = scan_source("package p; func A() {}; func B() {}").expect("Should scan");
        assert_eq!(names(&file), vec![("A", 1), ("B", 1)]);
    }

    #[test]
    fn test_build_tags_and_bom() {
        let src = "\u{feff}//go:build linux\n\npackage p_test\n\nfunc TestLinux(t *testing.T) {}\n";
        let file = scan_source(src).expect("Should scan");
        assert_eq!(file.package, "p_test");
        assert_eq!(names(&file), vec![("TestLinux", 5)]);
    }

    #[test]
    fn test_unicode_identifiers() {
        let file = scan_source("package p\nfunc TestÜber(t *testing.T) {}\n").expect("Should scan");
        assert_eq!(names(&file), vec![("TestÜber", 2)]);
    }

    #[test]
    fn test_find_returns_last_declaration() {
        let file = SourceFile {
            package: "p".to_string(),
            funcs: vec![
                FuncDecl { name: "init".to_string(), line: 3, method: false },
                FuncDecl { name: "init".to_string(), line: 9, method: false },
            ],
        };
        assert_eq!(file.find("init").map(|f| f.line), Some(9));
        assert!(file.find("TestMissing").is_none());
    }

    #[test]
    fn test_missing_package_clause() {
        let err = scan_source("func TestX() {}\n").expect_err("Should fail");
        assert!(err.message.contains("package"));
        assert!(scan_source("").is_err());
        assert!(scan_source("// only a comment\n").is_err());
    }

    #[test]
    fn test_package_clause_must_come_first() {
        let err = scan_source("func TestX() {}\npackage p\n").expect_err("Should fail");
        assert_eq!(err.line, 1);
        assert!(err.message.contains("package"));
    }

    #[test]
    fn test_statements_outside_functions_are_rejected() {
        let err = scan_source("package p\n\nx := 1\n").expect_err("Should fail");
        assert_eq!(err.line, 3);
    }

    #[test]
    fn test_incomplete_statement_is_rejected() {
        let src = "package pkg\n\nfunc TestFoo(t *testing.T) {\n\tx := \n}\n";
        assert!(scan_source(src).is_err());
    }

    #[test]
    fn test_if_without_condition_is_rejected() {
        let src = "package pkg\n\nfunc TestFoo(t *testing.T) {\n\tif {\n}\n}\n";
        assert!(scan_source(src).is_err());
    }

    #[test]
    fn test_unbalanced_brackets() {
        assert!(scan_source("package p\n\nfunc TestX() {\n").is_err());
        assert!(scan_source("package p\nfunc TestX() }\n").is_err());
        assert!(scan_source("package p\nvar x = [1)\n").is_err());
    }

    #[test]
    fn test_unterminated_literals() {
        assert!(scan_source("package p\nvar s = \"abc\n").is_err());
        assert!(scan_source("package p\nvar s = `abc\n").is_err());
        assert!(scan_source("package p\n/* never closed\n").is_err());
        assert!(scan_source("package p\nvar r = 'a\n").is_err());
    }

    #[test]
    fn test_invalid_character() {
        let err = scan_source("package p\n\nvar x = 1 # 2\n").expect_err("Should fail");
        assert_eq!(err.line, 3);
    }

    #[test]
    fn test_escaped_quotes_in_strings() {
        let src = "package p\nvar s = \"a\\\"{\"\nfunc TestY() {}\n";
        let file = scan_source(src).expect("Should scan");
        assert_eq!(names(&file), vec![("TestY", 3)]);
    }

    #[test]
    fn test_numbers_with_exponents() {
        let src = "package p\nvar f = 1e+10\nvar h = 0x1p-2\nvar g = .5\nfunc TestZ() {}\n";
        let file = scan_source(src).expect("Should scan");
        assert_eq!(names(&file), vec![("TestZ", 5)]);
    }
}
