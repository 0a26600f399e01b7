//! Best-effort rendering of Go type and value expressions.
//!
//! Rendering never fails: any shape not listed below becomes `"unknown"`.

use tree_sitter::Node;

use crate::parser::ParsedFile;

/// Rendered in place of any unsupported syntax shape.
pub const UNKNOWN: &str = "unknown";

/// Render a type expression.
///
/// - `T` → `T`
/// - `*T` → `*T`
/// - `[]T`, `[N]T`, `[...]T` → `[]T`
/// - `pkg.T` → `pkg.T`
pub fn render_type(parsed: &ParsedFile, node: Node) -> String {
    match node.kind() {
        "type_identifier" | "identifier" => parsed.node_text(node).to_string(),
        "pointer_type" => match node.named_child(0) {
            Some(inner) => format!("*{}", render_type(parsed, inner)),
            None => UNKNOWN.to_string(),
        },
        "slice_type" | "array_type" | "implicit_length_array_type" => {
            match node.child_by_field_name("element") {
                Some(element) => format!("[]{}", render_type(parsed, element)),
                None => UNKNOWN.to_string(),
            }
        }
        "qualified_type" => {
            match (
                node.child_by_field_name("package"),
                node.child_by_field_name("name"),
            ) {
                (Some(pkg), Some(name)) => {
                    format!("{}.{}", parsed.node_text(pkg), parsed.node_text(name))
                }
                _ => UNKNOWN.to_string(),
            }
        }
        _ => UNKNOWN.to_string(),
    }
}

/// Render a value expression, typically a call argument.
///
/// Nested calls render as `f()` without their arguments.
pub fn render_expr(parsed: &ParsedFile, node: Node) -> String {
    match node.kind() {
        "int_literal" | "float_literal" | "imaginary_literal" | "rune_literal"
        | "interpreted_string_literal" | "raw_string_literal" => {
            parsed.node_text(node).to_string()
        }
        "identifier" | "type_identifier" | "field_identifier" | "package_identifier"
        | "true" | "false" | "nil" | "iota" => parsed.node_text(node).to_string(),
        "selector_expression" => {
            let operand = field_or_unknown(parsed, node, "operand");
            let field = node
                .child_by_field_name("field")
                .map(|f| parsed.node_text(f))
                .unwrap_or(UNKNOWN);
            format!("{}.{}", operand, field)
        }
        "call_expression" => format!("{}()", field_or_unknown(parsed, node, "function")),
        "type_conversion_expression" => {
            format!("{}()", field_or_unknown(parsed, node, "type"))
        }
        "unary_expression" => {
            let operator = node
                .child_by_field_name("operator")
                .map(|op| parsed.node_text(op))
                .unwrap_or("");
            format!("{}{}", operator, field_or_unknown(parsed, node, "operand"))
        }
        "binary_expression" => {
            let operator = node
                .child_by_field_name("operator")
                .map(|op| parsed.node_text(op))
                .unwrap_or("");
            format!(
                "{} {} {}",
                field_or_unknown(parsed, node, "left"),
                operator,
                field_or_unknown(parsed, node, "right")
            )
        }
        "parenthesized_expression" => {
            let inner = node
                .named_children(&mut node.walk())
                .find(|c| c.kind() != "comment")
                .map(|c| render_expr(parsed, c))
                .unwrap_or_else(|| UNKNOWN.to_string());
            format!("({})", inner)
        }
        "index_expression" => format!(
            "{}[{}]",
            field_or_unknown(parsed, node, "operand"),
            field_or_unknown(parsed, node, "index")
        ),
        "slice_expression" => format!(
            "{}[{}:{}]",
            field_or_unknown(parsed, node, "operand"),
            field_or_unknown(parsed, node, "start"),
            field_or_unknown(parsed, node, "end")
        ),
        "composite_literal" => match node.child_by_field_name("type") {
            Some(ty) if ty.kind() == "type_identifier" => {
                format!("{}{{}}", parsed.node_text(ty))
            }
            _ => "composite{}".to_string(),
        },
        _ => UNKNOWN.to_string(),
    }
}

/// Render a named field as an expression; an absent field is `"unknown"`.
fn field_or_unknown(parsed: &ParsedFile, node: Node, field: &str) -> String {
    node.child_by_field_name(field)
        .map(|child| render_expr(parsed, child))
        .unwrap_or_else(|| UNKNOWN.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::GoParser;
    use std::path::Path;

    fn parse_go(source: &str) -> ParsedFile {
        GoParser::new()
            .parse(Path::new("test.go"), source.as_bytes())
            .unwrap()
    }

    /// Collect every node of `kind` in document order.
    fn find_all<'a>(node: Node<'a>, kind: &str, out: &mut Vec<Node<'a>>) {
        if node.kind() == kind {
            out.push(node);
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            find_all(child, kind, out);
        }
    }

    /// Render each argument of the first call to `sink` in the source.
    fn rendered_args(body: &str) -> Vec<String> {
        let source = format!("package main\n\nfunc main() {{\n\tsink({})\n}}\n", body);
        let parsed = parse_go(&source);
        let mut calls = Vec::new();
        find_all(parsed.root(), "call_expression", &mut calls);
        let call = calls
            .into_iter()
            .find(|c| {
                c.child_by_field_name("function")
                    .map(|f| parsed.node_text(f) == "sink")
                    .unwrap_or(false)
            })
            .expect("sink call");
        let args = call.child_by_field_name("arguments").unwrap();
        let rendered = args
            .named_children(&mut args.walk())
            .map(|arg| render_expr(&parsed, arg))
            .collect();
        rendered
    }

    /// Render each parameter type of the first function declaration.
    fn param_types(signature: &str) -> Vec<String> {
        let source = format!("package main\n\nfunc f({}) {{}}\n", signature);
        let parsed = parse_go(&source);
        let mut params = Vec::new();
        find_all(parsed.root(), "parameter_declaration", &mut params);
        params
            .into_iter()
            .map(|p| render_type(&parsed, p.child_by_field_name("type").unwrap()))
            .collect()
    }

    #[test]
    fn test_render_types() {
        assert_eq!(
            param_types("a int, b *Config, c []string, d [4]byte, e *http.Request, f []*pkg.T"),
            vec!["int", "*Config", "[]string", "[]byte", "*http.Request", "[]*pkg.T"]
        );
    }

    #[test]
    fn test_render_unsupported_types() {
        assert_eq!(
            param_types("m map[string]int, ch chan int, fn func(), i interface{}"),
            vec!["unknown", "unknown", "unknown", "unknown"]
        );
    }

    #[test]
    fn test_render_literals_and_identifiers() {
        assert_eq!(
            rendered_args(r#""/users", 42, 3.5, 'x', `raw`, nil, true, name"#),
            vec!["\"/users\"", "42", "3.5", "'x'", "`raw`", "nil", "true", "name"]
        );
    }

    #[test]
    fn test_render_selectors_and_calls() {
        assert_eq!(
            rendered_args("handlers.List, a.b.c, fmt.Sprintf(\"%d\", n), build(x, y)"),
            vec!["handlers.List", "a.b.c", "fmt.Sprintf()", "build()"]
        );
    }

    #[test]
    fn test_render_operators() {
        assert_eq!(
            rendered_args("&cfg, *ptr, -n, !ok, a + b, (x * y), <-ch"),
            vec!["&cfg", "*ptr", "-n", "!ok", "a + b", "(x * y)", "<-ch"]
        );
    }

    #[test]
    fn test_render_index_and_slice() {
        assert_eq!(
            rendered_args("items[i], buf[lo:hi], buf[:n]"),
            vec!["items[i]", "buf[lo:hi]", "buf[unknown:n]"]
        );
    }

    #[test]
    fn test_render_composite_literals() {
        assert_eq!(
            rendered_args("User{Name: \"a\"}, []int{1, 2}, &Config{}, pkg.T{}"),
            vec!["User{}", "composite{}", "&Config{}", "composite{}"]
        );
    }

    #[test]
    fn test_render_unknown_expressions() {
        assert_eq!(
            rendered_args("func() {}, v.(string)"),
            vec!["unknown", "unknown"]
        );
    }
}
