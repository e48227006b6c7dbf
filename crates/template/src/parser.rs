//! Parsing template source into a block tree.
//!
//! The scanner walks the source for `{...}` spans. Only two span contents are
//! directives (`block:<name>` opens a section, `end` closes one); everything
//! else is recorded as a raw expression and left uninterpreted until render
//! time, so malformed content in a never-rendered branch never fails.

use crate::ast::{BlockNode, TemplateNode};
use crate::error::TemplateError;

/// Parse template source into its root block. `file` is used in parse error
/// messages only.
pub fn parse(source: &str, file: &str) -> Result<BlockNode, TemplateError> {
    let mut root = BlockNode::default();
    // Currently open `{block:...}` sections, innermost last.
    let mut open: Vec<BlockNode> = Vec::new();
    let mut rest = source;
    let mut line_count = 0usize;

    while let Some((before, content, after)) = next_span(rest) {
        line_count += before.matches('\n').count();

        if !before.is_empty() {
            let target = open.last_mut().unwrap_or(&mut root);
            target.children.push(TemplateNode::Html(before.to_string()));
        }

        if content == "end" {
            match open.pop() {
                Some(block) => {
                    let target = open.last_mut().unwrap_or(&mut root);
                    target.children.push(TemplateNode::Block(block));
                }
                None => {
                    return Err(parse_error(file, line_count + 1, "unexpected {end}"));
                }
            }
        } else if let Some(name) = content.strip_prefix("block:") {
            open.push(BlockNode::new(name));
        } else {
            let target = open.last_mut().unwrap_or(&mut root);
            target
                .children
                .push(TemplateNode::Expression(content.to_string()));
        }

        rest = after;
    }

    line_count += rest.matches('\n').count();

    if !open.is_empty() {
        return Err(parse_error(file, line_count + 1, "missing {end}"));
    }

    if !rest.is_empty() {
        root.children.push(TemplateNode::Html(rest.to_string()));
    }

    Ok(root)
}

/// The next `{...}` span: the first `{` that is followed, at distance >= 1
/// and with no intervening `}`, by a `}`. Returns the text before the span,
/// the span content, and the text after it.
fn next_span(text: &str) -> Option<(&str, &str, &str)> {
    let mut from = 0;
    loop {
        let open = from + text[from..].find('{')?;
        match text[open + 1..].find('}') {
            // Empty braces are plain text; scan on.
            Some(0) => from = open + 1,
            Some(offset) => {
                let close = open + 1 + offset;
                return Some((&text[..open], &text[open + 1..close], &text[close + 1..]));
            }
            None => return None,
        }
    }
}

fn parse_error(file: &str, line: usize, message: &str) -> TemplateError {
    TemplateError::Parse {
        file: file.to_string(),
        line,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(source: &str) -> BlockNode {
        parse(source, "<test>").unwrap()
    }

    fn html(content: &str) -> TemplateNode {
        TemplateNode::Html(content.to_string())
    }

    #[test]
    fn test_structure_mirrors_source_nesting() {
        let root = parsed("foo{block:bar}baz{end}qux");

        assert_eq!(root.children.len(), 3);
        assert_eq!(root.children[0], html("foo"));
        assert_eq!(
            root.children[1],
            TemplateNode::Block(BlockNode {
                name: "bar".to_string(),
                children: vec![html("baz")],
            })
        );
        assert_eq!(root.children[2], html("qux"));
    }

    #[test]
    fn test_nested_blocks() {
        let root = parsed("{block:outer}{block:inner}x{end}{end}");

        let TemplateNode::Block(outer) = &root.children[0] else {
            panic!("expected a block");
        };
        assert_eq!(outer.name, "outer");
        let TemplateNode::Block(inner) = &outer.children[0] else {
            panic!("expected a nested block");
        };
        assert_eq!(inner.name, "inner");
        assert_eq!(inner.children, vec![html("x")]);
    }

    #[test]
    fn test_expression_content_is_kept_raw() {
        let root = parsed("a{$foo}b{not ! an * expression}c");

        assert_eq!(
            root.children,
            vec![
                html("a"),
                TemplateNode::Expression("$foo".to_string()),
                html("b"),
                TemplateNode::Expression("not ! an * expression".to_string()),
                html("c"),
            ]
        );
    }

    #[test]
    fn test_unexpected_end() {
        let error = parse("a{end}", "<test>").unwrap_err();
        let TemplateError::Parse { line, message, .. } = error else {
            panic!("expected a parse error");
        };
        assert_eq!(line, 1);
        assert_eq!(message, "unexpected {end}");
    }

    #[test]
    fn test_unexpected_end_line_number() {
        let error = parse("one\ntwo\n{end}", "<test>").unwrap_err();
        let TemplateError::Parse { line, .. } = error else {
            panic!("expected a parse error");
        };
        assert_eq!(line, 3);
    }

    #[test]
    fn test_missing_end() {
        let error = parse("{block:x}\nfoo", "<test>").unwrap_err();
        let TemplateError::Parse { line, message, .. } = error else {
            panic!("expected a parse error");
        };
        assert_eq!(line, 2);
        assert_eq!(message, "missing {end}");
    }

    #[test]
    fn test_empty_braces_are_plain_text() {
        let root = parsed("a{}b");
        assert_eq!(root.children, vec![html("a{}b")]);
    }

    #[test]
    fn test_unclosed_brace_is_plain_text() {
        let root = parsed("a{b");
        assert_eq!(root.children, vec![html("a{b")]);
    }
}
