//! Integration tests for the mdtree parser

use mdtree_core::lexer::split_lines;
use mdtree_core::{BlockKind, BlockRef, ChildRef, Document, InlineKind, ListKind};
use mdtree_core::{ParseErrorKind, Parser};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn parse(input: &str) -> Document<'_> {
    Parser::new().parse_str(input)
}

/// Compact outline: `KIND@level[inline texts](nested blocks)`.
fn outline(block: BlockRef<'_, '_>) -> String {
    let mut out = format!("{}@{}", block.kind().name(), block.level());
    let texts: Vec<&str> = block.inlines().map(|i| i.text()).collect();
    if !texts.is_empty() {
        out.push_str(&format!("[{}]", texts.join("|")));
    }
    let nested: Vec<String> = block.child_blocks().map(outline).collect();
    if !nested.is_empty() {
        out.push_str(&format!("({})", nested.join(" ")));
    }
    out
}

fn top_outline(doc: &Document<'_>) -> Vec<String> {
    doc.top_level().map(outline).collect()
}

// ============================================================================
// Core Properties
// ============================================================================

#[test]
fn test_table_rejected_when_rows_disagree() {
    let lines = ["|a|b|", "|--|--|", "|1|2|3|"];
    let doc = Parser::new().parse(&lines);

    assert!(doc.blocks().all(|b| *b.kind() != BlockKind::TableTop));
    let first = doc.top_level().next().unwrap();
    assert_eq!(*first.kind(), BlockKind::Paragraph);
    assert_eq!(first.linenum(), 1);
    assert_eq!(first.inlines().next().unwrap().text(), "|a|b|");
}

#[test]
fn test_setext_heading_consumes_underline() {
    let lines = ["Title", "==="];
    let doc = Parser::new().parse(&lines);

    assert_eq!(doc.len(), 2);
    let heading = doc.top_level().next().unwrap();
    assert_eq!(*heading.kind(), BlockKind::Heading);
    assert_eq!(heading.level(), 1);
    assert_eq!(heading.linenum(), 1);
    assert_eq!(heading.plain_text(), "Title");
}

#[test]
fn test_over_deep_quote_line_is_dropped() {
    let lines = [">a", ">>>b"];
    let doc = Parser::new().parse(&lines);
    assert_eq!(top_outline(&doc), vec!["QUOTE_TOP@0(QUOTE_DATA@1[a])"]);
}

#[test]
fn test_over_deep_first_quote_line_is_dropped() {
    let lines = [">> a", "> b"];
    let result = Parser::new().parse_with_recovery(&lines);
    assert_eq!(
        top_outline(&result.document),
        vec!["QUOTE_TOP@0(QUOTE_DATA@1[b])"]
    );
    assert_eq!(result.errors.of_kind(ParseErrorKind::NestingJump).count(), 1);
}

#[test]
fn test_over_deep_quote_in_list_is_dropped() {
    let lines = ["- item", ">> q"];
    let doc = Parser::new().parse(&lines);
    assert_eq!(
        top_outline(&doc),
        vec!["LIST_TOP@0(LIST_NORMAL@1[item](QUOTE_TOP@0))"]
    );
}

#[test]
fn test_list_continuation_splice() {
    let lines = ["- item one", "  continued text"];
    let doc = Parser::new().parse(&lines);
    assert_eq!(
        top_outline(&doc),
        vec!["LIST_TOP@0(LIST_NORMAL@1[item one|continued text])"]
    );
}

#[test]
fn test_inline_priority_in_paragraph() {
    let doc = parse("**bold** and *em*");
    let para = doc.top_level().next().unwrap();
    let spans: Vec<_> = para.inlines().map(|i| (i.kind, i.text())).collect();
    assert_eq!(
        spans,
        vec![
            (InlineKind::Bold, "bold"),
            (InlineKind::Plain, " and "),
            (InlineKind::Italic, "em"),
        ]
    );
}

#[test]
fn test_empty_and_blank_inputs() {
    assert!(parse("").is_empty());
    assert!(parse("\n\n   \n\t\n").is_empty());

    let doc = parse("");
    assert_eq!(*doc.root().kind(), BlockKind::Document);
    assert_eq!(doc.root().linenum(), 0);
}

#[test]
fn test_reparse_is_identical() {
    let input = "# A\n\n- x\n    - y\n> q\n\n|a|\n|-|\n\ntext  \nmore";
    let mut parser = Parser::new();
    let first = parser.parse_str(input);
    let second = parser.parse_str(input);
    assert_eq!(first, second);
}

// ============================================================================
// Dispatcher Order
// ============================================================================

#[rstest]
#[case("# heading", "HEADER")]
#[case("---", "HR")]
#[case("***", "HR")]
#[case("- - -", "HR")]
#[case("![alt](img.png)", "IMAGE")]
#[case("    indented", "PRE")]
#[case("```", "CODE")]
#[case("~~~python", "CODE")]
#[case("<!-- note -->", "COMMENT")]
#[case("> quoted", "QUOTE_TOP")]
#[case("- item", "LIST_TOP")]
#[case("1. item", "LIST_TOP")]
#[case("* [ ] task", "LIST_TOP")]
#[case("|a|", "PARA")]
#[case("#hashtag", "PARA")]
#[case("plain words", "PARA")]
fn test_single_line_kind(#[case] line: &str, #[case] expected: &str) {
    let doc = parse(line);
    let kinds: Vec<_> = doc.top_level().map(|b| b.kind().name()).collect();
    assert_eq!(kinds, vec![expected]);
}

#[test]
fn test_setext_level_two_beats_rule_on_underline() {
    let doc = parse("Sub\n---\n\n---");
    assert_eq!(top_outline(&doc), vec!["HEADER@2[Sub]", "HR@0"]);
}

#[test]
fn test_linenums_follow_source() {
    let doc = parse("# A\n\ntext\n- item\n\n```\nx\n```");
    let linenums: Vec<_> = doc
        .top_level()
        .map(|b| (b.kind().name(), b.linenum()))
        .collect();
    assert_eq!(
        linenums,
        vec![("HEADER", 1), ("PARA", 3), ("LIST_TOP", 4), ("CODE", 6)]
    );
}

// ============================================================================
// Leaf Blocks
// ============================================================================

#[test]
fn test_heading_level_is_raw() {
    let doc = parse("######## deep");
    assert_eq!(doc.top_level().next().unwrap().level(), 8);
}

#[test]
fn test_paragraph_lines_merge_until_blank() {
    let doc = parse("one\ntwo\n\nthree");
    assert_eq!(top_outline(&doc), vec!["PARA@0[one|two]", "PARA@0[three]"]);
}

#[test]
fn test_hard_break_marker() {
    let doc = parse("line  \nnext");
    let para = doc.top_level().next().unwrap();
    assert_eq!(para.plain_text(), "line\nnext");
}

#[test]
fn test_fenced_code_keeps_info_and_text() {
    let doc = parse("```rust\nfn main() {}\n```\nafter");
    let code = doc.top_level().next().unwrap();
    assert_eq!(
        *code.kind(),
        BlockKind::Code {
            info: "rust".to_string()
        }
    );
    assert_eq!(code.plain_text(), "fn main() {}");
    assert_eq!(doc.top_level().count(), 2);
}

#[test]
fn test_block_image_fragments() {
    let doc = parse(r#"![Diagram](arch.png "Overview")"#);
    let image = doc.top_level().next().unwrap();
    let inline = image.inlines().next().unwrap();
    assert_eq!(inline.kind, InlineKind::Image);
    assert_eq!(inline.label(), Some("Diagram"));
    assert_eq!(inline.target(), Some("arch.png"));
    assert_eq!(inline.title(), Some("Overview"));
}

#[test]
fn test_multi_line_comment_is_one_block() {
    let doc = parse("<!--\nhidden\n-->\ntext");
    assert_eq!(
        top_outline(&doc),
        vec!["COMMENT@0[hidden]", "PARA@0[text]"]
    );
}

// ============================================================================
// Containers
// ============================================================================

#[test]
fn test_nested_list_with_code() {
    let doc = parse("- a\n    - b\n```\ncode\n```\n- c");
    assert_eq!(
        top_outline(&doc),
        vec!["LIST_TOP@0(LIST_NORMAL@1[a](LIST_NORMAL@2[b](CODE@0[code])) LIST_NORMAL@1[c])"]
    );
}

#[test]
fn test_list_item_kinds() {
    let doc = parse("- [x] done\n- [ ] open\n1. first\n- plain");
    let kinds: Vec<_> = doc
        .blocks()
        .filter_map(|b| match b.kind() {
            BlockKind::ListItem(kind) => Some(*kind),
            _ => None,
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            ListKind::Check { checked: true },
            ListKind::Check { checked: false },
            ListKind::Ordered,
            ListKind::Unordered,
        ]
    );
}

#[test]
fn test_quote_ends_at_plain_line() {
    let doc = parse("> a\n>> b\nplain");
    assert_eq!(
        top_outline(&doc),
        vec![
            "QUOTE_TOP@0(QUOTE_DATA@1[a](QUOTE_DATA@2[b]))",
            "PARA@0[plain]"
        ]
    );
}

#[test]
fn test_list_holds_quote() {
    let doc = parse("- a\n> q\n- b");
    assert_eq!(
        top_outline(&doc),
        vec!["LIST_TOP@0(LIST_NORMAL@1[a](QUOTE_TOP@0(QUOTE_DATA@1[q])) LIST_NORMAL@1[b])"]
    );
}

#[test]
fn test_list_holds_table_comment_and_image() {
    let doc = parse("- a\n|x|y|\n|-|-|\n|1|2|\n<!-- c -->\n![i](p.png)\ntail");
    assert_eq!(
        top_outline(&doc),
        vec![
            "LIST_TOP@0(LIST_NORMAL@1[a](\
             TABLE_TOP@0(TABLE_ROW_H@0(TABLE_CELL@0[x] TABLE_CELL@0[y]) \
             TABLE_ROW@0(TABLE_CELL@0[1] TABLE_CELL@0[2])) \
             COMMENT@0[c] IMAGE@0[i] PARA@0[tail]))"
        ]
    );
}

#[test]
fn test_ragged_table_in_list_is_spliced_as_text() {
    let doc = parse("- a\n|x|y|\n|-|-|\n|1|");
    let item = doc.top_level().next().unwrap().child_blocks().next().unwrap();
    assert_eq!(item.child_blocks().count(), 0);
    let texts: Vec<&str> = item.inlines().map(|i| i.text()).collect();
    assert_eq!(texts, vec!["a", "|x|y|", "|-|-|", "|1|"]);
}

#[test]
fn test_table_structure() {
    let doc = parse("| a | b |\n|---|:-:|\n| 1 | `2` |\n\nafter");
    assert_eq!(
        top_outline(&doc),
        vec![
            "TABLE_TOP@0(TABLE_ROW_H@0(TABLE_CELL@0[a] TABLE_CELL@0[b]) \
             TABLE_ROW@0(TABLE_CELL@0[1] TABLE_CELL@0[2]))",
            "PARA@0[after]",
        ]
    );
}

// ============================================================================
// Document Access
// ============================================================================

#[test]
fn test_children_interleave_inlines_and_blocks() {
    let doc = parse("- item\n    - nested");
    let item = doc.top_level().next().unwrap().child_blocks().next().unwrap();
    let shape: Vec<&str> = item
        .children()
        .map(|c| match c {
            ChildRef::Inline(_) => "inline",
            ChildRef::Block(_) => "block",
        })
        .collect();
    assert_eq!(shape, vec!["inline", "block"]);
}

#[test]
fn test_parent_links() {
    let doc = parse("- a\n    - b\n        - c");
    let deepest = doc.blocks().last().unwrap();
    assert_eq!(deepest.plain_text(), "c");
    assert_eq!(deepest.depth(), 4);
    let levels: Vec<u32> = deepest.ancestors().map(|b| b.level()).collect();
    assert_eq!(levels, vec![2, 1, 0, 0]);
}

// ============================================================================
// Recovery Notes
// ============================================================================

#[rstest]
#[case(&["<!-- open", "text"], ParseErrorKind::UnclosedComment, 1)]
#[case(&["text", "~~~", "code"], ParseErrorKind::UnclosedFence, 2)]
#[case(&["> a", ">>> b"], ParseErrorKind::NestingJump, 2)]
#[case(&["|a|b|", "|--|--|", "|1|"], ParseErrorKind::RaggedTable, 1)]
fn test_recovery_notes(
    #[case] lines: &[&str],
    #[case] kind: ParseErrorKind,
    #[case] line: usize,
) {
    let result = Parser::new().parse_with_recovery(lines);
    assert!(!result.is_clean());
    let notes: Vec<_> = result.errors.of_kind(kind).collect();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].line, line);
}

#[test]
fn test_clean_input_has_no_notes() {
    let lines = split_lines("# A\n\n- b\n\n```\nc\n```\n");
    let result = Parser::new().parse_with_recovery(&lines);
    assert!(result.is_clean());
}

#[test]
fn test_crlf_input() {
    let doc = parse("# A\r\n\r\ntext\r\n");
    assert_eq!(top_outline(&doc), vec!["HEADER@1[A]", "PARA@0[text]"]);
}
