//! Pipe table builder.
//!
//! A table is a pipe-delimited header row, a separator row of dashes, then
//! any number of pipe-delimited body rows. It is accepted only whole: if the
//! rows disagree on cell count, no block is produced and the dispatcher
//! moves on to the next matcher for the header line.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::{Block, BlockKind};
use crate::error::ParseError;
use crate::inline::parse_inlines;
use crate::parser::{Context, Matched};
use crate::span::Span;

static ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*\|.*\|[ \t]*$").expect("table row pattern is valid"));

static SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t]*\|?[ \t]*:?-+:?[ \t]*(?:\|[ \t]*:?-+:?[ \t]*)*\|?[ \t]*$")
        .expect("table separator pattern is valid")
});

#[inline]
fn is_separator(line: &str) -> bool {
    line.contains('|') && SEPARATOR.is_match(line)
}

/// Split one row into trimmed cells, dropping the outer pipes.
fn split_cells(line: &str) -> Vec<&str> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(str::trim).collect()
}

/// Build a table starting at line `at`.
pub(crate) fn table<'a>(cx: &mut Context<'a, '_>, at: usize) -> Option<Matched<'a>> {
    let header = cx.line(at)?;
    if !ROW.is_match(header) || !cx.line(at + 1).is_some_and(is_separator) {
        return None;
    }

    // (line index, cells) for the header and every body row
    let mut rows = vec![(at, split_cells(header))];
    let mut end = at + 2;
    while let Some(line) = cx.line(end) {
        if !ROW.is_match(line) {
            break;
        }
        rows.push((end, split_cells(line)));
        end += 1;
    }

    let mut counts: Vec<usize> = Vec::new();
    for (_, cells) in &rows {
        if !counts.contains(&cells.len()) {
            counts.push(cells.len());
        }
    }
    if counts.len() > 1 {
        debug!(
            "line {}: table rows have {:?} cells, reparsing lines",
            at + 1,
            counts
        );
        cx.note(ParseError::ragged_table(&counts, at + 1));
        return None;
    }

    let mut top = Block::new(BlockKind::TableTop, at + 1);
    for (n, (index, cells)) in rows.into_iter().enumerate() {
        let kind = if n == 0 {
            BlockKind::TableHeaderRow
        } else {
            BlockKind::TableRow
        };
        let mut row = Block::new(kind, index + 1);
        for cell in cells {
            row.push_block(
                Block::new(BlockKind::TableCell, index + 1).with_inlines(parse_inlines(cell, false)),
            );
        }
        top.push_block(row);
    }

    Some(Matched::new(top, Span::new(at, end)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Node;
    use crate::error::ParseErrorKind;
    use pretty_assertions::assert_eq;

    fn cell_texts(row: &Block<'_>) -> Vec<String> {
        row.children
            .iter()
            .filter_map(|c| match c {
                Node::Block(cell) => Some(
                    cell.children
                        .iter()
                        .filter_map(|i| match i {
                            Node::Inline(i) => Some(i.text()),
                            Node::Block(_) => None,
                        })
                        .collect::<String>(),
                ),
                Node::Inline(_) => None,
            })
            .collect()
    }

    fn rows<'b, 'a>(top: &'b Block<'a>) -> Vec<&'b Block<'a>> {
        top.children
            .iter()
            .filter_map(|c| match c {
                Node::Block(b) => Some(b),
                Node::Inline(_) => None,
            })
            .collect()
    }

    #[test]
    fn header_and_body_rows() {
        let lines = ["| a | b |", "|:--|--:|", "| 1 | **2** |", "|3|4|", "after"];
        let mut cx = Context::new(&lines, true);
        let m = table(&mut cx, 0).unwrap();
        assert_eq!(m.span, Span::new(0, 4));
        assert_eq!(m.block.kind, BlockKind::TableTop);

        let rows = rows(&m.block);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].kind, BlockKind::TableHeaderRow);
        assert_eq!(rows[1].kind, BlockKind::TableRow);
        assert_eq!(rows[1].linenum, 3);
        assert_eq!(cell_texts(rows[0]), vec!["a", "b"]);
        assert_eq!(cell_texts(rows[1]), vec!["1", "2"]);
        assert_eq!(cell_texts(rows[2]), vec!["3", "4"]);
    }

    #[test]
    fn ragged_rows_reject_the_whole_table() {
        let lines = ["|a|b|", "|--|--|", "|1|2|3|"];
        let mut cx = Context::new(&lines, true);
        assert!(table(&mut cx, 0).is_none());
        let errors = cx.into_errors();
        let notes: Vec<_> = errors.of_kind(ParseErrorKind::RaggedTable).collect();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].line, 1);
    }

    #[test]
    fn needs_separator_row() {
        let lines = ["|a|b|", "|1|2|"];
        let mut cx = Context::new(&lines, true);
        assert!(table(&mut cx, 0).is_none());
        assert!(cx.into_errors().is_empty());

        let lines = ["|a|b|", "---"];
        let mut cx = Context::new(&lines, true);
        assert!(table(&mut cx, 0).is_none());
    }

    #[test]
    fn header_only_table() {
        let lines = ["|x|", "|-|"];
        let mut cx = Context::new(&lines, true);
        let m = table(&mut cx, 0).unwrap();
        assert_eq!(m.span, Span::new(0, 2));
        assert_eq!(rows(&m.block).len(), 1);
    }

    #[test]
    fn split_keeps_empty_inner_cells() {
        assert_eq!(split_cells("| a || c |"), vec!["a", "", "c"]);
        assert_eq!(split_cells("  |x|  "), vec!["x"]);
    }
}
