// Chunk: docs/chunks/line_buffer - Rows of display units for the highlighting engine

//! Integration tests for the line buffer and line index.
//!
//! Providers report positions through [`LineIndex`]; the mapper walks the
//! rows of [`LineBuffer`]. These tests check that both agree on what a line
//! and a column are.

use psedit_buffer::{LineBuffer, LineIndex, TextPos, UnitWidth};

#[test]
fn test_rows_and_index_agree_on_line_count() {
    for text in ["", "a", "a\n", "a\r\nb", "\n\n", "x\ny\r\nz\n"] {
        let rows = LineBuffer::split(text);
        let index = LineIndex::new(text);
        assert_eq!(rows.row_count(), index.line_count(), "text {text:?}");
    }
}

#[test]
fn test_rows_and_index_agree_on_line_content() {
    let text = "first\r\n\tsecond\nthird 漢字";
    let rows = LineBuffer::split(text);
    let index = LineIndex::new(text);

    for line in 0..rows.row_count() {
        assert_eq!(Some(rows.row(line).text().as_str()), index.line_text(line));
    }
}

#[test]
fn test_index_columns_address_row_units() {
    let text = "ab\n\té漢x";
    let rows = LineBuffer::split(text);
    let index = LineIndex::new(text);

    // Byte offset of 'x' on line 2
    let offset = text.find('x').unwrap();
    let pos = index.position(offset);
    assert_eq!(pos, TextPos::new(2, 4));

    let unit = rows.row(pos.line - 1).units()[pos.column - 1];
    assert_eq!(unit.ch, 'x');
    assert_eq!(pos.to_position().col, pos.column - 1);
}

#[test]
fn test_display_width_of_mixed_row() {
    let rows = LineBuffer::split("\té漢x");
    let row = rows.row(0);

    let widths: Vec<UnitWidth> = row.units().iter().map(|u| u.width).collect();
    assert_eq!(
        widths,
        vec![UnitWidth::Tab, UnitWidth::Narrow, UnitWidth::Wide, UnitWidth::Narrow]
    );
    assert_eq!(row.display_width(4), 4 + 1 + 2 + 1);
    assert_eq!(row.display_width(2), 2 + 1 + 2 + 1);
}

#[test]
fn test_offset_round_trips_through_position() {
    let text = "key: 'värde'\n  - item";
    let index = LineIndex::new(text);
    for (offset, _) in text.char_indices() {
        assert_eq!(index.offset(index.position(offset)), offset);
    }
}
