//! Unit tests for box-drawing table recognition

use mediabridge::decoder::{DecodeEvent, StreamDecoder, TableStyle};
use mediabridge::models::TableFrame;

fn frame(headers: &[&str], rows: &[&[&str]]) -> TableFrame {
    let mut frame = TableFrame::new(headers.iter().map(|h| h.to_string()).collect());
    for row in rows {
        frame
            .push_row(row.iter().map(|c| c.to_string()).collect())
            .unwrap();
    }
    frame
}

fn decode_tables(text: &str) -> Vec<TableFrame> {
    let mut decoder = StreamDecoder::new();
    decoder
        .push(text.as_bytes())
        .into_iter()
        .filter_map(|event| match event {
            DecodeEvent::Table(frame) => Some(frame),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod table_parser_tests {
    use super::*;

    #[test]
    fn test_light_table_literal() {
        let text = "\
┌───────┬─────────┐
│ Index │ Name    │
├───────┼─────────┤
│ 1     │ Pilot   │
│ 2     │ Finale  │
└───────┴─────────┘
";
        let tables = decode_tables(text);
        assert_eq!(
            tables,
            vec![frame(
                &["Index", "Name"],
                &[&["1", "Pilot"], &["2", "Finale"]]
            )]
        );
    }

    #[test]
    fn test_heavy_table_literal() {
        let text = "\
┏━━━━━━━┳━━━━━━━━━━┓
┃ Index ┃ Title    ┃
┣━━━━━━━╋━━━━━━━━━━┫
┃ 1     ┃ Episode  ┃
┗━━━━━━━┻━━━━━━━━━━┛
";
        let tables = decode_tables(text);
        assert_eq!(tables, vec![frame(&["Index", "Title"], &[&["1", "Episode"]])]);
    }

    #[test]
    fn test_mixed_border_vocabulary() {
        // Heavy header block closed with a light bottom border, the way
        // rich renders its rounded-header tables
        let text = "\
┏━━━━━━━┳━━━━━━━━┓
┃ Index ┃ Name   ┃
┡━━━━━━━╇━━━━━━━━┩
│ 1     │ Pilot  │
└───────┴────────┘
";
        let tables = decode_tables(text);
        assert_eq!(tables, vec![frame(&["Index", "Name"], &[&["1", "Pilot"]])]);
    }

    #[test]
    fn test_surrounding_text_is_not_consumed() {
        let text = format!(
            "before\n{}after\n",
            TableStyle::Light.render(&frame(&["A"], &[&["x"]]))
        );
        let mut decoder = StreamDecoder::new();
        decoder.push(text.as_bytes());
        assert!(decoder.contents().contains("before"));
        assert!(decoder.contents().contains("after"));
    }

    #[test]
    fn test_frame_requires_closing_border() {
        let text = "\
┌───────┬───────┐
│ Index │ Name  │
│ 1     │ Pilot │
";
        assert!(decode_tables(text).is_empty());
    }

    #[test]
    fn test_row_column_mismatch_discards_frame() {
        let text = "\
┌───────┬───────┐
│ Index │ Name  │
│ 1     │ a     │ extra │
└───────┴───────┘
";
        // The malformed frame is dropped without poisoning the stream
        let mut decoder = StreamDecoder::new();
        assert!(decode_tables(text).is_empty());
        let follow_up = TableStyle::Light.render(&frame(&["A"], &[&["x"]]));
        decoder.push(text.as_bytes());
        let events = decoder.push(follow_up.as_bytes());
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_style_detection() {
        assert_eq!(TableStyle::detect("┏━━┓"), Some(TableStyle::Heavy));
        assert_eq!(TableStyle::detect("┌──┐"), Some(TableStyle::Light));
        assert_eq!(TableStyle::detect("plain text"), None);
    }

    #[test]
    fn test_render_parse_identity() {
        let original = frame(
            &["Index", "Name", "Duration"],
            &[&["1", "Pilot", "45m"], &["2", "The End", "52m"]],
        );
        for style in [TableStyle::Heavy, TableStyle::Light] {
            let tables = decode_tables(&style.render(&original));
            assert_eq!(tables, vec![original.clone()], "style {:?}", style);
        }
    }

    #[test]
    fn test_season_picklist_shape() {
        let picklist = TableFrame::for_seasons(3);
        assert_eq!(picklist.headers, vec!["Index", "Season"]);
        assert_eq!(picklist.rows.len(), 3);
        assert_eq!(picklist.rows[2], vec!["3", "Stagione 3"]);
    }

    #[test]
    fn test_unicode_cell_content() {
        let text = "\
┌───────┬──────────────┐
│ Index │ Name         │
│ 1     │ Città ridotta │
└───────┴──────────────┘
";
        let tables = decode_tables(text);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows[0][1], "Città ridotta");
    }
}
