//! Landmark frame input. The detector is an external process; it writes
//! one JSON object per line: `{"hands": [[{"x":..,"y":..,"z":..}, ...]]}`.

use std::io::BufRead;

use serde::Deserialize;

use crate::landmarks::{Hand, Landmark};

/// One detector frame as it arrives on the wire: zero or more candidate
/// hands, each a flat landmark list, not yet validated.
#[derive(Debug, Default, Deserialize)]
pub struct RawFrame {
    #[serde(default)]
    pub hands: Vec<Vec<Landmark>>,
}

/// Parse one frame line into validated hands. A line that is not valid
/// JSON, and any hand with the wrong landmark count or out-of-range
/// coordinates, degrades to "no hand" rather than an error; the stream
/// recovers on the next frame.
pub fn parse_frame(line: &str) -> Vec<Hand> {
    let raw: RawFrame = match serde_json::from_str(line) {
        Ok(raw) => raw,
        Err(_) => return Vec::new(),
    };
    raw.hands
        .iter()
        .filter_map(|points| Hand::from_points(points))
        .collect()
}

/// Pulls frames off a buffered reader, one JSON line at a time.
pub struct FrameSource<R> {
    reader: R,
}

impl<R: BufRead> FrameSource<R> {
    pub fn new(reader: R) -> Self {
        FrameSource { reader }
    }

    /// Next frame, or `None` at end of input. Blank lines are skipped.
    pub fn next_frame(&mut self) -> Option<Vec<Hand>> {
        let mut line = String::new();
        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) | Err(_) => return None,
                Ok(_) => {}
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            return Some(parse_frame(trimmed));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn frame_json(points: usize) -> String {
        let hand: Vec<String> = (0..points).map(|_| r#"{"x":0.5,"y":0.5}"#.to_string()).collect();
        format!(r#"{{"hands":[[{}]]}}"#, hand.join(","))
    }

    #[test]
    fn valid_frame_yields_a_hand() {
        let hands = parse_frame(&frame_json(21));
        assert_eq!(hands.len(), 1);
    }

    #[test]
    fn bad_json_degrades_to_no_hand() {
        assert!(parse_frame("not json").is_empty());
        assert!(parse_frame(r#"{"hands": "nope"}"#).is_empty());
    }

    #[test]
    fn invalid_hands_are_filtered_out() {
        assert!(parse_frame(&frame_json(20)).is_empty());
        let out_of_range = r#"{"hands":[[{"x":7.0,"y":0.5}]]}"#;
        assert!(parse_frame(out_of_range).is_empty());
    }

    #[test]
    fn empty_and_missing_hands_are_fine() {
        assert!(parse_frame(r#"{"hands":[]}"#).is_empty());
        assert!(parse_frame(r#"{}"#).is_empty());
    }

    #[test]
    fn source_walks_lines_and_stops_at_eof() {
        let input = format!("\n{}\nnot json\n", frame_json(21));
        let mut source = FrameSource::new(Cursor::new(input));
        assert_eq!(source.next_frame().map(|h| h.len()), Some(1));
        assert_eq!(source.next_frame().map(|h| h.len()), Some(0));
        assert!(source.next_frame().is_none());
    }

    #[test]
    fn depth_field_is_optional() {
        let with_z = r#"{"x":0.5,"y":0.5,"z":-0.02}"#;
        let hand: Vec<String> = (0..21).map(|_| with_z.to_string()).collect();
        let line = format!(r#"{{"hands":[[{}]]}}"#, hand.join(","));
        assert_eq!(parse_frame(&line).len(), 1);
    }
}
