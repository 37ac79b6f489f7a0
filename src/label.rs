//! Node label wrapping.
//!
//! Labels are packed greedily, word by word, into at most `max_lines` lines
//! of at most `max_line_length` characters. When words remain after the last
//! permitted line, that line is closed with [`ELLIPSIS`].

/// Truncation marker appended to the last line of a clipped label.
pub const ELLIPSIS: &str = "...";

/// Wrap `text` into at most `max_lines` lines.
///
/// Character counts are in Unicode scalar values. A word longer than
/// `max_line_length` is placed on its own line and clipped, closed with the
/// marker. No line ever exceeds `max_line_length`: below 3 characters the
/// marker itself is shortened (`"."`, `".."`).
pub fn wrap_label(text: &str, max_line_length: usize, max_lines: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    if max_lines == 0 || max_line_length == 0 {
        return lines;
    }

    let mut line = String::new();
    let mut line_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let needed = if line_len == 0 { word_len } else { line_len + 1 + word_len };

        if needed > max_line_length && line_len > 0 {
            if lines.len() + 1 == max_lines {
                lines.push(with_ellipsis(&line, line_len, max_line_length));
                return lines;
            }
            lines.push(std::mem::take(&mut line));
            line_len = 0;
        }

        if line_len > 0 {
            line.push(' ');
            line_len += 1;
        }
        if word_len > max_line_length {
            line.push_str(&with_ellipsis(word, word_len, max_line_length));
            line_len += max_line_length;
        } else {
            line.push_str(word);
            line_len += word_len;
        }
    }

    if line_len > 0 {
        lines.push(line);
    }
    lines
}

/// Close a truncated line: append the marker when it fits, otherwise cut
/// the line's tail so line + marker stays within the limit.
fn with_ellipsis(line: &str, line_len: usize, max_line_length: usize) -> String {
    let marker = ELLIPSIS.len().min(max_line_length);
    let keep = line_len.min(max_line_length - marker);
    let mut out: String = line.chars().take(keep).collect();
    out.push_str(&ELLIPSIS[..marker]);
    out
}
