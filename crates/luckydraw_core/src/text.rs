//! Text layout.
//!
//! Greedy, character-at-a-time wrapping against a bound that may change
//! with the line index. Measuring is the host's job, so callers pass a
//! measure function in.

/// Removes literal line breaks. Wrapping recomputes every break itself.
#[must_use]
pub fn strip_line_breaks(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '\n' | '\r')).collect()
}

/// Breaks `text` into lines.
///
/// With `wrap` off, lines come from literal `\n` breaks only. With `wrap`
/// on, line breaks are stripped and characters are appended one at a time;
/// when the accumulated width exceeds `bound(lines_so_far)` the last character
/// moves to a fresh line. A character that is wider than the bound on its own
/// still becomes a line by itself.
///
/// Empty input yields a single empty line.
pub fn layout_lines<M, B>(text: &str, wrap: bool, mut measure: M, mut bound: B) -> Vec<String>
where
    M: FnMut(&str) -> f64,
    B: FnMut(usize) -> f64,
{
    if !wrap {
        return text.split('\n').map(str::to_owned).collect();
    }

    let text = strip_line_breaks(text);
    let mut lines = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        current.push(c);
        if measure(&current) > bound(lines.len()) {
            current.pop();
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current.push(c);
            // Re-check the lone character against the bound of its own line.
            if measure(&current) > bound(lines.len()) {
                lines.push(std::mem::take(&mut current));
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(text);
    }
    lines
}

/// X offset that centers a line of `width` on the origin.
#[inline]
#[must_use]
pub fn centered_x(width: f64) -> f64 {
    -width / 2.0
}

/// Baseline of line `index` stacked below `top`.
#[inline]
#[must_use]
pub fn baseline(top: f64, line_height: f64, index: usize) -> f64 {
    top + (index as f64 + 1.0) * line_height
}

#[cfg(test)]
mod tests {
    use super::*;

    // Ten pixels per character.
    fn mono(s: &str) -> f64 {
        s.chars().count() as f64 * 10.0
    }

    #[test]
    fn test_wrap_at_constant_bound() {
        let lines = layout_lines("abcdefg", true, mono, |_| 30.0);
        assert_eq!(lines, vec!["abc", "def", "g"]);
    }

    #[test]
    fn test_wrap_with_shrinking_bound() {
        let lines = layout_lines("abcdefgh", true, mono, |line| 40.0 - 10.0 * line as f64);
        assert_eq!(lines, vec!["abcd", "efg", "h"]);
    }

    #[test]
    fn test_wrap_strips_breaks() {
        let lines = layout_lines("ab\ncd", true, mono, |_| 100.0);
        assert_eq!(lines, vec!["abcd"]);
    }

    #[test]
    fn test_oversized_character_gets_own_line() {
        let lines = layout_lines("abc", true, mono, |_| 5.0);
        assert_eq!(lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_no_wrap_splits_on_breaks_only() {
        let lines = layout_lines("first\n\nthird", false, mono, |_| 1.0);
        assert_eq!(lines, vec!["first", "", "third"]);
    }

    #[test]
    fn test_empty_text_is_one_empty_line() {
        assert_eq!(layout_lines("", true, mono, |_| 10.0), vec![String::new()]);
    }

    #[test]
    fn test_positions() {
        assert_eq!(centered_x(40.0), -20.0);
        assert_eq!(baseline(5.0, 20.0, 0), 25.0);
        assert_eq!(baseline(5.0, 20.0, 2), 65.0);
    }
}
