//! Operator-facing ASCII banner rendering

/// Render the given lines inside an ASCII box. Every content line is padded
/// on the right to the width of the longest line, with `padding` spaces
/// between the text and the `|` borders.
pub fn ascii_box(lines: &[&str], padding: usize) -> Vec<String> {
    let max_len = lines.iter().map(|line| line.len()).max().unwrap_or(0);
    let spacer = " ".repeat(padding);
    let border = format!("+{}+", "-".repeat(max_len + padding * 2));

    let mut box_lines = Vec::with_capacity(lines.len() + 2);
    box_lines.push(border.clone());
    for line in lines {
        box_lines.push(format!(
            "|{spacer}{line}{}{spacer}|",
            " ".repeat(max_len - line.len())
        ));
    }
    box_lines.push(border);
    box_lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_width() {
        let rendered = ascii_box(&["a", "bb"], 1);
        // max(len) + 2*padding + 2 border characters
        assert_eq!(rendered[0].len(), 2 + 2 + 2);
        assert_eq!(rendered[0], "+----+");
        assert_eq!(rendered.last().unwrap(), &rendered[0]);
    }

    #[test]
    fn test_content_lines_padded_to_equal_width() {
        let rendered = ascii_box(&["a", "bb"], 1);
        assert_eq!(rendered[1], "| a  |");
        assert_eq!(rendered[2], "| bb |");
        for line in &rendered {
            assert_eq!(line.len(), rendered[0].len());
        }
    }

    #[test]
    fn test_empty_input() {
        let rendered = ascii_box(&[], 2);
        assert_eq!(rendered, vec!["+----+", "+----+"]);
    }
}
