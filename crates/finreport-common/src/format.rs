//! Display formatting shared by tables, summaries, and report pages.

/// Formats a currency value with two decimals and thousands separators,
/// e.g. `$1,234,567.89`. Negative values carry a leading minus sign.
pub fn format_currency(value: f64) -> String {
    let negative = value < 0.0;
    let rounded = format!("{:.2}", value.abs());
    let (whole, frac) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));
    let grouped = group_thousands(whole);
    if negative {
        format!("-${grouped}.{frac}")
    } else {
        format!("${grouped}.{frac}")
    }
}

/// Formats a percentage with a fixed number of decimals and a trailing `%`.
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value)
}

/// Formats an integer count with thousands separators.
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let chars: Vec<char> = digits.chars().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*c);
    }
    out
}

/// Wraps text at word boundaries so that every output line fits within
/// `width` characters. Words are never split; a word longer than the budget
/// is emitted on its own line.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for raw_line in text.lines() {
        let trimmed = raw_line.trim();
        if trimmed.is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        for word in trimmed.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
            } else if current.chars().count() + 1 + word.chars().count() <= width {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(999.9), "$999.90");
        assert_eq!(format_currency(-1500.5), "-$1,500.50");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(12.3456, 2), "12.35%");
        assert_eq!(format_percent(0.0, 1), "0.0%");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(1234567), "1,234,567");
        assert_eq!(format_count(42), "42");
    }

    #[test]
    fn test_wrap_respects_width() {
        let text = "The quick brown fox jumps over the lazy dog near the riverbank at dawn";
        let lines = wrap_text(text, 20);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.chars().count() <= 20, "line too long: {line}");
        }
    }

    #[test]
    fn test_wrap_never_splits_words() {
        let text = "alpha beta gamma delta epsilon";
        let lines = wrap_text(text, 12);
        let rejoined: Vec<&str> = lines.iter().flat_map(|l| l.split_whitespace()).collect();
        assert_eq!(rejoined, vec!["alpha", "beta", "gamma", "delta", "epsilon"]);
    }

    #[test]
    fn test_wrap_overlong_word_gets_own_line() {
        let lines = wrap_text("a pneumonoultramicroscopic b", 10);
        assert_eq!(lines[1], "pneumonoultramicroscopic");
        assert_eq!(lines[0], "a");
        assert_eq!(lines[2], "b");
    }

    #[test]
    fn test_wrap_preserves_blank_lines() {
        let lines = wrap_text("first\n\nsecond", 80);
        assert_eq!(lines, vec!["first", "", "second"]);
    }
}
