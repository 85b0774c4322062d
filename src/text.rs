const ELLIPSIS: &str = "...";

/// Cuts `text` to `max_chars` characters and appends an ellipsis when it was longer.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Greedy word wrap into at most `max_lines` lines of `max_chars` characters.
///
/// Words are split on single spaces. A word longer than a line gets a line of
/// its own. When words are left over the last line ends in an ellipsis.
pub fn wrap_text(text: &str, max_chars: usize, max_lines: usize) -> Vec<String> {
    if text.is_empty() || max_lines == 0 {
        return Vec::new();
    }

    let words: Vec<&str> = text.split(' ').collect();
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in &words {
        let candidate = if current.is_empty() {
            (*word).to_string()
        } else {
            format!("{current} {word}")
        };
        if candidate.chars().count() <= max_chars {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            if lines.len() >= max_lines {
                break;
            }
        }
        current = (*word).to_string();
    }
    if !current.is_empty() && lines.len() < max_lines {
        lines.push(current);
    }

    let placed_words = lines.join(" ").split(' ').count();
    if lines.len() == max_lines && words.len() > placed_words {
        if let Some(last) = lines.last_mut() {
            let keep = max_chars.saturating_sub(ELLIPSIS.len());
            if last.chars().count() > keep {
                *last = last.chars().take(keep).collect();
            }
            last.push_str(ELLIPSIS);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_long_titles() {
        assert_eq!(truncate_text("short", 25), "short");
        assert_eq!(truncate_text("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn wraps_into_lines() {
        let lines = wrap_text("the quick brown fox jumps over", 10, 3);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps over"]);
    }

    #[test]
    fn marks_overflow_with_ellipsis() {
        let lines = wrap_text("one two three four five six seven eight", 9, 2);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "one two");
        assert_eq!(lines[1], "three...");
    }

    #[test]
    fn empty_text_has_no_lines() {
        assert!(wrap_text("", 25, 3).is_empty());
    }

    #[test]
    fn long_word_gets_its_own_line() {
        let lines = wrap_text("a supercalifragilistic b", 8, 3);
        assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
    }
}
