/// Greedy word wrap measured in characters.
///
/// Runs of whitespace (newlines included) collapse to single spaces, and a
/// word longer than `width` is broken across lines, filling whatever room is
/// left on the current line first.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        let mut rest: Vec<char> = word.chars().collect();

        while !rest.is_empty() {
            let room = if line_len == 0 { width } else { width.saturating_sub(line_len + 1) };

            if rest.len() <= room {
                if line_len > 0 {
                    line.push(' ');
                    line_len += 1;
                }
                line.extend(rest.iter());
                line_len += rest.len();
                break;
            }

            if rest.len() > width && room > 0 {
                if line_len > 0 {
                    line.push(' ');
                }
                line.extend(rest[..room].iter());
                rest.drain(..room);
            }

            lines.push(std::mem::take(&mut line));
            line_len = 0;
        }
    }

    if line_len > 0 {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_blank_text_have_no_lines() {
        assert!(wrap("", 35).is_empty());
        assert!(wrap(" \n\t ", 35).is_empty());
    }

    #[test]
    fn short_text_is_one_line() {
        assert_eq!(wrap("I love you", 35), vec!["I love you"]);
    }

    #[test]
    fn breaks_between_words() {
        assert_eq!(
            wrap("the quick brown fox jumps over", 10),
            vec!["the quick", "brown fox", "jumps over"]
        );
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(wrap("roses   are\nred", 35), vec!["roses are red"]);
    }

    #[test]
    fn long_words_are_split() {
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap("ok abcdefghij", 6), vec!["ok abc", "defghi", "j"]);
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(wrap("été été", 3), vec!["été", "été"]);
    }

    #[test]
    fn lines_never_exceed_width() {
        let text = "Every day with you is my favourite day, and tomorrow is the next favourite";
        for line in wrap(text, 35) {
            assert!(line.chars().count() <= 35, "{line:?}");
        }
    }
}
