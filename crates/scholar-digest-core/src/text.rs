/// Splits `text` into a short first line and the rest without breaking words.
///
/// The cut lands on a Unicode whitespace boundary when one falls within
/// `lookahead` runes of `n`, and hard-cuts at the `n + lookahead` rune
/// boundary otherwise (bounded work even for pathological whitespace-free
/// input). Operates on code points, never bytes, so multi-byte scripts
/// survive intact.
pub fn separate_first_line(text: &str, n: usize, lookahead: usize) -> (String, String) {
    let text = text.replace('\n', "");
    if text.len() < n {
        // byte length: anything this short cannot need a split
        return (text, String::new());
    }

    let mut runes = 0; // runes consumed so far
    let mut end = 0; // byte offset just past the last consumed rune
    let mut last_space = 0; // rune count at the last whitespace seen
    let mut last_space_end = 0; // byte offset just past that whitespace
    for (pos, ch) in text.char_indices() {
        if runes >= n + lookahead {
            break;
        }
        end = pos + ch.len_utf8();
        if ch.is_whitespace() {
            last_space = runes;
            last_space_end = end;
        }
        runes += 1;
    }

    let mut cut = end;
    if n.abs_diff(last_space) < lookahead {
        // whitespace in the lookahead neighborhood of the nth rune
        cut = last_space_end;
    }
    let (first, rest) = text.split_at(cut);
    (first.trim_end().to_string(), rest.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    // (text, n, lookahead, first, rest)
    const CASES: &[(&str, usize, usize, &str, &str)] = &[
        ("й", 2, 2, "й", ""),
        ("abcd", 2, 2, "abcd", ""),
        ("abcdef", 2, 2, "abcd", "ef"),
        ("ab cdef", 2, 2, "ab", "cdef"),
        (
            "Многие методы преобразования программ (включая суперкомпиляцию и насыщение равенствами) можно сформулировать в виде набора правил переписывания графов или термов, применяемых в некотором порядке …",
            80,
            10,
            "Многие методы преобразования программ (включая суперкомпиляцию и насыщение равенствами)",
            "можно сформулировать в виде набора правил переписывания графов или термов, применяемых в некотором порядке …",
        ),
    ];

    #[test]
    fn first_line_separation() {
        for (i, (text, n, lookahead, first, rest)) in CASES.iter().enumerate() {
            let (got_first, got_rest) = separate_first_line(text, *n, *lookahead);
            assert_eq!(&got_first, first, "case {i}");
            assert_eq!(&got_rest, rest, "case {i}");
        }
    }

    #[test]
    fn embedded_newlines_are_stripped() {
        let (first, rest) = separate_first_line("ab\ncd", 10, 2);
        assert_eq!(first, "abcd");
        assert_eq!(rest, "");
    }

    #[test]
    fn empty_input() {
        assert_eq!(separate_first_line("", 80, 10), (String::new(), String::new()));
    }
}
