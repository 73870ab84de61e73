//! Redis-style glob matching for the memory backend (`KEYS` semantics)

pub(crate) fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    match_from(&pattern, &text)
}

fn match_from(mut p: &[char], mut t: &[char]) -> bool {
    while let Some(&head) = p.first() {
        match head {
            '*' => {
                // collapse runs of '*'
                while p.first() == Some(&'*') {
                    p = &p[1..];
                }
                if p.is_empty() {
                    return true;
                }
                return (0..=t.len()).any(|skip| match_from(p, &t[skip..]));
            }
            '?' => {
                if t.is_empty() {
                    return false;
                }
                p = &p[1..];
                t = &t[1..];
            }
            '[' => {
                let Some(&ch) = t.first() else {
                    return false;
                };
                let (matched, consumed) = match_class(&p[1..], ch);
                if !matched {
                    return false;
                }
                p = &p[1 + consumed..];
                t = &t[1..];
            }
            '\\' if p.len() >= 2 => {
                if t.first() != Some(&p[1]) {
                    return false;
                }
                p = &p[2..];
                t = &t[1..];
            }
            literal => {
                if t.first() != Some(&literal) {
                    return false;
                }
                p = &p[1..];
                t = &t[1..];
            }
        }
    }
    t.is_empty()
}

/// Match `ch` against a class body (after `[`). Returns whether it matched
/// and how many pattern chars the class used, including the closing `]`.
fn match_class(body: &[char], ch: char) -> (bool, usize) {
    let mut i = 0;
    let negate = body.first() == Some(&'^');
    if negate {
        i += 1;
    }

    let mut matched = false;
    while i < body.len() && body[i] != ']' {
        if body[i] == '\\' && i + 1 < body.len() {
            matched |= body[i + 1] == ch;
            i += 2;
        } else if i + 2 < body.len() && body[i + 1] == '-' && body[i + 2] != ']' {
            let (lo, hi) = if body[i] <= body[i + 2] {
                (body[i], body[i + 2])
            } else {
                (body[i + 2], body[i])
            };
            matched |= lo <= ch && ch <= hi;
            i += 3;
        } else {
            matched |= body[i] == ch;
            i += 1;
        }
    }

    // unterminated class: treat the rest of the pattern as the class
    let consumed = if i < body.len() { i + 1 } else { i };
    (matched != negate, consumed)
}

#[cfg(test)]
mod tests {
    use super::glob_match;

    #[test]
    fn test_star_and_question() {
        assert!(glob_match("stats:abc:hits:hour:2024-03-05 *", "stats:abc:hits:hour:2024-03-05 07"));
        assert!(!glob_match("stats:abc:hits:hour:2024-03-05 *", "stats:abc:hits:hour:2024-03-06 07"));
        assert!(glob_match("h?llo", "hello"));
        assert!(!glob_match("h?llo", "hllo"));
        assert!(glob_match("*", ""));
        assert!(glob_match("a*b*c", "aXXbYYc"));
        assert!(!glob_match("a*b*c", "aXXbYY"));
    }

    #[test]
    fn test_classes() {
        assert!(glob_match("h[ae]llo", "hallo"));
        assert!(!glob_match("h[ae]llo", "hillo"));
        assert!(glob_match("h[^e]llo", "hallo"));
        assert!(!glob_match("h[^e]llo", "hello"));
        assert!(glob_match("h[a-c]llo", "hbllo"));
    }

    #[test]
    fn test_escapes() {
        assert!(glob_match("app\\[1\\]:*", "app[1]:x"));
        assert!(!glob_match("app\\[1\\]:*", "app1:x"));
        assert!(glob_match("a\\*b", "a*b"));
        assert!(!glob_match("a\\*b", "aXb"));
    }
}
