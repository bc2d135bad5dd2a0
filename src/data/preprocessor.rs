// ============================================================
// Layer 4 — Text Preprocessor
// ============================================================
// Cleans raw query text before tokenisation.
//
// Customer queries arrive copy-pasted from emails and chat
// windows, so they carry non-breaking spaces, zero-width spaces,
// tabs and the occasional control character. If we don't clean
// these, the tokenizer treats them as meaningful tokens and maps
// perfectly ordinary words to [UNK].
//
// Cleaning steps (applied in order):
//   1. Replace Unicode whitespace variants with plain space
//   2. Remove invisible control characters
//   3. Collapse runs of spaces into one
//   4. Trim leading/trailing whitespace

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Clean one query string for downstream tokenisation.
    pub fn clean(&self, text: &str) -> String {
        let normalised: String = text
            .chars()
            .map(|c| match c {
                '\t' | '\r' | '\n' => ' ',
                '\u{00A0}' | '\u{200B}' | '\u{FEFF}' => ' ',
                c if c.is_control() => ' ',
                c => c,
            })
            .collect();

        // Collapse consecutive spaces — queries are single-line,
        // so there are no paragraph breaks worth keeping.
        let mut out = String::with_capacity(normalised.len());
        let mut last_space = false;
        for c in normalised.chars() {
            if c == ' ' {
                if !last_space {
                    out.push(' ');
                }
                last_space = true;
            } else {
                out.push(c);
                last_space = false;
            }
        }

        out.trim().to_string()
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_multiple_spaces() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("printer   not   working"), "printer not working");
    }

    #[test]
    fn test_trims_edges() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("  monitor flicker  "), "monitor flicker");
    }

    #[test]
    fn test_removes_control_chars_and_newlines() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("scanner\x01jam\nagain"), "scanner jam again");
    }

    #[test]
    fn test_empty_string() {
        let p = Preprocessor::new();
        assert_eq!(p.clean(""), "");
    }
}
