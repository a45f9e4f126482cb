use std::io::{self, Write};

use article::language_name;

/// Reads one line from stdin, `None` once stdin is closed.
pub fn input(prompt: &str) -> io::Result<Option<String>> {
    let mut line = String::new();
    print!("{prompt}");
    io::stdout().flush()?;
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Splits `Haus ru` into the word and an optional trailing language code.
/// Only codes with a known language name are split off.
pub fn split_word_and_language(line: &str) -> (&str, Option<&str>) {
    let line = line.trim();
    if let Some((word, language)) = line.rsplit_once(char::is_whitespace) {
        let language = language.trim();
        if is_language_code(language) {
            return (word.trim(), Some(language));
        }
    }
    (line, None)
}

fn is_language_code(candidate: &str) -> bool {
    let primary = candidate.split(['-', '_']).next().unwrap_or_default();
    !primary.is_empty() && language_name(primary) != primary
}
