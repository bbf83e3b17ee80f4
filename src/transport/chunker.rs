//! Splits long messages into transport-sized, sequence-tagged chunks.

/// Splits `text` into chunks whose bodies stay within `max_len` bytes, each
/// prefixed with `"(i/N) "`.
///
/// Words are packed greedily: the running buffer keeps a trailing space, and
/// a word is added only while `buffer + word + 1` fits the budget. The
/// sequence prefix is not counted against `max_len`. A single word longer
/// than `max_len` becomes its own over-long chunk and is never split
/// mid-word.
///
/// Empty or whitespace-only input yields no chunks.
pub fn split_message(text: &str, max_len: usize) -> Vec<String> {
    let mut bodies: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.len() + word.len() + 1 <= max_len {
            current.push_str(word);
            current.push(' ');
        } else {
            if !current.is_empty() {
                bodies.push(current.trim_end().to_string());
            }
            current = format!("{} ", word);
        }
    }
    if !current.is_empty() {
        bodies.push(current.trim_end().to_string());
    }

    let total = bodies.len();
    bodies
        .into_iter()
        .enumerate()
        .map(|(i, body)| format!("({}/{}) {}", i + 1, total, body))
        .collect()
}
