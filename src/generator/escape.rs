/// Escape the characters LaTeX treats specially in running text.
///
/// Each of `& $ % # _ { }` is prefixed with a single backslash. The input is
/// walked once, so a backslash written for one character is never escaped again.
pub fn escape_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 8);

    for c in text.chars() {
        match c {
            '&' | '$' | '%' | '#' | '_' | '{' | '}' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }

    result
}
