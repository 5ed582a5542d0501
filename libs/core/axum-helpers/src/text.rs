/// Uppercase the first character of every whitespace-separated word.
///
/// The rest of each word is left as typed, so `"iPhone case"` becomes `"IPhone Case"`
/// and `"perfume 01"` becomes `"Perfume 01"`. Whitespace is preserved as is.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;

    for ch in input.chars() {
        if ch.is_whitespace() {
            at_word_start = true;
            out.push(ch);
        } else if at_word_start {
            at_word_start = false;
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
    }

    out
}
