//! Split/Join Transform
//!
//! Pure string transforms behind `/split` and `/join`. Positions are
//! 1-indexed, so the first character lands in `odd`.

/// Splits `input` into characters at odd and even positions.
///
/// Relative order is preserved inside each bucket.
pub fn split(input: &str) -> (Vec<String>, Vec<String>) {
    let mut odd = Vec::with_capacity(input.len() / 2 + 1);
    let mut even = Vec::with_capacity(input.len() / 2);

    for (index, ch) in input.chars().enumerate() {
        // index is 0-based: index 0 is position 1 (odd)
        if index % 2 == 0 {
            odd.push(ch.to_string());
        } else {
            even.push(ch.to_string());
        }
    }

    (odd, even)
}

/// Interleaves `odd` and `even` back into one string.
///
/// Walks `max(len(odd), len(even))` slots, appending `odd[i]` then
/// `even[i]`. A slot that is out of range on either side contributes
/// nothing.
pub fn join<S: AsRef<str>>(odd: &[S], even: &[S]) -> String {
    let max_length = odd.len().max(even.len());
    let mut output = String::new();

    for index in 0..max_length {
        if let Some(part) = odd.get(index) {
            output.push_str(part.as_ref());
        }
        if let Some(part) = even.get(index) {
            output.push_str(part.as_ref());
        }
    }

    output
}
