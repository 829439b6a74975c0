/// Turns a reason code or fragment into a sentence.
///
/// Snake-case codes become capitalized, space-separated words. Prose (anything
/// already containing whitespace) only has its first letter capitalized. A
/// trailing period is added unless the text already ends in terminal
/// punctuation. `missing_noi_inputs` becomes `Missing Noi Inputs.`
pub fn to_sentence(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut sentence = if trimmed.contains(char::is_whitespace) {
        capitalize(trimmed)
    } else {
        trimmed
            .split(['_', '-'])
            .filter(|word| !word.is_empty())
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" ")
    };
    if sentence.is_empty() {
        return sentence;
    }
    if !sentence.ends_with(['.', '!', '?']) {
        sentence.push('.');
    }
    sentence
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-cased, with every run of non-alphanumerics collapsed to `_`.
///
/// Used to key canned copy: `Base Case - Break Condition` and
/// `base_case_break_condition` share a key.
pub fn normalize_key(raw: &str) -> String {
    let mut key = String::with_capacity(raw.len());
    for ch in raw.trim().chars() {
        if ch.is_alphanumeric() {
            key.extend(ch.to_lowercase());
        } else if !key.is_empty() && !key.ends_with('_') {
            key.push('_');
        }
    }
    while key.ends_with('_') {
        key.pop();
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_becomes_a_sentence() {
        assert_eq!(to_sentence("missing_noi_inputs"), "Missing Noi Inputs.");
        assert_eq!(to_sentence("  cap-rate_not_supplied "), "Cap Rate Not Supplied.");
        assert_eq!(to_sentence("rents"), "Rents.");
    }

    #[test]
    fn prose_is_kept_and_terminated_once() {
        assert_eq!(to_sentence("already a sentence."), "Already a sentence.");
        assert_eq!(to_sentence("Keep under_score words"), "Keep under_score words.");
        assert_eq!(to_sentence("Why?"), "Why?");
        assert_eq!(to_sentence("   "), "");
    }

    #[test]
    fn keys_collapse_punctuation() {
        assert_eq!(normalize_key("Base Case - Break Condition"), "base_case_break_condition");
        assert_eq!(normalize_key("base_case_break_condition"), "base_case_break_condition");
        assert_eq!(normalize_key("__x__"), "x");
    }
}
