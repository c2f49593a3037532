/// Derives a visible label from a trigger's title, which is usually a file
/// name such as `yakuza_anger.mp3`.
///
/// The extension is dropped, underscores become spaces, `kajinoN` becomes
/// `カジノN`, and labels without Japanese characters get their words
/// capitalized.
pub fn derive_label(title: &str) -> String {
    let stem = match title.rfind('.') {
        Some(index) if index + 1 < title.len() => &title[..index],
        _ => title,
    };
    let label = stem.replace('_', " ");

    if let Some(number) = kajino_number(&label) {
        return format!("カジノ{number}");
    }

    if label.chars().any(is_japanese) {
        label
    } else {
        capitalize_words(&label)
    }
}

fn kajino_number(label: &str) -> Option<&str> {
    let prefix = label.get(..6)?;
    let number = &label[6..];
    (prefix.eq_ignore_ascii_case("kajino")
        && !number.is_empty()
        && number.chars().all(|c| c.is_ascii_digit()))
    .then_some(number)
}

fn is_japanese(c: char) -> bool {
    matches!(c, '\u{3000}'..='\u{303F}' | '\u{3040}'..='\u{30FF}' | '\u{4E00}'..='\u{9FFF}')
}

fn capitalize_words(label: &str) -> String {
    let mut at_word_start = true;
    label
        .chars()
        .map(|c| {
            let mapped = if at_word_start { c.to_ascii_uppercase() } else { c };
            at_word_start = c.is_whitespace();
            mapped
        })
        .collect()
}
