pub(crate) fn normalize_label(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "").replace('_', " ");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::normalize_label;

    #[test]
    fn strips_markers_and_joins_words() {
        assert_eq!(
            normalize_label("\u{feff}FURTHER_MATHEMATICS"),
            "further mathematics"
        );
        assert_eq!(normalize_label("  Pure   Mathematics "), "pure mathematics");
    }
}
