pub const TRIVIA: &str = include_str!("../data/prompts/trivia.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

/// Build the instruction sent to the model for `count` questions on `topic`.
pub fn build_prompt(topic: &str, count: u32) -> String {
    let format_lines: String = (1..=count)
        .map(|n| format!("Q{n}: <question>\nA{n}: <answer>\n"))
        .collect();

    // Topic goes last so user text is never re-scanned for placeholders.
    render(
        TRIVIA,
        &[
            ("format", format_lines.trim_end()),
            ("count", &count.to_string()),
            ("topic", topic),
        ],
    )
}
