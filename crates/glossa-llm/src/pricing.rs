/// USD per million tokens: (model prefix, input, output)
const PRICES: &[(&str, f64, f64)] = &[
    ("gpt-4o-mini", 0.15, 0.60),
    ("gpt-4o", 2.50, 10.00),
    ("gpt-4.1-nano", 0.10, 0.40),
    ("gpt-4.1-mini", 0.40, 1.60),
    ("gpt-4.1", 2.00, 8.00),
    ("gpt-3.5-turbo", 0.50, 1.50),
    ("o3-mini", 1.10, 4.40),
    ("o4-mini", 1.10, 4.40),
];

/// Estimated cost of one call; unknown models cost zero
pub fn estimate_cost(model: &str, prompt_tokens: u32, completion_tokens: u32) -> f64 {
    let model = model.to_lowercase();

    PRICES
        .iter()
        .filter(|(prefix, _, _)| model.starts_with(prefix))
        .max_by_key(|(prefix, _, _)| prefix.len())
        .map(|(_, input, output)| {
            (prompt_tokens as f64 * input + completion_tokens as f64 * output) / 1_000_000.0
        })
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_prefix_wins() {
        let mini = estimate_cost("gpt-4o-mini-2024-07-18", 1_000_000, 0);
        let full = estimate_cost("gpt-4o-2024-08-06", 1_000_000, 0);
        assert!((mini - 0.15).abs() < 1e-9);
        assert!((full - 2.50).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_model_is_free() {
        assert_eq!(estimate_cost("local-llama", 5000, 5000), 0.0);
    }
}
