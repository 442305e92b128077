/// Parse and validate a namespace prefix.
///
/// The prefix starts every generated identifier, so it must be a valid
/// JavaScript identifier start: a letter, `_` or `$`, then letters, digits,
/// `_` or `$`.
///
/// # Errors
///
/// Returns an error message if the prefix cannot start an identifier.
pub fn parse_namespace_prefix(s: &str) -> Result<String, String> {
    let Some(first) = s.chars().next() else {
        return Err("Namespace prefix cannot be empty".to_string());
    };

    if !first.is_ascii_alphabetic() && first != '_' && first != '$' {
        return Err(format!(
            "Namespace prefix must start with a letter, underscore, or dollar sign: '{s}'"
        ));
    }

    if let Some(bad) = s
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && *c != '_' && *c != '$')
    {
        return Err(format!("Namespace prefix cannot contain '{bad}': '{s}'"));
    }

    Ok(s.to_string())
}
