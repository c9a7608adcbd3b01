/// Splits one line of comma-delimited text into fields.
///
/// Double quotes toggle quoted mode, inside which commas are literal and a
/// doubled quote yields one literal quote. The final field is always emitted.
/// An unbalanced quote leaves the rest of the line quoted.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }

    fields.push(current);
    fields
}

/// Converts a raw numeric field to a count, treating anything unusable as 0.
///
/// Thousands separators and surrounding whitespace are ignored; fractional
/// values truncate toward zero.
pub fn coerce_count(raw: &str) -> u64 {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return 0;
    }

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value as u64,
        _ => 0,
    }
}
