//! Number formatting and escaping shared by the chart and table renderers.

const SIGNIFICANT_DIGITS: i32 = 6;

/// Format a float like C's `%g`: six significant digits, trailing zeros
/// removed, scientific notation for very small or very large magnitudes.
pub fn format_g(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    // Round to the significant digits first so 999999.5 picks the right branch.
    let scientific = format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if exponent < -4 || exponent >= SIGNIFICANT_DIGITS {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.abs()
        )
    } else {
        let decimals = (SIGNIFICANT_DIGITS - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

/// Escape text for use inside SVG/XML content and attributes
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape LaTeX special characters
pub fn escape_latex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '~' => escaped.push_str("\\textasciitilde{}"),
            '^' => escaped.push_str("\\^{}"),
            '\\' => escaped.push_str("\\textbackslash{}"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0.0, "0")]
    #[test_case(1.0, "1")]
    #[test_case(10.0, "10")]
    #[test_case(12.5, "12.5")]
    #[test_case(0.1, "0.1")]
    #[test_case(1.0 / 3.0, "0.333333")]
    #[test_case(123456.0, "123456")]
    #[test_case(1234567.0, "1.23457e+06")]
    #[test_case(0.0001, "0.0001")]
    #[test_case(0.00001234, "1.234e-05")]
    #[test_case(-2.5, "-2.5")]
    #[test_case(f64::INFINITY, "inf")]
    fn test_format_g(value: f64, expected: &str) {
        assert_eq!(format_g(value), expected);
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }

    #[test]
    fn test_escape_latex() {
        assert_eq!(escape_latex("# Bodies"), "\\# Bodies");
        assert_eq!(escape_latex("50% of x_1"), "50\\% of x\\_1");
    }
}
