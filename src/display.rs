/// Formats a result for humans: six decimals with trailing zeros cut,
/// scientific notation for very large or very small magnitudes.
pub fn format_number(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }
    if x.abs() > 1e10 || (x.abs() < 1e-5 && x != 0.0) {
        return format!("{:.6e}", x);
    }

    let s = format!("{:.6}", x);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Strips a `details` prefix or suffix, returning whether it was present.
pub fn split_details(input: &str) -> (bool, &str) {
    const KEYWORD: &str = "details";
    let n = KEYWORD.len();

    if let Some(rest) = input.get(n..) {
        if input[..n].eq_ignore_ascii_case(KEYWORD) && rest.starts_with(' ') {
            return (true, rest.trim());
        }
    }

    let suffix_start = input.len().checked_sub(n + 1);
    if let Some(start) = suffix_start {
        if let Some(suffix) = input.get(start..) {
            if suffix.starts_with(' ') && suffix[1..].eq_ignore_ascii_case(KEYWORD) {
                return (true, input[..start].trim());
            }
        }
    }

    (false, input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(14.0), "14");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(1.0 / 3.0), "0.333333");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(2e12), "2.000000e12");
        assert_eq!(format_number(f64::INFINITY), "inf");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn test_split_details() {
        assert_eq!(split_details("details 1 + 2"), (true, "1 + 2"));
        assert_eq!(split_details("DETAILS  x^2"), (true, "x^2"));
        assert_eq!(split_details("1 + 2 details"), (true, "1 + 2"));
        assert_eq!(split_details("1 + 2"), (false, "1 + 2"));
        assert_eq!(split_details("details"), (false, "details"));
        assert_eq!(split_details("π details"), (true, "π"));
    }
}
