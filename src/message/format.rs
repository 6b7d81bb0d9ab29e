//! Printf-style positional formatting.
//!
//! Placeholders follow `%[flags][width][.precision]verb`. Supported verbs:
//!
//! | Verb | Meaning                                         |
//! |------|-------------------------------------------------|
//! | `%v` | default representation of any argument          |
//! | `%s` | string                                          |
//! | `%d` | integer (a `char` renders as its code point)    |
//! | `%f` | float, 6 decimals unless a precision is given   |
//! | `%g` | float, shortest representation; a precision sets the significant digits |
//! | `%t` | boolean                                         |
//! | `%q` | quoted string or char                           |
//! | `%x` / `%X` | hex integer, or hex bytes of a string    |
//! | `%c` | char (an integer renders as that code point)    |
//! | `%%` | literal percent sign                            |
//!
//! Flags: `-` pads on the right, `0` pads numbers with zeros.
//!
//! `%g` and `%v` switch to exponent form (`1.23e+03`) when the decimal
//! exponent is below -4 or at least the precision (6 when none is given).
//!
//! Formatting never fails. Mismatches render as visible markers in the output:
//! `%!d(string=abc)` for a wrong verb, `%!v(MISSING)` for a missing argument,
//! `%!(EXTRA int=3)` for unused arguments and `%!(NOVERB)` for a trailing `%`.
//! A width or precision above one million renders `%!(BADWIDTH)` or
//! `%!(BADPREC)` and is ignored.

use std::fmt::Write;

use crate::message::Arg;

/// Largest accepted width or precision.
const MAX_WIDTH: usize = 1_000_000;

#[derive(Debug, Default, Clone, Copy)]
struct Directive {
    left: bool,
    zero: bool,
    plus: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

/// Format `pattern` with positional `args`.
pub fn sprintf(pattern: &str, args: &[Arg]) -> String {
    let mut out = String::with_capacity(pattern.len() + 16 * args.len());
    let mut chars = pattern.chars().peekable();
    let mut next_arg = 0;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let mut directive = Directive::default();
        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => directive.left = true,
                '0' => directive.zero = true,
                '+' => directive.plus = true,
                _ => break,
            }
            chars.next();
        }
        directive.width = read_number(&mut chars);
        if directive.width.is_some_and(|width| width > MAX_WIDTH) {
            out.push_str("%!(BADWIDTH)");
            directive.width = None;
        }
        if chars.peek() == Some(&'.') {
            chars.next();
            let precision = read_number(&mut chars).unwrap_or(0);
            if precision > MAX_WIDTH {
                out.push_str("%!(BADPREC)");
            } else {
                directive.precision = Some(precision);
            }
        }

        let Some(verb) = chars.next() else {
            out.push_str("%!(NOVERB)");
            break;
        };

        if verb == '%' {
            out.push('%');
            continue;
        }

        match args.get(next_arg) {
            Some(arg) => {
                next_arg += 1;
                match render(verb, arg, directive) {
                    Some(text) => pad(&mut out, &text, directive, is_numeric(arg)),
                    None => {
                        let _ = write!(out, "%!{}({}={})", verb, arg.type_name(), arg);
                    }
                }
            }
            None => {
                let _ = write!(out, "%!{}(MISSING)", verb);
            }
        }
    }

    if next_arg < args.len() {
        let extra: Vec<String> = args[next_arg..]
            .iter()
            .map(|arg| format!("{}={}", arg.type_name(), arg))
            .collect();
        let _ = write!(out, "%!(EXTRA {})", extra.join(", "));
    }

    out
}

fn read_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(d as usize));
        chars.next();
    }
    value
}

fn is_numeric(arg: &Arg) -> bool {
    matches!(arg, Arg::Int(_) | Arg::Uint(_) | Arg::Float(_))
}

fn signed<T: std::fmt::Display>(value: T, negative: bool, directive: Directive) -> String {
    let text = value.to_string();
    if directive.plus && !negative && !text.starts_with('+') {
        format!("+{}", text)
    } else {
        text
    }
}

fn non_finite(x: f64) -> Option<&'static str> {
    if x.is_nan() {
        Some("NaN")
    } else if x.is_infinite() {
        Some(if x > 0.0 { "+Inf" } else { "-Inf" })
    } else {
        None
    }
}

fn fixed(x: f64, precision: usize) -> String {
    match non_finite(x) {
        Some(text) => text.to_string(),
        None => format!("{:.*}", precision, x),
    }
}

/// `%g`: `precision` significant digits (shortest round-trip when `None`),
/// trailing zeros dropped.
fn general(x: f64, precision: Option<usize>) -> String {
    if let Some(text) = non_finite(x) {
        return text.to_string();
    }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let scientific = match precision {
        Some(p) => format!("{:.*e}", p.max(1) - 1, x),
        None => format!("{:e}", x),
    };
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i64 = exponent.parse().unwrap_or(0);
    let mantissa = if mantissa.contains('.') {
        mantissa.trim_end_matches('0').trim_end_matches('.')
    } else {
        mantissa
    };

    let limit = precision.map_or(6, |p| p.max(1) as i64);
    if exponent < -4 || exponent >= limit {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantissa, sign, exponent.unsigned_abs());
    }

    match precision {
        None => x.to_string(),
        Some(_) => {
            let digits = mantissa.chars().filter(char::is_ascii_digit).count() as i64;
            let decimals = (digits - exponent - 1).max(0) as usize;
            format!("{:.*}", decimals, x)
        }
    }
}

fn render(verb: char, arg: &Arg, directive: Directive) -> Option<String> {
    let text = match (verb, arg) {
        ('v', Arg::Float(x)) | ('g', Arg::Float(x)) => {
            signed(general(*x, directive.precision), *x < 0.0, directive)
        }
        ('v', Arg::Int(n)) | ('d', Arg::Int(n)) => signed(n, *n < 0, directive),
        ('v', Arg::Uint(n)) | ('d', Arg::Uint(n)) => signed(n, false, directive),
        ('v', Arg::Str(s)) | ('s', Arg::Str(s)) => truncate(s, directive.precision),
        ('v', Arg::Bool(b)) | ('t', Arg::Bool(b)) => b.to_string(),
        ('v', Arg::Char(c)) | ('c', Arg::Char(c)) => c.to_string(),
        ('d', Arg::Char(c)) => (*c as u32).to_string(),
        ('f', Arg::Float(x)) => {
            signed(fixed(*x, directive.precision.unwrap_or(6)), *x < 0.0, directive)
        }
        ('q', Arg::Str(s)) => format!("{:?}", s),
        ('q', Arg::Char(c)) => format!("{:?}", c),
        ('x', Arg::Int(n)) => hex_signed(*n, false),
        ('X', Arg::Int(n)) => hex_signed(*n, true),
        ('x', Arg::Uint(n)) => format!("{:x}", n),
        ('X', Arg::Uint(n)) => format!("{:X}", n),
        ('x', Arg::Str(s)) => s.bytes().map(|b| format!("{:02x}", b)).collect(),
        ('X', Arg::Str(s)) => s.bytes().map(|b| format!("{:02X}", b)).collect(),
        ('c', Arg::Int(n)) => char::from_u32(u32::try_from(*n).ok()?)?.to_string(),
        ('c', Arg::Uint(n)) => char::from_u32(u32::try_from(*n).ok()?)?.to_string(),
        _ => return None,
    };
    Some(text)
}

fn hex_signed(n: i64, upper: bool) -> String {
    let magnitude = n.unsigned_abs();
    let digits = if upper {
        format!("{:X}", magnitude)
    } else {
        format!("{:x}", magnitude)
    };
    if n < 0 {
        format!("-{}", digits)
    } else {
        digits
    }
}

fn truncate(s: &str, precision: Option<usize>) -> String {
    match precision {
        Some(p) => s.chars().take(p).collect(),
        None => s.to_string(),
    }
}

fn pad(out: &mut String, text: &str, directive: Directive, numeric: bool) {
    let len = text.chars().count();
    let width = directive.width.unwrap_or(0);
    if len >= width {
        out.push_str(text);
        return;
    }

    let fill = width - len;
    if directive.left {
        out.push_str(text);
        out.extend(std::iter::repeat(' ').take(fill));
    } else if directive.zero && numeric {
        // Zeros go after the sign.
        let (sign, digits) = match text.strip_prefix(['-', '+']) {
            Some(rest) => text.split_at(text.len() - rest.len()),
            None => ("", text),
        };
        out.push_str(sign);
        out.extend(std::iter::repeat('0').take(fill));
        out.push_str(digits);
    } else {
        out.extend(std::iter::repeat(' ').take(fill));
        out.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn s(value: &str) -> Arg {
        Arg::Str(value.to_string())
    }

    // ==================== Verb Tests ====================

    #[test]
    fn test_plain_pattern_unchanged() {
        assert_eq!(sprintf("Welcome", &[]), "Welcome");
    }

    #[test]
    fn test_default_verb() {
        assert_eq!(sprintf("Hello, %v!", &[s("Sam")]), "Hello, Sam!");
        assert_eq!(
            sprintf("%v %v %v %v", &[Arg::Int(-3), Arg::Float(2.5), Arg::Bool(true), Arg::Char('z')]),
            "-3 2.5 true z"
        );
    }

    #[test]
    fn test_string_and_integer_verbs() {
        assert_eq!(
            sprintf("%s has %d new messages", &[s("Ada"), Arg::Uint(4)]),
            "Ada has 4 new messages"
        );
    }

    #[test]
    fn test_float_precision() {
        assert_eq!(sprintf("%f", &[Arg::Float(1.5)]), "1.500000");
        assert_eq!(sprintf("%.2f", &[Arg::Float(3.14159)]), "3.14");
        assert_eq!(sprintf("%g", &[Arg::Float(0.25)]), "0.25");
    }

    #[test]
    fn test_general_float_precision_counts_significant_digits() {
        assert_eq!(sprintf("%.3g", &[Arg::Float(1234.5678)]), "1.23e+03");
        assert_eq!(sprintf("%.6g", &[Arg::Float(1234.5678)]), "1234.57");
        assert_eq!(sprintf("%.3g", &[Arg::Float(1.0)]), "1");
        assert_eq!(sprintf("%.2g", &[Arg::Float(0.000123)]), "0.00012");
    }

    #[test]
    fn test_general_float_switches_to_exponent() {
        assert_eq!(sprintf("%v", &[Arg::Float(1e6)]), "1e+06");
        assert_eq!(sprintf("%v", &[Arg::Float(123456.0)]), "123456");
        assert_eq!(sprintf("%g", &[Arg::Float(1.5e-7)]), "1.5e-07");
        assert_eq!(sprintf("%g", &[Arg::Float(-2.5e21)]), "-2.5e+21");
        assert_eq!(sprintf("%v", &[Arg::Float(0.0001)]), "0.0001");
    }

    #[test]
    fn test_non_finite_floats() {
        assert_eq!(sprintf("%v %f", &[Arg::Float(f64::NAN), Arg::Float(f64::INFINITY)]), "NaN +Inf");
        assert_eq!(sprintf("%+g", &[Arg::Float(f64::INFINITY)]), "+Inf");
        assert_eq!(sprintf("%g", &[Arg::Float(f64::NEG_INFINITY)]), "-Inf");
    }

    #[test]
    fn test_quote_and_hex() {
        assert_eq!(sprintf("%q", &[s("a\"b")]), "\"a\\\"b\"");
        assert_eq!(sprintf("%x %X", &[Arg::Int(255), Arg::Uint(171)]), "ff AB");
        assert_eq!(sprintf("%x", &[Arg::Int(-16)]), "-10");
        assert_eq!(sprintf("%x", &[s("hi")]), "6869");
    }

    #[test]
    fn test_char_verbs() {
        assert_eq!(sprintf("%c%c", &[Arg::Int(72), Arg::Char('i')]), "Hi");
        assert_eq!(sprintf("%d", &[Arg::Char('A')]), "65");
    }

    #[test]
    fn test_percent_literal() {
        assert_eq!(sprintf("100%% of %v", &[s("it")]), "100% of it");
    }

    // ==================== Width and Flag Tests ====================

    #[test]
    fn test_width_padding() {
        assert_eq!(sprintf("[%5v]", &[s("ab")]), "[   ab]");
        assert_eq!(sprintf("[%-5v]", &[s("ab")]), "[ab   ]");
        assert_eq!(sprintf("[%05d]", &[Arg::Int(-42)]), "[-0042]");
        assert_eq!(sprintf("[%+d]", &[Arg::Int(7)]), "[+7]");
    }

    #[test]
    fn test_zero_flag_ignored_for_strings() {
        assert_eq!(sprintf("[%05s]", &[s("ab")]), "[   ab]");
    }

    #[test]
    fn test_string_precision_truncates() {
        assert_eq!(sprintf("%.3s", &[s("abcdef")]), "abc");
    }

    // ==================== Malformed Pattern Tests ====================

    #[test]
    fn test_missing_argument() {
        assert_eq!(sprintf("Hello, %v and %s!", &[s("Sam")]), "Hello, Sam and %!s(MISSING)!");
    }

    #[test]
    fn test_extra_arguments() {
        assert_eq!(
            sprintf("Hello", &[s("Sam"), Arg::Int(3)]),
            "Hello%!(EXTRA string=Sam, int=3)"
        );
    }

    #[test]
    fn test_wrong_verb_for_type() {
        assert_eq!(sprintf("%d", &[s("abc")]), "%!d(string=abc)");
        assert_eq!(sprintf("%t", &[Arg::Int(1)]), "%!t(int=1)");
    }

    #[test]
    fn test_trailing_percent() {
        assert_eq!(sprintf("50%", &[]), "50%!(NOVERB)");
    }

    #[test]
    fn test_oversized_width_is_marked_not_padded() {
        assert_eq!(sprintf("%99999999999999999999999v", &[s("a")]), "%!(BADWIDTH)a");
        assert_eq!(sprintf("[%1000001d]", &[Arg::Int(7)]), "[%!(BADWIDTH)7]");
    }

    #[test]
    fn test_oversized_precision_is_marked_and_ignored() {
        assert_eq!(sprintf("%.99999999999f", &[Arg::Float(1.5)]), "%!(BADPREC)1.500000");
        assert_eq!(sprintf("%.2000000s", &[s("abc")]), "%!(BADPREC)abc");
    }

    #[test]
    fn test_width_at_limit_still_pads() {
        let out = sprintf("%1000000v", &[s("a")]);
        assert_eq!(out.len(), 1_000_000);
        assert!(out.ends_with(" a"));
    }

    #[test]
    fn test_invalid_code_point() {
        assert_eq!(sprintf("%c", &[Arg::Int(-1)]), "%!c(int=-1)");
    }

    // ==================== Property Tests ====================

    proptest! {
        #[test]
        fn prop_text_without_percent_is_verbatim(text in "[^%]*") {
            prop_assert_eq!(sprintf(&text, &[]), text);
        }

        #[test]
        fn prop_v_substitutes_string_exactly(prefix in "[a-zA-Z ]*", value in ".*") {
            let pattern = format!("{}%v", prefix);
            prop_assert_eq!(sprintf(&pattern, &[Arg::Str(value.clone())]), format!("{}{}", prefix, value));
        }

        #[test]
        fn prop_any_width_never_panics(width in any::<u64>(), precision in any::<u64>()) {
            let pattern = format!("%{}.{}v|%{}f", width % 10_000_000_000, precision, width);
            let out = sprintf(&pattern, &[Arg::Str("x".to_string()), Arg::Float(1.0)]);
            prop_assert!(out.contains('|'));
        }

        #[test]
        fn prop_integers_match_display(n in any::<i64>()) {
            prop_assert_eq!(sprintf("%d", &[Arg::Int(n)]), n.to_string());
        }
    }
}
