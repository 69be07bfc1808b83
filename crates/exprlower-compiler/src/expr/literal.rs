//! Literal values as host source text.

use std::fmt::Write;

use exprlower_ast::LiteralKind;

pub(super) fn to_source(literal: &LiteralKind<'_>) -> String {
    match *literal {
        LiteralKind::Int(value) => value.to_string(),
        LiteralKind::Long(value) => format!("{value}L"),
        LiteralKind::Double(value) => double(value),
        LiteralKind::Boolean(value) => value.to_string(),
        LiteralKind::Char(value) => {
            let mut out = String::from("'");
            escape_into(&mut out, value, '\'');
            out.push('\'');
            out
        }
        LiteralKind::String(value) => {
            let mut out = String::with_capacity(value.len() + 2);
            out.push('"');
            for c in value.chars() {
                escape_into(&mut out, c, '"');
            }
            out.push('"');
            out
        }
        LiteralKind::Null => "null".to_string(),
    }
}

fn double(value: f64) -> String {
    if value.is_nan() {
        "Double.NaN".to_string()
    } else if value.is_infinite() {
        let sign = if value > 0.0 { "POSITIVE" } else { "NEGATIVE" };
        format!("Double.{sign}_INFINITY")
    } else {
        // Debug keeps the fraction (`1.0`, not `1`) and uses exponents for
        // large magnitudes, both valid host double literals.
        format!("{value:?}")
    }
}

fn escape_into(out: &mut String, c: char, quote: char) {
    match c {
        '\\' => out.push_str("\\\\"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        '\u{8}' => out.push_str("\\b"),
        '\u{c}' => out.push_str("\\f"),
        c if c == quote => {
            out.push('\\');
            out.push(c);
        }
        c if c.is_control() => {
            let _ = write!(out, "\\u{:04x}", c as u32);
        }
        c => out.push(c),
    }
}
