//! Number formatting and XML escaping for SVG emission.
//!
//! Two number formats are in play. Path data (`d` attributes) uses D3's
//! `d3-path` convention: round to 3 fractional digits, ties half-up, then trim
//! trailing zeros. Everything else (transforms, radii, text offsets) uses a
//! round-trippable decimal form similar to JS `Number#toString()`, with `-0`
//! and tiny float noise from our own arithmetic cleaned away.

use std::fmt::Write as _;

use mangrove_core::style::StyleProps;

pub fn fmt(v: f64) -> String {
    let mut out = String::new();
    fmt_into(&mut out, v);
    out
}

pub fn fmt_into(out: &mut String, v: f64) {
    if !v.is_finite() {
        out.push_str("0");
        return;
    }

    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    if v == -0.0 {
        v = 0.0;
    }

    let _ = write!(out, "{v}");
}

pub fn fmt_path(v: f64) -> String {
    let mut out = String::new();
    fmt_path_into(&mut out, v);
    out
}

pub fn fmt_path_into(out: &mut String, v: f64) {
    // D3 uses `Math.round(x * 1000) / 1000` (ties half-up, including for
    // negatives) when stringifying path commands.
    if !v.is_finite() || v.abs() < 0.0005 {
        out.push_str("0");
        return;
    }

    let scaled = v * 1000.0;
    let k = (scaled + 0.5).floor() as i64;
    if k == 0 {
        out.push_str("0");
        return;
    }
    append_fixed_3dp_trimmed(out, k);
}

fn append_fixed_3dp_trimmed(out: &mut String, k: i64) {
    let neg = k.is_negative();
    let abs = k.unsigned_abs();
    let int_part = abs / 1000;
    let frac = abs % 1000;

    if neg {
        out.push('-');
    }
    let _ = write!(out, "{int_part}");

    if frac == 0 {
        return;
    }

    let mut digits = [b'0'; 3];
    digits[0] = b'0' + ((frac / 100) as u8);
    digits[1] = b'0' + (((frac / 10) % 10) as u8);
    digits[2] = b'0' + ((frac % 10) as u8);

    let mut end = 3usize;
    while end > 0 && digits[end - 1] == b'0' {
        end -= 1;
    }

    out.push('.');
    for &b in &digits[..end] {
        out.push(b as char);
    }
}

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_xml_into(&mut out, text);
    out
}

pub fn escape_xml_into(out: &mut String, text: &str) {
    let bytes = text.as_bytes();
    let mut start = 0usize;
    for (i, &b) in bytes.iter().enumerate() {
        let esc = match b {
            b'&' => Some("&amp;"),
            b'<' => Some("&lt;"),
            b'"' => Some("&quot;"),
            b'\'' => Some("&#39;"),
            _ => None,
        };
        let Some(esc) = esc else {
            continue;
        };
        if start < i {
            out.push_str(&text[start..i]);
        }
        out.push_str(esc);
        start = i + 1;
    }
    if start < text.len() {
        out.push_str(&text[start..]);
    }
}

/// Writes `key:value;` declarations in map order, values escaped for use
/// inside an attribute.
pub fn write_css_into(out: &mut String, props: &StyleProps) {
    for (key, value) in props {
        escape_xml_into(out, key);
        out.push(':');
        escape_xml_into(out, value);
        out.push(';');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt_string(v: f64) -> String {
        let mut s = String::new();
        fmt_into(&mut s, v);
        s
    }

    fn fmt_path_string(v: f64) -> String {
        let mut s = String::new();
        fmt_path_into(&mut s, v);
        s
    }

    #[test]
    fn fmt_into_matches_expected() {
        assert_eq!(fmt_string(f64::NAN), "0");
        assert_eq!(fmt_string(f64::INFINITY), "0");
        assert_eq!(fmt_string(-0.0), "0");
        assert_eq!(fmt_string(0.0), "0");
        assert_eq!(fmt_string(30.0), "30");
        assert_eq!(fmt_string(1.0000004), "1");
        assert_eq!(fmt_string(-1234.5678), "-1234.5678");
    }

    #[test]
    fn fmt_path_into_matches_expected() {
        assert_eq!(fmt_path_string(f64::NAN), "0");
        assert_eq!(fmt_path_string(0.0004), "0");
        assert_eq!(fmt_path_string(-0.0004), "0");
        assert_eq!(fmt_path_string(1.23456), "1.235");
        assert_eq!(fmt_path_string(1.0), "1");
        assert_eq!(fmt_path_string(-1.2345), "-1.234");
        assert_eq!(fmt_path_string(5.0 / 3.0), "1.667");
    }

    #[test]
    fn escape_xml_handles_all_specials() {
        assert_eq!(escape_xml(r#"a<b&"c'"#), "a&lt;b&amp;&quot;c&#39;");
        assert_eq!(escape_xml("plain"), "plain");
    }

    #[test]
    fn css_props_serialize_in_insertion_order() {
        let mut props = StyleProps::new();
        props.insert("fill".into(), "red".into());
        props.insert("stroke-width".into(), "2px".into());

        let mut out = String::new();
        write_css_into(&mut out, &props);
        assert_eq!(out, "fill:red;stroke-width:2px;");
    }
}
