// Canonical query-string construction for the update-check request.
//
// Parameter order is part of the wire contract: servers may log or cache on
// the exact request string, and tests assert it verbatim. `url`'s form
// serializer encodes spaces as `+`, so component-style percent encoding is
// done here directly.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Component encoding: everything except unreserved ASCII and the marks
/// `- _ . ! ~ * ' ( )` is percent-encoded. Spaces become `%20`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Encode an ordered parameter list into a query string.
///
/// Parameters with a `None` value are skipped entirely; present values are
/// emitted in caller order, each key and value percent-encoded
/// independently. An empty string value encodes as `key=`.
pub fn encode(params: &[(&str, Option<&str>)]) -> String {
    let mut out = String::new();
    for (key, value) in params {
        let Some(value) = value else { continue };
        if !out.is_empty() {
            out.push('&');
        }
        out.extend(utf8_percent_encode(key, COMPONENT));
        out.push('=');
        out.extend(utf8_percent_encode(value, COMPONENT));
    }
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use percent_encoding::percent_decode_str;
    use pretty_assertions::assert_eq;

    use super::*;

    fn decode(query: &str) -> Vec<(String, String)> {
        query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap();
                (
                    percent_decode_str(key).decode_utf8().unwrap().into_owned(),
                    percent_decode_str(value).decode_utf8().unwrap().into_owned(),
                )
            })
            .collect()
    }

    #[test]
    fn skips_absent_values_and_preserves_order() {
        let encoded = encode(&[("a", Some("1")), ("b", None), ("c", Some("x y"))]);
        assert_eq!(encoded, "a=1&c=x%20y");
    }

    #[test]
    fn round_trips_present_parameters() {
        let encoded = encode(&[("a", Some("1")), ("b", None), ("c", Some("x y"))]);
        assert_eq!(
            decode(&encoded),
            vec![("a".into(), "1".into()), ("c".into(), "x y".into())]
        );
    }

    #[test]
    fn empty_value_encodes_as_bare_key() {
        assert_eq!(encode(&[("label", Some(""))]), "label=");
    }

    #[test]
    fn encodes_reserved_characters_in_keys_and_values() {
        let encoded = encode(&[("deployment key", Some("a/b+c=d&e"))]);
        assert_eq!(encoded, "deployment%20key=a%2Fb%2Bc%3Dd%26e");
    }

    #[test]
    fn unreserved_marks_pass_through() {
        assert_eq!(encode(&[("k", Some("a-b_c.d!e~f*g'h(i)j"))]), "k=a-b_c.d!e~f*g'h(i)j");
    }

    #[test]
    fn all_absent_yields_empty_string() {
        assert_eq!(encode(&[("a", None), ("b", None)]), "");
    }
}
