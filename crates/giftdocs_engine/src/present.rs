/* 📖 # Why colorize with one regex instead of a tokenizer?

The response view only needs five token classes (key, string, number, boolean,
null) and always gets pretty-printed JSON, where a single alternation finds
them in order. The text is HTML-escaped first. The pattern never spans a `<`
or `>`, so the spans it inserts cannot break the markup.
*/

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"("(\\u[a-zA-Z0-9]{4}|\\[^u]|[^\\"])*"(\s*:)?|\b(true|false|null)\b|-?\d+(?:\.\d*)?(?:[eE][+\-]?\d+)?)"#,
    )
    .expect("valid token regex")
});

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// Two-space indented JSON.
pub fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Inverse of [`escape_html`].
pub fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

pub fn strip_tags(html: &str) -> String {
    TAG.replace_all(html, "").into_owned()
}

fn token_class(token: &str) -> &'static str {
    if token.starts_with('"') {
        if token.ends_with(':') { "key" } else { "string" }
    } else if token == "true" || token == "false" {
        "boolean"
    } else if token == "null" {
        "null"
    } else {
        "number"
    }
}

/// Wrap every token of already-escaped JSON text in a `token` span.
fn colorize_escaped(escaped: &str) -> String {
    TOKEN
        .replace_all(escaped, |captures: &Captures| {
            let token = &captures[0];
            format!(r#"<span class="token {}">{}</span>"#, token_class(token), token)
        })
        .into_owned()
}

/// Pretty-print, escape and colorize a value.
pub fn colorize_value(value: &Value) -> String {
    colorize_escaped(&escape_html(&pretty(value)))
}

/// Colorize `text` if it is JSON. Anything else is shown escaped but otherwise verbatim.
pub fn format_json_html(text: &str) -> String {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => colorize_value(&value),
        Err(_) => escape_html(text),
    }
}

/// The text a reader sees in the colorized view.
pub fn plain_text(html: &str) -> String {
    unescape_html(&strip_tags(html))
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;
    use serde_json::json;

    #[test]
    fn test_colorize_token_classes() {
        let html = colorize_value(&json!({"ok": true, "n": -1.5e3, "s": "x", "z": null}));
        expect![[r#"
            {
              <span class="token key">"ok":</span> <span class="token boolean">true</span>,
              <span class="token key">"n":</span> <span class="token number">-1500.0</span>,
              <span class="token key">"s":</span> <span class="token string">"x"</span>,
              <span class="token key">"z":</span> <span class="token null">null</span>
            }"#]]
        .assert_eq(&html);
    }

    #[test]
    fn test_markup_is_escaped() {
        let html = colorize_value(&json!({"html": "<b>&</b>"}));
        assert!(html.contains(r#""&lt;b&gt;&amp;&lt;/b&gt;""#), "{html}");
        assert!(!strip_tags(&html).contains('<'));
    }

    #[test]
    fn test_invalid_json_is_shown_verbatim() {
        assert_eq!(format_json_html("Executing <now> & later"), "Executing &lt;now&gt; &amp; later");
    }

    #[test]
    fn test_strip_tags_roundtrip() {
        let value = json!({
            "title": "Amazon Pay <E-Gift> & \"more\"",
            "list": [1, 2.5, false, null, "a\\u0041"],
            "nested": {"key: with colon": "value"}
        });
        let html = format_json_html(&value.to_string());
        let recovered: Value = serde_json::from_str(&plain_text(&html)).unwrap();
        assert_eq!(recovered, value);
        assert_eq!(plain_text(&html), pretty(&value));
    }

    #[test]
    fn test_escaped_quote_stays_in_string() {
        let html = colorize_value(&json!("say \"hi\""));
        assert_eq!(html, r#"<span class="token string">"say \"hi\""</span>"#);
    }
}
