//! SSML document construction

/// Escape the XML special characters in `text`.
pub(crate) fn escape_xml(text: &str) -> String {
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

/// Single-voice SSML document speaking `text`.
pub(crate) fn build_ssml(language: &str, voice: &str, text: &str) -> String {
    format!(
        "<speak version='1.0' xml:lang='{}'><voice name='{}'>{}</voice></speak>",
        escape_xml(language),
        escape_xml(voice),
        escape_xml(text)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml() {
        assert_eq!(
            escape_xml(r#"Tom & Jerry <"cartoon"> 'ok'"#),
            "Tom &amp; Jerry &lt;&quot;cartoon&quot;&gt; &apos;ok&apos;"
        );
        assert_eq!(escape_xml("a dog"), "a dog");
    }

    #[test]
    fn test_build_ssml() {
        assert_eq!(
            build_ssml("en-US", "en-US-JennyNeural", "fish & chips"),
            "<speak version='1.0' xml:lang='en-US'><voice name='en-US-JennyNeural'>fish &amp; chips</voice></speak>"
        );
    }
}
