//! Plain text ↔ editor HTML

use crate::html::{block_texts, escape_html};

/// One `<p>` per line; blank lines become `<p><br></p>`
pub fn text_to_html(text: &str) -> String {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .map(|line| {
            if line.trim().is_empty() {
                "<p><br></p>".to_string()
            } else {
                format!("<p>{}</p>", escape_html(line))
            }
        })
        .collect()
}

/// Block text joined by `separator`, markup dropped
pub fn html_to_text(html: &str, separator: &str) -> String {
    block_texts(html).join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_become_paragraphs() {
        assert_eq!(text_to_html("one\ntwo"), "<p>one</p><p>two</p>");
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        assert_eq!(text_to_html("a\r\n\r\nb"), "<p>a</p><p><br></p><p>b</p>");
        assert_eq!(text_to_html("   "), "<p><br></p>");
    }

    #[test]
    fn test_markup_in_text_is_escaped() {
        assert_eq!(text_to_html("<b>&"), "<p>&lt;b&gt;&amp;</p>");
    }

    #[test]
    fn test_html_to_text_uses_separator() {
        let html = "<h1>Title</h1><p>Body <em>text</em></p>";
        assert_eq!(html_to_text(html, "\n\n"), "Title\n\nBody text");
        assert_eq!(html_to_text(html, "|"), "Title|Body text");
    }

    #[test]
    fn test_text_round_trip_keeps_lines() {
        let html = text_to_html("first\n\nthird");
        assert_eq!(html_to_text(&html, "\n"), "first\n\nthird");
    }
}
