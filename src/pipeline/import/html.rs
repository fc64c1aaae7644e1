//! Rendered text of HTML documents and text content of slide XML.

use std::sync::LazyLock;

use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use scraper::{ElementRef, Html, Node};

use super::ImportError;

/// Elements whose content never reaches rendered text.
const HIDDEN_ELEMENTS: &[&str] = &["head", "script", "style", "template", "noscript"];

/// Elements that end with a line break.
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "li", "tr", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "table", "section",
    "article", "blockquote", "pre",
];

static HORIZONTAL_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t\u{A0}]+").unwrap());

static BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Visible text of an HTML document, close to a browser's `innerText`.
///
/// Head, script and style content, comments and the doctype are dropped.
/// Whitespace inside text nodes collapses to single spaces except within
/// `<pre>`. Block elements and `<br>` end a line. Horizontal whitespace is
/// collapsed per line and blank-line runs are capped at one.
pub fn extract_from_html(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    let document = Html::parse_document(html);
    let mut text = String::new();
    collect_rendered_text(document.root_element(), false, &mut text);

    let lines = text
        .lines()
        .map(|line| HORIZONTAL_SPACE.replace_all(line, " ").trim().to_string())
        .collect::<Vec<_>>()
        .join("\n");

    BLANK_RUN.replace_all(&lines, "\n\n").trim().to_string()
}

fn collect_rendered_text(element: ElementRef<'_>, preformatted: bool, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) if preformatted => out.push_str(text),
            Node::Text(text) => {
                let mut words = text.split_whitespace().peekable();
                if text.starts_with(char::is_whitespace) {
                    out.push(' ');
                }
                while let Some(word) = words.next() {
                    out.push_str(word);
                    if words.peek().is_some() {
                        out.push(' ');
                    }
                }
                if text.ends_with(char::is_whitespace) && !text.trim().is_empty() {
                    out.push(' ');
                }
            }
            Node::Element(el) => {
                let name = el.name();
                if HIDDEN_ELEMENTS.contains(&name) {
                    continue;
                }
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_rendered_text(child_element, preformatted || name == "pre", out);
                }
                if BLOCK_ELEMENTS.contains(&name) {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

/// Concatenated text and CDATA of an XML document (its `textContent`).
/// Entities and character references are decoded.
pub fn xml_text_content(xml: &str) -> Result<String, ImportError> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Text(e)) => {
                let unescaped = e
                    .unescape()
                    .map_err(|err| ImportError::MalformedXml(err.to_string()))?;
                text.push_str(&unescaped);
            }
            Ok(Event::CData(e)) => text.push_str(&String::from_utf8_lossy(&e.into_inner())),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(ImportError::MalformedXml(format!(
                    "at byte {}: {err}",
                    reader.buffer_position()
                )))
            }
        }
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extraction::extract_clinical_data;

    #[test]
    fn empty_html() {
        assert_eq!(extract_from_html(""), "");
        assert_eq!(extract_from_html("  \n "), "");
    }

    #[test]
    fn paragraphs_become_lines() {
        let html = "<html><head><title>Case</title></head><body><p>HPI: falls at home</p><p>Meds: donepezil 5mg</p></body></html>";
        assert_eq!(extract_from_html(html), "HPI: falls at home\nMeds: donepezil 5mg");
    }

    #[test]
    fn scripts_and_styles_dropped() {
        let html = "<style>p{color:red}</style><p>Visible</p><SCRIPT type=\"x\">alert(1)</SCRIPT>";
        assert_eq!(extract_from_html(html), "Visible");
    }

    #[test]
    fn br_and_entities() {
        let html = "85F&nbsp;&nbsp;with<br/>K &lt; 3.5 &amp; Na &#62; 145 &#x2014; &unknown;";
        assert_eq!(extract_from_html(html), "85F with\nK < 3.5 & Na > 145 \u{2014} &unknown;");
    }

    #[test]
    fn named_entities_decoded() {
        let html = "<p>HPI: caf&eacute; &mdash; pt s/p fall&hellip;</p>";
        assert_eq!(extract_from_html(html), "HPI: caf\u{e9} \u{2014} pt s/p fall\u{2026}");
    }

    #[test]
    fn comments_never_reach_text() {
        let html = "<p>HPI: falls</p><!-- draft: a > b, patient 99F per old note -->";
        let text = extract_from_html(html);
        assert_eq!(text, "HPI: falls");
        assert_eq!(extract_clinical_data(&text).age_sex, None);
    }

    #[test]
    fn doctype_dropped() {
        let html = "<!DOCTYPE html><html><body><p>72M</p></body></html>";
        assert_eq!(extract_from_html(html), "72M");
    }

    #[test]
    fn source_whitespace_collapsed() {
        let html = "<div>  Line   one  </div>\n\n\n\n<div>\tLine\n two</div>";
        assert_eq!(extract_from_html(html), "Line one\nLine two");
    }

    #[test]
    fn preformatted_keeps_lines() {
        let html = "<pre>Na 130\nK 3.1</pre>";
        assert_eq!(extract_from_html(html), "Na 130\nK 3.1");
    }

    #[test]
    fn slide_xml_text_content() {
        let xml = "<?xml version=\"1.0\"?><p:sld><a:t>HPI: </a:t><a:t>Falls &amp; confusion</a:t></p:sld>";
        assert_eq!(xml_text_content(xml).unwrap(), "HPI: Falls & confusion");
    }

    #[test]
    fn slide_xml_cdata_and_char_refs() {
        let xml = "<p:sld><a:t><![CDATA[K < 3.5]]></a:t><a:t> &#8212; &#x2026;</a:t><!-- note 99F --></p:sld>";
        assert_eq!(xml_text_content(xml).unwrap(), "K < 3.5 \u{2014} \u{2026}");
    }

    #[test]
    fn malformed_slide_xml() {
        let result = xml_text_content("<p:sld><a:t>x</a:b></p:sld>");
        assert!(matches!(result, Err(ImportError::MalformedXml(_))));
    }
}
