// src/utils/html_debug.rs
use std::fs::File;
use std::io::Write;
use std::path::Path;
use crate::extractors::course::CourseMatch;
use crate::utils::error::StorageError;

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders transcript text as HTML with every course match highlighted.
/// Accepted matches are green, excluded ones red; `matches` must be in scan order.
pub fn render_debug_html(text: &str, matches: &[CourseMatch]) -> String {
    let mut debug_html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<style>\n");

    // CSS for highlight colors
    debug_html.push_str("body { font-family: monospace; white-space: pre-wrap; }\n");
    debug_html.push_str(".course-accepted { background-color: #90EE90; }\n");
    debug_html.push_str(".course-excluded { background-color: #FFB6C1; text-decoration: line-through; }\n");
    debug_html.push_str("</style>\n</head>\n<body>\n");

    let mut last_pos = 0;
    for m in matches {
        // Add content before the highlight
        if m.start > last_pos {
            debug_html.push_str(&escape_html(&text[last_pos..m.start]));
        }

        let css_class = if m.excluded { "course-excluded" } else { "course-accepted" };

        debug_html.push_str(&format!(
            "<span class=\"{}\" title=\"{} ({}) bytes {}-{}\">",
            css_class,
            escape_html(&m.record.code),
            m.record.grade,
            m.start,
            m.end
        ));
        debug_html.push_str(&escape_html(&text[m.start..m.end]));
        debug_html.push_str("</span>");

        last_pos = m.end;
    }

    // Add any remaining content
    if last_pos < text.len() {
        debug_html.push_str(&escape_html(&text[last_pos..]));
    }

    debug_html.push_str("\n</body>\n</html>");
    debug_html
}

/// Writes the annotated view from [`render_debug_html`] to `filename`.
pub fn create_debug_html<P: AsRef<Path>>(
    text: &str,
    filename: P,
    matches: &[CourseMatch],
) -> Result<(), StorageError> {
    let path = filename.as_ref();
    let mut file = File::create(path)?;
    file.write_all(render_debug_html(text, matches).as_bytes())?;

    tracing::info!("Saved debug HTML to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::CourseExtractor;

    #[test]
    fn test_highlights_accepted_and_excluded() {
        let text = "R&D <x> CS 101 Intro UG A 3.0 Fall term standing good, honours list and dean notes \
                    MATH 201 Calc UG B 4.0 Excluded";
        let matches = CourseExtractor::new().scan(text);
        let html = render_debug_html(text, &matches);

        assert!(html.contains("R&amp;D &lt;x&gt; "));
        assert!(html.contains("<span class=\"course-accepted\" title=\"CS101 (A) bytes 8-29\">CS 101 Intro UG A 3.0</span>"));
        assert!(html.contains("class=\"course-excluded\""));
        assert!(html.ends_with(" Excluded\n</body>\n</html>"));
    }
}
