use std::io;
use std::io::ErrorKind;

use markdown::Options;

/// Derives the HTML body of a post.
///
/// Markdown posts go through the GFM renderer, anything else is kept as typed.
pub fn render_content_html(content: &str, is_md: bool) -> io::Result<String> {
    if !is_md {
        return Ok(content.to_string());
    }

    match markdown::to_html_with_options(content, &Options::gfm()) {
        Ok(x) => Ok(x),
        Err(e) => Err(io::Error::new(ErrorKind::InvalidInput, e.reason.as_str())),
    }
}
