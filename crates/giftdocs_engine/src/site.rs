/* 📖 # Why render HTML on the server?

The interactive parts of the site talk to the JSON API, but the documentation
itself is static: the endpoint list, each endpoint's summary and its four
highlighted default samples. Rendering that here keeps the binary
self-contained, with syntect doing the highlighting.
*/

use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;
use tracing::warn;

use crate::endpoint::{EndpointId, catalog};
use crate::overview::{QUICK_TRY_ENDPOINTS, SnippetLanguage};
use crate::present::escape_html;
use crate::representation::Representation;
use crate::samples::{CodeSampleSet, sample_url};

const THEME_NAME: &str = "InspiredGitHub";

/// Renders the documentation pages.
pub struct SiteRenderer {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl std::fmt::Debug for SiteRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteRenderer")
            .field("theme", &THEME_NAME)
            .finish()
    }
}

impl Default for SiteRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteRenderer {
    pub fn new() -> Self {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let theme = ThemeSet::load_defaults()
            .themes
            .get(THEME_NAME)
            .cloned()
            .unwrap_or_default();
        Self { syntax_set, theme }
    }

    /// Highlight `code` as HTML. Unknown languages and highlighter errors fall back to an escaped `<pre>`.
    pub fn highlight(&self, code: &str, extension: &str) -> String {
        let Some(syntax) = self.syntax_set.find_syntax_by_extension(extension) else {
            return plain_block(code);
        };
        match highlighted_html_for_string(code, &self.syntax_set, syntax, &self.theme) {
            Ok(html) => html,
            Err(error) => {
                warn!(extension, %error, "Highlighting failed");
                plain_block(code)
            }
        }
    }

    pub fn render_index(&self, title: &str, description: Option<&str>) -> String {
        let mut body = format!("<h1>{}</h1>\n", escape_html(title));
        if let Some(description) = description {
            body.push_str(&format!("<p>{}</p>\n", escape_html(description)));
        }

        body.push_str("<h2>Endpoints</h2>\n<ul class=\"endpoints\">\n");
        for definition in catalog() {
            body.push_str(&format!(
                "<li><a href=\"/docs/{}\"><span class=\"method\">{}</span> {}</a> <code>{}</code></li>\n",
                definition.id,
                definition.method,
                escape_html(definition.title),
                escape_html(definition.path),
            ));
        }
        body.push_str("</ul>\n");

        body.push_str("<h2>Quick try</h2>\n<ul class=\"quick-try\">\n");
        for endpoint in QUICK_TRY_ENDPOINTS {
            body.push_str(&format!(
                "<li><button data-quick-try=\"{}\">{}</button></li>\n",
                endpoint,
                escape_html(endpoint.definition().title),
            ));
        }
        body.push_str("</ul>\n");

        body.push_str("<h2>Payload encryption</h2>\n");
        body.push_str(
            "<p>Order payloads are sent as <code>{\"data\": &lt;cipher&gt;}</code>, \
             encrypted with AES-256-CBC and PKCS#7 padding, base64 encoded.</p>\n",
        );
        for language in SnippetLanguage::ALL {
            body.push_str(&format!(
                "<section class=\"snippet\" data-language=\"{}\">\n<h3>{}</h3>\n{}</section>\n",
                language.file_extension(),
                language.label(),
                self.highlight(language.encryption_snippet(), language.file_extension()),
            ));
        }
        page(title, &body)
    }

    pub fn render_endpoint_page(&self, endpoint: EndpointId, base_url: &str) -> String {
        let definition = endpoint.definition();
        let samples = CodeSampleSet::defaults(endpoint, base_url);

        let mut body = format!(
            "<h1>{}</h1>\n<p class=\"request\"><span class=\"method\">{}</span> <code>{}</code></p>\n<p>{}</p>\n",
            escape_html(definition.title),
            definition.method,
            escape_html(&sample_url(endpoint, base_url)),
            escape_html(definition.summary),
        );
        for representation in Representation::ALL {
            body.push_str(&format!(
                "<section class=\"sample\" data-representation=\"{}\">\n<h3>{}</h3>\n{}</section>\n",
                representation,
                representation.label(),
                self.highlight(samples.get(representation), representation.file_extension()),
            ));
        }
        body.push_str("<p><a href=\"/\">All endpoints</a></p>\n");
        page(definition.title, &body)
    }
}

fn plain_block(code: &str) -> String {
    format!("<pre>{}</pre>\n", escape_html(code))
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(title),
        body
    )
}
