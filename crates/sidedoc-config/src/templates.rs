use thiserror::Error;

/// Error type for template operations.
#[derive(Debug, Error)]
pub enum TemplateError {
  /// The requested configuration format is not supported.
  #[error("Unsupported config format: {0}")]
  UnsupportedFormat(String),
}

/// Default configuration template in TOML, with every field commented.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# sidedoc configuration file

# Markdown source to render
input = "readme.md"

# HTML page to write
output = "readme.html"

# Page title. Defaults to the first level-1 heading of the document
# title = "Django Course"

# Renderer: "tree" parses the full Markdown syntax, "lines" only understands
# `#`-`###` headings, fenced code blocks and paragraphs
mode = "tree"

# Custom page shell (tera template). Run `sidedoc export` for a starting point
# template_path = "templates/default.html"

# Stylesheets and scripts referenced from the page head, in order
stylesheets = ["/js_css/main.css", "/js_css/default.min.css"]
scripts = ["/js_css/copy.js", "/js_css/highlight.min.js"]

# Emit the `hljs.highlightAll()` initialiser
highlight_init = true

[toc]
# Heading shown above the table of contents
# title = "Contents"

# Heading levels listed in the table of contents (1-6)
min_level = 1
max_level = 3

# Append a "¶" permalink to every heading
permalink = true

# Wrap heading text in a link to its own anchor
anchorlink = false

[code]
# Label of the button appended to every fenced code block
copy_label = "Copy code"

[links]
# Open http:// and https:// links in a new tab
new_tab = true
"#;

/// Default configuration template in JSON.
pub const DEFAULT_JSON_TEMPLATE: &str = r#"{
  "input": "readme.md",
  "output": "readme.html",
  "mode": "tree",
  "stylesheets": ["/js_css/main.css", "/js_css/default.min.css"],
  "scripts": ["/js_css/copy.js", "/js_css/highlight.min.js"],
  "highlight_init": true,
  "toc": {
    "min_level": 1,
    "max_level": 3,
    "permalink": true,
    "anchorlink": false
  },
  "code": {
    "copy_label": "Copy code"
  },
  "links": {
    "new_tab": true
  }
}
"#;

/// Get the correct configuration template based on the requested format.
///
/// # Errors
///
/// Returns an error if the requested format is not supported.
pub fn get_template(format: &str) -> Result<&'static str, TemplateError> {
  match format.to_lowercase().as_str() {
    "toml" => Ok(DEFAULT_TOML_TEMPLATE),
    "json" => Ok(DEFAULT_JSON_TEMPLATE),
    _ => Err(TemplateError::UnsupportedFormat(format.to_string())),
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]
  use super::*;
  use crate::Config;

  #[test]
  fn test_templates_parse_to_defaults() {
    let from_toml: Config = toml::from_str(DEFAULT_TOML_TEMPLATE).unwrap();
    let from_json: Config = serde_json::from_str(DEFAULT_JSON_TEMPLATE).unwrap();

    assert_eq!(from_toml, Config::default());
    assert_eq!(from_json, Config::default());
  }

  #[test]
  fn test_unsupported_format() {
    let err = get_template("yaml").unwrap_err();
    assert_eq!(err.to_string(), "Unsupported config format: yaml");
    assert!(get_template("TOML").is_ok());
  }
}
