use std::collections::HashMap;

pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/default.html");

pub const MAIN_CSS: &str = include_str!("../templates/main.css");
pub const COPY_JS: &str = include_str!("../templates/copy.js");

#[must_use]
pub fn all_templates() -> HashMap<&'static str, &'static str> {
  let mut templates = HashMap::new();
  templates.insert("default.html", DEFAULT_TEMPLATE);
  templates.insert("main.css", MAIN_CSS);
  templates.insert("copy.js", COPY_JS);
  templates
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_all_templates_are_listed() {
    let templates = all_templates();
    assert_eq!(templates.len(), 3);
    assert!(templates["default.html"].contains("{{ content | safe }}"));
    assert!(templates["copy.js"].contains("function copyCode(blockId)"));
    assert!(templates["main.css"].contains(".copy-button"));
  }
}
