#![allow(clippy::expect_used, reason = "Fine in tests")]
use std::{fs, path::Path};

use kuchikikiki::parse_html;
use sidedoc::{error::SidedocError, generate::generate_page};
use sidedoc_config::Config;
use sidedoc_markdown::RenderMode;
use tempfile::tempdir;
use tendril::TendrilSink;

const COURSE: &str = r"# Django Course

See https://www.djangoproject.com before starting.

## Models

```python
class Author(models.Model):
    pass
```

## Views

```bash
# run the server
python manage.py runserver
```
";

fn config_in(dir: &Path) -> Config {
  let input = dir.join("readme.md");
  fs::write(&input, COURSE).expect("Failed to write readme.md in test");
  Config {
    input,
    output: dir.join("readme.html"),
    ..Default::default()
  }
}

#[test]
fn test_full_page_generation() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let config = config_in(temp_dir.path());

  let document = generate_page(&config).expect("Failed to generate page");
  assert_eq!(document.toc.len(), 3);
  assert_eq!(document.code_blocks, 2);

  let html =
    fs::read_to_string(&config.output).expect("Failed to read output in test");
  let page = parse_html().one(html.as_str());

  let title = page.select_first("title").expect("page has a title");
  assert_eq!(title.as_node().text_contents(), "Django Course");

  let body = page.select_first("body").expect("page has a body");
  let regions: Vec<String> = body
    .as_node()
    .children()
    .filter_map(|child| {
      child
        .as_element()
        .and_then(|e| {
          e.attributes.borrow().get("class").map(ToString::to_string)
        })
    })
    .collect();
  assert_eq!(regions, ["sidebar", "content"]);

  let buttons = page
    .select("button.copy-button")
    .expect("valid selector")
    .count();
  assert_eq!(buttons, 2);

  let external = page
    .select(r#"a[target="_blank"]"#)
    .expect("valid selector")
    .count();
  assert_eq!(external, 1);

  assert!(html.contains(r#"<script src="/js_css/copy.js"></script>"#));
  assert!(html.contains("hljs.highlightAll();"));
}

#[test]
fn test_line_mode_generation() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let mut config = config_in(temp_dir.path());
  config.mode = RenderMode::Lines;

  let document = generate_page(&config).expect("Failed to generate page");
  assert_eq!(document.toc.len(), 3);
  assert_eq!(document.code_blocks, 2);

  let html =
    fs::read_to_string(&config.output).expect("Failed to read output in test");
  assert!(html.contains(r#"<li class="toc-level-2" style="margin-left: 1em">"#));
  assert!(html.contains("# run the server\npython manage.py runserver"));
}

#[test]
fn test_missing_input_is_reported() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let config = Config {
    input: temp_dir.path().join("missing.md"),
    output: temp_dir.path().join("out.html"),
    ..Default::default()
  };

  let err = generate_page(&config).expect_err("missing input");
  assert!(matches!(err, SidedocError::Render(_)));
  assert!(err.to_string().contains("missing.md"));
  assert!(!config.output.exists());
}

#[test]
fn test_config_file_drives_generation() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let base = config_in(temp_dir.path());

  let config_path = temp_dir.path().join("sidedoc.toml");
  fs::write(
    &config_path,
    format!(
      "input = {:?}\noutput = {:?}\nhighlight_init = false\n\n[toc]\ntitle = \
       \"Оглавление\"\nmax_level = 1\n\n[links]\nnew_tab = false\n",
      base.input.display().to_string(),
      base.output.display().to_string(),
    ),
  )
  .expect("Failed to write config in test");

  let config =
    Config::load(&[config_path], &["code.copy_label=Copy".to_string()])
      .expect("Failed to load config");
  let document = generate_page(&config).expect("Failed to generate page");
  assert_eq!(document.toc.len(), 1);

  let html =
    fs::read_to_string(&config.output).expect("Failed to read output in test");
  assert!(html.contains(r#"<span class="toctitle">Оглавление</span>"#));
  assert!(html.contains(">Copy</button>"));
  assert!(!html.contains("target=\"_blank\""));
  assert!(!html.contains("hljs.highlightAll"));
}
