/// What a single line means to the fence state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenceLine {
  /// The line opens a fenced block with the given language tag.
  Open(String),
  /// The line closes the currently open block.
  Close,
  /// The line is code inside an open block.
  Code,
  /// The line is outside of any fenced block.
  Prose,
}

/// State tracking for backtick code fences in raw markdown.
///
/// A line starting with three or more backticks opens a fence; the rest of
/// the line is the language tag. While a fence is open, only a bare fence of
/// at least the same length closes it and every other line is code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FenceTracker {
  in_code_block:    bool,
  code_fence_count: usize,
}

impl FenceTracker {
  /// Create a new fence tracker.
  #[must_use]
  pub const fn new() -> Self {
    Self {
      in_code_block:    false,
      code_fence_count: 0,
    }
  }

  /// Check if currently inside a code block.
  #[must_use]
  pub const fn in_code_block(&self) -> bool {
    self.in_code_block
  }

  /// Classify a line and advance the fence state.
  pub fn process_line(&mut self, line: &str) -> FenceLine {
    let trimmed = line.trim_start();
    let fence_count = trimmed.chars().take_while(|&c| c == '`').count();

    if self.in_code_block {
      if fence_count >= self.code_fence_count
        && trimmed[fence_count..].trim().is_empty()
      {
        self.in_code_block = false;
        self.code_fence_count = 0;
        return FenceLine::Close;
      }
      return FenceLine::Code;
    }

    if fence_count >= 3 {
      let info = trimmed[fence_count..].trim();
      // Backticks in the info string mean this is inline code, not a fence
      if !info.contains('`') {
        self.in_code_block = true;
        self.code_fence_count = fence_count;
        let language = info.split_whitespace().next().unwrap_or("plaintext");
        return FenceLine::Open(language.to_string());
      }
    }

    FenceLine::Prose
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_open_and_close() {
    let mut tracker = FenceTracker::new();
    assert_eq!(
      tracker.process_line("```python"),
      FenceLine::Open("python".to_string())
    );
    assert!(tracker.in_code_block());
    assert_eq!(tracker.process_line("print('hi')"), FenceLine::Code);
    assert_eq!(tracker.process_line("```"), FenceLine::Close);
    assert!(!tracker.in_code_block());
    assert_eq!(tracker.process_line("after"), FenceLine::Prose);
  }

  #[test]
  fn test_bare_opener_defaults_to_plaintext() {
    let mut tracker = FenceTracker::new();
    assert_eq!(
      tracker.process_line("```"),
      FenceLine::Open("plaintext".to_string())
    );
  }

  #[test]
  fn test_tagged_fence_inside_block_is_code() {
    let mut tracker = FenceTracker::new();
    let _ = tracker.process_line("````markdown");
    assert_eq!(tracker.process_line("```python"), FenceLine::Code);
    assert_eq!(tracker.process_line("```"), FenceLine::Code);
    assert_eq!(tracker.process_line("````"), FenceLine::Close);
  }

  #[test]
  fn test_heading_inside_fence_is_code() {
    let mut tracker = FenceTracker::new();
    let _ = tracker.process_line("```bash");
    assert_eq!(tracker.process_line("# not a heading"), FenceLine::Code);
  }

  #[test]
  fn test_inline_triple_backticks_are_prose() {
    let mut tracker = FenceTracker::new();
    assert_eq!(tracker.process_line("```code``` inline"), FenceLine::Prose);
    assert!(!tracker.in_code_block());
  }
}
