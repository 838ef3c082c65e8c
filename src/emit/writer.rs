// Mon Oct 19 2026 - Alex

use crate::config::GenerateFlags;
use crate::emit::plan::{EmitError, EmitResult};
use crate::schema::MetaTag;
use std::io::Write;

#[derive(Debug)]
struct Line {
    indent: usize,
    content: Option<String>,
}

/// Line-buffered source text with tab indentation.
pub struct SourceWriter {
    lines: Vec<Line>,
    indent: usize,
    flags: GenerateFlags,
}

impl SourceWriter {
    pub fn new(flags: GenerateFlags) -> Self {
        Self {
            lines: Vec::new(),
            indent: 0,
            flags,
        }
    }

    pub fn has_flag(&self, flag: GenerateFlags) -> bool {
        self.flags.contains(flag)
    }

    pub fn indent_level(&self) -> usize {
        self.indent
    }

    pub fn new_line(&mut self) -> &mut Self {
        self.lines.push(Line {
            indent: self.indent,
            content: None,
        });
        self
    }

    /// Adds one line per line of `text` at the current indentation.
    pub fn add_line<S: AsRef<str>>(&mut self, text: S) -> &mut Self {
        let indent = self.indent;
        self.add_line_at(text, indent)
    }

    pub fn add_line_at<S: AsRef<str>>(&mut self, text: S, indent: usize) -> &mut Self {
        for line in text.as_ref().split('\n') {
            self.lines.push(Line {
                indent,
                content: Some(line.to_owned()),
            });
        }
        self
    }

    /// Appends to the last line instead of starting a new one.
    pub fn append<S: AsRef<str>>(&mut self, text: S) -> &mut Self {
        match self.lines.last_mut() {
            Some(Line { content: Some(content), .. }) => content.push_str(text.as_ref()),
            _ => {
                self.add_line(text);
            }
        }
        self
    }

    pub fn comment<S: AsRef<str>>(&mut self, text: S) -> &mut Self {
        for line in text.as_ref().split('\n') {
            self.add_line(format!("// {}", line));
        }
        self
    }

    /// Comment written only when comments were requested.
    pub fn comment_if_enabled<S: AsRef<str>>(&mut self, text: S) -> &mut Self {
        if self.has_flag(GenerateFlags::ADD_COMMENTS) {
            self.comment(text);
        }
        self
    }

    pub fn metatags(&mut self, tags: &[MetaTag]) -> &mut Self {
        for tag in tags {
            self.comment_if_enabled(tag.to_string());
        }
        self
    }

    pub fn indent(&mut self) -> &mut Self {
        self.indent += 1;
        self
    }

    pub fn dedent(&mut self) -> EmitResult<&mut Self> {
        if self.indent == 0 {
            return Err(EmitError::Writer("Cannot dedent below column zero".to_string()));
        }
        self.indent -= 1;
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn build(&self) -> String {
        let mut result = String::new();
        for line in &self.lines {
            if let Some(content) = &line.content {
                for _ in 0..line.indent {
                    result.push('\t');
                }
                result.push_str(content);
            }
            result.push('\n');
        }
        result
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> EmitResult<()> {
        out.write_all(self.build().as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indentation_uses_tabs() {
        let mut writer = SourceWriter::new(GenerateFlags::empty());
        writer.add_line("class A").add_line("{").indent().add_line("int32 a;");
        writer.dedent().unwrap().add_line("};");
        assert_eq!(writer.build(), "class A\n{\n\tint32 a;\n};\n");
    }

    #[test]
    fn test_comments_follow_flag() {
        let mut silent = SourceWriter::new(GenerateFlags::empty());
        silent.comment_if_enabled("Size: 0x10");
        assert!(silent.is_empty());

        let mut verbose = SourceWriter::new(GenerateFlags::ADD_COMMENTS);
        verbose.comment_if_enabled("line one\nline two");
        assert_eq!(verbose.build(), "// line one\n// line two\n");
    }

    #[test]
    fn test_append_and_dedent_error() {
        let mut writer = SourceWriter::new(GenerateFlags::empty());
        writer.add_line("int32 a;").append(" // 0x0");
        assert_eq!(writer.build(), "int32 a; // 0x0\n");
        assert!(writer.dedent().is_err());
    }
}
