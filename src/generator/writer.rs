//! TL-032: Indent-aware line writer for generated Python modules.

/// Accumulates lines, each indented by `level * indent` spaces.
#[derive(Debug, Clone)]
pub struct PyWriter {
    out: String,
    indent: usize,
}

impl PyWriter {
    pub fn new(indent: usize) -> Self {
        Self {
            out: String::new(),
            indent,
        }
    }

    pub fn line(&mut self, level: usize, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            self.out.push_str(&" ".repeat(level * self.indent));
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Interpreter line and encoding header.
    pub fn headers(&mut self) {
        self.line(0, "#!/usr/bin/python");
        self.line(0, "# -*- coding: UTF-8 -*-");
        self.blank();
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// Turn a relation or package name into a Python identifier.
pub fn identifier(raw: &str) -> String {
    let mut ident: String = raw
        .trim_start_matches('@')
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tl032_indent_levels() {
        let mut w = PyWriter::new(2);
        w.line(0, "class A:");
        w.line(1, "def f(self):");
        w.line(2, "pass");
        w.line(3, "");
        assert_eq!(w.finish(), "class A:\n  def f(self):\n    pass\n\n");
    }

    #[test]
    fn test_tl032_headers() {
        let mut w = PyWriter::new(4);
        w.headers();
        assert_eq!(w.finish(), "#!/usr/bin/python\n# -*- coding: UTF-8 -*-\n\n");
    }

    #[test]
    fn test_tl032_identifier() {
        assert_eq!(identifier("@lines"), "lines");
        assert_eq!(identifier("@order.lines"), "order_lines");
        assert_eq!(identifier("9lives"), "_9lives");
        assert_eq!(identifier("@"), "_");
    }
}
