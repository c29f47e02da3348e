//! Markup building blocks shared by the field renderers.

use std::fmt::{self, Write};

use markdown_weaver_escape::{FmtWriter, escape_html, escape_html_body_text};

use crate::attributes::{Attribute, ClassifiedAttributes, Mode, is_switched_on};

/// Class used when a field supplies none of its own.
pub const DEFAULT_CLASS: &str = "form-control";

/// Attributes the renderers always write themselves.
const RENDERER_OWNED: &[&str] = &["id"];

/// Flags every view rendering writes on its control.
pub const VIEW_FLAGS: &[&str] = &["readonly", "disabled"];

/// An HTML fragment under construction.
#[derive(Debug, Default)]
pub struct Markup {
    buf: String,
}

impl Markup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append trusted markup verbatim.
    pub fn raw(&mut self, s: &str) -> fmt::Result {
        self.buf.write_str(s)
    }

    /// Append escaped text content.
    pub fn text(&mut self, s: &str) -> fmt::Result {
        escape_html_body_text(FmtWriter(&mut self.buf), s)
    }

    /// Append ` name="value"` with the value escaped.
    pub fn attr(&mut self, name: &str, value: &str) -> fmt::Result {
        write!(self.buf, " {}=\"", name)?;
        escape_html(FmtWriter(&mut self.buf), value)?;
        self.buf.write_char('"')
    }

    /// Append a bare unary attribute.
    pub fn flag(&mut self, name: &str) -> fmt::Result {
        write!(self.buf, " {}", name)
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

impl Write for Markup {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buf.write_str(s)
    }
}

/// A whitespace-separated class attribute with set semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    tokens: Vec<String>,
}

impl ClassList {
    pub fn parse(s: &str) -> Self {
        let mut list = Self::default();
        list.extend_from(s);
        list
    }

    pub fn extend_from(&mut self, s: &str) {
        for token in s.split_whitespace() {
            self.insert(token);
        }
    }

    /// Add a token unless it is already present.
    pub fn insert(&mut self, token: &str) {
        if !self.contains(token) {
            self.tokens.push(token.to_string());
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Swap one token for another, keeping its position.
    pub fn replace(&mut self, from: &str, to: &str) {
        if self.contains(to) {
            self.tokens.retain(|t| t != from);
            return;
        }
        for token in self.tokens.iter_mut().filter(|t| *t == from) {
            *token = to.to_string();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Add the tokens that make a control visually read-only.
    pub fn make_read_only(&mut self) {
        self.insert("readonly");
        self.insert("disabled");
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens.join(" "))
    }
}

/// The merged class for a set of attributes, defaulting to `form-control`.
pub fn merged_class<'a>(attributes: impl IntoIterator<Item = &'a Attribute>) -> ClassList {
    let mut classes = ClassList::default();
    for attribute in attributes.into_iter().filter(|a| a.name == "class") {
        classes.extend_from(&attribute.value);
    }
    if classes.is_empty() {
        classes.insert(DEFAULT_CLASS);
    }
    classes
}

impl ClassifiedAttributes {
    /// Write the attributes for `mode` onto an open tag, class last.
    ///
    /// `written` names attributes the caller has already put on the tag;
    /// they are skipped, as are [`VIEW_FLAGS`] in view mode.
    pub fn attach(&self, markup: &mut Markup, mode: Mode, written: &[&str]) -> fmt::Result {
        self.attach_with(markup, mode, written, |_| {})
    }

    /// Like [`attach`](Self::attach), letting the caller adjust the merged
    /// class before it is written.
    pub fn attach_with(
        &self,
        markup: &mut Markup,
        mode: Mode,
        written: &[&str],
        adjust: impl FnOnce(&mut ClassList),
    ) -> fmt::Result {
        for attribute in self.for_mode(mode) {
            let name = attribute.name.as_str();
            if name == "class"
                || RENDERER_OWNED.contains(&name)
                || written.contains(&name)
                || (mode == Mode::View && VIEW_FLAGS.contains(&name))
                || !is_switched_on(&attribute.value)
            {
                continue;
            }
            markup.attr(&attribute.name, &attribute.value)?;
        }

        let mut classes = self.class_list(mode);
        adjust(&mut classes);
        markup.attr("class", &classes.to_string())
    }

    /// The merged class a rendering in `mode` carries.
    pub fn class_list(&self, mode: Mode) -> ClassList {
        let mut classes = merged_class(self.for_mode(mode));
        if mode == Mode::View {
            classes.make_read_only();
        }
        classes
    }
}
