//! Formatting registered texts with positional arguments.
//!
//! Texts use `{}` for the next argument and `{N}` for argument `N`; `{{` and
//! `}}` are literal braces. When an identifier has no text, the output is the
//! identifier followed by the arguments: `"24:1 a"`.

use std::fmt::{self, Display, Write};

use thiserror::Error;

use crate::i18n::{Registry, TextContext, TextFinder, TextId, TextKey};

/// An error whose message is a formatted text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TextError {
    key: TextKey,
    message: String,
}

impl TextError {
    /// Key of the text the message was built from.
    pub fn key(&self) -> &TextKey {
        &self.key
    }

    /// The formatted message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Substitute `args` into `template`.
///
/// Placeholders referring to missing arguments are kept as written.
pub fn substitute(template: &str, args: &[&dyn Display]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut next = 0;
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut inner = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    inner.push(c);
                }

                let index = if inner.is_empty() {
                    let index = next;
                    next += 1;
                    Some(index)
                } else {
                    inner.trim().parse::<usize>().ok()
                };

                match index.and_then(|i| args.get(i)) {
                    Some(arg) if closed => {
                        let _ = write!(out, "{}", arg);
                    }
                    _ => {
                        out.push('{');
                        out.push_str(&inner);
                        if closed {
                            out.push('}');
                        }
                    }
                }
            }
            c => out.push(c),
        }
    }

    out
}

/// Render an identifier without text: `"<id>:<arg> <arg> ..."`.
pub fn fallback_text(id: &dyn TextId, args: &[&dyn Display]) -> String {
    let mut out = format!("{}:", id);
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{}", arg);
    }
    out
}

/// Format the text for `id` from `finder`, or the fallback rendering.
pub fn format_with(finder: &dyn TextFinder, id: &dyn TextId, args: &[&dyn Display]) -> String {
    match finder.lookup(&id.text_key()) {
        Some(template) => substitute(&template, args),
        None => fallback_text(id, args),
    }
}

/// Format the text for `id` from the global registry.
pub fn format_text(id: &dyn TextId, args: &[&dyn Display]) -> String {
    format_with(Registry::global(), id, args)
}

/// Format the text for `id` from the finder bound to `ctx`.
pub fn format_in(ctx: &TextContext, id: &dyn TextId, args: &[&dyn Display]) -> String {
    format_with(ctx.finder(), id, args)
}

/// Build an error from the text for `id` in `finder`.
pub fn text_error_with(
    finder: &dyn TextFinder,
    id: &dyn TextId,
    args: &[&dyn Display],
) -> TextError {
    TextError {
        key: id.text_key(),
        message: format_with(finder, id, args),
    }
}

/// Build an error from the text for `id` in the global registry.
pub fn text_error(id: &dyn TextId, args: &[&dyn Display]) -> TextError {
    text_error_with(Registry::global(), id, args)
}

/// Build an error from the text for `id` in the finder bound to `ctx`.
pub fn text_error_in(ctx: &TextContext, id: &dyn TextId, args: &[&dyn Display]) -> TextError {
    text_error_with(ctx.finder(), id, args)
}

/// Display adapter formatting a text lazily.
pub struct Formatted<'a> {
    finder: &'a dyn TextFinder,
    id: &'a dyn TextId,
    args: &'a [&'a dyn Display],
}

impl<'a> Formatted<'a> {
    /// Wrap a finder, identifier and arguments for display.
    pub fn new(
        finder: &'a dyn TextFinder,
        id: &'a dyn TextId,
        args: &'a [&'a dyn Display],
    ) -> Self {
        Self { finder, id, args }
    }
}

impl Display for Formatted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_with(self.finder, self.id, self.args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{int_plural, int_single, Keyed, Shape, TextMap};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Msg(i64);

    impl Keyed for Msg {
        fn shape(&self) -> Shape {
            Shape::Int(self.0)
        }
    }

    impl TextId for Msg {
        fn single(&self) -> Self {
            Msg(int_single(self.0))
        }

        fn plural(&self) -> Self {
            Msg(int_plural(self.0))
        }
    }

    impl fmt::Display for Msg {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    const ARGS: Msg = Msg(3);

    fn ctx_map() -> TextMap {
        TextMap::new()
            .with(ARGS, "CTX Single {}")
            .with(ARGS.plural(), "Plurals {}")
    }

    // ==================== Substitution Tests ====================

    #[test]
    fn test_substitute_sequential() {
        assert_eq!(substitute("{} and {}", &[&1, &"a"]), "1 and a");
    }

    #[test]
    fn test_substitute_positional() {
        assert_eq!(substitute("{1} before {0}", &[&1, &"a"]), "a before 1");
    }

    #[test]
    fn test_substitute_escapes() {
        assert_eq!(substitute("{{{}}}", &[&7]), "{7}");
    }

    #[test]
    fn test_substitute_missing_args_kept() {
        assert_eq!(substitute("{} {} {5}", &[&1]), "1 {} {5}");
    }

    #[test]
    fn test_substitute_unclosed() {
        assert_eq!(substitute("text {", &[&1]), "text {");
        assert_eq!(substitute("text {0", &[&1]), "text {0");
    }

    #[test]
    fn test_substitute_non_ascii() {
        assert_eq!(substitute("único {}", &[&1]), "único 1");
    }

    // ==================== Fallback Tests ====================

    #[test]
    fn test_fallback_with_args() {
        assert_eq!(fallback_text(&Msg(24), &[&1, &"a"]), "24:1 a");
    }

    #[test]
    fn test_fallback_without_args() {
        assert_eq!(fallback_text(&Msg(10), &[]), "10:");
    }

    // ==================== Finder Tests ====================

    #[test]
    fn test_format_with_missing_text() {
        let tm = TextMap::new();
        assert_eq!(format_with(&tm, &Msg(24), &[&1, &"a"]), "24:1 a");
    }

    #[test]
    fn test_format_with_found_text() {
        assert_eq!(format_with(&ctx_map(), &ARGS, &[&1]), "CTX Single 1");
        assert_eq!(format_with(&ctx_map(), &ARGS.plural(), &[&2]), "Plurals 2");
    }

    #[test]
    fn test_format_in_context() {
        let ctx = TextContext::with_finder(ctx_map());
        assert_eq!(format_in(&ctx, &ARGS, &[&1]), "CTX Single 1");
        assert_eq!(format_in(&ctx, &Msg(24), &[&1, &"a"]), "24:1 a");
    }

    #[test]
    fn test_format_text_unregistered_uses_fallback() {
        assert_eq!(format_text(&Msg(424_242), &[&1, &"a"]), "424242:1 a");
    }

    #[test]
    fn test_text_error_in_context() {
        let ctx = TextContext::with_finder(ctx_map());
        let err = text_error_in(&ctx, &ARGS, &[&1]);

        assert_eq!(err.to_string(), "CTX Single 1");
        assert_eq!(err.key(), &ARGS.text_key());
        assert_eq!(err.message(), "CTX Single 1");
    }

    #[test]
    fn test_text_error_fallback() {
        let err = text_error(&Msg(424_243), &[&1, &"a"]);
        assert_eq!(err.to_string(), "424243:1 a");
    }

    #[test]
    fn test_formatted_display() {
        let tm = ctx_map();
        let id = ARGS;
        let args: [&dyn Display; 1] = [&9];
        let formatted = Formatted::new(&tm, &id, &args);
        assert_eq!(format!("[{}]", formatted), "[CTX Single 9]");
    }
}
