use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::path::TreePath;

pub type PrefixFn = Box<dyn Fn(&TreePath) -> Option<Span<'static>>>;
pub type SuffixFn = Box<dyn Fn(&TreePath) -> Option<Span<'static>>>;
pub type NameFn = Box<dyn Fn(&str) -> Span<'static>>;
pub type StyleFn = Box<dyn Fn(&TreePath) -> Style>;
pub type OnSelectFn = Box<dyn FnMut(&str)>;

/// Injectable presentation callbacks.
///
/// Every hook runs each time a row is (re)built, so hooks should be cheap
/// and a pure function of the path. `prefix` decorates files only;
/// directories carry the open/closed indicator from [`TreeConfig`] instead.
#[derive(Default)]
pub struct RenderHooks {
    pub prefix: Option<PrefixFn>,
    pub suffix: Option<SuffixFn>,
    pub name: Option<NameFn>,
    pub style: Option<StyleFn>,
    pub on_select: Option<OnSelectFn>,
}

/// Visual knobs that are data, not code.
#[derive(Debug, Clone)]
pub struct TreeConfig {
    /// Columns of indentation per nesting level.
    pub indent_width: usize,
    pub open_icon: String,
    pub closed_icon: String,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            indent_width: 2,
            open_icon: "▾".to_owned(),
            closed_icon: "▸".to_owned(),
        }
    }
}

/// The presentation unit owned by a node: one built terminal line.
///
/// Dropped together with its node on removal, rebuilt in place on refresh.
#[derive(Debug, Clone)]
pub struct Row {
    line: Line<'static>,
}

impl Row {
    pub fn line(&self) -> &Line<'static> {
        &self.line
    }
}

pub(crate) fn build_row(
    path: &TreePath,
    opened: bool,
    active: bool,
    hooks: &RenderHooks,
    config: &TreeConfig,
) -> Row {
    let mut spans: Vec<Span<'static>> = Vec::new();

    if path.depth() > 0 {
        spans.push(Span::raw(" ".repeat(config.indent_width * path.depth())));
    }

    if path.is_directory() {
        let icon = if opened {
            &config.open_icon
        } else {
            &config.closed_icon
        };
        spans.push(Span::raw(format!("{icon} ")));
    } else if let Some(prefix) = &hooks.prefix {
        if let Some(span) = prefix(path) {
            spans.push(span);
            spans.push(Span::raw(" "));
        }
    }

    let raw_name = path.name().to_owned();
    spans.push(match &hooks.name {
        Some(name) => name(&raw_name),
        None => Span::raw(raw_name),
    });

    if let Some(suffix) = &hooks.suffix {
        if let Some(span) = suffix(path) {
            spans.push(Span::raw(" "));
            spans.push(span);
        }
    }

    let mut style = match &hooks.style {
        Some(style_fn) => style_fn(path),
        None => Style::default(),
    };
    if active {
        style = style.add_modifier(Modifier::REVERSED);
    }

    Row {
        line: Line::from(spans).style(style),
    }
}
