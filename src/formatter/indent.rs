//! Physical indentation units
//!
//! An indentation level is a run of spaces or tabs. Text rendering repeats
//! the unit's character; length computation multiplies tab counts by the
//! configured tab width.

/// The character an indentation unit repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentKind {
    Spaces,
    Tabs,
}

/// One indentation unit: a repeated-character run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indent {
    pub kind: IndentKind,
    pub count: usize,
}

impl Indent {
    pub fn spaces(count: usize) -> Self {
        Indent {
            kind: IndentKind::Spaces,
            count,
        }
    }

    pub fn tabs(count: usize) -> Self {
        Indent {
            kind: IndentKind::Tabs,
            count,
        }
    }

    /// A unit covering `columns` columns, using tabs when the configured
    /// kind is tabs and the width divides evenly, spaces otherwise.
    pub fn from_columns(columns: usize, kind: IndentKind, tab_width: usize) -> Self {
        match kind {
            IndentKind::Tabs if tab_width > 0 && columns % tab_width == 0 => {
                Indent::tabs(columns / tab_width)
            }
            _ => Indent::spaces(columns),
        }
    }

    pub fn columns(&self, tab_width: usize) -> usize {
        match self.kind {
            IndentKind::Spaces => self.count,
            IndentKind::Tabs => self.count * tab_width,
        }
    }

    pub fn text(&self) -> String {
        let ch = match self.kind {
            IndentKind::Spaces => ' ',
            IndentKind::Tabs => '\t',
        };
        ch.to_string().repeat(self.count)
    }
}

/// The printer's active indentation: one frame per broken group.
#[derive(Debug, Default)]
pub struct IndentStack {
    units: Vec<Indent>,
}

impl IndentStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn push(&mut self, unit: Indent) {
        self.units.push(unit);
    }

    pub fn truncate(&mut self, len: usize) {
        self.units.truncate(len);
    }

    pub fn columns(&self, tab_width: usize) -> usize {
        self.units.iter().map(|u| u.columns(tab_width)).sum()
    }

    pub fn render(&self) -> String {
        self.units.iter().map(Indent::text).collect()
    }
}
