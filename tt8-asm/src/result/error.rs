use std::fmt::{Display, Formatter, Debug};
use std::error::Error;
use std::ops::BitOr;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use console::Style;

/// Defines a bright cyan text, used for styling help messages.
pub fn help_style() -> Style {
    Style::new()
        .cyan()
        .bright()
}

/// Defines a bright yellow text, used for styling warning messages.
pub fn warning_style() -> Style {
    Style::new()
        .yellow()
        .bright()
}

/// Defines a bright red text, used for styling error messages.
pub fn error_style() -> Style {
    Style::new()
        .red()
        .bright()
}

/// Defines a bright white text, used for styling important parts of messages.
pub fn white_style() -> Style {
    Style::new()
        .white()
        .bright()
}

/// A span on a single source line; `line` is 1-based, `column` is 0-based.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Location {
    line: usize,
    column: usize,
    len: usize
}
impl Location {
    pub fn new(line: usize, column: usize, len: usize) -> Location {
        Location {
            line,
            column,
            len
        }
    }
}
impl Locate for Location {
    fn locate(&self) -> Location {
        *self
    }
}
impl BitOr for Location {
    type Output = Location;

    fn bitor(self, rhs: Self) -> Self::Output {
        let line = std::cmp::min(self.line, rhs.line);
        let column = std::cmp::min(self.column, rhs.column);
        let end = std::cmp::max(self.column + self.len, rhs.column + rhs.len);
        Location { line, column, len: end - column }
    }
}

pub trait Locate {
    fn locate(&self) -> Location;
    fn line(&self) -> usize {
        self.locate().line
    }
    fn column(&self) -> usize {
        self.locate().column
    }
    fn len(&self) -> usize {
        self.locate().len
    }
}
impl<T> Locate for &T where
    T: Locate {
    fn locate(&self) -> Location {
        (*self).locate()
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum NotificationKind {
    Warning,
    Error
}

/// A single diagnostic pointing into the assembly source.
#[derive(Clone, Eq, PartialEq)]
pub struct Notification {
    kind: NotificationKind,
    description: String,
    location: Location,
    note: Option<String>,
    filename: Option<PathBuf>,
    text: Option<Rc<String>>
}
impl Notification {
    fn error<L, S>(location: L, description: S, note: Option<String>) -> Self where
        L: Locate,
        S: ToString {
        Notification {
            kind: NotificationKind::Error,
            description: description.to_string(),
            location: location.locate(),
            note,
            filename: None,
            text: None
        }
    }

    fn warning<L, S>(location: L, description: S, note: Option<String>) -> Self where
        L: Locate,
        S: ToString {
        Notification {
            kind: NotificationKind::Warning,
            ..Notification::error(location, description, note)
        }
    }

    pub fn error_lexer_illegal_symbol<L>(location: L) -> Self where
        L: Locate {
        Notification::error(location, "illegal symbol in token", None)
    }

    pub fn error_parser_expected_found<L, E, F>(location: L, expected: E, found: F) -> Self where
        L: Locate,
        E: ToString,
        F: ToString {
        let found = found.to_string();
        let description = if found.is_empty() {
            format!("expected {}, found end of line", expected.to_string())
        } else {
            format!("expected {}, found `{}`", expected.to_string(), found)
        };
        Notification::error(location, description, Some(format!("expected {}", expected.to_string())))
    }

    pub fn error_unknown_mnemonic<L, S>(location: L, mnemonic: S) -> Self where
        L: Locate,
        S: ToString {
        Notification::error(location, format!("unknown instruction `{}`", mnemonic.to_string()), None)
    }

    pub fn error_invalid_number_format<L, F>(location: L, format: F) -> Self where
        L: Locate,
        F: ToString {
        Notification::error(location, format!("invalid number `{}`", format.to_string()), None)
    }

    pub fn error_value_out_of_range<L>(location: L, value: u64, max: u64) -> Self where
        L: Locate {
        Notification::error(location, format!("value {} does not fit the operand", value), Some(format!("must be at most {}", max)))
    }

    pub fn error_operands_amount<L>(location: L, expected: &[usize], found: usize) -> Self where
        L: Locate {
        let plural = |amount: usize| { if amount == 1 { "" } else { "s" } };
        let requirement = match expected {
            [n] => format!("{} operand{}", n, plural(*n)),
            [a, b] => format!("{} or {} operands", a, b),
            _ => expected.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(", ") + " operands"
        };
        let description = format!("this instruction takes {} but {} operand{} were supplied", requirement, found, plural(found));
        Notification::error(location, description, Some(format!("requires {}", requirement)))
    }

    pub fn error_wait_without_instruction<L>(location: L) -> Self where
        L: Locate {
        Notification::error(location, "`WAIT` must follow an instruction", Some(String::from("nothing to repeat")))
    }

    pub fn warning_no_effect<L, S>(location: L, what: S) -> Self where
        L: Locate,
        S: ToString {
        Notification::warning(location, format!("`{}` has no effect", what.to_string()), None)
    }

    pub fn warning_unimplemented_opcode<L>(location: L, command: u8) -> Self where
        L: Locate {
        Notification::warning(location, format!("opcode {:04b} is not implemented by the core", command >> 4), Some(String::from("the cycle will report an unimplemented instruction")))
    }

    pub fn kind(&self) -> NotificationKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_filename<P>(&mut self, filename: P) where
        P: AsRef<Path> {
        self.filename = Some(filename.as_ref().to_path_buf());
    }

    pub fn set_text(&mut self, text: Rc<String>) {
        self.text = Some(text);
    }

    fn display_source(&self, style: &Style, f: &mut Formatter<'_>) -> std::fmt::Result {
        let width = format!("{}", self.location.line()).len();
        let line = self.text.as_ref()
            .and_then(|text| text.lines().nth(self.location.line() - 1));
        let line = match line {
            Some(line) => line,
            None => return Ok(())
        };

        writeln!(f, "{:width$} {}", "", help_style().apply_to("|"), width = width)?;
        writeln!(f, "{:width$} {} {}", help_style().apply_to(self.location.line()), help_style().apply_to("|"), line, width = width)?;
        write!(f, "{:width$} {}{}{}",
               "",
               help_style().apply_to("|"),
               " ".repeat(self.location.column() + 1),
               style.apply_to("^".repeat(std::cmp::max(self.location.len(), 1))),
               width = width
        )?;
        if let Some(ref note) = self.note {
            write!(f, " {}", style.apply_to(note))?;
        }
        writeln!(f)?;
        writeln!(f)
    }
}
impl Locate for Notification {
    fn locate(&self) -> Location {
        self.location
    }
}
impl Debug for Notification {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let filename = if let Some(ref filename) = self.filename {
            filename.to_string_lossy()
        } else {
            std::borrow::Cow::Borrowed("<anonymous>")
        };
        write!(f, "{}:{}:{}: {} ({:?})", filename, self.location.line(), self.location.column() + 1, self.description, &self.kind)
    }
}
impl Display for Notification {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let (label, style) = match self.kind {
            NotificationKind::Warning => ("warning", warning_style()),
            NotificationKind::Error => ("error", error_style())
        };
        if !f.alternate() {
            return writeln!(f, "{}: {}", label, self.description);
        }

        let filename = if let Some(ref filename) = self.filename {
            filename.to_string_lossy()
        } else {
            std::borrow::Cow::Borrowed("<anonymous>")
        };
        let width = format!("{}", self.location.line()).len();
        writeln!(f, "{}: {}", style.apply_to(label), white_style().apply_to(&self.description))?;
        writeln!(f, "{:width$}{} {}:{}:{}", "", help_style().apply_to("-->"), filename, self.location.line(), self.location.column() + 1, width = width)?;
        self.display_source(&style, f)
    }
}
impl Error for Notification {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

/// All diagnostics produced while assembling one source file.
#[derive(Clone)]
pub struct AssemblerLog {
    filename: Option<PathBuf>,
    text: Option<Rc<String>>,
    warnings: Vec<Notification>,
    errors: Vec<Notification>
}
impl AssemblerLog {
    pub fn new() -> Self {
        AssemblerLog {
            filename: None,
            text: None,
            warnings: Vec::new(),
            errors: Vec::new()
        }
    }

    pub fn warn(&mut self, warning: Notification) {
        self.warnings.push(warning);
    }

    pub fn err(&mut self, error: Notification) {
        self.errors.push(error);
    }

    pub fn set_filename<P>(&mut self, filename: P) where
        P: AsRef<Path> {
        self.filename = Some(filename.as_ref().to_path_buf());
    }

    pub fn set_text(&mut self, text: Rc<String>) {
        self.text = Some(text);
    }

    /// Attaches the file name and source text to every notification, so that they can be rendered.
    pub fn update(&mut self) {
        for notification in self.warnings.iter_mut().chain(self.errors.iter_mut()) {
            if let Some(ref filename) = self.filename {
                notification.set_filename(filename);
            }
            if let Some(ref text) = self.text {
                notification.set_text(text.clone());
            }
        }
    }

    pub fn warnings(&self) -> &[Notification] {
        &self.warnings
    }

    pub fn errors(&self) -> &[Notification] {
        &self.errors
    }

    pub fn is_err(&self) -> bool {
        !self.errors.is_empty()
    }
}
impl Default for AssemblerLog {
    fn default() -> Self {
        AssemblerLog::new()
    }
}
impl Debug for AssemblerLog {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.warnings.iter().chain(self.errors.iter()))
            .finish()
    }
}
impl Display for AssemblerLog {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let iter = self.warnings.iter()
            .chain(self.errors.iter());
        for notification in iter {
            Display::fmt(notification, f)?;
        }
        if f.alternate() {
            let plural = |amount: usize| { if amount == 1 { "" } else { "s" } };
            let errors = self.errors.len();
            let warnings = self.warnings.len();
            let summary = match (errors, warnings) {
                (0, 0) => None,
                (0, w) => Some(format!("{} warning{} emitted", w, plural(w))),
                (1, 0) => Some(String::from("aborting due to previous error")),
                (e, 0) => Some(format!("aborting due to {} previous errors", e)),
                (1, w) => Some(format!("aborting due to previous error; {} warning{} emitted", w, plural(w))),
                (e, w) => Some(format!("aborting due to {} previous errors; {} warning{} emitted", e, w, plural(w)))
            };
            if let Some(summary) = summary {
                let label = if errors > 0 { error_style().apply_to("error") } else { warning_style().apply_to("warning") };
                writeln!(f, "{}: {}", label, white_style().apply_to(summary))?;
            }
        }
        Ok(())
    }
}
impl Error for AssemblerLog {}
