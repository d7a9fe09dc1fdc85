//! Text → [`FormulaSet`] conversion.
//!
//! Lines have the form `<target>[:<method>]=<value>`. Content problems are
//! reported to the sink and the offending line is skipped; parsing itself
//! never fails.

use crate::model::{Formula, FormulaSet, Method, Target};
use crate::sink::DiagnosticSink;
use crate::types::{Diagnostic, DiagnosticKind};
use regex::Regex;
use std::sync::LazyLock;

static VALID_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?P<target>eth\d+)\s*(?::\s*(?P<method>[^=]+?))?\s*=\s*(?P<value>.+)$",
    )
    .expect("line pattern is valid")
});

/// The method as written on a line, before guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MethodToken {
    Known(Method),
    Guess,
}

impl MethodToken {
    fn parse(token: &str) -> Option<Self> {
        if token == "guess" {
            return Some(Self::Guess);
        }
        Method::from_token(token).map(Self::Known)
    }
}

/// Parses rule lines into a formula set.
///
/// Blank lines and `#` comments are skipped. Later definitions of a target
/// replace earlier ones.
pub fn parse_lines<I, S>(lines: I, sink: &mut dyn DiagnosticSink) -> FormulaSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut formulae = FormulaSet::new();

    for (index, raw) in lines.into_iter().enumerate() {
        let line = raw.as_ref().trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let num = index + 1;

        let Some((target, formula)) = parse_line(line, num, sink) else {
            continue;
        };

        if let Some(previous) = formulae.insert_or_replace(target.clone(), formula) {
            sink.emit(
                Diagnostic::new(
                    DiagnosticKind::DuplicateTarget,
                    format!(
                        "Static rule for '{target}' already found. Discarding older entry ({}=\"{}\")",
                        previous.method(),
                        previous.value()
                    ),
                )
                .at_line(num),
            );
        }
    }

    formulae
}

/// Parses a whole text blob, line by line.
pub fn parse_str(text: &str, sink: &mut dyn DiagnosticSink) -> FormulaSet {
    parse_lines(text.lines(), sink)
}

fn parse_line(line: &str, num: usize, sink: &mut dyn DiagnosticSink) -> Option<(Target, Formula)> {
    let Some(caps) = VALID_LINE.captures(line) else {
        report_unrecognised(line, num, sink);
        return None;
    };
    let Ok(target) = Target::new(caps["target"].trim()) else {
        report_unrecognised(line, num, sink);
        return None;
    };

    let (value, quoted) = unquote(caps["value"].trim());

    let token = match caps.name("method") {
        None => {
            sink.emit(
                Diagnostic::new(
                    DiagnosticKind::MethodGuessed,
                    format!("Guessing method for interface {target}"),
                )
                .at_line(num),
            );
            MethodToken::Guess
        }
        Some(m) => {
            let raw = m.as_str().trim();
            let Some(token) = MethodToken::parse(raw) else {
                sink.emit(
                    Diagnostic::new(
                        DiagnosticKind::UnknownMethod,
                        format!("Unrecognised static identification method '{raw}' - Ignoring"),
                    )
                    .at_line(num),
                );
                return None;
            };
            token
        }
    };

    // A quoted "guess" is the literal label "guess".
    let token = if quoted && value == "guess" {
        MethodToken::Known(Method::Label)
    } else {
        token
    };

    let method = match token {
        MethodToken::Known(method) => method,
        MethodToken::Guess => Method::guess(value),
    };

    let formula = Formula::new(method, value);
    if let Err(e) = formula.validate() {
        sink.emit(
            Diagnostic::new(DiagnosticKind::InvalidValue, format!("{e} - Ignoring")).at_line(num),
        );
        return None;
    }

    let formula = translate_legacy_ppn(&target, formula, num, sink);
    Some((target, formula))
}

fn report_unrecognised(line: &str, num: usize, sink: &mut dyn DiagnosticSink) {
    sink.emit(
        Diagnostic::new(
            DiagnosticKind::UnrecognisedLine,
            format!("Unrecognised line '{line}' in static rules"),
        )
        .at_line(num),
    );
}

/// Rewrites old-style `pciXpY` ppns to `pXpY`.
fn translate_legacy_ppn(
    target: &Target,
    formula: Formula,
    num: usize,
    sink: &mut dyn DiagnosticSink,
) -> Formula {
    if formula.method() != Method::Ppn {
        return formula;
    }
    let Some(rest) = formula.value().strip_prefix("pci") else {
        return formula;
    };
    let translated = format!("p{rest}");
    sink.emit(
        Diagnostic::new(
            DiagnosticKind::LegacyPpn,
            format!("Detected use of old-style ppn reference for {target} - Translating to {translated}"),
        )
        .at_line(num),
    );
    Formula::new(Method::Ppn, translated)
}

/// Strips one pair of matching single or double quotes.
fn unquote(value: &str) -> (&str, bool) {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return (&value[1..value.len() - 1], true);
        }
    }
    (value, false)
}
