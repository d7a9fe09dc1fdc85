//! Loading and saving a static rules file.

use crate::model::FormulaSet;
use crate::nic::{MacPci, NicDescriptor};
use crate::sink::DiagnosticSink;
use crate::types::DiagnosticKind;
use crate::{parser, resolver, serializer};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Failure to obtain, read or write the rules source.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum SourceError {
    /// No path was configured.
    #[error("No source of static rules configured")]
    #[diagnostic(code(ifrename::source::none))]
    NoSource,

    /// The configured path does not exist.
    #[error("Static rule file '{}' does not exist", .path.display())]
    #[diagnostic(
        code(ifrename::source::missing),
        help("create it with `ifrename-static init`")
    )]
    Missing {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// Reading or writing failed.
    #[error("I/O error on static rule file '{}': {source}", .path.display())]
    #[diagnostic(code(ifrename::source::io))]
    Io {
        /// Path being accessed, empty for streams.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl SourceError {
    fn kind(&self) -> DiagnosticKind {
        match self {
            Self::NoSource | Self::Missing { .. } => DiagnosticKind::SourceUnavailable,
            Self::Io { .. } => DiagnosticKind::IoFailure,
        }
    }

    fn reported(self, sink: &mut dyn DiagnosticSink) -> Self {
        sink.error(self.kind(), self.to_string());
        self
    }
}

/// A static rules file: its formulae and the rules generated from them.
#[derive(Debug, Clone, Default)]
pub struct StaticRules {
    path: Option<PathBuf>,
    formulae: FormulaSet,
    rules: Vec<MacPci>,
}

impl StaticRules {
    /// Creates an empty instance with no backing path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an instance backed by `path`.
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Returns the parsed formulae.
    #[must_use]
    pub fn formulae(&self) -> &FormulaSet {
        &self.formulae
    }

    /// Returns the rules from the last [`StaticRules::generate`].
    #[must_use]
    pub fn rules(&self) -> &[MacPci] {
        &self.rules
    }

    /// Reads and parses the backing file, replacing current formulae.
    ///
    /// # Errors
    ///
    /// Fails if no path is configured, the file does not exist, or reading
    /// fails. Formulae are left untouched on failure.
    pub fn load_and_parse(&mut self, sink: &mut dyn DiagnosticSink) -> Result<(), SourceError> {
        let Some(path) = self.path.clone() else {
            return Err(SourceError::NoSource.reported(sink));
        };
        if !path.exists() {
            return Err(SourceError::Missing { path }.reported(sink));
        }

        let file = std::fs::File::open(&path).map_err(|source| {
            SourceError::Io {
                path: path.clone(),
                source,
            }
            .reported(sink)
        })?;
        let lines = read_lines(BufReader::new(file), &path).map_err(|e| e.reported(sink))?;

        tracing::debug!(path = %path.display(), lines = lines.len(), "Parsing static rules");
        self.formulae = parser::parse_lines(&lines, sink);
        Ok(())
    }

    /// Parses rules from a reader, replacing current formulae.
    ///
    /// # Errors
    ///
    /// Fails if reading fails. Formulae are left untouched on failure.
    pub fn load_from_reader<R: BufRead>(
        &mut self,
        reader: R,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<(), SourceError> {
        let lines = read_lines(reader, Path::new("")).map_err(|e| e.reported(sink))?;
        self.formulae = parser::parse_lines(&lines, sink);
        Ok(())
    }

    /// Resolves the formulae against a NIC snapshot and stores the rules.
    pub fn generate(&mut self, nics: &[NicDescriptor], sink: &mut dyn DiagnosticSink) -> &[MacPci] {
        self.rules = resolver::resolve(&self.formulae, nics, sink);
        &self.rules
    }

    /// Renders the formulae as rules text.
    #[must_use]
    pub fn write(&self, header: bool, sink: &mut dyn DiagnosticSink) -> String {
        serializer::serialize(&self.formulae, header, sink)
    }

    /// Writes the rules text to the backing file.
    ///
    /// # Errors
    ///
    /// Fails if no path is configured or writing fails.
    pub fn save(&self, header: bool, sink: &mut dyn DiagnosticSink) -> Result<(), SourceError> {
        let Some(path) = self.path.as_deref() else {
            return Err(SourceError::NoSource.reported(sink));
        };
        let text = self.write(header, sink);
        std::fs::write(path, text).map_err(|source| {
            SourceError::Io {
                path: path.to_path_buf(),
                source,
            }
            .reported(sink)
        })?;
        tracing::debug!(path = %path.display(), "Saved static rules");
        Ok(())
    }

    /// Writes the rules text to any writer.
    ///
    /// # Errors
    ///
    /// Fails if writing fails.
    pub fn write_to<W: Write>(
        &self,
        mut writer: W,
        header: bool,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<(), SourceError> {
        let text = self.write(header, sink);
        writer
            .write_all(text.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|source| {
                SourceError::Io {
                    path: PathBuf::new(),
                    source,
                }
                .reported(sink)
            })
    }
}

/// Splits the reader into lines, decoding each one lossily so a stray
/// non-UTF-8 byte only affects its own line.
fn read_lines<R: BufRead>(mut reader: R, path: &Path) -> Result<Vec<String>, SourceError> {
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| SourceError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        if read == 0 {
            return Ok(lines);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        lines.push(String::from_utf8_lossy(&buf).into_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Method, Target};
    use crate::sink::{Collector, NullSink};
    use std::io::{self, Cursor, Read};

    const RULES: &str = "\
# comment line (ignored)
eth0:mac=\"DE:AD:C0:DE:00:00\"
eth1:pci=\"0000:01:01.1\"
";

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn load_without_path_fails() {
        let mut rules = StaticRules::new();
        let mut sink = Collector::new();
        let err = rules.load_and_parse(&mut sink).unwrap_err();
        assert!(matches!(err, SourceError::NoSource));
        assert!(sink.has(DiagnosticKind::SourceUnavailable));
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut rules = StaticRules::with_path(dir.path().join("absent.conf"));
        let err = rules.load_and_parse(&mut NullSink).unwrap_err();
        assert!(matches!(err, SourceError::Missing { .. }));
        assert!(rules.formulae().is_empty());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("static-rules.conf");
        std::fs::write(&path, RULES).unwrap();

        let mut rules = StaticRules::with_path(&path);
        rules.load_and_parse(&mut NullSink).unwrap();
        assert_eq!(rules.formulae().len(), 2);
        assert_eq!(
            rules
                .formulae()
                .get(&Target::new("eth1").unwrap())
                .unwrap()
                .method(),
            Method::Pci
        );
    }

    #[test]
    fn load_from_reader() {
        let mut rules = StaticRules::new();
        rules
            .load_from_reader(Cursor::new(RULES), &mut NullSink)
            .unwrap();
        assert_eq!(rules.formulae().len(), 2);
    }

    #[test]
    fn non_utf8_bytes_do_not_abort_the_load() {
        let text: &[u8] =
            b"# Carte r\xe9seau\neth0:mac=\"DE:AD:C0:DE:00:00\"\r\neth1:label=\"Slot \xe9\"\n";
        let mut rules = StaticRules::new();
        let mut sink = Collector::new();
        rules.load_from_reader(text, &mut sink).unwrap();

        assert!(!sink.has(DiagnosticKind::IoFailure));
        assert_eq!(rules.formulae().len(), 2);
        let eth0 = rules.formulae().get(&Target::new("eth0").unwrap()).unwrap();
        assert_eq!(eth0.value(), "DE:AD:C0:DE:00:00");
        let eth1 = rules.formulae().get(&Target::new("eth1").unwrap()).unwrap();
        assert_eq!(eth1.method(), Method::Label);
        assert_eq!(eth1.value(), "Slot \u{fffd}");
    }

    #[test]
    fn read_failure_keeps_previous_formulae() {
        let mut rules = StaticRules::new();
        rules
            .load_from_reader(Cursor::new(RULES), &mut NullSink)
            .unwrap();

        let mut sink = Collector::new();
        let err = rules
            .load_from_reader(BufReader::new(FailingReader), &mut sink)
            .unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
        assert!(sink.has(DiagnosticKind::IoFailure));
        assert_eq!(rules.formulae().len(), 2);
    }

    #[test]
    fn save_without_path_fails() {
        let rules = StaticRules::new();
        assert!(matches!(
            rules.save(true, &mut NullSink),
            Err(SourceError::NoSource)
        ));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("static-rules.conf");

        let mut source = StaticRules::with_path(&path);
        source
            .load_from_reader(Cursor::new(RULES), &mut NullSink)
            .unwrap();
        source.save(true, &mut NullSink).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with(serializer::SAVE_HEADER));

        let mut reloaded = StaticRules::with_path(&path);
        reloaded.load_and_parse(&mut NullSink).unwrap();
        assert_eq!(reloaded.formulae(), source.formulae());
    }

    #[test]
    fn write_to_failure_is_io_error() {
        let rules = StaticRules::new();
        let mut sink = Collector::new();
        let result = rules.write_to(FailingWriter, false, &mut sink);
        // Empty text, so write() is never called.
        assert!(result.is_ok());

        let mut rules = StaticRules::new();
        rules
            .load_from_reader(Cursor::new(RULES), &mut NullSink)
            .unwrap();
        let err = rules.write_to(FailingWriter, false, &mut sink).unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
        assert!(sink.has(DiagnosticKind::IoFailure));
    }

    #[test]
    fn generate_stores_rules() {
        let mut rules = StaticRules::new();
        rules
            .load_from_reader(Cursor::new(RULES), &mut NullSink)
            .unwrap();
        let nics = vec![
            NicDescriptor::new("de:ad:c0:de:00:00", "0000:05:00.0"),
            NicDescriptor::new("de:ad:c0:de:00:01", "0000:01:01.1"),
        ];
        let generated = rules.generate(&nics, &mut NullSink).len();
        assert_eq!(generated, 2);
        assert_eq!(rules.rules()[1].mac(), "de:ad:c0:de:00:01");
    }
}
