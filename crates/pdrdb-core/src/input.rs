use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use tracing::debug;

use crate::splitter::StatementSplitter;

/// Path that selects standard input.
pub const STDIN_PATH: &str = "-";

/// Buffered line source for SQL text: a file or standard input.
pub struct SqlInput {
    reader: Box<dyn BufRead>,
    name: String,
}

impl SqlInput {
    /// Open `path` for reading, or standard input when `path` is `-`.
    pub fn open(path: &str) -> io::Result<Self> {
        if path == STDIN_PATH {
            return Ok(Self::stdin());
        }

        let file = File::open(Path::new(path)).map_err(|e| {
            io::Error::new(e.kind(), format!("failed to open SQL file '{}': {}", path, e))
        })?;
        debug!("reading SQL from {}", path);
        Ok(SqlInput { reader: Box::new(BufReader::new(file)), name: path.to_string() })
    }

    pub fn stdin() -> Self {
        debug!("reading SQL from stdin");
        SqlInput { reader: Box::new(io::stdin().lock()), name: "<stdin>".to_string() }
    }

    pub fn from_reader(reader: impl BufRead + 'static, name: impl Into<String>) -> Self {
        SqlInput { reader: Box::new(reader), name: name.into() }
    }

    /// Display name of the source, `<stdin>` for standard input.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lazily split the input into statements.
    pub fn statements(self) -> StatementSplitter<io::Lines<Box<dyn BufRead>>> {
        StatementSplitter::new(self.reader.lines())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use super::*;

    #[test]
    fn test_open_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "CREATE TABLE t (id INT);").unwrap();
        writeln!(file, "SELECT *").unwrap();
        writeln!(file, "  FROM t;").unwrap();

        let input = SqlInput::open(file.path().to_str().unwrap()).unwrap();
        let stmts: Vec<String> =
            input.statements().map(|s| s.unwrap().into_string()).collect();
        assert_eq!(stmts, vec!["CREATE TABLE t (id INT)", "SELECT * FROM t"]);
    }

    #[test]
    fn test_open_missing_file_names_path() {
        let err = SqlInput::open("/nonexistent/pdrdb/query.sql").err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("/nonexistent/pdrdb/query.sql"));
    }

    #[test]
    fn test_from_reader() {
        let input = SqlInput::from_reader(Cursor::new("SELECT 1;\nSELECT 2"), "inline");
        assert_eq!(input.name(), "inline");
        assert_eq!(input.statements().count(), 2);
    }

    #[test]
    fn test_invalid_utf8_surfaces_as_error() {
        let input = SqlInput::from_reader(Cursor::new(vec![0xff, 0xfe, b';', b'\n']), "binary");
        let results: Vec<_> = input.statements().collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }
}
