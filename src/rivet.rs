//! RIVET bifiltration file
//!
//! Text input of the RIVET multiparameter persistence software:
//! ```text
//! --datatype points
//! N N
//! first_0, second_0
//! ...
//! first_N-1, second_N-1
//! ```
//! with a line per point of the 2 filtration values, in the point cloud order.

use crate::features::Features;
use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Read, Write},
    ops::Deref,
    path::{Path, PathBuf},
};

/// First line of a RIVET point cloud file
pub const DATATYPE: &str = "--datatype points";

#[derive(thiserror::Error, Debug)]
pub enum RivetError {
    #[error("Failed to access the RIVET file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read the RIVET data")]
    Read(#[from] std::io::Error),
    #[error("RIVET data has {0} lines, expected at least 3")]
    TooFewLines(usize),
    #[error("Line #{line}: expected {DATATYPE:?}, found {content:?}")]
    Datatype { line: usize, content: String },
    #[error("Line #{line}: malformed point count {content:?}")]
    Count { line: usize, content: String },
    #[error("Line #{line}: expected 2 comma separated numbers, found {content:?}")]
    Values { line: usize, content: String },
    #[error("Point count mismatch: {declared} declared but {found} data lines")]
    CountMismatch { declared: usize, found: usize },
}
type Result<T> = std::result::Result<T, RivetError>;

/// Pairs of filtration values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bifiltration {
    values: Vec<(f64, f64)>,
}
impl Deref for Bifiltration {
    type Target = Vec<(f64, f64)>;

    fn deref(&self) -> &Self::Target {
        &self.values
    }
}
impl From<Vec<(f64, f64)>> for Bifiltration {
    fn from(values: Vec<(f64, f64)>) -> Self {
        Self { values }
    }
}
impl Bifiltration {
    pub fn from_features(features: &Features) -> Self {
        Self {
            values: features
                .first()
                .iter()
                .copied()
                .zip(features.second().iter().copied())
                .collect(),
        }
    }
    /// Writes the RIVET data
    pub fn to_writer<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        let n = self.values.len();
        writeln!(writer, "{DATATYPE}")?;
        writeln!(writer, "{n} {n}")?;
        for (first, second) in &self.values {
            writeln!(writer, "{:?}, {:?}", first, second)?;
        }
        writer.flush()
    }
    /// Writes the RIVET file
    pub fn to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let io_error = |source| RivetError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(io_error)?;
        self.to_writer(BufWriter::new(file)).map_err(io_error)?;
        log::info!("RIVET file {:?} written ({} points)", path, self.len());
        Ok(())
    }
    /// Reads the RIVET data
    ///
    /// Blank lines are skipped and line numbers start at 1.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut lines = vec![];
        for (k, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            if !line.trim().is_empty() {
                lines.push((k + 1, line));
            }
        }
        if lines.len() < 3 {
            return Err(RivetError::TooFewLines(lines.len()));
        }

        let (line, content) = &lines[0];
        if content.trim() != DATATYPE {
            return Err(RivetError::Datatype {
                line: *line,
                content: content.clone(),
            });
        }

        let (line, content) = &lines[1];
        let declared = content
            .split_whitespace()
            .next()
            .and_then(|n| n.parse::<usize>().ok())
            .ok_or_else(|| RivetError::Count {
                line: *line,
                content: content.clone(),
            })?;

        let values = lines[2..]
            .iter()
            .map(|(line, content)| {
                let mut fields = content.split(',').map(|field| field.trim().parse::<f64>());
                match (fields.next(), fields.next()) {
                    (Some(Ok(first)), Some(Ok(second))) => Ok((first, second)),
                    _ => Err(RivetError::Values {
                        line: *line,
                        content: content.clone(),
                    }),
                }
            })
            .collect::<Result<Vec<(f64, f64)>>>()?;
        if values.len() != declared {
            return Err(RivetError::CountMismatch {
                declared,
                found: values.len(),
            });
        }
        Ok(Self { values })
    }
    /// Reads the RIVET file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| RivetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loading {:?}...", path);
        Self::from_reader(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let bifiltration = Bifiltration::from(vec![
            (0.0523, 1.2e-3),
            (1.0, 0.1 + 0.2),
            (0.5, 3.14159265358979),
        ]);
        let mut buffer = vec![];
        bifiltration.to_writer(&mut buffer)?;
        let text = String::from_utf8(buffer.clone())?;
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("--datatype points"));
        assert_eq!(lines.next(), Some("3 3"));
        assert_eq!(lines.next(), Some("0.0523, 0.0012"));
        assert_eq!(Bifiltration::from_reader(buffer.as_slice())?, bifiltration);
        Ok(())
    }

    #[test]
    fn two_lines() {
        let data = "--datatype points\n0 0\n";
        assert!(matches!(
            Bifiltration::from_reader(data.as_bytes()),
            Err(RivetError::TooFewLines(2))
        ));
    }

    #[test]
    fn wrong_datatype() {
        let data = "--datatype metric\n1 1\n0.1, 0.2\n";
        assert!(matches!(
            Bifiltration::from_reader(data.as_bytes()),
            Err(RivetError::Datatype { line: 1, .. })
        ));
    }

    #[test]
    fn missing_field() {
        let data = "--datatype points\n2 2\n0.1, 0.2\n0.3\n";
        match Bifiltration::from_reader(data.as_bytes()) {
            Err(RivetError::Values { line, content }) => {
                assert_eq!(line, 4);
                assert_eq!(content, "0.3");
            }
            other => panic!("expected a malformed line error, got {other:?}"),
        }
    }

    #[test]
    fn not_a_number() {
        let data = "--datatype points\n1 1\n0.1, abc\n";
        assert!(matches!(
            Bifiltration::from_reader(data.as_bytes()),
            Err(RivetError::Values { line: 3, .. })
        ));
    }

    #[test]
    fn count_mismatch() {
        let data = "--datatype points\n3 3\n0.1, 0.2\n0.3, 0.4\n";
        assert!(matches!(
            Bifiltration::from_reader(data.as_bytes()),
            Err(RivetError::CountMismatch {
                declared: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn trailing_blank_lines() -> std::result::Result<(), RivetError> {
        let data = "--datatype points\n1 1\n0.1, 0.2\n\n";
        assert_eq!(Bifiltration::from_reader(data.as_bytes())?.len(), 1);
        Ok(())
    }
}
