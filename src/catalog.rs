//! Galaxy survey catalog
//!
//! Loads a CSV table of named numeric columns, e.g. a SkyServer query export with
//! the `ra`, `dec`, `redshift` and `extinction_r` columns.
//! Every cell is read as text and coerced to a number, cells that cannot be coerced
//! are treated as missing and rows with missing values in any of the required
//! columns are dropped.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
    time::Instant,
};

/// Right ascension, declination and redshift column names
pub const SPATIAL_COLUMNS: [&str; 3] = ["ra", "dec", "redshift"];
/// r-band extinction column name
pub const EXTINCTION_COLUMN: &str = "extinction_r";

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("Failed to open the catalog {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read the CSV catalog {path:?}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Catalog {path:?} is missing the required columns {columns:?}")]
    MissingColumns { path: PathBuf, columns: Vec<String> },
    #[error("Column {0:?} is not in the catalog")]
    MissingColumn(String),
    #[error("Missing value in column {column:?} at row #{row}")]
    MissingValue { column: String, row: usize },
    #[error("Cannot sample {requested} rows out of {available}")]
    SampleSize { requested: usize, available: usize },
}
type Result<T> = std::result::Result<T, CatalogError>;

/// Row selection applied once the catalog is cleaned
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Sampling {
    /// All the rows in file order
    #[default]
    All,
    /// All the rows in a random (unseeded) order
    Shuffle,
    /// `n` rows drawn at random with a seeded generator
    Sample { n: usize, seed: u64 },
}

/// Table of numeric columns
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    path: PathBuf,
    headers: Vec<String>,
    rows: Vec<Vec<Option<f64>>>,
}
impl Catalog {
    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
    /// The catalog source
    pub fn path(&self) -> &Path {
        &self.path
    }
    /// Column names, whitespace stripped
    pub fn headers(&self) -> &[String] {
        &self.headers
    }
    fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| CatalogError::MissingColumn(name.to_string()))
    }
    /// Iterator over the values of a column, `None` for missing cells
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = Option<f64>> + '_> {
        let k = self.column_index(name)?;
        Ok(self.rows.iter().map(move |row| row[k]))
    }
    /// Returns the values of a column that must not have missing cells
    pub fn values(&self, name: &str) -> Result<Vec<f64>> {
        self.column(name)?
            .enumerate()
            .map(|(row, value)| {
                value.ok_or_else(|| CatalogError::MissingValue {
                    column: name.to_string(),
                    row,
                })
            })
            .collect()
    }
}

fn coerce(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|x| !x.is_nan())
}

/// [Catalog] builder
pub struct CatalogLoader {
    path: PathBuf,
    required: Vec<String>,
    sampling: Sampling,
}
impl Default for CatalogLoader {
    fn default() -> Self {
        Self {
            path: PathBuf::from("catalog.csv"),
            required: SPATIAL_COLUMNS
                .iter()
                .chain(Some(&EXTINCTION_COLUMN))
                .map(|c| c.to_string())
                .collect(),
            sampling: Sampling::All,
        }
    }
}
impl CatalogLoader {
    pub fn path<P: AsRef<Path>>(self, path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ..self
        }
    }
    /// Columns that must have a value for a row to be kept
    pub fn required_columns<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: columns.into_iter().map(|c| c.into()).collect(),
            ..self
        }
    }
    /// Keeps `n` rows drawn at random, reproducible for a given `seed`
    pub fn sample(self, n: usize, seed: u64) -> Self {
        Self {
            sampling: Sampling::Sample { n, seed },
            ..self
        }
    }
    /// Shuffles all the rows
    pub fn shuffle(self) -> Self {
        Self {
            sampling: Sampling::Shuffle,
            ..self
        }
    }
    /// Loads the catalog from the file system
    ///
    /// Files with the `gz` extension are decompressed on the fly, as well as `bz2` files
    /// if the `bzip2` feature is enabled
    pub fn load(self) -> Result<Catalog> {
        let csv_file = File::open(&self.path).map_err(|source| CatalogError::Io {
            path: self.path.clone(),
            source,
        })?;
        log::info!("Loading {:?}...", self.path);
        let now = Instant::now();
        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());
        let catalog = match extension.as_deref() {
            Some("gz") => self.from_reader(flate2::read::GzDecoder::new(csv_file)),
            #[cfg(feature = "bzip2")]
            Some("bz2") => {
                self.from_reader(bzip2::bufread::BzDecoder::new(BufReader::new(csv_file)))
            }
            _ => self.from_reader(BufReader::new(csv_file)),
        }?;
        log::info!(
            "... loaded {} rows in {:}ms",
            catalog.len(),
            now.elapsed().as_millis()
        );
        Ok(catalog)
    }
    /// Loads the catalog from any reader
    pub fn from_reader<R: Read>(self, reader: R) -> Result<Catalog> {
        let Self {
            path,
            required,
            sampling,
        } = self;
        let csv_error = |source| CatalogError::Csv {
            path: path.clone(),
            source,
        };
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(|h| h.to_string())
            .collect();
        let missing: Vec<String> = required
            .iter()
            .filter(|c| !headers.contains(c))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(CatalogError::MissingColumns {
                path: path.clone(),
                columns: missing,
            });
        }
        let required_idx: Vec<usize> = required
            .iter()
            .filter_map(|c| headers.iter().position(|h| h == c))
            .collect();

        let mut rows = vec![];
        let mut n_dropped = 0usize;
        for result in rdr.records() {
            let record = result.map_err(csv_error)?;
            let row: Vec<Option<f64>> = (0..headers.len())
                .map(|k| record.get(k).and_then(coerce))
                .collect();
            if required_idx.iter().all(|&k| row[k].is_some()) {
                rows.push(row);
            } else {
                n_dropped += 1;
            }
        }
        if n_dropped > 0 {
            log::debug!("dropped {n_dropped} rows with missing {required:?} values");
        }

        let rows = match sampling {
            Sampling::All => rows,
            Sampling::Shuffle => {
                rows.shuffle(&mut rand::thread_rng());
                rows
            }
            Sampling::Sample { n, seed } => {
                if n > rows.len() {
                    return Err(CatalogError::SampleSize {
                        requested: n,
                        available: rows.len(),
                    });
                }
                let mut rng = StdRng::seed_from_u64(seed);
                let mut rows: Vec<_> = rows.into_iter().map(Some).collect();
                rand::seq::index::sample(&mut rng, rows.len(), n)
                    .into_iter()
                    .filter_map(|i| rows[i].take())
                    .collect()
            }
        };
        Ok(Catalog {
            path,
            headers,
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SKYSERVER: &str = "objid , ra , dec ,redshift, extinction_r
1,150.1,2.2,0.11,0.05
2,150.2,2.3,,0.04
3,150.3,  2.4 ,0.09,abc
4,150.4,2.5,0.12,0.07
5,150.5,2.6,0.13,0.08
6,150.6,2.7,0.14
";

    #[test]
    fn strip_coerce_and_drop() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let catalog = CatalogLoader::default().from_reader(SKYSERVER.as_bytes())?;
        assert_eq!(
            catalog.headers(),
            &["objid", "ra", "dec", "redshift", "extinction_r"]
        );
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.values("ra")?, vec![150.1, 150.4, 150.5]);
        assert_eq!(catalog.values("extinction_r")?, vec![0.05, 0.07, 0.08]);
        Ok(())
    }

    #[test]
    fn relaxed_requirements_keep_missing_cells() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let catalog = CatalogLoader::default()
            .required_columns(["ra", "dec"])
            .from_reader(SKYSERVER.as_bytes())?;
        assert_eq!(catalog.len(), 6);
        let extinction: Vec<_> = catalog.column("extinction_r")?.collect();
        assert_eq!(extinction[2], None);
        assert_eq!(extinction[5], None);
        assert!(matches!(
            catalog.values("redshift"),
            Err(CatalogError::MissingValue { row: 1, .. })
        ));
        Ok(())
    }

    #[test]
    fn missing_required_columns() {
        let csv = "ra,dec\n1,2\n";
        match CatalogLoader::default().from_reader(csv.as_bytes()) {
            Err(CatalogError::MissingColumns { columns, .. }) => {
                assert_eq!(columns, vec!["redshift", "extinction_r"])
            }
            other => panic!("expected missing columns, got {other:?}"),
        }
    }

    #[test]
    fn seeded_sample_is_reproducible() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut csv = String::from("ra,dec,redshift,extinction_r\n");
        for i in 0..50 {
            csv.push_str(&format!("{i},{i},0.1,0.01\n"));
        }
        let a = CatalogLoader::default()
            .sample(10, 42)
            .from_reader(csv.as_bytes())?;
        let b = CatalogLoader::default()
            .sample(10, 42)
            .from_reader(csv.as_bytes())?;
        assert_eq!(a, b);
        let mut ra = a.values("ra")?;
        assert_eq!(ra.len(), 10);
        ra.sort_by(f64::total_cmp);
        ra.dedup();
        assert_eq!(ra.len(), 10);
        Ok(())
    }

    #[test]
    fn oversized_sample() {
        assert!(matches!(
            CatalogLoader::default()
                .sample(10, 42)
                .from_reader(SKYSERVER.as_bytes()),
            Err(CatalogError::SampleSize {
                requested: 10,
                available: 3
            })
        ));
    }

    #[test]
    fn shuffle_keeps_all_rows() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let catalog = CatalogLoader::default()
            .shuffle()
            .from_reader(SKYSERVER.as_bytes())?;
        let mut ra = catalog.values("ra")?;
        ra.sort_by(f64::total_cmp);
        assert_eq!(ra, vec![150.1, 150.4, 150.5]);
        Ok(())
    }
}
