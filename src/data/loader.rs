//! CSV Data Loader Module
//! Reads the ICO and BDGD extracts with Polars and coerces them into typed frames.

use crate::data::catalog::{categorize_item, company_label, equipment_description};
use crate::data::coerce::{
    coerce_tuc, days_since_epoch, parse_code, parse_day_first_date, parse_number, NumberFormat,
};
use chrono::Datelike;
use polars::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;
use thiserror::Error;
use tracing::{debug, info};

pub const DATA_BASE: &str = "DATA_BASE";
pub const ANO: &str = "Ano";
pub const DIST: &str = "DIST";
pub const ITEM: &str = "ITEM";
pub const PROPRIO: &str = "Próprio_Distribuidor";
pub const DIFERENTE: &str = "Diferente_Próprio_Distribuidor";
pub const TOTAL: &str = "Total";
pub const GRUPO: &str = "Grupo";
pub const TUC: &str = "TUC";
pub const QTD: &str = "QTD";
pub const SOMA_REDE_KM: &str = "SOMA_REDE_KM";
pub const DESCRICAO_TUC: &str = "DESCRICAO_TUC";

/// Cost measures summed by the per-year aggregate, in display order.
pub const COST_MEASURES: [&str; 3] = [PROPRIO, DIFERENTE, TOTAL];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Missing column '{0}'")]
    MissingColumn(String),
    #[error("Invalid date '{value}' on line {line}")]
    InvalidDate { line: usize, value: String },
}

/// The two extracts the application knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// ICO operational cost report
    Cost,
    /// BDGD technical asset inventory
    Asset,
}

impl Dataset {
    pub fn label(self) -> &'static str {
        match self {
            Dataset::Cost => "ICO",
            Dataset::Asset => "BDGD",
        }
    }

    /// Load and coerce a source file of this kind.
    pub fn load(self, path: &Path, format: &NumberFormat) -> Result<DataFrame, LoaderError> {
        match self {
            Dataset::Cost => load_cost(path, format),
            Dataset::Asset => load_asset(path, format),
        }
    }
}

/// Read a semicolon separated file with every column kept as text.
fn read_raw(path: &Path) -> Result<DataFrame, LoaderError> {
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_separator(b';')
        .with_infer_schema_length(Some(0))
        .finish()?
        .collect()?;
    Ok(df)
}

fn require<'a>(raw: &'a DataFrame, name: &str) -> Result<&'a Column, LoaderError> {
    raw.column(name)
        .map_err(|_| LoaderError::MissingColumn(name.to_string()))
}

fn text<'a>(raw: &'a DataFrame, name: &str) -> Result<&'a StringChunked, LoaderError> {
    Ok(require(raw, name)?.str()?)
}

fn measure(raw: &DataFrame, name: &str, format: &NumberFormat) -> Result<Vec<Option<f64>>, LoaderError> {
    Ok(text(raw, name)?
        .into_iter()
        .map(|v| parse_number(v, format))
        .collect())
}

/// Parse `DATA_BASE` into (days since epoch, year) pairs. Any bad date aborts the load.
fn dates(raw: &DataFrame) -> Result<(Vec<i32>, Vec<i32>), LoaderError> {
    let ca = text(raw, DATA_BASE)?;
    let mut days = Vec::with_capacity(ca.len());
    let mut years = Vec::with_capacity(ca.len());

    for (row, value) in ca.into_iter().enumerate() {
        let date = value
            .and_then(parse_day_first_date)
            .ok_or_else(|| LoaderError::InvalidDate {
                // +1 for the header, +1 for 1-based lines
                line: row + 2,
                value: value.unwrap_or_default().to_string(),
            })?;
        days.push(days_since_epoch(date));
        years.push(date.year());
    }

    Ok((days, years))
}

fn date_column(days: Vec<i32>) -> Result<Column, LoaderError> {
    Ok(Column::new(DATA_BASE.into(), days).cast(&DataType::Date)?)
}

/// Load the ICO cost report.
///
/// Output columns: [DATA_BASE, Ano, DIST, ITEM, Próprio_Distribuidor,
/// Diferente_Próprio_Distribuidor, Total, Grupo]
pub fn load_cost(path: &Path, format: &NumberFormat) -> Result<DataFrame, LoaderError> {
    let raw = read_raw(path)?;
    let (days, years) = dates(&raw)?;

    let groups: Vec<&str> = text(&raw, ITEM)?
        .into_iter()
        .map(|item| categorize_item(item.unwrap_or_default()).label())
        .collect();

    let df = DataFrame::new(vec![
        date_column(days)?,
        Column::new(ANO.into(), years),
        require(&raw, DIST)?.clone(),
        require(&raw, ITEM)?.clone(),
        Column::new(PROPRIO.into(), measure(&raw, PROPRIO, format)?),
        Column::new(DIFERENTE.into(), measure(&raw, DIFERENTE, format)?),
        Column::new(TOTAL.into(), measure(&raw, TOTAL, format)?),
        Column::new(GRUPO.into(), groups),
    ])?;

    info!(path = %path.display(), rows = df.height(), "Loaded ICO cost report");
    Ok(df)
}

/// Load the BDGD asset inventory, remapping codes to labels.
///
/// Rows whose TUC is zero, blank or non-numeric are dropped here and never
/// reach a view. Output columns: [DATA_BASE, Ano, DIST, TUC, QTD,
/// SOMA_REDE_KM, DESCRICAO_TUC]
pub fn load_asset(path: &Path, format: &NumberFormat) -> Result<DataFrame, LoaderError> {
    let raw = read_raw(path)?;
    let (days, years) = dates(&raw)?;
    let dist = text(&raw, DIST)?;
    let tuc = text(&raw, TUC)?;
    let qtd = measure(&raw, QTD, format)?;
    let rede = measure(&raw, SOMA_REDE_KM, format)?;

    let mut out_days = Vec::new();
    let mut out_years = Vec::new();
    let mut out_company: Vec<Option<&str>> = Vec::new();
    let mut out_tuc = Vec::new();
    let mut out_qtd = Vec::new();
    let mut out_rede = Vec::new();
    let mut out_desc: Vec<Option<&str>> = Vec::new();

    for i in 0..raw.height() {
        let code = coerce_tuc(tuc.get(i));
        if code == 0 {
            continue;
        }
        out_days.push(days[i]);
        out_years.push(years[i]);
        out_company.push(parse_code(dist.get(i)).and_then(company_label));
        out_tuc.push(code);
        out_qtd.push(qtd[i]);
        out_rede.push(rede[i]);
        out_desc.push(equipment_description(code));
    }

    let dropped = raw.height() - out_tuc.len();
    if dropped > 0 {
        debug!(dropped, "Dropped BDGD rows with zero or unparseable TUC");
    }

    let df = DataFrame::new(vec![
        date_column(out_days)?,
        Column::new(ANO.into(), out_years),
        Column::new(DIST.into(), out_company),
        Column::new(TUC.into(), out_tuc),
        Column::new(QTD.into(), out_qtd),
        Column::new(SOMA_REDE_KM.into(), out_rede),
        Column::new(DESCRICAO_TUC.into(), out_desc),
    ])?;

    info!(path = %path.display(), rows = df.height(), dropped, "Loaded BDGD asset inventory");
    Ok(df)
}

/// Identity of a source file as seen by the cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SourceKey {
    dataset: Dataset,
    path: PathBuf,
    len: u64,
    modified: Option<SystemTime>,
    format: NumberFormat,
}

impl SourceKey {
    fn probe(dataset: Dataset, path: &Path, format: NumberFormat) -> Result<Self, LoaderError> {
        let io_err = |source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        };
        let canonical = std::fs::canonicalize(path).map_err(io_err)?;
        let meta = std::fs::metadata(&canonical).map_err(io_err)?;
        Ok(Self {
            dataset,
            path: canonical,
            len: meta.len(),
            modified: meta.modified().ok(),
            format,
        })
    }
}

/// Read-through cache of loaded frames. Entries live for the whole process.
#[derive(Default)]
pub struct DataLoader {
    frames: Mutex<HashMap<SourceKey, Arc<DataFrame>>>,
}

impl DataLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached frame for this source, loading it on first use.
    pub fn load(
        &self,
        dataset: Dataset,
        path: &Path,
        format: NumberFormat,
    ) -> Result<Arc<DataFrame>, LoaderError> {
        let key = SourceKey::probe(dataset, path, format)?;

        if let Some(df) = self.lock().get(&key) {
            debug!(dataset = dataset.label(), path = %path.display(), "Cache hit");
            return Ok(Arc::clone(df));
        }

        // Load outside the lock so the two datasets can be read in parallel.
        let df = Arc::new(dataset.load(path, &format)?);
        self.lock().insert(key, Arc::clone(&df));
        Ok(df)
    }

    /// Number of cached frames.
    pub fn cached_frames(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<SourceKey, Arc<DataFrame>>> {
        // A poisoned map still holds complete entries.
        self.frames.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const COST_CSV: &str = "\
DATA_BASE;DIST;ITEM;Próprio_Distribuidor;Diferente_Próprio_Distribuidor;Total
31/12/2021;404;CONSUMIDOR RESIDENCIAL;1.000;500;1.500
31/12/2022;404;REDE AEREA;2.000,50;n/d;2.000,50
31/12/2022;405;ILUMINACAO PUBLICA;;10;10
";

    const ASSET_CSV: &str = "\
DATA_BASE;DIST;TUC;QTD;SOMA_REDE_KM
01/06/2023;404;565;10;1.5
01/06/2023;404;0;99;99
01/06/2023;9999;abc;5;5
01/06/2023;26;160;3;
01/06/2023;405;777;1;0.25
";

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_cost_coerces_columns() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "ico.txt", COST_CSV);
        let df = load_cost(&path, &NumberFormat::brazilian()).unwrap();

        assert_eq!(df.height(), 3);
        let years: Vec<Option<i32>> = df.column(ANO).unwrap().i32().unwrap().into_iter().collect();
        assert_eq!(years, vec![Some(2021), Some(2022), Some(2022)]);

        let total = df.column(TOTAL).unwrap().f64().unwrap();
        assert_eq!(total.get(0), Some(1500.0));
        assert_eq!(total.get(1), Some(2000.5));

        let other = df.column(DIFERENTE).unwrap().f64().unwrap();
        assert_eq!(other.get(1), None);

        let own = df.column(PROPRIO).unwrap().f64().unwrap();
        assert_eq!(own.get(2), None);

        let groups = df.column(GRUPO).unwrap().str().unwrap();
        assert_eq!(groups.get(0), Some("Consumidores"));
        assert_eq!(groups.get(1), Some("Rede"));
        assert_eq!(groups.get(2), Some("Outros"));
    }

    #[test]
    fn test_load_cost_invalid_date_fails() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "ico.txt",
            "DATA_BASE;DIST;ITEM;Próprio_Distribuidor;Diferente_Próprio_Distribuidor;Total\n\
             not-a-date;1;X;1;1;2\n",
        );
        let err = load_cost(&path, &NumberFormat::brazilian()).unwrap_err();
        assert!(matches!(err, LoaderError::InvalidDate { line: 2, .. }));
    }

    #[test]
    fn test_load_cost_missing_column() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "ico.txt", "DATA_BASE;DIST;ITEM\n01/01/2020;1;X\n");
        let err = load_cost(&path, &NumberFormat::brazilian()).unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn(ref c) if c == PROPRIO));
    }

    #[test]
    fn test_load_asset_remaps_and_drops_zero_tuc() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "fato.csv", ASSET_CSV);
        let df = load_asset(&path, &NumberFormat::plain()).unwrap();

        // TUC 0 and "abc" rows are gone
        assert_eq!(df.height(), 3);
        let tuc: Vec<Option<i64>> = df.column(TUC).unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(tuc, vec![Some(565), Some(160), Some(777)]);

        let dist = df.column(DIST).unwrap().str().unwrap();
        assert_eq!(dist.get(0), Some("EMS"));
        assert_eq!(dist.get(1), Some("EAC"));
        assert_eq!(dist.get(2), Some("EMT"));

        let desc = df.column(DESCRICAO_TUC).unwrap().str().unwrap();
        assert_eq!(desc.get(0), Some("TRANSFORMADOR DE DISTRIBUIÇÃO"));
        assert_eq!(desc.get(1), Some("CHAVE"));
        assert_eq!(desc.get(2), None);

        let rede = df.column(SOMA_REDE_KM).unwrap().f64().unwrap();
        assert_eq!(rede.get(1), None);
    }

    #[test]
    fn test_unknown_company_is_null() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "fato.csv",
            "DATA_BASE;DIST;TUC;QTD;SOMA_REDE_KM\n01/01/2020;1234;565;1;1\n",
        );
        let df = load_asset(&path, &NumberFormat::plain()).unwrap();
        assert_eq!(df.column(DIST).unwrap().str().unwrap().get(0), None);
    }

    #[test]
    fn test_loader_caches_by_source() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "ico.txt", COST_CSV);
        let loader = DataLoader::new();

        let first = loader
            .load(Dataset::Cost, &path, NumberFormat::brazilian())
            .unwrap();
        let second = loader
            .load(Dataset::Cost, &path, NumberFormat::brazilian())
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loader.cached_frames(), 1);

        loader
            .load(Dataset::Cost, &path, NumberFormat::plain())
            .unwrap();
        assert_eq!(loader.cached_frames(), 2);
    }

    #[test]
    fn test_loader_missing_file() {
        let dir = TempDir::new().unwrap();
        let loader = DataLoader::new();
        let err = loader
            .load(Dataset::Asset, &dir.path().join("nope.csv"), NumberFormat::plain())
            .unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
    }
}
