//! Data Processor Module
//! Aggregated views over filtered frames: per-year sums, pivots, long format.

use crate::data::coerce::round2;
use crate::data::filter::MISSING_LABEL;
use crate::data::loader::{ANO, COST_MEASURES, DESCRICAO_TUC, QTD, SOMA_REDE_KM, TOTAL, TUC};
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

pub const TIPO: &str = "Tipo";
pub const VALOR: &str = "Valor";
pub const QUANTIDADE_UNIDADES: &str = "Quantidade_Unidades";
pub const EXTENSAO_REDE_KM: &str = "Extensao_Rede_km";

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Handles the group-by, pivot and melt operations behind every table and chart.
pub struct DataProcessor;

impl DataProcessor {
    /// Sum the cost measures per year, sorted by year. Nulls are skipped.
    ///
    /// Output columns: [Ano, Próprio_Distribuidor, Diferente_Próprio_Distribuidor, Total]
    pub fn cost_by_year(df: &DataFrame) -> Result<DataFrame, ProcessorError> {
        let agg = df
            .clone()
            .lazy()
            .group_by([col(ANO)])
            .agg(COST_MEASURES.map(|m| col(m).sum()))
            .sort([ANO], SortMultipleOptions::default())
            .collect()?;
        Ok(agg)
    }

    /// Transform the per-year aggregate to long format (melt).
    ///
    /// Output columns: [Ano, Tipo, Valor]
    pub fn melt_by_year(agg: &DataFrame) -> Result<DataFrame, ProcessorError> {
        let mut years: Vec<i32> = Vec::new();
        let mut kinds: Vec<&str> = Vec::new();
        let mut values: Vec<f64> = Vec::new();

        let year_ca = agg.column(ANO)?.i32()?;

        for measure in COST_MEASURES {
            let value_f64 = agg.column(measure)?.cast(&DataType::Float64)?;
            let value_ca = value_f64.f64()?;

            for (year, value) in year_ca.into_iter().zip(value_ca.into_iter()) {
                if let (Some(y), Some(v)) = (year, value) {
                    if !v.is_nan() {
                        years.push(y);
                        kinds.push(measure);
                        values.push(v);
                    }
                }
            }
        }

        let df = DataFrame::new(vec![
            Column::new(ANO.into(), years),
            Column::new(TIPO.into(), kinds),
            Column::new(VALOR.into(), values),
        ])?;

        Ok(df)
    }

    /// Pivot `Total` with `key` values as rows and years as columns.
    ///
    /// Rows are sorted by key, year columns ascending, absent combinations are
    /// 0 and every cell is rounded to two decimals.
    pub fn pivot_total(df: &DataFrame, key: &str) -> Result<DataFrame, ProcessorError> {
        let grouped = df
            .clone()
            .lazy()
            .group_by([col(key), col(ANO)])
            .agg([col(TOTAL).sum()])
            .collect()?;

        let keys = grouped.column(key)?.str()?;
        let years = grouped.column(ANO)?.i32()?;
        let totals = grouped.column(TOTAL)?.f64()?;

        let mut cells: BTreeMap<&str, BTreeMap<i32, f64>> = BTreeMap::new();
        let mut all_years: BTreeSet<i32> = BTreeSet::new();

        for ((k, year), total) in keys.into_iter().zip(years.into_iter()).zip(totals.into_iter()) {
            let Some(year) = year else { continue };
            all_years.insert(year);
            *cells
                .entry(k.unwrap_or(MISSING_LABEL))
                .or_default()
                .entry(year)
                .or_insert(0.0) += total.unwrap_or(0.0);
        }

        let row_keys: Vec<&str> = cells.keys().copied().collect();
        let mut columns = vec![Column::new(key.into(), row_keys)];
        for year in &all_years {
            let values: Vec<f64> = cells
                .values()
                .map(|row| round2(row.get(year).copied().unwrap_or(0.0)))
                .collect();
            columns.push(Column::new(year.to_string().into(), values));
        }

        Ok(DataFrame::new(columns)?)
    }

    /// Summarise assets per equipment type.
    ///
    /// Output columns: [TUC, DESCRICAO_TUC, Quantidade_Unidades, Extensao_Rede_km]
    pub fn asset_summary(df: &DataFrame) -> Result<DataFrame, ProcessorError> {
        let summary = df
            .clone()
            .lazy()
            .group_by([col(TUC), col(DESCRICAO_TUC)])
            .agg([
                col(QTD).sum().alias(QUANTIDADE_UNIDADES),
                col(SOMA_REDE_KM).sum().alias(EXTENSAO_REDE_KM),
            ])
            .sort([TUC], SortMultipleOptions::default())
            .collect()?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::coerce::NumberFormat;
    use crate::data::filter::RowFilter;
    use crate::data::loader::{load_asset, DIFERENTE, DIST, GRUPO, ITEM, PROPRIO};
    use std::fs;
    use tempfile::TempDir;

    fn cost_frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new(ANO.into(), vec![2021, 2021, 2022, 2022]),
            Column::new(DIST.into(), vec!["404", "405", "404", "404"]),
            Column::new(ITEM.into(), vec!["REDE AEREA", "REDE AEREA", "CONSUMIDOR", "REDE AEREA"]),
            Column::new(PROPRIO.into(), vec![Some(1.0), Some(2.0), None, Some(3.0)]),
            Column::new(DIFERENTE.into(), vec![Some(0.5), None, Some(1.5), Some(1.0)]),
            Column::new(TOTAL.into(), vec![Some(1.5), Some(2.004), Some(1.5), Some(4.0)]),
            Column::new(GRUPO.into(), vec!["Rede", "Rede", "Consumidores", "Rede"]),
        ])
        .unwrap()
    }

    fn f64_at(df: &DataFrame, column: &str, row: usize) -> Option<f64> {
        df.column(column).unwrap().f64().unwrap().get(row)
    }

    #[test]
    fn test_cost_by_year_sums_and_skips_nulls() {
        let agg = DataProcessor::cost_by_year(&cost_frame()).unwrap();
        assert_eq!(agg.height(), 2);
        assert_eq!(agg.column(ANO).unwrap().i32().unwrap().get(0), Some(2021));
        assert_eq!(f64_at(&agg, PROPRIO, 0), Some(3.0));
        assert_eq!(f64_at(&agg, DIFERENTE, 0), Some(0.5));
        assert_eq!(f64_at(&agg, PROPRIO, 1), Some(3.0));
        assert_eq!(f64_at(&agg, TOTAL, 1), Some(5.5));
    }

    #[test]
    fn test_cost_by_year_is_not_rounded() {
        let agg = DataProcessor::cost_by_year(&cost_frame()).unwrap();
        let total = f64_at(&agg, TOTAL, 0).unwrap();
        assert!((total - 3.504).abs() < 1e-9);
    }

    #[test]
    fn test_single_record_aggregate_equals_record() {
        let df = cost_frame().slice(3, 1);
        let agg = DataProcessor::cost_by_year(&df).unwrap();
        assert_eq!(agg.height(), 1);
        assert_eq!(agg.column(ANO).unwrap().i32().unwrap().get(0), Some(2022));
        assert_eq!(f64_at(&agg, PROPRIO, 0), Some(3.0));
        assert_eq!(f64_at(&agg, DIFERENTE, 0), Some(1.0));
        assert_eq!(f64_at(&agg, TOTAL, 0), Some(4.0));
    }

    #[test]
    fn test_melt_by_year() {
        let agg = DataProcessor::cost_by_year(&cost_frame()).unwrap();
        let long = DataProcessor::melt_by_year(&agg).unwrap();
        assert_eq!(long.height(), 6);

        let kinds = long.column(TIPO).unwrap().str().unwrap();
        assert_eq!(kinds.get(0), Some(PROPRIO));
        assert_eq!(kinds.get(5), Some(TOTAL));
        assert_eq!(long.column(ANO).unwrap().i32().unwrap().get(5), Some(2022));
        assert_eq!(f64_at(&long, VALOR, 5), Some(5.5));
    }

    #[test]
    fn test_pivot_fills_zero_and_rounds() {
        let pivot = DataProcessor::pivot_total(&cost_frame(), ITEM).unwrap();
        let names: Vec<String> = pivot
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, vec![ITEM, "2021", "2022"]);

        let items = pivot.column(ITEM).unwrap().str().unwrap();
        assert_eq!(items.get(0), Some("CONSUMIDOR"));
        assert_eq!(items.get(1), Some("REDE AEREA"));

        // CONSUMIDOR has no 2021 rows
        assert_eq!(f64_at(&pivot, "2021", 0), Some(0.0));
        assert_eq!(f64_at(&pivot, "2021", 1), Some(3.5));
        assert_eq!(f64_at(&pivot, "2022", 1), Some(4.0));
    }

    #[test]
    fn test_pivot_by_group() {
        let pivot = DataProcessor::pivot_total(&cost_frame(), GRUPO).unwrap();
        assert_eq!(pivot.height(), 2);
        assert_eq!(pivot.column(GRUPO).unwrap().str().unwrap().get(1), Some("Rede"));
        assert_eq!(f64_at(&pivot, "2022", 0), Some(1.5));
    }

    #[test]
    fn test_pivot_empty_frame() {
        let pivot = DataProcessor::pivot_total(&cost_frame().head(Some(0)), GRUPO).unwrap();
        assert_eq!(pivot.height(), 0);
        assert_eq!(pivot.width(), 1);
    }

    #[test]
    fn test_asset_summary_excludes_zero_tuc() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fato.csv");
        fs::write(
            &path,
            "DATA_BASE;DIST;TUC;QTD;SOMA_REDE_KM\n\
             01/01/2023;404;565;10;1.5\n\
             01/01/2023;404;0;100;100\n\
             01/01/2024;404;565;5;0.5\n\
             01/01/2024;405;160;2;\n\
             01/01/2024;405;x;7;7\n",
        )
        .unwrap();

        let df = load_asset(&path, &NumberFormat::plain()).unwrap();
        let filtered = RowFilter::observed(&df, &[DIST, DESCRICAO_TUC])
            .apply(&df)
            .unwrap();
        let summary = DataProcessor::asset_summary(&filtered).unwrap();

        assert_eq!(summary.height(), 2);
        let tuc: Vec<Option<i64>> = summary
            .column(TUC)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(tuc, vec![Some(160), Some(565)]);

        assert_eq!(f64_at(&summary, QUANTIDADE_UNIDADES, 0), Some(2.0));
        assert_eq!(f64_at(&summary, QUANTIDADE_UNIDADES, 1), Some(15.0));
        assert_eq!(f64_at(&summary, EXTENSAO_REDE_KM, 1), Some(2.0));
        assert_eq!(
            summary.column(DESCRICAO_TUC).unwrap().str().unwrap().get(1),
            Some("TRANSFORMADOR DE DISTRIBUIÇÃO")
        );
    }
}
