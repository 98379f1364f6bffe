use crate::error::{ProcessingError, Result};
use crate::models::{ClimateVariable, Co2Series, DailyRecord, RecordKey, Station};
use crate::processors::interpolation::interpolate_linear;
use crate::readers::PointSeries;
use crate::utils::constants::MJ_TO_KJ;
use std::collections::{HashMap, HashSet};

/// One sampled value of a variable for a station-day
#[derive(Debug, Clone, PartialEq)]
pub struct VariableRow {
    pub key: RecordKey,
    pub value: Option<f64>,
    /// Radiation in its source unit; only set for `rss`
    pub radiation_mj: Option<f64>,
}

/// All station series of one variable, in station order then time order
#[derive(Debug, Clone)]
pub struct VariableColumn {
    pub variable: ClimateVariable,
    pub rows: Vec<VariableRow>,
}

impl VariableColumn {
    pub fn new(variable: ClimateVariable) -> Self {
        Self {
            variable,
            rows: Vec::new(),
        }
    }

    /// Appends a station's sampled series, converting radiation to kJ and
    /// filling gaps along time.
    pub fn push_series(&mut self, station: &Station, series: PointSeries) -> Result<()> {
        if series.dates.len() != series.values.len() {
            return Err(ProcessingError::DataMerge(format!(
                "{} series for {} has {} dates but {} values",
                self.variable,
                station.name,
                series.dates.len(),
                series.values.len()
            )));
        }

        let (mut values, mut radiation_mj) = if self.variable == ClimateVariable::Radiation {
            let kj = series.values.iter().map(|v| v.map(|mj| mj * MJ_TO_KJ)).collect();
            (kj, series.values.clone())
        } else {
            (series.values, Vec::new())
        };

        interpolate_linear(&mut values);
        interpolate_linear(&mut radiation_mj);

        for (index, (date, value)) in series.dates.into_iter().zip(values).enumerate() {
            self.rows.push(VariableRow {
                key: RecordKey::new(station, date),
                value,
                radiation_mj: radiation_mj.get(index).copied().flatten(),
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Counts reported by a merge step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub matched: usize,
    pub unmatched: usize,
    pub duplicates_dropped: usize,
}

pub struct DataMerger;

impl DataMerger {
    pub fn new() -> Self {
        Self
    }

    /// Left-joins a variable onto the accumulated table.
    ///
    /// An empty table takes the column's rows as its base. Where the column
    /// holds several rows for one key the first is used. Duplicate keys are
    /// dropped afterwards, keeping the first occurrence.
    pub fn merge_variable(
        &self,
        table: &mut Vec<DailyRecord>,
        column: VariableColumn,
    ) -> MergeStats {
        let variable = column.variable;
        let mut stats = MergeStats::default();

        if table.is_empty() {
            table.reserve(column.rows.len());
            for row in column.rows {
                let mut record = DailyRecord::from_key(&row.key);
                record.set_variable(variable, row.value, row.radiation_mj);
                table.push(record);
            }
            stats.matched = table.len();
        } else {
            let mut by_key: HashMap<RecordKey, VariableRow> =
                HashMap::with_capacity(column.rows.len());
            for row in column.rows {
                by_key.entry(row.key.clone()).or_insert(row);
            }

            for record in table.iter_mut() {
                match by_key.get(&record.key()) {
                    Some(row) => {
                        record.set_variable(variable, row.value, row.radiation_mj);
                        stats.matched += 1;
                    }
                    None => {
                        record.set_variable(variable, None, None);
                        stats.unmatched += 1;
                    }
                }
            }
        }

        stats.duplicates_dropped = self.drop_duplicate_keys(table);
        stats
    }

    /// Sets each record's CO2 concentration from its year; unmatched years
    /// stay missing.
    pub fn join_co2(&self, table: &mut [DailyRecord], co2: &Co2Series) -> usize {
        let mut unmatched = 0;
        for record in table.iter_mut() {
            record.co2_ppm = co2.concentration(record.year());
            if record.co2_ppm.is_none() {
                unmatched += 1;
            }
        }
        unmatched
    }

    fn drop_duplicate_keys(&self, table: &mut Vec<DailyRecord>) -> usize {
        let before = table.len();
        let mut seen = HashSet::with_capacity(before);
        table.retain(|record| seen.insert(record.key()));
        before - table.len()
    }
}

impl Default for DataMerger {
    fn default() -> Self {
        Self::new()
    }
}
