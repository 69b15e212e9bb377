//! Column oriented export of a set of profiles.

use super::ProfileRecord;
use crate::Result;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Named numeric columns built from the profiles of one redraw. Each profile contributes
/// `{name}_pos{i}` for every spatial axis `i`, then `{name}_intensity`, then `{name}_distance`.
/// Color layers get one `{name}_intensity{c}` column per channel instead of a single intensity
/// column. All columns of one layer have the same length.
///
/// Columns keep the order in which they were added. Presenting the table as a grid, copying it,
/// or writing it to a file is left to the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileTable {
    columns: Vec<(String, Vec<f64>)>,
}

impl ProfileTable {
    pub fn from_records(records: &[ProfileRecord]) -> Self {
        let mut table = Self::default();
        for record in records {
            table.add_record(record);
        }
        table
    }

    fn add_record(&mut self, record: &ProfileRecord) {
        let samples = &record.samples;
        let ndim = samples.positions().first().map(|p| p.len()).unwrap_or(0);

        for axis in 0..ndim {
            let column = samples.positions().iter().map(|p| p[axis] as f64).collect();
            self.push(format!("{}_pos{}", record.name, axis), column);
        }

        let channels = samples.channels();
        if channels <= 1 {
            self.push(
                format!("{}_intensity", record.name),
                samples.flat_intensities(),
            );
        } else {
            for c in 0..channels {
                if let Some(column) = samples.channel(c) {
                    self.push(format!("{}_intensity{}", record.name, c), column);
                }
            }
        }

        self.push(
            format!("{}_distance", record.name),
            samples.distances().to_vec(),
        );
    }

    /// Add a column, replacing any existing column of the same name in place.
    fn push(&mut self, name: String, values: Vec<f64>) {
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = values,
            None => self.columns.push((name, values)),
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.columns.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    /// Serialize the table to a JSON object of column name to values, in column order.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for ProfileTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, values) in &self.columns {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}
