use std::path::Path;

use anyhow::Context as _;

use crate::{
    foundation::error::{DwellError, DwellResult},
    samples::model::RawRow,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Column {
    PersonId,
    TSec,
    AngleDeg,
    RadiusFactor,
    Bench,
    Motion,
    Notes,
}

fn column_for(header: &str) -> Option<Column> {
    let key: String = header
        .trim()
        .chars()
        .filter(|c| !matches!(c, '_' | ' ' | '-'))
        .collect::<String>()
        .to_ascii_lowercase();
    match key.as_str() {
        "personid" => Some(Column::PersonId),
        "tsec" => Some(Column::TSec),
        "angledeg" => Some(Column::AngleDeg),
        "radiusfactor" => Some(Column::RadiusFactor),
        "bench" => Some(Column::Bench),
        "motion" => Some(Column::Motion),
        "notes" => Some(Column::Notes),
        _ => None,
    }
}

/// Read a keyframe table. Column order is taken from the header row; unknown columns are
/// ignored. Only a missing `personId`/`tSec` header fails the whole table.
///
/// Every recognized column yields a cell for every record, so a short record reads its missing
/// cells as blank.
pub fn read_rows(text: &str) -> DwellResult<Vec<RawRow>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let header = reader
        .headers()
        .map_err(|e| DwellError::parse(format!("keyframe table header: {e}")))?;
    if header.iter().all(|h| h.trim().is_empty()) {
        return Err(DwellError::parse("keyframe table is empty"));
    }
    let columns: Vec<Option<Column>> = header.iter().map(column_for).collect();
    for required in [Column::PersonId, Column::TSec] {
        if !columns.contains(&Some(required)) {
            return Err(DwellError::parse(format!(
                "keyframe table header is missing {required:?}"
            )));
        }
    }

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record =
            record.map_err(|e| DwellError::parse(format!("keyframe record {index}: {e}")))?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        let mut row = RawRow::default();
        for (i, col) in columns.iter().enumerate() {
            let Some(col) = col else {
                continue;
            };
            let slot = match col {
                Column::PersonId => &mut row.person_id,
                Column::TSec => &mut row.t_sec,
                Column::AngleDeg => &mut row.angle_deg,
                Column::RadiusFactor => &mut row.radius_factor,
                Column::Bench => &mut row.bench,
                Column::Motion => &mut row.motion,
                Column::Notes => &mut row.notes,
            };
            *slot = Some(record.get(i).unwrap_or("").to_string());
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Read keyframe rows from disk: `.json` files hold an array of rows, anything else is a table.
pub fn read_rows_from_path(path: &Path) -> DwellResult<Vec<RawRow>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read keyframes '{}'", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(serde_json::from_str(&text)?)
    } else {
        read_rows(&text)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/samples/csv.rs"]
mod tests;
