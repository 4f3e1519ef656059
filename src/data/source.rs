use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::models::DayRecord;

/// One day-record window as the backend delivers it.
///
/// Older exports wrap the array in an envelope object; newer ones send the
/// array directly. Both shapes are accepted everywhere through this single
/// union instead of ad-hoc branching at call sites. Anything else falls into
/// `Other` and normalizes to empty: absent or malformed data means "no
/// activity yet", not a failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RecordSource {
    Raw(Vec<DayRecord>),
    Envelope { values: Vec<DayRecord> },
    Other(serde_json::Value),
}

/// Flatten an optional source into an ordered record sequence.
///
/// Total over every input shape; never errors.
pub fn normalize(source: Option<&RecordSource>) -> Vec<DayRecord> {
    match source {
        Some(RecordSource::Raw(records)) => records.clone(),
        Some(RecordSource::Envelope { values }) => values.clone(),
        Some(RecordSource::Other(value)) => {
            log::warn!("unrecognized record source shape: {value}");
            Vec::new()
        }
        None => Vec::new(),
    }
}

/// The progress document exported by the dashboard aggregator.
///
/// Either window may be missing; a missing window is valid and means no data
/// for that window.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgressExport {
    #[serde(default)]
    pub month: Option<RecordSource>,
    #[serde(default)]
    pub plan: Option<RecordSource>,
}

impl ProgressExport {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Reading progress export {:?}", path))?;
        let export: ProgressExport =
            serde_json::from_str(&content).context("Parsing progress export")?;
        Ok(export)
    }

    pub fn month_records(&self) -> Vec<DayRecord> {
        normalize(self.month.as_ref())
    }

    pub fn plan_records(&self) -> Vec<DayRecord> {
        normalize(self.plan.as_ref())
    }

    /// A plan window only counts as available when it actually has records.
    pub fn has_plan(&self) -> bool {
        !self.plan_records().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DayStatus;
    use std::io::Write;

    fn parse(json: &str) -> Option<RecordSource> {
        serde_json::from_str(json).ok()
    }

    #[test]
    fn raw_array_passes_through() {
        let source = parse(r#"[{"day":1,"percentage":90,"status":"success"}]"#);
        let records = normalize(source.as_ref());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].day, 1);
        assert_eq!(records[0].status, DayStatus::Success);
    }

    #[test]
    fn envelope_unwraps_to_same_sequence() {
        let raw = parse(r#"[{"day":2,"percentage":50,"status":"fail"}]"#);
        let wrapped = parse(r#"{"values":[{"day":2,"percentage":50,"status":"fail"}]}"#);
        assert_eq!(normalize(raw.as_ref()), normalize(wrapped.as_ref()));
    }

    #[test]
    fn absent_yields_empty() {
        assert!(normalize(None).is_empty());
    }

    #[test]
    fn unrecognized_shape_yields_empty() {
        let source = parse(r#"{"totally":"unexpected"}"#);
        assert!(matches!(source, Some(RecordSource::Other(_))));
        assert!(normalize(source.as_ref()).is_empty());
    }

    #[test]
    fn export_tolerates_missing_windows() {
        let export: ProgressExport = serde_json::from_str("{}").unwrap();
        assert!(export.month_records().is_empty());
        assert!(!export.has_plan());
    }

    #[test]
    fn export_loads_mixed_shapes_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"month":[{{"day":1,"percentage":85,"status":"success"}}],
                "plan":{{"values":[{{"day":1,"percentage":85,"status":"success"}},
                                   {{"day":2,"percentage":0,"status":"rest"}}]}}}}"#
        )
        .unwrap();

        let export = ProgressExport::load(file.path()).unwrap();
        assert_eq!(export.month_records().len(), 1);
        assert_eq!(export.plan_records().len(), 2);
        assert!(export.has_plan());
    }
}
