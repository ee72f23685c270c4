use std::path::Path;

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::protocols::meter::decode_frame;
use crate::source::{ReportEvent, ReportSource, SourceError, UsbmonFilter, open_capture};
use crate::{CaptureSummary, DEFAULT_GENERATED_AT, Report, make_stub_report};

mod groups;
mod issues;

use groups::{GroupStats, add_measurement, build_group_summaries};
use issues::IssueTracker;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

pub fn analyze_capture_file(path: &Path, filter: UsbmonFilter) -> Result<Report, AnalysisError> {
    let source = open_capture(path, filter)?;
    analyze_source(path, source)
}

/// Decode every report of `source` and aggregate the session report.
///
/// Reports that fail framing are counted in `decode_errors`; only source
/// errors abort the run.
pub fn analyze_source<S: ReportSource>(
    path: &Path,
    mut source: S,
) -> Result<Report, AnalysisError> {
    let mut reports_total = 0u64;
    let mut reports_decoded = 0u64;
    let mut first_ts = None;
    let mut last_ts = None;
    let mut group_stats = std::collections::BTreeMap::<u8, GroupStats>::new();
    let mut issues = IssueTracker::default();

    while let Some(ReportEvent { ts, data }) = source.next_report()? {
        reports_total += 1;
        update_ts_bounds(&mut first_ts, &mut last_ts, ts);
        let decoded = decode_frame(&data).and_then(|frame| frame.measurement());
        match decoded {
            Ok(measurement) => {
                reports_decoded += 1;
                add_measurement(&mut group_stats, &measurement);
            }
            Err(err) => {
                log::debug!("report #{reports_total}: {err}");
                issues.record(&err, reports_total, ts_to_rfc3339(ts));
            }
        }
    }

    let mut report = make_stub_report(&path.display().to_string(), path.metadata()?.len());
    report.capture_summary = Some(CaptureSummary {
        reports_total,
        reports_decoded,
        time_start: ts_to_rfc3339(first_ts),
        time_end: ts_to_rfc3339(last_ts),
    });
    report.generated_at = report
        .capture_summary
        .as_ref()
        .and_then(|summary| summary.time_end.clone().or(summary.time_start.clone()))
        .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());
    report.groups = build_group_summaries(group_stats);
    report.decode_errors = issues.into_issues();
    Ok(report)
}

fn update_ts_bounds(first: &mut Option<f64>, last: &mut Option<f64>, ts: Option<f64>) {
    let Some(ts) = ts else {
        return;
    };
    if first.is_none_or(|existing| ts < existing) {
        *first = Some(ts);
    }
    if last.is_none_or(|existing| ts > existing) {
        *last = Some(ts);
    }
}

fn ts_to_rfc3339(ts: Option<f64>) -> Option<String> {
    let ts = ts?;
    let nanos = (ts * 1_000_000_000.0) as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}

#[cfg(test)]
mod tests {
    use super::{analyze_source, ts_to_rfc3339, update_ts_bounds};
    use crate::source::{ReportEvent, ReportSource, SourceError};
    use std::path::Path;

    struct VecSource(std::vec::IntoIter<ReportEvent>);

    impl ReportSource for VecSource {
        fn next_report(&mut self) -> Result<Option<ReportEvent>, SourceError> {
            Ok(self.0.next())
        }
    }

    #[test]
    fn any_report_length_maps_to_frame_issue_only() {
        let events: Vec<ReportEvent> = (0..=70)
            .map(|len| ReportEvent {
                ts: None,
                data: vec![0u8; len],
            })
            .collect();
        let manifest = Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");
        let report = analyze_source(&manifest, VecSource(events.into_iter())).unwrap();

        let summary = report.capture_summary.unwrap();
        assert_eq!(summary.reports_total, 71);
        assert_eq!(summary.reports_decoded, 7);
        assert_eq!(report.decode_errors.len(), 1);
        assert_eq!(report.decode_errors[0].id, "HM-FRAME-TOO-SHORT");
        assert_eq!(report.decode_errors[0].count, 64);
    }

    #[test]
    fn ts_bounds_track_min_and_max() {
        let mut first = None;
        let mut last = None;
        for ts in [Some(5.0), None, Some(2.0), Some(9.0)] {
            update_ts_bounds(&mut first, &mut last, ts);
        }
        assert_eq!(first, Some(2.0));
        assert_eq!(last, Some(9.0));
    }

    #[test]
    fn rfc3339_formatting() {
        assert_eq!(ts_to_rfc3339(Some(0.0)).as_deref(), Some("1970-01-01T00:00:00Z"));
        assert_eq!(ts_to_rfc3339(None), None);
    }
}
