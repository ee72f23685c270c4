use std::collections::BTreeMap;

use crate::DecodeIssue;
use crate::protocols::meter::{FramingError, Layer};

const MAX_EXAMPLES: usize = 3;

/// Analysis decodes whole frames, so only `HM-FRAME-TOO-SHORT` occurs
/// there: a frame of 64 bytes always carries a complete sub-packet and
/// payload. The other ids keep every `FramingError` mapped.
pub(crate) fn issue_id(err: &FramingError) -> &'static str {
    match err {
        FramingError::SizeMismatch {
            layer: Layer::Frame,
            ..
        } => "HM-FRAME-TOO-SHORT",
        FramingError::SizeMismatch {
            layer: Layer::SubPacket,
            ..
        } => "HM-SUBPACKET-TOO-SHORT",
        FramingError::SizeMismatch {
            layer: Layer::Payload,
            ..
        } => "HM-PAYLOAD-SIZE",
        FramingError::InvalidReserved { .. } | FramingError::InvalidFree { .. } => {
            "HM-FIELD-WIDTH"
        }
    }
}

/// Aggregates framing failures by id, in id order.
#[derive(Debug, Default)]
pub(crate) struct IssueTracker {
    issues: BTreeMap<&'static str, DecodeIssue>,
}

impl IssueTracker {
    pub(crate) fn record(&mut self, err: &FramingError, report_index: u64, ts: Option<String>) {
        let id = issue_id(err);
        let issue = self.issues.entry(id).or_insert_with(|| DecodeIssue {
            id: id.to_string(),
            message: err.to_string(),
            count: 0,
            examples: Vec::new(),
        });
        issue.count += 1;
        if issue.examples.len() < MAX_EXAMPLES {
            let example = match ts {
                Some(ts) => format!("report #{report_index} @ {ts}"),
                None => format!("report #{report_index}"),
            };
            issue.examples.push(example);
        }
    }

    pub(crate) fn into_issues(self) -> Vec<DecodeIssue> {
        self.issues.into_values().collect()
    }
}
