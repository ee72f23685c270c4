use std::io::{BufWriter, Write};

use anyhow::Context;
use hidmeter_core::{MeterData, ReportEvent, ReportSource, UsbFrame, decode_frame, open_capture};
use serde::Serialize;

use crate::cli::DecodeArgs;
use crate::{CliError, resolve_input_path, validate_input_file};

#[derive(Serialize)]
struct DecodedReading<'a> {
    report: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    ts: Option<f64>,
    idx1: u8,
    idx2: u8,
    reading: &'a MeterData,
}

pub(crate) fn cmd_capture_decode(args: DecodeArgs) -> Result<(), CliError> {
    let input = resolve_input_path(&args.input)?;
    validate_input_file(&input)?;

    let mut source = open_capture(&input, args.filter.into())
        .with_context(|| format!("Failed to open capture: {}", input.display()))?;
    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let mut report = 0u64;
    let mut decoded = 0u64;
    let mut skipped = 0u64;
    while args.limit.is_none_or(|limit| decoded < limit) {
        let Some(ReportEvent { ts, data }) = source
            .next_report()
            .with_context(|| format!("Failed to read capture: {}", input.display()))?
        else {
            break;
        };
        report += 1;

        let (frame, reading) = match decode_report(&data) {
            Ok(decoded) => decoded,
            Err(err) => {
                log::warn!("report #{report}: {err}");
                skipped += 1;
                continue;
            }
        };
        decoded += 1;

        let line = if args.json {
            serde_json::to_string(&DecodedReading {
                report,
                ts,
                idx1: frame.idx1,
                idx2: frame.idx2,
                reading: &reading,
            })
            .context("JSON serialization failed")?
        } else {
            format_reading(&reading)
        };
        writeln!(out, "{line}").context("Failed to write to stdout")?;
    }
    out.flush().context("Failed to write to stdout")?;

    log::info!("decoded {decoded} report(s), skipped {skipped}");
    Ok(())
}

fn decode_report(data: &[u8]) -> Result<(UsbFrame, MeterData), hidmeter_core::FramingError> {
    let frame = decode_frame(data)?;
    let reading = frame.measurement()?;
    Ok((frame, reading))
}

fn format_reading(reading: &MeterData) -> String {
    format!(
        "Time: {} Volt: {:.4} Current: {:.4} Power: {:.4}",
        reading.run_time,
        reading.vol,
        reading.current_magnitude(),
        reading.power()
    )
}

#[cfg(test)]
mod tests {
    use super::format_reading;
    use hidmeter_core::MeterData;

    #[test]
    fn text_line_uses_magnitudes() {
        let reading = MeterData {
            run_time: 12,
            vol: 5.0,
            cur: -0.5,
            ..MeterData::default()
        };
        assert_eq!(
            format_reading(&reading),
            "Time: 12 Volt: 5.0000 Current: 0.5000 Power: 2.5000"
        );
    }
}
