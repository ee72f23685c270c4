use std::collections::BTreeMap;

use crate::protocols::meter::MeterData;
use crate::{GroupSummary, RangeSummary};

#[derive(Debug, Default, Clone)]
pub(crate) struct RangeStats {
    count: u64,
    sum: f64,
    min: f64,
    max: f64,
}

impl RangeStats {
    /// Non-finite values are left out.
    pub(crate) fn push(&mut self, value: f32) {
        if !value.is_finite() {
            return;
        }
        let value = value as f64;
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
        self.sum += value;
    }

    pub(crate) fn summary(&self) -> Option<RangeSummary> {
        if self.count == 0 {
            return None;
        }
        Some(RangeSummary {
            min: self.min,
            max: self.max,
            mean: self.sum / self.count as f64,
        })
    }
}

#[derive(Debug, Default, Clone)]
pub(crate) struct GroupStats {
    pub samples: u64,
    pub run_time_start: u32,
    pub run_time_end: u32,
    pub voltage: RangeStats,
    pub current: RangeStats,
    pub power: RangeStats,
    pub temp_in: RangeStats,
    pub temp_out: RangeStats,
    pub ah_last: Option<f64>,
    pub wh_last: Option<f64>,
}

pub(crate) fn add_measurement(stats: &mut BTreeMap<u8, GroupStats>, data: &MeterData) {
    let entry = stats.entry(data.rec_grp).or_default();
    if entry.samples == 0 {
        entry.run_time_start = data.run_time;
        entry.run_time_end = data.run_time;
    } else {
        entry.run_time_start = entry.run_time_start.min(data.run_time);
        entry.run_time_end = entry.run_time_end.max(data.run_time);
    }
    entry.samples += 1;
    entry.voltage.push(data.vol);
    entry.current.push(data.cur);
    entry.power.push(data.power());
    entry.temp_in.push(data.temp_in);
    entry.temp_out.push(data.temp_out);
    if data.ah.is_finite() {
        entry.ah_last = Some(data.ah as f64);
    }
    if data.wh.is_finite() {
        entry.wh_last = Some(data.wh as f64);
    }
}

pub(crate) fn build_group_summaries(stats: BTreeMap<u8, GroupStats>) -> Vec<GroupSummary> {
    stats
        .into_iter()
        .map(|(rec_grp, stats)| GroupSummary {
            rec_grp,
            samples: stats.samples,
            run_time_start: stats.run_time_start,
            run_time_end: stats.run_time_end,
            voltage: stats.voltage.summary(),
            current: stats.current.summary(),
            power: stats.power.summary(),
            temp_in: stats.temp_in.summary(),
            temp_out: stats.temp_out.summary(),
            ah_last: stats.ah_last,
            wh_last: stats.wh_last,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{RangeStats, add_measurement, build_group_summaries};
    use crate::protocols::meter::MeterData;
    use std::collections::BTreeMap;

    fn reading(rec_grp: u8, run_time: u32, vol: f32, cur: f32) -> MeterData {
        MeterData {
            rec_grp,
            run_time,
            vol,
            cur,
            ah: run_time as f32,
            ..MeterData::default()
        }
    }

    #[test]
    fn range_skips_non_finite_values() {
        let mut stats = RangeStats::default();
        assert!(stats.summary().is_none());
        stats.push(f32::NAN);
        stats.push(f32::INFINITY);
        assert!(stats.summary().is_none());
        stats.push(2.0);
        stats.push(4.0);
        let summary = stats.summary().unwrap();
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 4.0);
        assert_eq!(summary.mean, 3.0);
    }

    #[test]
    fn groups_are_sorted_and_aggregated() {
        let mut stats = BTreeMap::new();
        add_measurement(&mut stats, &reading(2, 5, 12.0, 1.0));
        add_measurement(&mut stats, &reading(0, 9, 5.0, -2.0));
        add_measurement(&mut stats, &reading(0, 3, 4.0, -1.0));

        let summaries = build_group_summaries(stats);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].rec_grp, 0);
        assert_eq!(summaries[1].rec_grp, 2);

        let first = &summaries[0];
        assert_eq!(first.samples, 2);
        assert_eq!(first.run_time_start, 3);
        assert_eq!(first.run_time_end, 9);
        let current = first.current.unwrap();
        assert_eq!(current.min, -2.0);
        assert_eq!(current.max, -1.0);
        let power = first.power.unwrap();
        assert_eq!(power.min, 4.0);
        assert_eq!(power.max, 10.0);
        assert_eq!(first.ah_last, Some(3.0));
    }
}
