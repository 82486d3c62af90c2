// Multi-day overlay alignment onto a shared 24-hour slot grid
use crate::domain::sensor::{Metric, SensorRow};
use chrono::Timelike;

/// Minutes between slots on the shared time axis.
pub const SLOT_MINUTES: u32 = 10;

/// Number of slots: 00:00 through 23:50.
pub const SLOT_COUNT: usize = 144;

/// How far a reading's minute may sit from the slot's minute and still match.
pub const MATCH_TOLERANCE_MINUTES: i64 = 5;

/// The fixed `HH:MM` labels of the shared x axis.
pub fn slot_labels() -> Vec<String> {
    let mut labels = Vec::with_capacity(SLOT_COUNT);
    for hour in 0..24 {
        for minute in (0..60).step_by(SLOT_MINUTES as usize) {
            labels.push(format!("{hour:02}:{minute:02}"));
        }
    }
    labels
}

/// Map one day's rows onto the slot grid for a single metric.
///
/// A slot takes the first row (in ascending scan order) whose time of day
/// has the same hour as the slot and whose minute is within
/// [`MATCH_TOLERANCE_MINUTES`]. The hour must match exactly: a reading at
/// 07:59 never fills slot 08:00 even though it is one minute away. Slots
/// with no qualifying row stay `None`, drawing a gap instead of
/// interpolating.
pub fn align_day(rows: &[SensorRow], metric: Metric) -> Vec<Option<f64>> {
    let mut values = Vec::with_capacity(SLOT_COUNT);

    for slot_hour in 0..24u32 {
        for slot_minute in (0..60u32).step_by(SLOT_MINUTES as usize) {
            let matching = rows.iter().find(|row| {
                let time = row.timestamp.time();
                time.hour() == slot_hour
                    && (time.minute() as i64 - slot_minute as i64).abs()
                        <= MATCH_TOLERANCE_MINUTES
            });

            values.push(matching.and_then(|row| row.value(metric)));
        }
    }

    values
}
