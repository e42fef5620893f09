use kite::store::{DataOutput, IndexOutput};

use errors::{DocValuesError, LimitKind, Result};
use settings::DocValuesSettings;
use values::ValueSource;
use writer::bitset::write_missing_bitset;


#[derive(Debug, Clone, PartialEq)]
struct NumericStats {
    min: i64,
    max: i64,
    missing: bool,
    count: u64,
}


impl NumericStats {
    fn new() -> NumericStats {
        NumericStats {
            min: i64::max_value(),
            max: i64::min_value(),
            missing: false,
            count: 0,
        }
    }
}


/// Smallest number of bytes that can hold every value in `[min, max]`
///
/// A field with no present values (`min > max`) gets a width of 1.
pub fn byte_width(min: i64, max: i64) -> u8 {
    if min >= i8::min_value() as i64 && max <= i8::max_value() as i64 {
        1
    } else if min >= i16::min_value() as i64 && max <= i16::max_value() as i64 {
        2
    } else if min >= i32::min_value() as i64 && max <= i32::max_value() as i64 {
        4
    } else {
        8
    }
}


fn collect_stats<S>(field: &str, values: &S, settings: &DocValuesSettings) -> Result<NumericStats>
    where S: ValueSource + ?Sized,
          S::Item: Into<Option<i64>>
{
    let mut stats = NumericStats::new();

    for value in values.values() {
        match value.into() {
            Some(v) => {
                if v < stats.min {
                    stats.min = v;
                }
                if v > stats.max {
                    stats.max = v;
                }
            }
            None => {
                stats.missing = true;
            }
        }

        stats.count += 1;
        if stats.count >= settings.max_values() {
            return Err(DocValuesError::overflow(field, LimitKind::Values, settings.max_values()));
        }
    }

    Ok(stats)
}


/// Writes a numeric column to `data` and its entry to `meta`
///
/// Entry: data offset (i64), count (i32), missing bitset offset and length
/// (i64 each, or a single -1 when nothing is missing), byte width (u8).
pub fn write_numeric<D, M, S>(data: &mut D, meta: &mut M, field: &str, values: &S, settings: &DocValuesSettings) -> Result<()>
    where D: IndexOutput + ?Sized,
          M: DataOutput + ?Sized,
          S: ValueSource + ?Sized,
          S::Item: Into<Option<i64>>
{
    let stats = collect_stats(field, values, settings)?;

    meta.write_long(data.file_pointer() as i64)?;
    meta.write_int(stats.count as i32)?;

    if stats.missing {
        let start = data.file_pointer();
        write_missing_bitset(data, values.values().map(|value| value.into().is_some()))?;
        meta.write_long(start as i64)?;
        meta.write_long((data.file_pointer() - start) as i64)?;
    } else {
        meta.write_long(-1)?;
    }

    let width = byte_width(stats.min, stats.max);
    meta.write_byte(width)?;

    trace!("writing numeric field {}: count={}, width={}, missing={}", field, stats.count, width, stats.missing);

    for value in values.values() {
        let v = value.into().unwrap_or(0);

        match width {
            1 => data.write_byte(v as i8 as u8)?,
            2 => data.write_short(v as i16)?,
            4 => data.write_int(v as i32)?,
            _ => data.write_long(v)?,
        }
    }

    Ok(())
}
