use std::io;

use kite::store::DataOutput;


/// Number of 64 bit words needed to hold one bit per value
#[inline]
pub fn num_words(num_values: u64) -> u64 {
    (num_values + 63) / 64
}


/// Writes one bit per value: 1 if the value is present, 0 if it's missing
///
/// Bits are packed into big endian 64 bit words, value `i` going to bit
/// `i % 64` of word `i / 64`. A trailing partial word is written in full.
pub fn write_missing_bitset<O, I>(output: &mut O, present: I) -> io::Result<()>
    where O: DataOutput + ?Sized,
          I: IntoIterator<Item = bool>
{
    let mut bits: u64 = 0;
    let mut count = 0;

    for is_present in present {
        if count == 64 {
            output.write_long(bits as i64)?;
            count = 0;
            bits = 0;
        }

        if is_present {
            bits |= 1 << count;
        }

        count += 1;
    }

    if count > 0 {
        output.write_long(bits as i64)?;
    }

    Ok(())
}
