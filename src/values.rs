//! Per-document value sequences
//!
//! Writers make more than one pass over a field's values (statistics first,
//! then the payload), so values are supplied as a `ValueSource`: something
//! that can produce a fresh iterator on demand. Any `Fn() -> impl Iterator`
//! closure is a value source.

use std::iter::FusedIterator;


pub trait ValueSource {
    type Item;
    type Iter: Iterator<Item = Self::Item>;

    /// Starts a new pass over the values, from the first document
    fn values(&self) -> Self::Iter;
}


impl<F, I> ValueSource for F
    where F: Fn() -> I,
          I: Iterator
{
    type Item = I::Item;
    type Iter = I;

    #[inline]
    fn values(&self) -> I {
        self()
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AddressState {
    Iterating,
    EmitFinal,
    Done,
}


/// Turns per-document value counts into addresses
///
/// Yields the running total before each count, then one extra value: the
/// total of all counts. So `n` counts produce `n + 1` addresses, and the
/// values of document `i` live in `[address[i], address[i + 1])`.
///
/// ```
/// use kite_docvalues::values::CountToAddress;
///
/// let addresses: Vec<i64> = CountToAddress::new(vec![2, 0, 3].into_iter()).collect();
/// assert_eq!(addresses, vec![0, 2, 2, 5]);
/// ```
#[derive(Debug, Clone)]
pub struct CountToAddress<I> {
    counts: I,
    sum: i64,
    state: AddressState,
}


impl<I> CountToAddress<I> {
    pub fn new(counts: I) -> CountToAddress<I> {
        CountToAddress {
            counts: counts,
            sum: 0,
            state: AddressState::Iterating,
        }
    }
}


impl<I> Iterator for CountToAddress<I>
    where I: Iterator,
          I::Item: Into<i64>
{
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        loop {
            match self.state {
                AddressState::Iterating => {
                    match self.counts.next() {
                        Some(count) => {
                            let address = self.sum;
                            self.sum += count.into();
                            return Some(address);
                        }
                        None => {
                            self.state = AddressState::EmitFinal;
                        }
                    }
                }
                AddressState::EmitFinal => {
                    self.state = AddressState::Done;
                    return Some(self.sum);
                }
                AddressState::Done => return None,
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.state {
            AddressState::Iterating => {
                let (lower, upper) = self.counts.size_hint();
                (lower.saturating_add(1), upper.and_then(|upper| upper.checked_add(1)))
            }
            AddressState::EmitFinal => (1, Some(1)),
            AddressState::Done => (0, Some(0)),
        }
    }
}


impl<I> FusedIterator for CountToAddress<I>
    where I: Iterator,
          I::Item: Into<i64>
{}


#[cfg(test)]
mod tests {
    use super::{CountToAddress, ValueSource};

    #[test]
    fn test_addresses() {
        let addresses = CountToAddress::new(vec![2i64, 0, 3].into_iter()).collect::<Vec<_>>();

        assert_eq!(addresses, vec![0, 2, 2, 5]);
    }

    #[test]
    fn test_no_counts() {
        let addresses = CountToAddress::new(Vec::<i64>::new().into_iter()).collect::<Vec<_>>();

        assert_eq!(addresses, vec![0]);
    }

    #[test]
    fn test_fused_after_final_value() {
        let mut addresses = CountToAddress::new(vec![4u32].into_iter());

        assert_eq!(addresses.size_hint(), (2, Some(2)));
        assert_eq!(addresses.next(), Some(0));
        assert_eq!(addresses.size_hint(), (1, Some(1)));
        assert_eq!(addresses.next(), Some(4));
        assert_eq!(addresses.next(), None);
        assert_eq!(addresses.next(), None);
        assert_eq!(addresses.size_hint(), (0, Some(0)));
    }

    #[test]
    fn test_closure_is_restartable_source() {
        let counts = vec![1i64, 1, 1];
        let addresses = || CountToAddress::new(counts.iter().cloned());

        assert_eq!(addresses.values().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(addresses.values().count(), 4);
    }
}
