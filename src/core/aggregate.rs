use std::ops::{Add, Div};

use itertools::Itertools;

impl<T> Aggregate for T where T: ?Sized {}

pub trait Aggregate {
    #[must_use]
    fn mean<V>(self) -> Option<V>
    where
        Self: Sized + IntoIterator<Item = V>,
        V: Copy + Add<Output = V> + Div<f64, Output = V>,
    {
        let mut values = self.into_iter();
        let first = values.next()?;
        let (sum, count) =
            values.fold((first, 1_u32), |(sum, count), value| (sum + value, count + 1));
        Some(sum / f64::from(count))
    }

    #[must_use]
    fn median<V>(self) -> Option<V>
    where
        Self: Sized + IntoIterator<Item = V>,
        V: Copy + Add<Output = V> + Div<f64, Output = V> + Ord,
    {
        let mut values = self.into_iter().collect_vec();
        if values.is_empty() {
            None
        } else {
            let index = values.len() / 2;
            let index_value = *values.select_nth_unstable(index).1;
            if values.len() % 2 == 1 {
                Some(index_value)
            } else {
                let leading_value = *values.select_nth_unstable(index - 1).1;
                Some((leading_value + index_value) / 2.0)
            }
        }
    }
}
