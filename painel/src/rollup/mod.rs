//! Statistics over activity collections.
//!
//! Every rollup is a pure function of its inputs. Output maps keep the order
//! in which their keys were first encountered.

mod assignee;
mod matching;
mod owner;
mod project;

pub use assignee::*;
pub use matching::*;
pub use owner::*;
pub use project::*;

/// Integer mean rounded half toward positive infinity; `0` for no values.
pub fn mean_rounded<I>(values: I) -> i64
where
    I: IntoIterator<Item = i64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0i64, 0i64), |(sum, count), value| (sum + value, count + 1));

    if count == 0 {
        return 0;
    }
    (2 * sum + count).div_euclid(2 * count)
}
