/*
seeded_random.rs

Copyright 2025 Hervé Quatremain

This file is part of Dotlink.

Dotlink is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Dotlink is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Dotlink. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Deterministic random source.
//!
//! Every random decision taken by [`super::flow_generator::Generator`] goes through the
//! [`RandomSource`] trait.
//! [`SeededRandom`] is the production implementation: a Mulberry32 generator that produces the
//! exact same sequence of values for the same 32-bit seed, on every platform.
//! Tests can provide their own scripted implementation.

use log::debug;
use rand::Rng;

/// Source of random values used by the puzzle generator.
pub trait RandomSource {
    /// Return a value in `[0, 1)` and advance the internal state.
    fn next_f64(&mut self) -> f64;

    /// Return an integer in `[min, max)`.
    ///
    /// When the range is empty, `min` is returned and the state still advances, so that the
    /// sequence of draws does not depend on the range.
    fn range(&mut self, min: usize, max: usize) -> usize {
        let r: f64 = self.next_f64();
        if max <= min {
            return min;
        }
        (r * (max - min) as f64).floor() as usize + min
    }

    /// Shuffle the slice in place (Fisher-Yates, from the last element down).
    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j: usize = (self.next_f64() * (i + 1) as f64).floor() as usize;
            items.swap(i, j.min(i));
        }
    }
}

/// Mulberry32 generator.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    /// Seed the object was created with. Kept for traceability.
    seed: u32,

    /// Internal state, advanced on each draw.
    state: u32,
}

impl SeededRandom {
    /// Create a [`SeededRandom`] object from a numeric seed.
    pub fn new(seed: u32) -> Self {
        Self { seed, state: seed }
    }

    /// Create a [`SeededRandom`] object from a string seed.
    ///
    /// The string is hashed with a rolling `hash * 31 + code` over its UTF-16 code units,
    /// wrapped to 32 bits.
    pub fn from_text(seed: &str) -> Self {
        let hash: u32 = hash_seed(seed);
        debug!("Seed {seed:?} hashed to {hash}");
        Self::new(hash)
    }

    /// Create a [`SeededRandom`] object with a non-deterministic 31-bit seed.
    pub fn from_entropy() -> Self {
        Self::new(rand::rng().random_range(0..(1u32 << 31)))
    }

    /// Return the seed.
    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6d2b_79f5);
        let mut t: u32 = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        f64::from(t ^ (t >> 14)) / 4_294_967_296.0
    }
}

/// Hash a string seed to a 32-bit integer.
pub fn hash_seed(seed: &str) -> u32 {
    seed.encode_utf16()
        .fold(0u32, |hash, code| hash.wrapping_mul(31).wrapping_add(u32::from(code)))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Random source that replays a fixed list of values, cycling when exhausted.
    pub(crate) struct ScriptedRandom {
        values: Vec<f64>,
        index: usize,
    }

    impl ScriptedRandom {
        pub(crate) fn new(values: &[f64]) -> Self {
            Self {
                values: values.to_vec(),
                index: 0,
            }
        }
    }

    impl RandomSource for ScriptedRandom {
        fn next_f64(&mut self) -> f64 {
            let v: f64 = self.values[self.index % self.values.len()];
            self.index += 1;
            v
        }
    }

    #[test]
    fn test_known_sequence() {
        let mut r = SeededRandom::new(42);
        assert!((r.next_f64() - 0.601_103_751_920_163_6).abs() < 1e-12);
        assert!((r.next_f64() - 0.448_290_558_997_541_67).abs() < 1e-12);
        assert!((r.next_f64() - 0.852_465_793_490_409_9).abs() < 1e-12);
    }

    #[test]
    fn test_hash_seed() {
        assert_eq!(hash_seed(""), 0);
        assert_eq!(hash_seed("ABC123"), 1_923_891_888);
        assert_eq!(hash_seed("SEED1"), 78_776_288);
        assert_eq!(SeededRandom::from_text("ABC123").seed(), 1_923_891_888);
    }

    #[test]
    fn test_range() {
        let mut r = SeededRandom::new(1);
        let values: Vec<usize> = (0..5).map(|_| r.range(5, 15)).collect();
        assert_eq!(values, vec![11, 5, 10, 14, 14]);

        let mut r = ScriptedRandom::new(&[0.999_999]);
        assert_eq!(r.range(3, 4), 3);
        assert_eq!(r.range(7, 7), 7);
    }

    #[test]
    fn test_same_seed_same_shuffle() {
        let mut a: Vec<usize> = (0..20).collect();
        let mut b: Vec<usize> = (0..20).collect();
        SeededRandom::from_text("XYZ").shuffle(&mut a);
        SeededRandom::from_text("XYZ").shuffle(&mut b);
        assert_eq!(a, b);

        let mut sorted = a.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<usize>>());
    }

    #[test]
    fn test_scripted_shuffle() {
        // Always drawing 0 moves the last element to the front at each step
        let mut v = vec![1, 2, 3];
        ScriptedRandom::new(&[0.0]).shuffle(&mut v);
        assert_eq!(v, vec![2, 3, 1]);
    }
}
