/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use std::collections::VecDeque;

/// VecDeque used as a ring buffer with an explicit max length (VecDeque capacities can be larger
/// than requested so we can't use them as the bound)
pub trait RingDeque<T> {
    /// push to the back, dropping the oldest (front) elements if `max_len` would be exceeded
    fn push_to_ringbuffer (&mut self, t: T, max_len: usize);

    /// push to the front, dropping the oldest (back) elements if `max_len` would be exceeded
    fn push_front_to_ringbuffer (&mut self, t: T, max_len: usize);
}

impl<T> RingDeque<T> for VecDeque<T> {
    #[inline]
    fn push_to_ringbuffer (&mut self, t: T, max_len: usize) {
        if max_len == 0 { return }
        while self.len() >= max_len {
            self.pop_front();
        }
        self.push_back(t)
    }

    #[inline]
    fn push_front_to_ringbuffer (&mut self, t: T, max_len: usize) {
        if max_len == 0 { return }
        while self.len() >= max_len {
            self.pop_back();
        }
        self.push_front(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ringbuffer () {
        let mut v: VecDeque<u32> = VecDeque::with_capacity(3);
        for i in 0..5 { v.push_to_ringbuffer( i, 3); }
        assert_eq!( v.iter().copied().collect::<Vec<u32>>(), vec![2,3,4]);

        let mut v: VecDeque<u32> = VecDeque::new();
        for i in 0..5 { v.push_front_to_ringbuffer( i, 2); }
        assert_eq!( v.iter().copied().collect::<Vec<u32>>(), vec![4,3]);
    }
}
