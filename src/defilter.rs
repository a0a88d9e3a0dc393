use crate::error::{DecodeError, Result};

/// The five per-scanline reconstruction filters. See
/// <http://www.libpng.org/pub/png/spec/1.2/PNG-Filters.html>.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    None,
    Sub,
    Up,
    Average,
    Paeth,
}

impl Filter {
    pub fn from_byte(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Sub),
            2 => Ok(Self::Up),
            3 => Ok(Self::Average),
            4 => Ok(Self::Paeth),
            other => Err(DecodeError::invalid_filter_method(other)),
        }
    }
}

/// a = left, b = above, c = upper-left. Ties break in order (a, b, c).
pub fn paeth_predictor(a: u8, b: u8, c: u8) -> u8 {
    let (ia, ib, ic) = (a as i32, b as i32, c as i32);
    let p = ia + ib - ic;
    let pa = (p - ia).abs();
    let pb = (p - ib).abs();
    let pc = (p - ic).abs();

    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

/// Reverses `filter` on `current` in place. `previous` is the already
/// defiltered scanline directly above it (all zeros for a pass's first row).
/// Both slices must have equal length; `bpp` is the number of bytes per
/// whole pixel, floored to 1 for sub-byte pixels.
pub fn defilter_scanline(filter: Filter, current: &mut [u8], previous: &[u8], bpp: usize) {
    debug_assert_eq!(current.len(), previous.len());

    match filter {
        Filter::None => {}
        Filter::Sub => {
            for i in 0..current.len() {
                let a = if i >= bpp { current[i - bpp] } else { 0 };
                current[i] = current[i].wrapping_add(a);
            }
        }
        Filter::Up => {
            for i in 0..current.len() {
                current[i] = current[i].wrapping_add(previous[i]);
            }
        }
        Filter::Average => {
            for i in 0..current.len() {
                let a = if i >= bpp { current[i - bpp] as u16 } else { 0 };
                let b = previous[i] as u16;
                current[i] = current[i].wrapping_add(((a + b) / 2) as u8);
            }
        }
        Filter::Paeth => {
            for i in 0..current.len() {
                let a = if i >= bpp { current[i - bpp] } else { 0 };
                let b = previous[i];
                let c = if i >= bpp { previous[i - bpp] } else { 0 };
                current[i] = current[i].wrapping_add(paeth_predictor(a, b, c));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_passes_through() {
        let mut current = vec![1, 2, 3];
        let previous = vec![9, 9, 9];
        defilter_scanline(Filter::None, &mut current, &previous, 1);
        assert_eq!(current, vec![1, 2, 3]);
    }

    #[test]
    fn sub_accumulates_left_neighbor() {
        let mut current = vec![10, 5, 5];
        let previous = vec![0, 0, 0];
        defilter_scanline(Filter::Sub, &mut current, &previous, 1);
        assert_eq!(current, vec![10, 15, 20]);
    }

    #[test]
    fn up_adds_previous_row() {
        let mut current = vec![1, 2, 3];
        let previous = vec![10, 20, 30];
        defilter_scanline(Filter::Up, &mut current, &previous, 1);
        assert_eq!(current, vec![11, 22, 33]);
    }

    #[test]
    fn average_floors_the_mean() {
        let mut current = vec![3, 0];
        let previous = vec![0, 5];
        // bpp = 1: byte 0 has a=0 b=0 -> floor(0/2)=0 -> 3
        // byte 1 has a=current[0]=3 (post reconstruction) b=5 -> floor(8/2)=4 -> 0+4=4
        defilter_scanline(Filter::Average, &mut current, &previous, 1);
        assert_eq!(current, vec![3, 4]);
    }

    #[test]
    fn paeth_predictor_returns_one_of_its_inputs() {
        for (a, b, c) in [(0, 0, 0), (10, 20, 5), (255, 0, 128), (1, 2, 3)] {
            let p = paeth_predictor(a, b, c);
            assert!(p == a || p == b || p == c);
        }
    }

    #[test]
    fn paeth_predictor_ties_break_in_order_a_b_c() {
        // p = a + b - c. Choosing a == b == c makes pa == pb == pc == 0.
        assert_eq!(paeth_predictor(7, 7, 7), 7);
        // a closest wins even if b or c would also be a valid distance.
        assert_eq!(paeth_predictor(5, 5, 5), 5);
    }

    /// Straightforward reference implementation, free of the shared-distance
    /// short-circuiting in [`paeth_predictor`], to check against.
    fn reference_paeth(a: u8, b: u8, c: u8) -> u8 {
        let (a, b, c) = (a as i32, b as i32, c as i32);
        let p = a + b - c;
        let (pa, pb, pc) = ((p - a).abs(), (p - b).abs(), (p - c).abs());
        if pa <= pb && pa <= pc {
            a as u8
        } else if pb <= pc {
            b as u8
        } else {
            c as u8
        }
    }

    #[test]
    fn paeth_predictor_exhaustive_over_full_256_cubed_space() {
        for a in 0u8..=255 {
            for b in 0u8..=255 {
                for c in 0u8..=255 {
                    assert_eq!(paeth_predictor(a, b, c), reference_paeth(a, b, c));
                }
            }
        }
    }

    proptest::proptest! {
        #[test]
        fn paeth_predictor_matches_reference_on_random_samples(
            a in 0u8..=255,
            b in 0u8..=255,
            c in 0u8..=255,
        ) {
            let got = paeth_predictor(a, b, c);
            let want = reference_paeth(a, b, c);
            proptest::prop_assert_eq!(got, want);
            proptest::prop_assert!(got == a || got == b || got == c);
        }
    }
}
