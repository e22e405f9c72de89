//! The numeric half of the visualizer: folds the linear bar sequence into a
//! center-outward read of the spectrum and maps magnitudes to bar heights.

/// Fixed geometry of the bar field inside the SVG viewBox. Positions are
/// computed once at creation; only heights change per frame.
#[derive(Clone, Copy, Debug)]
pub struct BarLayout {
    pub bar_count: usize,
    pub bar_width: f32,
    pub bar_spacing: f32,
    pub svg_width: f32,
    /// Bars grow up and down from this center line.
    pub center_y: f32,
}

impl BarLayout {
    pub fn new(bar_count: usize) -> Self {
        Self {
            bar_count,
            bar_width: 2.0,
            bar_spacing: 0.5,
            svg_width: 300.0,
            center_y: 25.0,
        }
    }

    fn step(&self) -> f32 {
        self.bar_width + self.bar_spacing
    }

    /// X position of bar `i`, with the whole run centered in the viewBox.
    pub fn x(&self, i: usize) -> f32 {
        let total = self.bar_count as f32 * self.step();
        (self.svg_width - total) / 2.0 + i as f32 * self.step()
    }
}

/// Seeded xorshift64 for the idle animation. Every draw advances the state,
/// so silent frames never repeat.
#[derive(Clone, Debug)]
pub struct Jitter(u64);

impl Jitter {
    pub fn new(seed: u64) -> Self {
        // xorshift state must be nonzero
        Self(seed.max(1))
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        (x >> 40) as f32 / (1u64 << 24) as f32
    }
}

/// One frame of bar heights from a byte magnitude buffer.
///
/// Each bar reads the bin at `|i - center| / center * (len / 2)`, so bars
/// near the middle see the lowest frequencies and the spectrum spreads
/// outward symmetrically. With signal, magnitudes pass through a concave
/// `^0.8` gain curve (low magnitudes stay visible) and shrink linearly with
/// distance from the center. Without signal, a low random flutter keeps the
/// display alive. Heights land in roughly `[3, 48.8]` drawing units.
pub fn bar_heights(magnitudes: &[u8], bar_count: usize, jitter: &mut Jitter) -> Vec<f32> {
    let len = magnitudes.len();
    let center = bar_count as f32 / 2.0;
    let has_signal = magnitudes.iter().any(|&m| m > 0);

    (0..bar_count)
        .map(|i| {
            let distance = (i as f32 - center).abs();
            let value = if has_signal {
                let folded = distance / center * (len as f32 / 2.0);
                let data_index = (folded.floor() as usize).min(len - 1);
                let boosted = (f32::from(magnitudes[data_index]) / 255.0).powf(0.8) * 255.0;
                boosted * (1.0 - distance / center)
            } else {
                jitter.next_f32() * 50.0
            };
            value / 256.0 * 45.0 + 3.0
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BAR_COUNT: usize = 128;

    fn heights(magnitudes: &[u8]) -> Vec<f32> {
        let mut jitter = Jitter::new(7);
        bar_heights(magnitudes, BAR_COUNT, &mut jitter)
    }

    #[test]
    fn folded_mapping_is_symmetric_around_center() {
        // Bars at equal distance from the center read the same bin and get
        // the same attenuation.
        let h = heights(&[200u8; 128]);
        for i in 1..BAR_COUNT {
            assert_eq!(h[i], h[BAR_COUNT - i], "pair ({i}, {})", BAR_COUNT - i);
        }
    }

    #[test]
    fn silence_stays_in_idle_band_and_varies() {
        let zeros = vec![0u8; 128];
        let mut jitter = Jitter::new(42);
        let first = bar_heights(&zeros, BAR_COUNT, &mut jitter);
        let second = bar_heights(&zeros, BAR_COUNT, &mut jitter);
        let idle_max = 3.0 + 50.0 / 256.0 * 45.0;
        for &h in first.iter().chain(second.iter()) {
            assert!((3.0..idle_max).contains(&h), "idle height {h} out of band");
        }
        assert_ne!(first, second, "idle animation must not freeze");
    }

    #[test]
    fn single_hot_bin_lights_only_the_center() {
        // With len == bar_count the folded index equals the distance, so bin
        // zero maps only onto the middle bar.
        let mut magnitudes = vec![0u8; 128];
        magnitudes[0] = 255;
        let h = heights(&magnitudes);
        let center = BAR_COUNT / 2;
        for (i, &height) in h.iter().enumerate() {
            if i == center {
                // Full gain curve output, zero attenuation at distance 0.
                assert_eq!(height, 255.0 / 256.0 * 45.0 + 3.0);
            } else {
                assert_eq!(height, 3.0, "bar {i} should sit on the floor");
            }
        }
    }

    #[test]
    fn center_bar_carries_full_weight() {
        let h = heights(&[100u8; 128]);
        let expected = (100.0f32 / 255.0).powf(0.8) * 255.0 / 256.0 * 45.0 + 3.0;
        assert_eq!(h[BAR_COUNT / 2], expected);
    }

    #[test]
    fn edge_bars_are_fully_attenuated() {
        // Distance == center at bar 0, so the attenuation factor is zero.
        let h = heights(&[255u8; 128]);
        assert_eq!(h[0], 3.0);
    }

    #[test]
    fn data_index_clamps_to_buffer_end() {
        // A shorter buffer than bar count must never index out of bounds.
        let magnitudes = vec![10u8; 16];
        let h = heights(&magnitudes);
        assert_eq!(h.len(), BAR_COUNT);
    }

    #[test]
    fn layout_positions_are_fixed_and_evenly_spaced() {
        let layout = BarLayout::new(BAR_COUNT);
        let step = layout.bar_width + layout.bar_spacing;
        for i in 0..BAR_COUNT - 1 {
            assert_eq!(layout.x(i + 1) - layout.x(i), step);
        }
        // The run is centered in the viewBox.
        let left = layout.x(0);
        let right = layout.x(BAR_COUNT - 1) + step;
        assert!((left - (layout.svg_width - right)).abs() < 1e-3);
    }

    #[test]
    fn jitter_is_bounded_and_seeded() {
        let mut a = Jitter::new(1);
        let mut b = Jitter::new(1);
        for _ in 0..1000 {
            let v = a.next_f32();
            assert!((0.0..1.0).contains(&v));
            assert_eq!(v, b.next_f32());
        }
    }
}
