//! Destructible 1-D heightmap
//!
//! Y grows downward: a larger height is a lower surface. Craters only ever
//! increase heights; terrain never heals during a match.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// One sine octave of the terrain profile
#[derive(Debug, Clone, Copy)]
struct Octave {
    amplitude: f32,
    frequency: f32,
    phase: f32,
}

impl Octave {
    fn random(rng: &mut impl Rng, amplitude: (f32, f32), frequency: (f32, f32)) -> Self {
        Self {
            amplitude: amplitude.0 + rng.random::<f32>() * amplitude.1,
            frequency: frequency.0 + rng.random::<f32>() * frequency.1,
            phase: rng.random::<f32>() * std::f32::consts::TAU,
        }
    }

    #[inline]
    fn sample(&self, x: f32) -> f32 {
        (x * self.frequency + self.phase).sin() * self.amplitude
    }
}

/// Ground surface, one height per world column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Terrain {
    heights: Vec<i32>,
    /// Craters never dig below this height
    floor: i32,
}

impl Terrain {
    /// Procedurally generate a new profile: three random octaves plus jitter
    pub fn generate(tuning: &Tuning, rng: &mut impl Rng) -> Self {
        let width = tuning.world_width.max(1);

        // Large hills, medium hills, small ripples
        let octaves = [
            Octave::random(rng, (40.0, 50.0), (0.003, 0.005)),
            Octave::random(rng, (15.0, 25.0), (0.010, 0.012)),
            Octave::random(rng, (5.0, 15.0), (0.025, 0.020)),
        ];
        let jitter = 3.0 + rng.random::<f32>() * 6.0;

        let lo = tuning.terrain_min_height;
        let hi = tuning.terrain_max_height();

        let heights = (0..width)
            .map(|x| {
                let x = x as f32;
                let h = tuning.terrain_base
                    + octaves.iter().map(|o| o.sample(x)).sum::<f32>()
                    + (rng.random::<f32>() - 0.5) * jitter;
                (h.round() as i32).clamp(lo, hi.max(lo))
            })
            .collect();

        Self {
            heights,
            floor: tuning.crater_floor,
        }
    }

    /// Build a terrain from explicit column heights
    pub fn from_heights(heights: Vec<i32>, floor: i32) -> Self {
        assert!(!heights.is_empty(), "terrain needs at least one column");
        Self { heights, floor }
    }

    /// Level ground at `height`
    pub fn flat(width: usize, height: i32, floor: i32) -> Self {
        Self::from_heights(vec![height; width.max(1)], floor)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.heights.len()
    }

    /// Read-only view of every column
    #[inline]
    pub fn heights(&self) -> &[i32] {
        &self.heights
    }

    /// Surface height under world X (clamped, rounded to the nearest column)
    #[inline]
    pub fn height_at(&self, x: f32) -> i32 {
        let last = (self.heights.len() - 1) as f32;
        let ix = x.round().clamp(0.0, last) as usize;
        self.heights[ix]
    }

    /// Dig a circular crater centred on column `cx`
    ///
    /// Each column within `radius` sinks by `sqrt(r² - dx²) * depth_scale`,
    /// never below the floor.
    pub fn crater(&mut self, cx: f32, radius: f32, depth_scale: f32) {
        debug_assert!(
            depth_scale > 0.0 && depth_scale <= 1.0,
            "crater depth scale {depth_scale} outside (0, 1]"
        );
        if radius <= 0.0 {
            return;
        }
        let last = self.heights.len() as i64 - 1;
        let x0 = ((cx - radius).floor() as i64).max(0);
        let x1 = ((cx + radius).ceil() as i64).min(last);
        if x0 > x1 {
            return;
        }

        for x in x0..=x1 {
            let dx = x as f32 - cx;
            let inside = radius * radius - dx * dx;
            if inside <= 0.0 {
                continue;
            }
            let cut = inside.sqrt() * depth_scale;
            let column = &mut self.heights[x as usize];
            let dug = (*column as f32 + cut).round() as i32;
            // A column already below the floor stays where it is
            *column = (*column).max(dug.min(self.floor));
        }
    }

    /// Slope under a tank at `x`, in radians (positive when the ground drops to the right)
    pub fn tilt_at(&self, x: f32, probe: f32) -> f32 {
        let left = self.height_at(x - probe) as f32;
        let right = self.height_at(x + probe) as f32;
        (right - left).atan2(2.0 * probe)
    }
}
