use rand::Rng;
use serde::{Deserialize, Serialize};

/// Game durations offered by the typing game, in seconds.
pub const DURATIONS: [u32; 4] = [15, 30, 60, 120];

/// Target words-per-minute tiers: (weight, inclusive range).
const WPM_TIERS: [(f64, (u32, u32)); 3] = [
    (0.4, (20, 50)),
    (0.4, (50, 80)),
    (0.2, (80, 120)),
];

/// Typo ratio tiers: (weight, half-open range).
const ERROR_TIERS: [(f64, (f64, f64)); 3] = [
    (0.7, (0.0, 0.03)),
    (0.2, (0.03, 0.08)),
    (0.1, (0.08, 0.15)),
];

/// One fabricated game result, internally consistent: `wpm` and `accuracy`
/// are always recomputed from the character counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub wpm: u32,
    pub accuracy: u32,
    pub time: u32,
    pub correct_chars: u32,
    pub incorrect_chars: u32,
    /// Keystroke timeline; the web client sends one, the bot never does.
    pub progress_data: Vec<serde_json::Value>,
}

/// Pick one tier from a weighted list via a single uniform draw.
pub fn pick_tier<R: Rng, T: Copy>(rng: &mut R, tiers: &[(f64, T)]) -> T {
    let total: f64 = tiers.iter().map(|(weight, _)| weight).sum();
    let mut draw = rng.gen_range(0.0..total);
    for (weight, value) in tiers {
        if draw < *weight {
            return *value;
        }
        draw -= weight;
    }
    tiers[tiers.len() - 1].1
}

/// Fabricate a plausible game result.
///
/// A skill tier seeds a target typing speed, the character volume is derived
/// from it with some jitter, then a typo tier decides how clean the run was.
/// The reported `wpm`/`accuracy` come from the final character counts, not
/// from the seed target.
pub fn synthesize<R: Rng>(rng: &mut R) -> GameStats {
    let time = DURATIONS[rng.gen_range(0..DURATIONS.len())];

    let (lo, hi) = pick_tier(rng, &WPM_TIERS);
    let wpm_target = rng.gen_range(lo..=hi);

    let mut total_chars = (f64::from(wpm_target) * 5.0 * (f64::from(time) / 60.0)) as i64;
    total_chars += rng.gen_range(-10..=10);
    let total_chars = total_chars.max(50);

    let (ratio_lo, ratio_hi) = pick_tier(rng, &ERROR_TIERS);
    let incorrect_ratio = rng.gen_range(ratio_lo..ratio_hi);

    let incorrect_chars = (total_chars as f64 * incorrect_ratio) as i64;
    let correct_chars = (total_chars - incorrect_chars).max(1);

    let wpm = (correct_chars as f64 / 5.0 / (f64::from(time) / 60.0)).round() as i64;
    let wpm = wpm.clamp(0, 300);

    let denom = correct_chars + incorrect_chars;
    let accuracy = (correct_chars as f64 / denom as f64 * 100.0).round() as u32;

    GameStats {
        wpm: wpm as u32,
        accuracy,
        time,
        correct_chars: correct_chars as u32,
        incorrect_chars: incorrect_chars as u32,
        progress_data: Vec::new(),
    }
}
