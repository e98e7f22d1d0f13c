//! Train/val partitioning.

use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};

use crate::error::ConvertError;
use crate::ir::ImageRecord;

pub const DEFAULT_TRAIN_RATIO: f64 = 0.9;

/// Split options.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitOptions {
    /// Fraction of images assigned to `train`, in `[0.0, 1.0]`.
    pub train_ratio: f64,
    /// Fixed seed for a reproducible shuffle. `None` draws from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            train_ratio: DEFAULT_TRAIN_RATIO,
            seed: None,
        }
    }
}

/// Disjoint, exhaustive train/val assignment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SplitAssignment {
    pub train: Vec<ImageRecord>,
    pub val: Vec<ImageRecord>,
}

impl SplitAssignment {
    pub fn len(&self) -> usize {
        self.train.len() + self.val.len()
    }

    pub fn is_empty(&self) -> bool {
        self.train.is_empty() && self.val.is_empty()
    }

    /// `(name, images)` pairs in output order.
    pub fn named(&self) -> [(&'static str, &[ImageRecord]); 2] {
        [("train", self.train.as_slice()), ("val", self.val.as_slice())]
    }
}

pub fn validate_split_options(opts: &SplitOptions) -> Result<(), ConvertError> {
    if !(0.0..=1.0).contains(&opts.train_ratio) {
        return Err(ConvertError::InvalidSplitRatio {
            ratio: opts.train_ratio,
        });
    }
    Ok(())
}

/// Number of train images for `total` images: `floor(total * ratio)`.
pub fn train_count(total: usize, train_ratio: f64) -> usize {
    let raw = (total as f64 * train_ratio).floor() as usize;
    raw.min(total)
}

/// Shuffle a copy of `images` and cut it into train and val.
///
/// The input order does not matter when a seed is given: images are sorted
/// before shuffling so the same set and seed always yield the same split.
pub fn split_images(
    images: &[ImageRecord],
    opts: &SplitOptions,
) -> Result<SplitAssignment, ConvertError> {
    validate_split_options(opts)?;

    let mut shuffled = images.to_vec();
    shuffled.sort();

    if let Some(seed) = opts.seed {
        let mut rng = StdRng::seed_from_u64(seed);
        shuffled.shuffle(&mut rng);
    } else {
        let mut rng = rand::rng();
        shuffled.shuffle(&mut rng);
    }

    let cut = train_count(shuffled.len(), opts.train_ratio);
    let val = shuffled.split_off(cut);

    Ok(SplitAssignment {
        train: shuffled,
        val,
    })
}
