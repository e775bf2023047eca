//! Per-document font-size statistics.

use std::collections::BTreeMap;

use crate::model::{TextBlock, DEFAULT_FONT_SIZE};

/// Points a size must exceed the body size by to count as heading-sized.
pub const HEADING_SIZE_MARGIN: f32 = 1.0;

/// A font size rounded to 0.1pt, stored in tenths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SizeKey(i32);

impl SizeKey {
    /// Round a size in points to one decimal.
    pub fn from_points(size: f32) -> Self {
        SizeKey((size * 10.0).round() as i32)
    }

    /// The rounded size in points.
    pub fn points(self) -> f32 {
        self.0 as f32 / 10.0
    }
}

/// Font statistics for title detection.
#[derive(Debug, Clone, PartialEq)]
pub struct FontProfile {
    most_common: SizeKey,
    /// Distinct sizes, largest first
    all_sizes: Vec<SizeKey>,
    size_distribution: BTreeMap<SizeKey, usize>,
    /// Indices of blocks grouped by their rounded average size
    blocks_by_size: BTreeMap<SizeKey, Vec<usize>>,
    synthetic: bool,
}

impl FontProfile {
    /// Build the profile of a sequence of blocks.
    ///
    /// Block indices recorded in the profile refer to the position of each
    /// block in `blocks`. With no span sizes at all the profile falls back
    /// to a single 12pt body size.
    pub fn from_blocks<'a, I>(blocks: I) -> Self
    where
        I: IntoIterator<Item = &'a TextBlock>,
    {
        let mut size_distribution: BTreeMap<SizeKey, usize> = BTreeMap::new();
        let mut first_seen: Vec<SizeKey> = Vec::new();
        let mut blocks_by_size: BTreeMap<SizeKey, Vec<usize>> = BTreeMap::new();

        for (index, block) in blocks.into_iter().enumerate() {
            for &size in &block.font_sizes {
                let key = SizeKey::from_points(size);
                let count = size_distribution.entry(key).or_insert(0);
                if *count == 0 {
                    first_seen.push(key);
                }
                *count += 1;
            }
            blocks_by_size
                .entry(SizeKey::from_points(block.avg_size))
                .or_default()
                .push(index);
        }

        if size_distribution.is_empty() {
            let default = SizeKey::from_points(DEFAULT_FONT_SIZE);
            return Self {
                most_common: default,
                all_sizes: vec![default],
                size_distribution: BTreeMap::from([(default, 1)]),
                blocks_by_size,
                synthetic: true,
            };
        }

        // Ties go to the size seen first.
        let mut most_common = first_seen[0];
        let mut best = 0;
        for key in &first_seen {
            let count = size_distribution[key];
            if count > best {
                best = count;
                most_common = *key;
            }
        }

        let all_sizes: Vec<SizeKey> = size_distribution.keys().rev().copied().collect();

        log::debug!(
            "Font profile: body {:.1}pt, {} distinct sizes",
            most_common.points(),
            all_sizes.len()
        );

        Self {
            most_common,
            all_sizes,
            size_distribution,
            blocks_by_size,
            synthetic: false,
        }
    }

    /// The modal (body) size in points.
    pub fn most_common_size(&self) -> f32 {
        self.most_common.points()
    }

    /// Distinct sizes in points, largest first. Never empty.
    pub fn all_sizes(&self) -> Vec<f32> {
        self.all_sizes.iter().map(|k| k.points()).collect()
    }

    /// Number of spans observed at a size.
    pub fn count_of(&self, size: f32) -> usize {
        self.size_distribution
            .get(&SizeKey::from_points(size))
            .copied()
            .unwrap_or(0)
    }

    /// Whether a size is strictly larger than body size plus the margin.
    pub fn is_heading_size(&self, size: f32) -> bool {
        let margin = SizeKey::from_points(HEADING_SIZE_MARGIN).0;
        SizeKey::from_points(size).0 > self.most_common.0 + margin
    }

    /// Heading-sized sizes, largest first.
    pub fn heading_sizes(&self) -> impl Iterator<Item = SizeKey> + '_ {
        self.all_sizes
            .iter()
            .copied()
            .filter(|k| self.is_heading_size(k.points()))
    }

    /// Whether any heading-sized text exists.
    pub fn has_heading_sizes(&self) -> bool {
        self.heading_sizes().next().is_some()
    }

    /// Indices of blocks whose rounded average size equals `size`.
    pub fn blocks_of_size(&self, size: SizeKey) -> &[usize] {
        self.blocks_by_size
            .get(&size)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether the profile is the 12pt default used when no sizes were seen.
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }
}
