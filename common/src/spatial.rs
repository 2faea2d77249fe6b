use bevy_math::DVec2;
use std::{collections::HashMap, hash::Hash};

type Bucket = (i32, i32);

fn bucket_of(pos: DVec2) -> Bucket {
    (pos.x.floor() as i32, pos.y.floor() as i32)
}

// ============================================================================
// Spatial Proximity Index
// ============================================================================

// Continuous 2D field of keyed objects, bucketed by unit cell so radius queries only look at the
// cells the query circle touches.
#[derive(Clone, Debug)]
pub struct SpatialIndex<K> {
    locations: HashMap<K, DVec2>,
    buckets: HashMap<Bucket, Vec<K>>,
}

impl<K> Default for SpatialIndex<K> {
    fn default() -> Self {
        Self {
            locations: HashMap::new(),
            buckets: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> SpatialIndex<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: K) -> bool {
        self.locations.contains_key(&key)
    }

    #[must_use]
    pub fn location_of(&self, key: K) -> Option<DVec2> {
        self.locations.get(&key).copied()
    }

    // Insert or move an object.
    pub fn insert(&mut self, key: K, pos: DVec2) {
        if let Some(old) = self.locations.insert(key, pos) {
            self.unlink(key, bucket_of(old));
        }
        self.buckets.entry(bucket_of(pos)).or_default().push(key);
    }

    pub fn remove(&mut self, key: K) -> Option<DVec2> {
        let pos = self.locations.remove(&key)?;
        self.unlink(key, bucket_of(pos));
        Some(pos)
    }

    pub fn clear(&mut self) {
        self.locations.clear();
        self.buckets.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.locations.keys().copied()
    }

    // Objects whose location lies within `radius` of `point` (inclusive).
    #[must_use]
    pub fn neighbors_within(&self, point: DVec2, radius: f64) -> Vec<K> {
        let (min_x, min_y) = bucket_of(point - DVec2::splat(radius));
        let (max_x, max_y) = bucket_of(point + DVec2::splat(radius));
        let radius_sq = radius * radius;

        let mut found = Vec::new();
        for bx in min_x..=max_x {
            for by in min_y..=max_y {
                let Some(keys) = self.buckets.get(&(bx, by)) else {
                    continue;
                };
                found.extend(keys.iter().copied().filter(|key| {
                    self.locations
                        .get(key)
                        .is_some_and(|pos| pos.distance_squared(point) <= radius_sq)
                }));
            }
        }
        found
    }

    // Objects located exactly at `point`.
    #[must_use]
    pub fn objects_at(&self, point: DVec2) -> Vec<K> {
        self.buckets
            .get(&bucket_of(point))
            .map(|keys| {
                keys.iter()
                    .copied()
                    .filter(|key| self.locations.get(key) == Some(&point))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn unlink(&mut self, key: K, bucket: Bucket) {
        if let Some(keys) = self.buckets.get_mut(&bucket) {
            keys.retain(|k| *k != key);
            if keys.is_empty() {
                self.buckets.remove(&bucket);
            }
        }
    }
}
