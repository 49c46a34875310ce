// extensions/pool.rs
//
// Free-list pool for expensive render resources (tessellated meshes).
// Entries are grouped by a quantized size bucket; ownership is tracked by
// index, never by flags on the resource itself.

use std::collections::HashMap;

/// Handle to a pooled entry. Valid until the entry is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolHandle(usize);

#[derive(Debug)]
struct PoolEntry<T> {
    bucket: u32,
    in_use: bool,
    item: T,
}

/// Arena of reusable resources keyed by approximate size.
#[derive(Debug)]
pub struct MeshPool<T> {
    entries: Vec<PoolEntry<T>>,
    free: HashMap<u32, Vec<usize>>,
    quantum: f32,
}

impl<T> MeshPool<T> {
    /// Create a pool whose buckets are `quantum` units wide.
    pub fn new(quantum: f32) -> Self {
        Self {
            entries: Vec::new(),
            free: HashMap::new(),
            quantum: if quantum > 0.0 { quantum } else { 1.0 },
        }
    }

    /// Bucket index for a size. Sizes round to the nearest bucket, minimum 1.
    pub fn bucket_for(&self, size: f32) -> u32 {
        let b = (size.max(0.0) / self.quantum).round();
        if b.is_finite() { (b as u32).max(1) } else { 1 }
    }

    /// Representative size of a bucket, passed to the factory.
    pub fn bucket_size(&self, bucket: u32) -> f32 {
        bucket as f32 * self.quantum
    }

    /// Take a free entry from the size's bucket, or build one with `make`.
    pub fn acquire(&mut self, size: f32, make: impl FnOnce(f32) -> T) -> PoolHandle {
        let bucket = self.bucket_for(size);
        if let Some(idx) = self.free.get_mut(&bucket).and_then(Vec::pop) {
            self.entries[idx].in_use = true;
            return PoolHandle(idx);
        }
        let item = make(self.bucket_size(bucket));
        self.entries.push(PoolEntry { bucket, in_use: true, item });
        PoolHandle(self.entries.len() - 1)
    }

    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        self.entries
            .get(handle.0)
            .filter(|e| e.in_use)
            .map(|e| &e.item)
    }

    /// Return an entry to its bucket's free list. False if it was not in use.
    pub fn release(&mut self, handle: PoolHandle) -> bool {
        match self.entries.get_mut(handle.0) {
            Some(entry) if entry.in_use => {
                entry.in_use = false;
                self.free.entry(entry.bucket).or_default().push(handle.0);
                true
            }
            _ => false,
        }
    }

    /// Release every entry, typically at the start of a frame.
    pub fn release_all(&mut self) {
        self.free.clear();
        for (idx, entry) in self.entries.iter_mut().enumerate() {
            entry.in_use = false;
            self.free.entry(entry.bucket).or_default().push(idx);
        }
    }

    /// Total entries ever allocated.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn in_use(&self) -> usize {
        self.entries.iter().filter(|e| e.in_use).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn similar_sizes_share_a_bucket() {
        let pool: MeshPool<()> = MeshPool::new(2.0);
        assert_eq!(pool.bucket_for(9.8), pool.bucket_for(10.4));
        assert_ne!(pool.bucket_for(10.0), pool.bucket_for(14.0));
        assert_eq!(pool.bucket_for(0.0), 1);
    }

    #[test]
    fn released_entries_are_reused() {
        let mut pool = MeshPool::new(1.0);
        let mut built = 0;
        let a = pool.acquire(5.0, |s| {
            built += 1;
            s
        });
        pool.release(a);
        let b = pool.acquire(5.2, |s| {
            built += 1;
            s
        });
        assert_eq!(a, b);
        assert_eq!(built, 1);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn other_bucket_allocates_new_entry() {
        let mut pool = MeshPool::new(1.0);
        let a = pool.acquire(5.0, |s| s);
        pool.release(a);
        let b = pool.acquire(9.0, |s| s);
        assert_ne!(a, b);
        assert_eq!(pool.get(b), Some(&9.0));
        assert_eq!(pool.get(a), None);
    }

    #[test]
    fn release_all_recycles_a_frame() {
        let mut pool = MeshPool::new(1.0);
        for _ in 0..3 {
            pool.acquire(4.0, |s| s);
        }
        pool.release_all();
        assert_eq!(pool.in_use(), 0);
        for _ in 0..3 {
            pool.acquire(4.0, |_| panic!("should reuse"));
        }
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.in_use(), 3);
    }

    #[test]
    fn double_release_is_rejected() {
        let mut pool = MeshPool::new(1.0);
        let a = pool.acquire(3.0, |s| s);
        assert!(pool.release(a));
        assert!(!pool.release(a));
    }
}
