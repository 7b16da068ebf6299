#[cfg(test)]
mod tests {
    use chrono::NaiveTime;
    use servezone::prelude::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    fn noon() -> NaiveTime {
        NaiveTime::from_hms_opt(12, 0, 0).unwrap()
    }

    /// Grid of providers around (40, -74), all open all day, ids offset by `base`.
    fn dataset(base: u64, count: u64) -> Vec<Provider> {
        let open = NaiveTime::from_hms_opt(0, 0, 0).unwrap();
        let close = NaiveTime::from_hms_opt(23, 59, 59).unwrap();
        (0..count)
            .map(|i| {
                let lat = 40.0 + (i % 10) as f64 * 0.01;
                let lon = -74.0 + (i / 10) as f64 * 0.01;
                Provider::new(base + i, lat, lon, 3.0, open, close)
            })
            .collect()
    }

    fn hammer(engine: Arc<dyn ProviderIndex>) {
        let a = dataset(0, 100);
        let b = dataset(1_000, 60);

        let reference = RTreeIndex::new();
        reference.build(a.clone()).unwrap();
        let expected_a = reference.query(40.02, -73.98, Some(noon())).unwrap();
        reference.build(b.clone()).unwrap();
        let expected_b = reference.query(40.02, -73.98, Some(noon())).unwrap();
        assert!(!expected_a.is_empty());
        assert_ne!(expected_a, expected_b);

        engine.build(a.clone()).unwrap();
        let stop = Arc::new(AtomicBool::new(false));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let engine = Arc::clone(&engine);
                let stop = Arc::clone(&stop);
                let (expected_a, expected_b) = (expected_a.clone(), expected_b.clone());
                thread::spawn(move || {
                    let mut seen = 0u32;
                    while !stop.load(Ordering::Relaxed) || seen == 0 {
                        let ids = engine.query(40.02, -73.98, Some(noon())).unwrap();
                        assert!(
                            ids == expected_a || ids == expected_b,
                            "observed a mixed dataset: {ids:?}"
                        );
                        seen += 1;
                    }
                })
            })
            .collect();

        for round in 0..50 {
            let next = if round % 2 == 0 { b.clone() } else { a.clone() };
            engine.build(next).unwrap();
        }
        stop.store(true, Ordering::Relaxed);

        for reader in readers {
            reader.join().unwrap();
        }

        // Last build was dataset `a`
        assert_eq!(engine.query(40.02, -73.98, Some(noon())).unwrap(), expected_a);
    }

    #[test]
    fn test_rtree_rebuild_under_readers() {
        hammer(Arc::new(RTreeIndex::new()));
    }

    #[test]
    fn test_linear_rebuild_under_readers() {
        hammer(Arc::new(LinearIndex::new()));
    }

    #[test]
    fn test_cached_rebuild_under_readers() {
        hammer(Arc::new(CachingIndex::new(RTreeIndex::new())));
    }

    #[test]
    fn test_cache_counters_consistent_under_contention() {
        let engine = Arc::new(CachingIndex::new(RTreeIndex::new()));
        engine.build(dataset(0, 100)).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let engine = Arc::clone(&engine);
                thread::spawn(move || {
                    for i in 0..200 {
                        let lat = 40.0 + ((worker + i) % 10) as f64 * 0.005;
                        engine.query(lat, -73.99, Some(noon())).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = engine.stats();
        assert_eq!(stats.hits + stats.misses, 8 * 200);
        assert_eq!(stats.size, 10);
        assert!(stats.misses >= 10);
    }
}
