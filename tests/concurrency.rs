use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use chirpy::{
    ChirpEngine, RayonThreadPool, RecordStore, Result, SharedQueueThreadPool, StoreConfig,
    ThreadPool,
};
use crossbeam_utils::sync::WaitGroup;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

const CHIRPS: u64 = 64;

fn random_body(rng: &mut SmallRng, i: u64) -> String {
    let len = rng.gen_range(1..100);
    let filler: String = (0..len)
        .map(|_| rng.gen_range(b'a'..=b'z') as char)
        .collect();
    format!("{} {}", i, filler)
}

/// creates `CHIRPS` chirps concurrently on `pool` and checks that every one got its own id
fn concurrent_creates<P: ThreadPool>(pool: P) -> Result<()> {
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");
    let store = RecordStore::open(&StoreConfig::in_dir(temp_dir.path()))?;
    let mut rng = SmallRng::seed_from_u64(7);
    let failures = Arc::new(AtomicUsize::new(0));

    let wg = WaitGroup::new();
    for i in 0..CHIRPS {
        let store = store.clone();
        let body = random_body(&mut rng, i);
        let failures = Arc::clone(&failures);
        let wg = wg.clone();
        pool.spawn(move || {
            match store.create_chirp(body.clone(), i) {
                Ok(chirp) if chirp.body == body && chirp.author_id == i => {}
                _ => {
                    failures.fetch_add(1, Ordering::SeqCst);
                }
            }
            drop(wg);
        });
    }
    wg.wait();
    assert_eq!(failures.load(Ordering::SeqCst), 0);

    let chirps = store.list_chirps()?;
    let ids: BTreeSet<u64> = chirps.iter().map(|c| c.id).collect();
    assert_eq!(chirps.len() as u64, CHIRPS);
    assert_eq!(ids, (1..=CHIRPS).collect::<BTreeSet<_>>());
    // no lost writes: every author's chirp made it
    let authors: BTreeSet<u64> = chirps.iter().map(|c| c.author_id).collect();
    assert_eq!(authors, (0..CHIRPS).collect::<BTreeSet<_>>());

    Ok(())
}

#[test]
fn concurrent_creates_on_shared_queue_pool() -> Result<()> {
    concurrent_creates(SharedQueueThreadPool::new(8)?)
}

#[test]
fn concurrent_creates_on_rayon_pool() -> Result<()> {
    concurrent_creates(RayonThreadPool::new(8)?)
}

// users, tokens and deletions racing each other on plain threads
#[test]
fn mixed_concurrent_operations() -> Result<()> {
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");
    let store = RecordStore::open(&StoreConfig::in_dir(temp_dir.path()))?;
    for i in 0..16 {
        store.create_chirp(format!("seed {}", i), 0)?;
    }

    let handles: Vec<_> = (0..16u64)
        .map(|i| {
            let store = store.clone();
            thread::spawn(move || -> Result<()> {
                store.create_user(format!("user{}@x.com", i), "h".to_owned())?;
                // every thread races on the same email, exactly one can win
                let _ = store.create_user("shared@x.com".to_owned(), "h".to_owned());
                store.add_revoked_token(format!("token-{}", i % 4))?;
                store.delete_chirp(i + 1)?;
                store.create_chirp(format!("new {}", i), i)?;
                Ok(())
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker thread panicked")?;
    }

    let chirps = store.list_chirps()?;
    assert_eq!(chirps.len(), 16);
    assert!(chirps.iter().all(|c| c.id > 16));

    let user_ids: BTreeSet<u64> = (0..16)
        .map(|i| store.get_user_by_email(&format!("user{}@x.com", i)).map(|u| u.id))
        .collect::<Result<_>>()?;
    let shared = store.get_user_by_email("shared@x.com")?;
    assert!(!user_ids.contains(&shared.id));
    assert_eq!(user_ids.len(), 16);
    assert!(store.get_user_by_id(18).unwrap_err().is_not_found());

    for i in 0..4 {
        assert!(store.is_token_revoked(&format!("token-{}", i))?);
    }

    Ok(())
}

fn survives_panicking_job<P: ThreadPool>(pool: P) -> Result<()> {
    let counter = Arc::new(AtomicUsize::new(0));

    for _ in 0..4 {
        pool.spawn(|| panic!("job failed on purpose"));
    }

    let wg = WaitGroup::new();
    for _ in 0..20 {
        let counter = Arc::clone(&counter);
        let wg = wg.clone();
        pool.spawn(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            drop(wg);
        });
    }
    wg.wait();
    assert_eq!(counter.load(Ordering::SeqCst), 20);

    Ok(())
}

#[test]
fn shared_queue_pool_survives_panicking_job() -> Result<()> {
    survives_panicking_job(SharedQueueThreadPool::new(2)?)
}

#[test]
fn rayon_pool_survives_panicking_job() -> Result<()> {
    survives_panicking_job(RayonThreadPool::new(2)?)
}
