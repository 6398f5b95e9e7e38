//! Concurrency tests for remap tables.
//!
//! Readers resolving identifiers while another thread reloads must only ever
//! observe a complete table: either every configured identifier resolves or
//! none does.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use replacements_core::{Identifier, InMemoryRegistry, Registry, RegistryProvider, RemapTable};

const ENTRY_COUNT: usize = 64;

fn id(s: &str) -> Identifier {
    Identifier::parse(s).unwrap()
}

fn build_table() -> (Arc<RemapTable<usize>>, Vec<String>, Vec<Identifier>) {
    let registry: InMemoryRegistry<usize> = (0..ENTRY_COUNT)
        .map(|i| (id(&format!("modb:target_{i}")), i))
        .collect();
    let table = Arc::new(RemapTable::<usize>::new("items", Arc::new(registry)));

    let entries = (0..ENTRY_COUNT)
        .map(|i| format!("moda:old_{i}=modb:target_{i}"))
        .collect();
    let olds = (0..ENTRY_COUNT)
        .map(|i| id(&format!("moda:old_{i}")))
        .collect();
    (table, entries, olds)
}

#[test]
fn test_readers_never_see_partial_reload() {
    let (table, entries, olds) = build_table();
    let olds = Arc::new(olds);
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let table = Arc::clone(&table);
            let olds = Arc::clone(&olds);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                while !done.load(Ordering::Acquire) {
                    // one snapshot per pass: all-or-nothing
                    let entries = table.entries();
                    assert!(
                        entries.is_empty() || entries.len() == ENTRY_COUNT,
                        "observed partial table of {} entries",
                        entries.len()
                    );
                    for old in olds.iter() {
                        if let Some(value) = table.resolve(old) {
                            assert_eq!(old.path(), format!("old_{value}"));
                        }
                    }
                }
            })
        })
        .collect();

    for round in 0..200 {
        if round % 2 == 0 {
            table.reload(&entries);
        } else {
            table.reload(Vec::<String>::new());
        }
    }
    done.store(true, Ordering::Release);

    for reader in readers {
        reader.join().expect("reader thread panicked");
    }
}

#[test]
fn test_reload_from_another_thread_is_visible() {
    let (table, entries, olds) = build_table();

    let writer = {
        let table = Arc::clone(&table);
        thread::spawn(move || table.reload(&entries))
    };
    let outcome = writer.join().expect("writer thread panicked");

    assert_eq!(outcome.applied, ENTRY_COUNT);
    assert!(olds.iter().all(|old| table.resolve(old).is_some()));
}

#[test]
fn test_overlapping_reloads_keep_the_later_one() {
    let registry: Arc<dyn Registry<usize>> = Arc::new(
        InMemoryRegistry::new()
            .with(id("modb:stale"), 1)
            .with(id("modb:fresh"), 2),
    );
    // the first snapshot request parks until the test releases it
    let gate = Arc::new(Barrier::new(2));
    let first_call = Arc::new(AtomicBool::new(true));
    let provider: Arc<dyn RegistryProvider<usize>> = {
        let gate = Arc::clone(&gate);
        Arc::new(move || {
            if first_call.swap(false, Ordering::AcqRel) {
                gate.wait();
                gate.wait();
            }
            Arc::clone(&registry)
        })
    };
    let table = Arc::new(RemapTable::<usize>::new("items", provider));

    let earlier = {
        let table = Arc::clone(&table);
        thread::spawn(move || table.reload(["moda:old=modb:stale"]))
    };
    gate.wait();

    let later = {
        let table = Arc::clone(&table);
        thread::spawn(move || table.reload(["moda:old=modb:fresh"]))
    };
    thread::sleep(Duration::from_millis(50));
    gate.wait();

    earlier.join().expect("earlier reload panicked");
    later.join().expect("later reload panicked");

    assert_eq!(table.resolve(&id("moda:old")), Some(2));
}
