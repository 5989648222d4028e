//! Concurrency tests for the shared stores
//!
//! The vector store and the key-value tool store are shared by every request
//! handler, so parallel writers and readers must never lose or corrupt data.

use ragloom::domain::models::{Embedding, EntryId, TextSegment};
use ragloom::domain::ports::EmbeddingStore;
use ragloom::infrastructure::vector::InMemoryEmbeddingStore;
use ragloom::services::KeyValueStore;
use std::collections::HashSet;
use std::sync::Arc;

const WRITERS: usize = 8;
const PER_WRITER: usize = 50;
const DIM: usize = 4;

#[allow(clippy::cast_precision_loss)]
fn vector_for(writer: usize, i: usize) -> Embedding {
    Embedding::new(vec![1.0, writer as f32 + 1.0, i as f32 + 1.0, 0.5])
}

#[test]
fn test_parallel_inserts_and_queries_on_vector_store() {
    let store = Arc::new(InMemoryEmbeddingStore::new());
    store
        .add(Embedding::new(vec![1.0; DIM]), TextSegment::from_text("seed"))
        .unwrap();

    let ids: Vec<EntryId> = std::thread::scope(|scope| {
        let writers: Vec<_> = (0..WRITERS)
            .map(|writer| {
                let store = Arc::clone(&store);
                scope.spawn(move || {
                    let mut ids = Vec::new();
                    for i in 0..PER_WRITER {
                        if i % 2 == 0 {
                            let text = format!("writer {writer} entry {i}");
                            let id = store
                                .add(vector_for(writer, i), TextSegment::from_text(text))
                                .unwrap();
                            ids.push(id);
                        } else {
                            let batch = vec![(
                                vector_for(writer, i),
                                TextSegment::from_text(format!("writer {writer} entry {i}")),
                            )];
                            ids.extend(store.add_all(batch).unwrap());
                        }
                    }
                    ids
                })
            })
            .collect();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                scope.spawn(move || {
                    let query = Embedding::new(vec![1.0; DIM]);
                    for _ in 0..PER_WRITER {
                        let matches = store.find_relevant(&query, 5).unwrap();
                        assert!(!matches.is_empty());
                        assert!(matches.len() <= 5);
                        for pair in matches.windows(2) {
                            assert!(pair[0].score >= pair[1].score);
                        }
                    }
                })
            })
            .collect();

        for reader in readers {
            reader.join().unwrap();
        }
        writers
            .into_iter()
            .flat_map(|writer| writer.join().unwrap())
            .collect()
    });

    assert_eq!(ids.len(), WRITERS * PER_WRITER);
    assert_eq!(store.len(), WRITERS * PER_WRITER + 1);
    assert_eq!(store.dimension(), Some(DIM));

    let unique: HashSet<EntryId> = store.entries().iter().map(|entry| entry.id).collect();
    assert_eq!(unique.len(), store.len());
    assert!(ids.iter().all(|id| unique.contains(id)));

    // Each writer's entries keep their relative insertion order
    let entries = store.entries();
    for writer in 0..WRITERS {
        let prefix = format!("writer {writer} entry ");
        let order: Vec<usize> = entries
            .iter()
            .filter_map(|entry| entry.segment.text().strip_prefix(prefix.as_str()))
            .map(|i| i.parse().unwrap())
            .collect();
        assert_eq!(order, (0..PER_WRITER).collect::<Vec<_>>());
    }
}

#[test]
fn test_parallel_mismatched_batches_leave_store_consistent() {
    let store = Arc::new(InMemoryEmbeddingStore::new());
    store
        .add(Embedding::new(vec![1.0; DIM]), TextSegment::from_text("seed"))
        .unwrap();

    std::thread::scope(|scope| {
        for writer in 0..WRITERS {
            let store = Arc::clone(&store);
            scope.spawn(move || {
                for i in 0..PER_WRITER {
                    let bad = vec![
                        (vector_for(writer, i), TextSegment::from_text("good")),
                        (Embedding::new(vec![1.0; DIM + 1]), TextSegment::from_text("bad")),
                    ];
                    assert!(store.add_all(bad).is_err());
                }
            });
        }
    });

    assert_eq!(store.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_store_and_retrieve_on_key_value_store() {
    let kv = Arc::new(KeyValueStore::new());

    let tasks: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let kv = Arc::clone(&kv);
            tokio::spawn(async move {
                for i in 0..PER_WRITER {
                    let key = format!("w{writer}-k{i}");
                    kv.store(key.clone(), format!("value {i}"));
                    assert_eq!(kv.retrieve(&key).as_deref(), Some(format!("value {i}").as_str()));
                    kv.store("shared", format!("w{writer}"));
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(kv.len(), WRITERS * PER_WRITER + 1);
    let keys = kv.keys();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);

    let last_writer = kv.retrieve("shared").unwrap();
    assert!((0..WRITERS).any(|writer| last_writer == format!("w{writer}")));
}
