use std::sync::Arc;
use std::thread;

use tessel_mesh_cpu::MeshData;
use tessel_runtime::handoff;
use tessel_runtime::{AtomicBag, Pool};

#[test]
fn pool_reaches_steady_state() {
    let pool = Pool::new(|| Vec::<u32>::with_capacity(8));
    for _ in 0..3 {
        let a = pool.acquire();
        let b = pool.acquire();
        pool.release(a);
        pool.release(b);
    }
    assert_eq!(pool.created(), 2);
    assert_eq!(pool.available(), 2);
}

#[test]
fn pool_is_lifo() {
    let pool = Pool::new(|| 0u32);
    pool.release(1);
    pool.release(2);
    assert_eq!(pool.acquire(), 2);
    assert_eq!(pool.acquire(), 1);
    assert_eq!(pool.acquire(), 0);
    assert_eq!(pool.created(), 1);
}

#[test]
fn guard_returns_cleared_value_on_drop() {
    let pool = Pool::new(MeshData::new).with_reset(MeshData::clear);
    {
        let mut mesh = pool.guard();
        mesh.triangles_mut(tessel_blocks::MaterialId(4)).push(0);
        assert_eq!(mesh.submesh_count(), 1);
    }
    assert_eq!(pool.available(), 1);
    let again = pool.acquire();
    assert_eq!(again.submesh_count(), 0);
    assert_eq!(pool.created(), 1);
}

#[test]
fn guard_into_inner_keeps_value_out() {
    let pool = Pool::new(|| 5u8);
    let v = pool.guard().into_inner();
    assert_eq!(v, 5);
    assert_eq!(pool.available(), 0);
}

#[test]
fn prewarm_then_no_more_constructions() {
    let pool = Pool::new(|| 0u64);
    pool.prewarm(4);
    assert_eq!(pool.created(), 4);
    let items: Vec<u64> = (0..4).map(|_| pool.acquire()).collect();
    items.into_iter().for_each(|i| pool.release(i));
    assert_eq!(pool.created(), 4);
}

#[test]
fn pool_shared_across_threads() {
    let pool = Arc::new(Pool::new(|| vec![0u8; 64]));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let pool = pool.clone();
            thread::spawn(move || {
                for _ in 0..100 {
                    let v = pool.acquire();
                    pool.release(v);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert!(pool.created() <= 4);
    assert_eq!(pool.available(), pool.created());
}

#[test]
fn bag_drain_empties() {
    let bag = AtomicBag::new();
    (0..5).for_each(|i| bag.add(i));
    assert_eq!(bag.len(), 5);
    assert_eq!(bag.drain(), vec![4, 3, 2, 1, 0]);
    assert!(bag.is_empty());
}

#[test]
fn handoff_drains_in_send_order() {
    let (tx, rx) = handoff::channel();
    for i in 0..5 {
        tx.send(i).unwrap();
    }
    let mut got = Vec::new();
    assert_eq!(rx.drain(|i| got.push(i)), 5);
    assert_eq!(got, vec![0, 1, 2, 3, 4]);
    assert!(rx.is_empty());
    assert_eq!(rx.drain(|_| unreachable!()), 0);
}

#[test]
fn items_sent_during_drain_wait_for_next_call() {
    let (tx, rx) = handoff::channel();
    tx.send(1).unwrap();
    tx.send(2).unwrap();
    let n = rx.drain(|i| {
        tx.send(i * 10).unwrap();
    });
    assert_eq!(n, 2);
    assert_eq!(rx.len(), 2);
    assert_eq!(rx.try_recv(), Some(10));
    assert_eq!(rx.try_recv(), Some(20));
    assert_eq!(rx.try_recv(), None);
}

#[test]
fn send_after_receiver_dropped_returns_item() {
    let (tx, rx) = handoff::channel::<String>();
    let minted = rx.sender();
    drop(rx);
    assert_eq!(tx.send("a".into()), Err("a".to_string()));
    assert_eq!(minted.send("b".into()), Err("b".to_string()));
}

#[test]
fn many_producers_one_consumer() {
    let (tx, rx) = handoff::channel();
    let producers: Vec<_> = (0..4)
        .map(|p| {
            let tx = tx.clone();
            thread::spawn(move || {
                for i in 0..250 {
                    tx.send((p, i)).unwrap();
                }
            })
        })
        .collect();
    for h in producers {
        h.join().unwrap();
    }
    let mut last = [None::<i32>; 4];
    let n = rx.drain(|(p, i)| {
        // Per-producer order is preserved
        if let Some(prev) = last[p] {
            assert!(i > prev);
        }
        last[p] = Some(i);
    });
    assert_eq!(n, 1000);
}
