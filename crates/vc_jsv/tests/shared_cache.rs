//! Kept in its own binary: resetting or overriding codecs elsewhere would
//! disturb the counts.

use core::any::TypeId;
use std::sync::{Arc, Barrier};
use std::thread;

use vc_jsv::derive::Typed;
use vc_jsv::dispatch;
use vc_jsv::{from_jsv, to_jsv};

#[derive(Typed, Default, Debug, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

#[test]
fn racing_threads_share_one_codec() {
    const THREADS: usize = 8;
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS as i32)
        .map(|n| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let text = to_jsv(&Point { x: n, y: -n });
                from_jsv::<Point>(&text).unwrap() == Some(Point { x: n, y: -n })
            })
        })
        .collect();

    assert!(handles.into_iter().all(|h| h.join().unwrap()));
    // One writer and one parser, both for JSV.
    assert_eq!(dispatch::cached_count(TypeId::of::<Point>()), 2);
}
