#![cfg(test)]

// Property tests for ArrayList views, kept inside the crate next to the
// registry they exercise.

use crate::array_list::ArrayList;
use crate::error::CollectionError;
use proptest::prelude::*;

// Operations target a handle by pool index (modulo the pool size). Element
// indices run past typical lengths so out-of-range calls occur too.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, usize, u8),
    Set(usize, usize, u8),
    RemoveAt(usize, usize),
    Remove(usize, u8),
    RemoveAll(usize, Vec<u8>),
    RetainAll(usize, Vec<u8>),
    Add(usize, u8),
    Clear(usize),
    SubList(usize, usize, usize),
    DropHandle(usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    let h = 0usize..8;
    let i = 0usize..12;
    let e = 0u8..6;
    prop_oneof![
        4 => (h.clone(), i.clone(), e.clone()).prop_map(|(h, i, e)| Op::Insert(h, i, e)),
        2 => (h.clone(), i.clone(), e.clone()).prop_map(|(h, i, e)| Op::Set(h, i, e)),
        3 => (h.clone(), i.clone()).prop_map(|(h, i)| Op::RemoveAt(h, i)),
        1 => (h.clone(), e.clone()).prop_map(|(h, e)| Op::Remove(h, e)),
        1 => (h.clone(), proptest::collection::vec(e.clone(), 0..3)).prop_map(|(h, es)| Op::RemoveAll(h, es)),
        1 => (h.clone(), proptest::collection::vec(e.clone(), 0..4)).prop_map(|(h, es)| Op::RetainAll(h, es)),
        2 => (h.clone(), e).prop_map(|(h, e)| Op::Add(h, e)),
        1 => h.clone().prop_map(Op::Clear),
        3 => (h.clone(), i.clone(), i).prop_map(|(h, a, b)| Op::SubList(h, a, b)),
        1 => h.prop_map(Op::DropHandle),
    ]
}

// Absolute offset of handle `k` in the root, read from the parent chain.
fn offset(handles: &[(ArrayList<u8>, Option<usize>)], mut k: usize) -> usize {
    let mut off = 0;
    while let Some(parent) = handles[k].1 {
        off += handles[k].0.bounds().map(|r| r.start).unwrap_or(0);
        k = parent;
    }
    off
}

// Keep only the elements of `window` that satisfy `keep`.
fn rewrite(model: &mut Vec<u8>, window: core::ops::Range<usize>, keep: impl Fn(&u8) -> bool) {
    let tail = model.split_off(window.end);
    let kept: Vec<u8> = model.split_off(window.start).into_iter().filter(|x| keep(x)).collect();
    model.extend(kept);
    model.extend(tail);
}

// Property: every handle stays equal to its parent's slice over its bounds
// and the root equals a plain Vec model driven by root-translated edits.
// - Local edits on any view land at `offset + local` in the root.
// - Index errors use the issuing handle's own length and change nothing.
// - Views over fully removed ranges stay valid and empty.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_views_mirror_parent(init in proptest::collection::vec(0u8..6, 0..8), ops in proptest::collection::vec(arb_op(), 1..60)) {
        let mut model = init.clone();
        // (handle, parent index in `handles`)
        let mut handles: Vec<(ArrayList<u8>, Option<usize>)> = vec![(ArrayList::from(init), None)];
        let mut dropped: Vec<bool> = vec![false];

        for op in ops {
            // Dropped handles are detached roots the model does not track.
            let pick = |h: usize| {
                let k = h % handles.len();
                if dropped[k] { 0 } else { k }
            };
            match op {
                Op::Insert(h, i, e) => {
                    let k = pick(h);
                    let len = handles[k].0.len();
                    let off = offset(&handles, k);
                    match handles[k].0.insert(i, e) {
                        Ok(()) => {
                            prop_assert!(i <= len);
                            model.insert(off + i, e);
                        }
                        Err(err) => {
                            prop_assert!(i > len);
                            prop_assert_eq!(err, CollectionError::OutOfRange { index: i, len });
                        }
                    }
                }
                Op::Set(h, i, e) => {
                    let k = pick(h);
                    let off = offset(&handles, k);
                    let len = handles[k].0.len();
                    match handles[k].0.set(i, e) {
                        Ok(prev) => {
                            prop_assert_eq!(prev, model[off + i]);
                            model[off + i] = e;
                        }
                        Err(_) => prop_assert!(i >= len),
                    }
                }
                Op::RemoveAt(h, i) => {
                    let k = pick(h);
                    let off = offset(&handles, k);
                    let len = handles[k].0.len();
                    match handles[k].0.remove_at(i) {
                        Ok(removed) => prop_assert_eq!(removed, model.remove(off + i)),
                        Err(_) => prop_assert!(i >= len),
                    }
                }
                Op::Remove(h, e) => {
                    let k = pick(h);
                    let off = offset(&handles, k);
                    let pos = handles[k].0.index_of(&e);
                    let removed = handles[k].0.remove(&e);
                    prop_assert_eq!(removed, pos.is_some());
                    if let Some(p) = pos {
                        model.remove(off + p);
                    }
                }
                Op::RemoveAll(h, es) => {
                    let k = pick(h);
                    let off = offset(&handles, k);
                    let len = handles[k].0.len();
                    handles[k].0.remove_all(&es);
                    rewrite(&mut model, off..off + len, |x| !es.contains(x));
                }
                Op::RetainAll(h, es) => {
                    let k = pick(h);
                    let off = offset(&handles, k);
                    let len = handles[k].0.len();
                    handles[k].0.retain_all(&es);
                    rewrite(&mut model, off..off + len, |x| es.contains(x));
                }
                Op::Add(h, e) => {
                    let k = pick(h);
                    let off = offset(&handles, k);
                    let len = handles[k].0.len();
                    handles[k].0.add(e);
                    model.insert(off + len, e);
                }
                Op::Clear(h) => {
                    let k = pick(h);
                    let off = offset(&handles, k);
                    let len = handles[k].0.len();
                    handles[k].0.clear();
                    rewrite(&mut model, off..off + len, |_| false);
                }
                Op::SubList(h, a, b) => {
                    let k = pick(h);
                    let len = handles[k].0.len();
                    match handles[k].0.sub_list(a, b) {
                        Ok(v) => {
                            prop_assert!(a <= b && b <= len);
                            handles.push((v, Some(k)));
                            dropped.push(false);
                        }
                        Err(_) => prop_assert!(a > b || b > len),
                    }
                }
                Op::DropHandle(h) => {
                    // Replace the handle's list with a detached root so indices
                    // stay stable; only views are dropped.
                    let k = pick(h);
                    if k != 0 && !dropped[k] && !handles.iter().any(|(_, p)| *p == Some(k)) {
                        handles[k].0 = ArrayList::new();
                        handles[k].1 = None;
                        dropped[k] = true;
                    }
                }
            }

            prop_assert_eq!(handles[0].0.to_vec(), model.clone());
            for k in 1..handles.len() {
                if let Some(p) = handles[k].1 {
                    let r = handles[k].0.bounds().expect("view has bounds");
                    let parent = handles[p].0.to_vec();
                    prop_assert!(r.end <= parent.len());
                    prop_assert_eq!(handles[k].0.to_vec(), parent[r].to_vec());
                }
            }
        }
    }
}
