// ArrayList and view test suite.
//
// Core invariants exercised:
// - Index: valid indices are exactly 0..len on every list and view.
// - Synchronization: a view always equals its parent over its bounds.
// - Composition: edits on a grandchild reach the root re-indexed, and
//   edits on the root reach the grandchild.
// - Boundaries: inserts exactly at a view's upper bound are absorbed;
//   fully removed views stay valid and empty.
use misd_collections::{ArrayList, CollectionError};

fn list(s: &str) -> ArrayList<char> {
    s.chars().collect()
}

fn text(l: &ArrayList<char>) -> String {
    l.iter().collect()
}

// Test: insert shifts later elements right.
#[test]
fn scenario_insert_shifts_right() {
    let mut l = list("abcd");
    l.insert(1, 'x').unwrap();
    assert_eq!(text(&l), "axbcd");
}

// Test: a removal in the root inside a view's range shrinks the view.
#[test]
fn scenario_root_removal_inside_view() {
    let mut l = list("abcde");
    let v = l.sub_list(1, 4).unwrap();
    assert_eq!(text(&v), "bcd");
    assert_eq!(l.remove_at(2), Ok('c'));
    assert_eq!(text(&l), "abde");
    assert_eq!(text(&v), "bd");
    assert_eq!(v.bounds(), Some(1..3));
}

// Test: inserting at a view's lower bound lands at local index 0.
// Verifies: the upper bound grows by one.
#[test]
fn insert_at_lower_bound_grows_view() {
    let mut l = list("abcde");
    let v = l.sub_list(1, 3).unwrap();
    l.insert(1, 'x').unwrap();
    assert_eq!(v.get(0), Ok('x'));
    assert_eq!(v.bounds(), Some(1..4));
    assert_eq!(text(&v), "xbc");
}

// Test: a grandchild's local edits are visible in its parent and the root.
#[test]
fn nested_view_edits_reach_root() {
    let l = list("abcdef");
    let v = l.sub_list(1, 5).unwrap();
    let mut w = v.sub_list(1, 3).unwrap();
    assert_eq!(text(&w), "cd");

    w.insert(1, 'x').unwrap();
    assert_eq!(text(&w), "cxd");
    assert_eq!(text(&v), "bcxde");
    assert_eq!(text(&l), "abcxdef");

    assert_eq!(w.remove_at(0), Ok('c'));
    assert_eq!(text(&w), "xd");
    assert_eq!(text(&v), "bxde");
    assert_eq!(text(&l), "abxdef");

    w.set(1, 'D').unwrap();
    assert_eq!(text(&l), "abxDef");
}

// Test: root edits reach a grandchild, re-indexed through every level.
#[test]
fn root_edits_reach_grandchild() {
    let mut l = list("abcdef");
    let v = l.sub_list(2, 6).unwrap();
    let w = v.sub_list(1, 3).unwrap();
    assert_eq!(text(&w), "de");
    l.remove_at(0).unwrap();
    assert_eq!(w.bounds(), Some(1..3));
    assert_eq!(v.bounds(), Some(1..5));
    l.insert(2, 'y').unwrap();
    assert_eq!(text(&w), "yde");
    assert_eq!(text(&v), "cydef");
}

// Test: clear on a view removes only its range; siblings shift.
#[test]
fn clear_on_view_removes_its_range() {
    let l = list("abcdef");
    let mut v = l.sub_list(1, 4).unwrap();
    let s = l.sub_list(4, 6).unwrap();
    v.clear();
    assert!(v.is_empty());
    assert_eq!(text(&l), "aef");
    assert_eq!(text(&s), "ef");
    assert_eq!(s.bounds(), Some(1..3));
}

// Test: clear on an ancestor empties every descendant.
#[test]
fn clear_on_ancestor_empties_descendants() {
    let mut l = list("abcdef");
    let v = l.sub_list(1, 5).unwrap();
    let w = v.sub_list(1, 3).unwrap();
    l.clear();
    assert!(l.is_empty());
    assert!(v.is_empty());
    assert!(w.is_empty());
    assert_eq!(w.get(0), Err(CollectionError::OutOfRange { index: 0, len: 0 }));
}

// Test: an empty view stays empty until content lands on its boundary.
#[test]
fn empty_view_absorbs_boundary_insert() {
    let mut l = list("abc");
    let e = l.sub_list(1, 1).unwrap();
    l.insert(2, 'x').unwrap();
    assert!(e.is_empty());
    l.remove_at(0).unwrap();
    assert_eq!(e.bounds(), Some(0..0));
    l.insert(0, 'y').unwrap();
    assert_eq!(text(&e), "y");
    assert_eq!(text(&l), "ybxc");
}

// Test: a view whose range is fully removed stays valid and empty.
#[test]
fn view_over_removed_range_stays_valid() {
    let mut l = list("abcd");
    let v = l.sub_list(1, 3).unwrap();
    l.remove_at(1).unwrap();
    l.remove_at(1).unwrap();
    assert!(v.is_empty());
    assert_eq!(text(&l), "ad");
    l.insert(2, 'z').unwrap();
    assert!(v.is_empty());
}

// Test: index errors on a view use the view's own length.
// Verifies: failed calls leave the root and the view unchanged.
#[test]
fn view_errors_use_view_length() {
    let l = list("abcd");
    let mut v = l.sub_list(1, 3).unwrap();
    assert_eq!(v.get(2), Err(CollectionError::OutOfRange { index: 2, len: 2 }));
    assert_eq!(
        v.insert(3, 'x'),
        Err(CollectionError::OutOfRange { index: 3, len: 2 })
    );
    assert!(v.remove_at(2).unwrap_err().is_out_of_range());
    assert!(v.sub_list(0, 3).is_err());
    assert_eq!(text(&l), "abcd");
    assert_eq!(text(&v), "bc");
}

// Test: remove_all on a view leaves equal elements outside it alone.
#[test]
fn remove_all_on_view_is_scoped() {
    let l = list("abab");
    let mut v = l.sub_list(2, 4).unwrap();
    v.remove_all(&['a']);
    assert_eq!(text(&v), "b");
    assert_eq!(text(&l), "abb");
}

// Test: appending through a view inserts at the view's upper bound.
#[test]
fn add_on_view_inserts_before_tail() {
    let l = list("ad");
    let mut v = l.sub_list(0, 1).unwrap();
    v.add_all(['b', 'c']);
    assert_eq!(text(&v), "abc");
    assert_eq!(text(&l), "abcd");
}

// Test: construction copies; no aliasing with the source.
#[test]
fn copies_are_independent() {
    let source = vec!['a', 'b'];
    let mut l = ArrayList::from(source.clone());
    l.add('c');
    assert_eq!(source, vec!['a', 'b']);
    let mut copy = l.clone();
    copy.clear();
    assert_eq!(text(&l), "abc");
}

// Test: views keep working after sibling and ancestor handles drop.
#[test]
fn dropping_handles_keeps_others_live() {
    let l = list("abcdef");
    let v = l.sub_list(0, 4).unwrap();
    let mut w = v.sub_list(2, 4).unwrap();
    let sibling = l.sub_list(4, 6).unwrap();
    drop(v);
    drop(sibling);
    w.insert(0, 'x').unwrap();
    assert_eq!(text(&l), "abxcdef");
    drop(l);
    assert_eq!(text(&w), "xcd");
}
