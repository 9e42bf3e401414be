mod common;

use arbor_tree::{NodeState, RoundRobinSelector, Selector, Tree};
use common::{ctx, logging_blackboard, ticked, Scripted};

use NodeState::{Failed, Running, Succeeded};

#[test]
fn selector_short_circuits_on_first_success() {
    let mut tree = Tree::new();
    let sel = tree.set_root(Box::new(Selector::new("sel")));
    let a = tree
        .add_child(sel, Scripted::boxed("a", vec![Failed]))
        .unwrap();
    let b = tree
        .add_child(sel, Scripted::boxed("b", vec![Succeeded]))
        .unwrap();
    let _c = tree
        .add_child(sel, Scripted::boxed("c", vec![Failed]))
        .unwrap();

    let mut bb = logging_blackboard();
    assert_eq!(tree.tick(&ctx(0), &mut bb), Succeeded);
    // The third child is never ticked.
    assert_eq!(ticked(&bb), &[a.raw(), b.raw()]);
}

#[test]
fn selector_resumes_at_running_child_without_rescanning() {
    let mut tree = Tree::new();
    let sel = tree.set_root(Box::new(Selector::new("sel")));
    let a = tree
        .add_child(sel, Scripted::boxed("a", vec![Failed, Failed]))
        .unwrap();
    let b = tree
        .add_child(sel, Scripted::boxed("b", vec![Running, Succeeded]))
        .unwrap();

    let mut bb = logging_blackboard();
    assert_eq!(tree.tick(&ctx(0), &mut bb), Running);
    assert_eq!(tree.tick(&ctx(1), &mut bb), Succeeded);
    // `a` is not retried while `b` is mid-flight.
    assert_eq!(ticked(&bb), &[a.raw(), b.raw(), b.raw()]);
}

#[test]
fn selector_fails_after_exhausting_children() {
    let mut tree = Tree::new();
    let sel = tree.set_root(Box::new(Selector::new("sel")));
    tree.add_child(sel, Scripted::boxed("a", vec![Failed]))
        .unwrap();
    tree.add_child(sel, Scripted::boxed("b", vec![Failed]))
        .unwrap();

    let mut bb = logging_blackboard();
    assert_eq!(tree.tick(&ctx(0), &mut bb), Failed);
}

#[test]
fn empty_selector_fails_without_ticking_anything() {
    let mut tree = Tree::new();
    tree.set_root(Box::new(Selector::new("sel")));

    let mut bb = logging_blackboard();
    assert_eq!(tree.tick(&ctx(0), &mut bb), Failed);
    assert!(ticked(&bb).is_empty());
}

#[test]
fn round_robin_starts_next_cycle_where_it_stopped() {
    let mut tree = Tree::new();
    let sel = tree.set_root(Box::new(RoundRobinSelector::new("rr")));
    let a = tree
        .add_child(sel, Scripted::boxed("a", vec![Failed, Succeeded]))
        .unwrap();
    let b = tree
        .add_child(sel, Scripted::boxed("b", vec![Succeeded, Failed]))
        .unwrap();
    let c = tree
        .add_child(sel, Scripted::boxed("c", vec![Succeeded]))
        .unwrap();

    let mut bb = logging_blackboard();
    // First cycle stops at `b`.
    assert_eq!(tree.tick(&ctx(0), &mut bb), Succeeded);
    // Second cycle begins at `b`, not back at `a`.
    assert_eq!(tree.tick(&ctx(1), &mut bb), Succeeded);
    assert_eq!(ticked(&bb), &[a.raw(), b.raw(), b.raw(), c.raw()]);
}

#[test]
fn round_robin_resumes_its_running_child() {
    let mut tree = Tree::new();
    let sel = tree.set_root(Box::new(RoundRobinSelector::new("rr")));
    let a = tree
        .add_child(sel, Scripted::boxed("a", vec![Failed]))
        .unwrap();
    let b = tree
        .add_child(sel, Scripted::boxed("b", vec![Running, Succeeded]))
        .unwrap();

    let mut bb = logging_blackboard();
    assert_eq!(tree.tick(&ctx(0), &mut bb), Running);
    assert_eq!(tree.tick(&ctx(1), &mut bb), Succeeded);
    assert_eq!(ticked(&bb), &[a.raw(), b.raw(), b.raw()]);
}

#[test]
fn round_robin_fails_after_one_full_wrap() {
    let mut tree = Tree::new();
    let sel = tree.set_root(Box::new(RoundRobinSelector::new("rr")));
    let a = tree
        .add_child(sel, Scripted::boxed("a", vec![Succeeded, Failed]))
        .unwrap();
    let b = tree
        .add_child(sel, Scripted::boxed("b", vec![Failed]))
        .unwrap();
    let c = tree
        .add_child(sel, Scripted::boxed("c", vec![Failed]))
        .unwrap();

    let mut bb = logging_blackboard();
    assert_eq!(tree.tick(&ctx(0), &mut bb), Succeeded);
    // Cycle from `a` wraps through `b`, `c` and ends back at the start.
    assert_eq!(tree.tick(&ctx(1), &mut bb), Failed);
    assert_eq!(
        ticked(&bb),
        &[a.raw(), a.raw(), b.raw(), c.raw()]
    );
}

#[test]
fn empty_round_robin_fails() {
    let mut tree = Tree::new();
    tree.set_root(Box::new(RoundRobinSelector::new("rr")));

    let mut bb = logging_blackboard();
    assert_eq!(tree.tick(&ctx(0), &mut bb), Failed);
}
