mod common;

use arbor_tree::{NodeState, PrioritySelector, Tree};
use common::{ctx, logging_blackboard, ticked, Scripted};

use NodeState::{Failed, Running, Succeeded};

#[test]
fn children_stay_sorted_descending_by_priority() {
    let mut tree = Tree::new();
    let sel = tree.set_root(Box::new(PrioritySelector::new("prio")));
    let low = tree
        .add_child_with_priority(sel, Scripted::boxed("low", vec![]), 1)
        .unwrap();
    let high = tree
        .add_child_with_priority(sel, Scripted::boxed("high", vec![]), 3)
        .unwrap();
    let mid = tree
        .add_child_with_priority(sel, Scripted::boxed("mid", vec![]), 2)
        .unwrap();

    let node = tree.node(sel).unwrap();
    assert_eq!(node.children(), vec![high, mid, low]);
}

#[test]
fn priority_mutation_resorts_immediately() {
    let mut tree = Tree::new();
    let sel = tree.set_root(Box::new(PrioritySelector::new("prio")));
    let a = tree
        .add_child_with_priority(sel, Scripted::boxed("a", vec![]), 1)
        .unwrap();
    let b = tree
        .add_child_with_priority(sel, Scripted::boxed("b", vec![]), 2)
        .unwrap();

    tree.set_priority(sel, a, 5).unwrap();
    assert_eq!(tree.node(sel).unwrap().children(), vec![a, b]);

    let selector = tree.node_as::<PrioritySelector>(sel).unwrap();
    assert_eq!(selector.priority_of(a), Some(5));
    assert_eq!(selector.priority_of(b), Some(2));
}

#[test]
fn evaluation_always_restarts_at_the_top() {
    let mut tree = Tree::new();
    let sel = tree.set_root(Box::new(PrioritySelector::new("prio")));
    let high = tree
        .add_child_with_priority(sel, Scripted::boxed("high", vec![Failed, Succeeded]), 10)
        .unwrap();
    let low = tree
        .add_child_with_priority(sel, Scripted::boxed("low", vec![Running, Running]), 0)
        .unwrap();

    let mut bb = logging_blackboard();
    assert_eq!(tree.tick(&ctx(0), &mut bb), Running);
    // Unlike the resumable selector, the running `low` child does not pin
    // the scan: `high` is reconsidered first and wins.
    assert_eq!(tree.tick(&ctx(1), &mut bb), Succeeded);
    assert_eq!(ticked(&bb), &[high.raw(), low.raw(), high.raw()]);
}

#[test]
fn all_failed_children_fail_the_selector() {
    let mut tree = Tree::new();
    let sel = tree.set_root(Box::new(PrioritySelector::new("prio")));
    tree.add_child_with_priority(sel, Scripted::boxed("a", vec![Failed]), 2)
        .unwrap();
    tree.add_child_with_priority(sel, Scripted::boxed("b", vec![Failed]), 1)
        .unwrap();

    let mut bb = logging_blackboard();
    assert_eq!(tree.tick(&ctx(0), &mut bb), Failed);
}

#[test]
fn empty_priority_selector_fails() {
    let mut tree = Tree::new();
    tree.set_root(Box::new(PrioritySelector::new("prio")));

    let mut bb = logging_blackboard();
    assert_eq!(tree.tick(&ctx(0), &mut bb), Failed);
    assert!(ticked(&bb).is_empty());
}
