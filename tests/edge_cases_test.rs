//! Edge case tests for the netting and propagation core.

use settle_engine::{
    double_entrify, double_entrify_by, merge, mirror, net, net_positions, settle_sorted,
    spanning_forest, sum_by, DebtNetter, Forest, Ledger, Link, SettleError,
};
use std::collections::HashMap;

fn positions(transfers: HashMap<(&'static str, &'static str), i64>) -> HashMap<&'static str, i64> {
    net_positions(&mirror(transfers))
}

// ==================== NETTING EDGE CASES ====================

#[test]
fn test_many_equal_debtors_single_creditor() {
    let balances = [("c", 30), ("d1", -10), ("d2", -10), ("d3", -10)];
    let transfers = net(balances).unwrap();

    assert_eq!(transfers.len(), 3);
    assert_eq!(positions(transfers), HashMap::from(balances));
}

#[test]
fn test_exact_matches_pair_up() {
    let balances = [("a", 7), ("b", -7), ("c", 2), ("d", -2)];
    let transfers = net(balances).unwrap();

    assert_eq!(
        transfers,
        HashMap::from([(("b", "a"), 7), (("d", "c"), 2)])
    );
}

#[test]
fn test_repeated_party_is_netted_after_summing() {
    let balances = sum_by([("a", 3), ("a", 2), ("b", -5)]);
    let mut sorted: Vec<_> = balances.into_iter().collect();
    sorted.sort();

    let transfers = net(sorted).unwrap();
    assert_eq!(transfers, HashMap::from([(("b", "a"), 5)]));
}

#[test]
fn test_large_amounts() {
    let big = i64::MAX / 4;
    let transfers = net([("a", big), ("b", -big)]).unwrap();
    assert_eq!(transfers[&("b", "a")], big);
}

#[test]
fn test_only_debtors_is_unbalanced() {
    assert!(matches!(
        net([("a", -1), ("b", -2)]),
        Err(SettleError::Unbalanced { .. })
    ));
}

#[test]
fn test_error_message() {
    let err = net([("a", 1)]).unwrap_err();
    assert!(err.to_string().contains("Amounts do not sum to zero"));
}

#[test]
fn test_combine_after_partial_payee_resolution() {
    let ledger: Ledger<&str> = [("me", -10), ("friend", 4), ("inbox", 0)].into_iter().collect();
    let mut netter = DebtNetter::new(ledger);

    let first = netter.combine_one(6, "shop").unwrap();
    let rest = netter.combine().unwrap();
    let transfers = merge([first, rest]);

    assert_eq!(
        positions(transfers),
        HashMap::from([("me", -10), ("friend", 4), ("shop", 6)])
    );
}

// ==================== SORTED NETTING EDGE CASES ====================

#[test]
fn test_sorted_and_greedy_agree_on_positions() {
    let balances = [("a", 9), ("b", 4), ("c", -7), ("d", -6), ("e", 0)];

    let greedy = positions(net(balances).unwrap());
    let sorted = positions(settle_sorted(balances).unwrap());

    assert_eq!(greedy, sorted);
    assert_eq!(greedy, sum_by(balances));
}

#[test]
fn test_sorted_empty_and_all_zero() {
    assert!(settle_sorted(Vec::<(&str, i64)>::new()).unwrap().is_empty());
    assert!(settle_sorted([("a", 0), ("b", 0)]).unwrap().is_empty());
}

// ==================== FOREST EDGE CASES ====================

#[test]
fn test_reroot_twice_restores_forest() {
    let mut forest = Forest::from_edges([(1, 0), (2, 0), (3, 1), (4, 3), (5, 2)]).unwrap();
    let original = forest.to_map();

    forest.reroot(&4).unwrap();
    assert_eq!(forest.roots().collect::<Vec<_>>(), vec![&4]);
    forest.reroot(&0).unwrap();

    assert_eq!(forest.to_map(), original);
}

#[test]
fn test_reroot_only_touches_its_tree() {
    let mut forest = Forest::from_edges([("a", "r1"), ("b", "r2")]).unwrap();
    forest.reroot(&"a").unwrap();

    assert_eq!(forest.parent(&"r1"), Some(&"a"));
    assert_eq!(forest.parent(&"b"), Some(&"r2"));
}

#[test]
fn test_spanning_forest_then_reroot() {
    let links = vec![
        Link { id: 1, from: "a", to: "b" },
        Link { id: 2, from: "b", to: "c" },
    ];
    let mut forest = spanning_forest(["c", "b", "a"], links).unwrap();
    forest.reroot(&"c").unwrap();

    assert_eq!(forest.parent(&"b"), Some(&"c"));
    assert_eq!(forest.parent(&"a"), Some(&"b"));
}

// ==================== PROPAGATION EDGE CASES ====================

#[test]
fn test_propagation_empty_forest_is_noop() {
    let forest: Forest<&str> = Forest::new();
    let mut amounts = HashMap::from([("a", 5)]);

    assert!(double_entrify_by(&mut amounts, &forest).unwrap().is_empty());
    assert_eq!(amounts["a"], 5);
}

#[test]
fn test_propagation_wide_tree() {
    let edges: Vec<(u32, u32)> = (1..=50).map(|child| (child, 0)).collect();
    let forest = Forest::from_edges(edges).unwrap();
    let mut amounts: HashMap<u32, i64> = (1..=50).map(|n| (n, n as i64)).collect();

    let transfers = double_entrify_by(&mut amounts, &forest).unwrap();

    assert_eq!(transfers.len(), 50);
    assert_eq!(amounts[&0], (1..=50).sum::<i64>());
    assert!((1..=50).all(|n| amounts[&n] == 0));
}

#[test]
fn test_full_pipeline_books_to_zero() {
    let forest = Forest::from_edges([("me", "household"), ("partner", "household")]).unwrap();
    let people = HashMap::from([("me", -25), ("partner", 10)]);

    let transfers = double_entrify(&"me", people, forest, [("landlord", 15)]).unwrap();
    let entries = mirror(transfers);

    assert_eq!(entries.iter().map(|e| e.amount).sum::<i64>(), 0);
    assert_eq!(
        net_positions(&entries),
        HashMap::from([("me", -25), ("partner", 10), ("landlord", 15)])
    );
}
