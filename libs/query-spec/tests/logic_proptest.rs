//! Property-based checks for composite logic and paging.

mod common;

use common::{product, Product};
use proptest::prelude::*;
use query_spec::SpecificationBuilder;
use query_spec_core::ast::{FilterNode, Logic, Op};
use query_spec_core::PageSpec;

fn flag(active: bool) -> FilterNode {
    FilterNode::leaf("active", Op::Eq, active)
}

fn holds(node: FilterNode, item: &Product) -> bool {
    SpecificationBuilder::new()
        .filter(node)
        .build::<Product>()
        .unwrap()
        .evaluate(item)
}

proptest! {
    /// Composite nodes follow the boolean truth tables of their logic.
    #[test]
    fn composite_follows_truth_table(
        active in any::<bool>(),
        a in any::<bool>(),
        b in any::<bool>(),
    ) {
        let mut item = product("x", 1);
        item.active = active;
        // leaf truth: `active eq a` holds iff active == a
        let (ta, tb) = (active == a, active == b);

        for logic in [Logic::And, Logic::Or, Logic::Xor] {
            let node = FilterNode::composite(logic, vec![flag(a), flag(b)]);
            prop_assert_eq!(holds(node, &item), logic.combine(ta, tb));
        }
    }

    /// Paging never returns more than the page size, and consecutive pages
    /// never overlap.
    #[test]
    fn pages_partition_matches(
        len in 0usize..60,
        size in 1i64..15,
    ) {
        let items: Vec<Product> = (0..len)
            .map(|i| product(&format!("p{i}"), i as i64))
            .collect();
        let mut seen = Vec::new();
        let mut number = 1;
        loop {
            let spec = SpecificationBuilder::new()
                .page(PageSpec::new(number, size))
                .build::<Product>()
                .unwrap();
            let page = spec.apply(items.iter());
            prop_assert!(page.len() as i64 <= size);
            if page.is_empty() {
                break;
            }
            seen.extend(page.into_iter().map(|p| p.name.clone()));
            number += 1;
        }
        let expected: Vec<String> = items.iter().map(|p| p.name.clone()).collect();
        prop_assert_eq!(seen, expected);
    }

    /// Filtering never grows the collection.
    #[test]
    fn filter_never_grows(prices in prop::collection::vec(0i64..100, 0..40), threshold in 0i64..100) {
        let items: Vec<Product> = prices.iter().map(|p| product("x", *p)).collect();
        let spec = SpecificationBuilder::new()
            .filter(FilterNode::leaf("price", Op::Gte, threshold))
            .build::<Product>()
            .unwrap();
        let matched = spec.apply(items.iter());
        prop_assert!(matched.len() <= items.len());
        prop_assert_eq!(matched.len(), prices.iter().filter(|p| **p >= threshold).count());
    }
}
