//! Sankey flow graph
//!
//! Turns a [`CategoryAggregate`] into a renderer-agnostic directed graph.
//! Income categories flow into a central `Budget` node, expense categories
//! flow out of it. A category name containing `:` describes a longer path,
//! e.g. `Budget:Housing:Rent` for an expense category named `Housing:Rent`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::services::CategoryAggregate;

/// Label of the node every category flows into or out of
pub const BUDGET_NODE: &str = "Budget";

/// Separator between nodes of a flow path
pub const PATH_SEPARATOR: char = ':';

/// A node-link graph ready for a Sankey renderer
///
/// `source`, `target` and `value` are parallel arrays; entry `i` describes
/// the link from `labels[source[i]]` to `labels[target[i]]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowGraph {
    pub labels: Vec<String>,
    pub source: Vec<usize>,
    pub target: Vec<usize>,
    pub value: Vec<f64>,
}

/// One link of a [`FlowGraph`], resolved to labels
#[derive(Debug, Clone, PartialEq)]
pub struct FlowLink<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub value: f64,
}

impl FlowGraph {
    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    pub fn link_count(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn node_index(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    pub fn links(&self) -> impl Iterator<Item = FlowLink<'_>> {
        self.source
            .iter()
            .zip(&self.target)
            .zip(&self.value)
            .map(move |((s, t), v)| FlowLink {
                source: &self.labels[*s],
                target: &self.labels[*t],
                value: *v,
            })
    }

    /// Total weight of all links ending at `label`
    pub fn inflow_to(&self, label: &str) -> f64 {
        self.links()
            .filter(|link| link.target == label)
            .map(|link| link.value)
            .sum()
    }

    /// Total weight of all links starting at `label`
    pub fn outflow_from(&self, label: &str) -> f64 {
        self.links()
            .filter(|link| link.source == label)
            .map(|link| link.value)
            .sum()
    }
}

/// Builds a [`FlowGraph`] from a category aggregate
#[derive(Debug, Default)]
pub struct FlowGraphBuilder {
    labels: Vec<String>,
    index: HashMap<String, usize>,
    edges: Vec<((usize, usize), f64)>,
    edge_index: HashMap<(usize, usize), usize>,
}

impl FlowGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for an aggregate
    pub fn build(aggregate: &CategoryAggregate) -> FlowGraph {
        let mut builder = Self::new();
        for (category, value) in aggregate.values() {
            builder.add_flow(category, value);
        }
        builder.finish()
    }

    /// Route one category value through the budget node
    ///
    /// Non-negative values flow into the budget, negative values out of it.
    pub fn add_flow(&mut self, category: &str, value: f64) {
        let path = if value >= 0.0 {
            format!("{category}{PATH_SEPARATOR}{BUDGET_NODE}")
        } else {
            format!("{BUDGET_NODE}{PATH_SEPARATOR}{category}")
        };

        let nodes: Vec<usize> = path
            .split(PATH_SEPARATOR)
            .map(|label| self.node(label))
            .collect();

        for pair in nodes.windows(2) {
            self.accumulate((pair[0], pair[1]), value);
        }
    }

    /// Finish the graph; link weights become absolute values
    pub fn finish(self) -> FlowGraph {
        let mut graph = FlowGraph {
            labels: self.labels,
            ..FlowGraph::default()
        };

        for ((source, target), sum) in self.edges {
            graph.source.push(source);
            graph.target.push(target);
            graph.value.push(sum.abs());
        }

        debug!(
            nodes = graph.node_count(),
            links = graph.link_count(),
            "built flow graph"
        );
        graph
    }

    fn node(&mut self, label: &str) -> usize {
        if let Some(&idx) = self.index.get(label) {
            return idx;
        }
        let idx = self.labels.len();
        self.labels.push(label.to_string());
        self.index.insert(label.to_string(), idx);
        idx
    }

    fn accumulate(&mut self, pair: (usize, usize), value: f64) {
        match self.edge_index.get(&pair) {
            Some(&pos) => self.edges[pos].1 += value,
            None => {
                self.edge_index.insert(pair, self.edges.len());
                self.edges.push((pair, value));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DateWindow, Money};
    use chrono::NaiveDate;
    use std::collections::{BTreeMap, HashSet};

    fn aggregate(values: &[(&str, i64)]) -> CategoryAggregate {
        let date = |m| NaiveDate::from_ymd_opt(2025, m, 1).unwrap();
        let totals: BTreeMap<String, Money> = values
            .iter()
            .map(|(c, cents)| (c.to_string(), Money::from_cents(*cents)))
            .collect();
        let counts = totals.keys().map(|c| (c.clone(), 1)).collect();
        CategoryAggregate {
            window: DateWindow::new(date(1), date(12)),
            period_months: 1.0,
            normalized: false,
            totals,
            counts,
        }
    }

    #[test]
    fn test_income_and_expense_paths() {
        let graph = FlowGraphBuilder::build(&aggregate(&[
            ("Groceries", -5000),
            ("Salary", 300000),
        ]));

        // Sorted category order: Groceries first
        assert_eq!(graph.labels, vec!["Budget", "Groceries", "Salary"]);
        let links: Vec<_> = graph.links().collect();
        assert_eq!(
            links,
            vec![
                FlowLink {
                    source: "Budget",
                    target: "Groceries",
                    value: 50.0
                },
                FlowLink {
                    source: "Salary",
                    target: "Budget",
                    value: 3000.0
                },
            ]
        );
    }

    #[test]
    fn test_budget_reconciles_with_aggregate() {
        let agg = aggregate(&[
            ("Groceries", -12050),
            ("Other Expenses", -3000),
            ("Other Income", 1500),
            ("Rent", -90000),
            ("Salary", 300000),
        ]);
        let graph = FlowGraphBuilder::build(&agg);

        let expected: f64 = agg.values().map(|(_, v)| v.abs()).sum();
        let budget = graph.inflow_to(BUDGET_NODE) + graph.outflow_from(BUDGET_NODE);
        assert!((budget - expected).abs() < 1e-9);
        assert!((graph.inflow_to(BUDGET_NODE) - 3015.0).abs() < 1e-9);
    }

    #[test]
    fn test_labels_unique_and_weights_non_negative() {
        let graph = FlowGraphBuilder::build(&aggregate(&[
            ("A", -100),
            ("B", 200),
            ("C", -300),
            ("Housing:Rent", -400),
            ("Housing:Power", -50),
        ]));

        let unique: HashSet<_> = graph.labels.iter().collect();
        assert_eq!(unique.len(), graph.labels.len());
        assert!(graph.value.iter().all(|v| *v >= 0.0));
        assert_eq!(graph.source.len(), graph.value.len());
        assert_eq!(graph.target.len(), graph.value.len());
    }

    #[test]
    fn test_zero_value_keeps_edge() {
        let graph = FlowGraphBuilder::build(&aggregate(&[("Refunds", 0)]));

        assert_eq!(graph.labels, vec!["Refunds", "Budget"]);
        assert_eq!(graph.link_count(), 1);
        assert_eq!(graph.value[0], 0.0);
    }

    #[test]
    fn test_colon_in_category_extends_path() {
        let graph = FlowGraphBuilder::build(&aggregate(&[
            ("Housing:Power", -5000),
            ("Housing:Rent", -90000),
        ]));

        assert_eq!(graph.labels, vec!["Budget", "Housing", "Power", "Rent"]);
        // Both expenses share the Budget -> Housing link
        let housing = graph.node_index("Housing").unwrap();
        assert_eq!(graph.link_count(), 3);
        assert_eq!(graph.source[0], 0);
        assert_eq!(graph.target[0], housing);
        assert!((graph.value[0] - 950.0).abs() < 1e-9);
        assert!((graph.outflow_from("Housing") - 950.0).abs() < 1e-9);
    }

    #[test]
    fn test_repeated_pair_sums_signed_values() {
        let mut builder = FlowGraphBuilder::new();
        builder.add_flow("Gifts:Family", 100.0);
        builder.add_flow("Gifts:Family", -30.0);
        let graph = builder.finish();

        // Gifts -> Family is shared: 100 + (-30)
        assert_eq!(graph.labels, vec!["Gifts", "Family", "Budget"]);
        assert_eq!(graph.link_count(), 3);
        assert_eq!(graph.value, vec![70.0, 100.0, 30.0]);
    }

    #[test]
    fn test_groceries_statement_end_to_end() {
        use crate::models::{TransactionRecord, TransactionStore};
        use crate::services::{CategoryRuleSet, PeriodAggregator};

        let day = |d| NaiveDate::from_ymd_opt(2025, 1, d).unwrap();
        let store = TransactionStore::new(vec![
            TransactionRecord::simple(day(10), "SUPERMARKET XYZ", Money::from_cents(-5000)),
            TransactionRecord::simple(day(20), "cafe", Money::from_cents(-1000)),
        ]);
        let rules =
            CategoryRuleSet::from_json_str(r#"{"Groceries": ["supermarket"], "Other Expenses": []}"#)
                .unwrap();

        let labeled = rules.apply(&store);
        let aggregate = PeriodAggregator::new(&labeled)
            .aggregate(day(1), day(31), false)
            .unwrap();
        let graph = FlowGraphBuilder::build(&aggregate);

        assert_eq!(graph.labels, vec!["Budget", "Groceries", "Other Expenses"]);
        let links: Vec<_> = graph.links().collect();
        assert_eq!(
            links,
            vec![
                FlowLink {
                    source: "Budget",
                    target: "Groceries",
                    value: 50.0
                },
                FlowLink {
                    source: "Budget",
                    target: "Other Expenses",
                    value: 10.0
                },
            ]
        );
        assert_eq!(graph.outflow_from(BUDGET_NODE), 60.0);
    }

    #[test]
    fn test_empty_aggregate() {
        let graph = FlowGraphBuilder::build(&aggregate(&[]));
        assert!(graph.is_empty());
        assert_eq!(graph.inflow_to(BUDGET_NODE), 0.0);
    }

    #[test]
    fn test_serializes_parallel_arrays() {
        let graph = FlowGraphBuilder::build(&aggregate(&[("Salary", 100)]));
        let json = serde_json::to_value(&graph).unwrap();

        assert_eq!(json["labels"], serde_json::json!(["Salary", "Budget"]));
        assert_eq!(json["source"], serde_json::json!([0]));
        assert_eq!(json["target"], serde_json::json!([1]));
        assert_eq!(json["value"], serde_json::json!([1.0]));
    }
}
