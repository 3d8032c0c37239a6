//! Terminal views of aggregates, flow graphs and bar series

use super::report::{
    category_label, double_separator, format_amount, format_bar, format_percentage, separator,
    truncate,
};
use crate::reports::{BarChartSeries, FlowGraph, MonthlyBars};
use crate::services::CategoryAggregate;

const WIDTH: usize = 72;
const BAR_WIDTH: usize = 20;

/// Format an aggregate as a table with share-of-volume bars
pub fn format_aggregate(aggregate: &CategoryAggregate, symbol: &str) -> String {
    let mut output = String::new();

    let title = if aggregate.normalized {
        "Cashflow per Month"
    } else {
        "Cashflow"
    };
    output.push_str(&format!("{}: {} (bounds excluded)\n", title, aggregate.window));
    output.push_str(&double_separator(WIDTH));
    output.push('\n');
    output.push_str(&format!(
        "Period: {:.2} months, {} transactions\n\n",
        aggregate.period_months,
        aggregate.transaction_count()
    ));

    output.push_str(&format!(
        "{:<24} {:>14} {:>6} {:>6}  {}\n",
        "Category", "Amount", "Count", "%", "Share"
    ));
    output.push_str(&separator(WIDTH));
    output.push('\n');

    let volume: f64 = aggregate.values().map(|(_, v)| v.abs()).sum();
    let max = aggregate
        .values()
        .map(|(_, v)| v.abs())
        .fold(0.0, f64::max);

    for (category, value) in aggregate.values() {
        let pct = if volume > 0.0 {
            value.abs() / volume * 100.0
        } else {
            0.0
        };
        output.push_str(&format!(
            "{:<24} {:>14} {:>6} {:>6}  {}\n",
            truncate(category_label(category), 24),
            format_amount(value, symbol),
            aggregate.count(category),
            format_percentage(pct),
            format_bar(value.abs(), max, BAR_WIDTH)
        ));
    }

    output.push_str(&separator(WIDTH));
    output.push('\n');
    let income = aggregate.total_income();
    let expenses = aggregate.total_expenses();
    output.push_str(&format!("{:<24} {:>14}\n", "Income", format_amount(income, symbol)));
    output.push_str(&format!("{:<24} {:>14}\n", "Expenses", format_amount(expenses, symbol)));
    output.push_str(&format!(
        "{:<24} {:>14}\n",
        "Net",
        format_amount(income + expenses, symbol)
    ));

    output
}

/// Format a flow graph as a list of links
pub fn format_flow_graph(graph: &FlowGraph, symbol: &str) -> String {
    if graph.is_empty() {
        return "No flows.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{} nodes, {} links\n",
        graph.node_count(),
        graph.link_count()
    ));
    output.push_str(&separator(WIDTH));
    output.push('\n');

    for link in graph.links() {
        output.push_str(&format!(
            "{:<22} → {:<22} {:>14}\n",
            truncate(category_label(link.source), 22),
            truncate(category_label(link.target), 22),
            format_amount(link.value, symbol)
        ));
    }

    output
}

/// Format income and expense bars of an aggregate
pub fn format_bar_chart(series: &BarChartSeries, symbol: &str) -> String {
    let mut output = String::new();
    let max = series.max_value();

    for (title, bars) in [("INCOME", &series.income), ("EXPENSES", &series.expenses)] {
        output.push_str(&format!("{}\n", title));
        output.push_str(&separator(WIDTH));
        output.push('\n');

        if bars.is_empty() {
            output.push_str("  (none)\n");
        }
        for bar in bars {
            output.push_str(&format!(
                "  {:<22} {} {:>14}\n",
                truncate(category_label(&bar.category), 22),
                format_bar(bar.value, max, BAR_WIDTH),
                format_amount(bar.value, symbol)
            ));
        }
        output.push('\n');
    }

    output
}

/// Format monthly income and expenses side by side
pub fn format_monthly_bars(bars: &MonthlyBars, symbol: &str) -> String {
    let mut output = String::new();
    let max = bars.max_magnitude().abs().as_f64();

    output.push_str(&format!(
        "{:<8} {:>14} {:>14} {:>14}  {}\n",
        "Month", "Income", "Expenses", "Net", "In / Out"
    ));
    output.push_str(&separator(WIDTH + 10));
    output.push('\n');

    for month in &bars.months {
        output.push_str(&format!(
            "{:<8} {:>14} {:>14} {:>14}  {} {}\n",
            month.month.to_string(),
            month.income.format_with_symbol(symbol),
            month.expenses.format_with_symbol(symbol),
            month.net().format_with_symbol(symbol),
            format_bar(month.income.as_f64(), max, BAR_WIDTH / 2),
            format_bar(month.expenses.abs().as_f64(), max, BAR_WIDTH / 2)
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, TransactionRecord, TransactionStore};
    use crate::reports::FlowGraphBuilder;
    use crate::services::PeriodAggregator;
    use chrono::NaiveDate;

    fn sample_store() -> TransactionStore {
        let date = |m, d| NaiveDate::from_ymd_opt(2025, m, d).unwrap();
        TransactionStore::new(vec![
            TransactionRecord::simple(date(2, 27), "ACME", Money::from_cents(300000))
                .with_category("Salary"),
            TransactionRecord::simple(date(2, 3), "Miete", Money::from_cents(-90000))
                .with_category("Rent"),
            TransactionRecord::simple(date(1, 30), "ACME", Money::from_cents(300000))
                .with_category("Salary"),
            TransactionRecord::simple(date(1, 8), "REWE", Money::from_cents(-4550))
                .with_category("Groceries"),
        ])
    }

    fn sample_aggregate() -> CategoryAggregate {
        let date = |m, d| NaiveDate::from_ymd_opt(2025, m, d).unwrap();
        PeriodAggregator::new(&sample_store())
            .aggregate(date(1, 1), date(3, 1), false)
            .unwrap()
    }

    #[test]
    fn test_format_aggregate() {
        let output = format_aggregate(&sample_aggregate(), "€");

        assert!(output.starts_with("Cashflow: 2025-01-01..2025-03-01"));
        assert!(output.contains("Groceries"));
        assert!(output.contains("6000.00 €"));
        assert!(output.contains("-945.50 €"));
        assert!(output.contains("5054.50 €"));
    }

    #[test]
    fn test_format_flow_graph() {
        let graph = FlowGraphBuilder::build(&sample_aggregate());
        let output = format_flow_graph(&graph, "€");

        assert!(output.starts_with("4 nodes, 3 links"));
        assert!(output.contains("Salary"));
        assert!(output.contains("900.00 €"));
        assert_eq!(format_flow_graph(&FlowGraph::default(), "€"), "No flows.\n");
    }

    #[test]
    fn test_format_bar_chart() {
        let series = BarChartSeries::from_aggregate(&sample_aggregate());
        let output = format_bar_chart(&series, "€");

        let income = output.find("INCOME").unwrap();
        let expenses = output.find("EXPENSES").unwrap();
        let rent = output.find("Rent").unwrap();
        assert!(income < expenses && expenses < rent);
    }

    #[test]
    fn test_format_monthly_bars() {
        let date = |m, d| NaiveDate::from_ymd_opt(2025, m, d).unwrap();
        let bars = MonthlyBars::generate(&sample_store(), date(1, 1), date(3, 1)).unwrap();
        let output = format_monthly_bars(&bars, "€");

        assert!(output.contains("2025-01"));
        assert!(output.contains("2025-02"));
        assert!(output.contains("2954.50 €"));
    }
}
