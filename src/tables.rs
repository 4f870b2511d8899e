use average::Mean;
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    comparison::RankedPlan,
    core::simulator::CostReport,
    quantity::cost::Cost,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

#[must_use]
pub fn build_breakdown_table(report: &CostReport) -> Table {
    let mean_cost: Cost = {
        let estimate: Mean = report.monthly_breakdown.iter().map(|month| month.cost.0).collect();
        if estimate.is_empty() { Cost::ZERO } else { estimate.mean().into() }
    };

    let mut table = new_table();
    table.set_header(vec!["Month", "Usage", "Cost", "Demand", "Connection"]);
    for month in &report.monthly_breakdown {
        table.add_row(vec![
            Cell::new(month.month),
            Cell::new(month.usage).set_alignment(CellAlignment::Right),
            Cell::new(month.cost)
                .set_alignment(CellAlignment::Right)
                .fg(if month.cost > mean_cost { Color::Red } else { Color::Green }),
            Cell::new(month.demand_cost).set_alignment(CellAlignment::Right).fg(
                if month.demand_cost > Cost::ZERO { Color::DarkYellow } else { Color::Reset },
            ),
            month.connection_fee.map_or_else(
                || Cell::new("-").add_attribute(Attribute::Dim),
                |fee| Cell::new(fee).set_alignment(CellAlignment::Right),
            ),
        ]);
    }
    for discount in &report.discounts {
        table.add_row(vec![
            Cell::new(&discount.display_name).add_attribute(Attribute::Dim),
            Cell::new(format!("{:.1}%", discount.rate * 100.0)).set_alignment(CellAlignment::Right),
            Cell::new(-discount.amount).set_alignment(CellAlignment::Right).fg(Color::Green),
            Cell::new(""),
            Cell::new(""),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(report.total_kwh).set_alignment(CellAlignment::Right).add_attribute(Attribute::Bold),
        Cell::new(report.total_cost).set_alignment(CellAlignment::Right).add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
    ]);
    table
}

#[must_use]
pub fn build_ranking_table(ranking: &[RankedPlan]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["#", "Plan", "Brand", "Name", "Usage", "Total"]);
    for (rank, ranked) in (1..).zip(ranking) {
        table.add_row(vec![
            Cell::new(rank).add_attribute(Attribute::Dim),
            Cell::new(&ranked.plan_id),
            Cell::new(&ranked.brand_name),
            Cell::new(&ranked.display_name).add_attribute(Attribute::Dim),
            Cell::new(ranked.simulation_result.total_kwh).set_alignment(CellAlignment::Right),
            Cell::new(ranked.simulation_result.total_cost)
                .set_alignment(CellAlignment::Right)
                .fg(if rank == 1 { Color::Green } else { Color::Reset }),
        ]);
    }
    table
}
