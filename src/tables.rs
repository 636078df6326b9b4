use chrono_tz::Tz;
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::core::{
    catalog::Product,
    comparison::ComparisonResult,
    plan::Plan,
    timeline::TimelineSlot,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

/// Today's cost per plan, plans without a result are shown as unknown.
pub fn build_comparison_table(catalog: &[Plan], result: &ComparisonResult) -> Table {
    let cheapest = result.costs.values().min().copied();
    let most_expensive = result.costs.values().max().copied();

    let mut table = new_table();
    table.set_header(vec!["Plan", "Cost", "Current"]);
    for plan in catalog {
        let is_current = plan.display_name == result.current_plan_name;
        let cost_cell = match result.costs.get(&plan.id) {
            Some(cost) => Cell::new(cost).set_alignment(CellAlignment::Right).fg(
                if Some(*cost) == cheapest {
                    Color::Green
                } else if Some(*cost) == most_expensive {
                    Color::Red
                } else {
                    Color::DarkYellow
                },
            ),
            None => Cell::new("unknown").add_attribute(Attribute::Dim),
        };
        table.add_row(vec![
            Cell::new(plan.display_name),
            cost_cell,
            if is_current { Cell::new("✓").fg(Color::Green) } else { Cell::new("") },
        ]);
    }
    table
}

pub fn build_summary_table(result: &ComparisonResult) -> Table {
    let mut table = new_table();
    table.add_row(vec![Cell::new("Current plan"), Cell::new(&result.current_plan_name)]);
    table.add_row(vec![
        Cell::new("Consumption"),
        Cell::new(result.total_consumption).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Readings"),
        Cell::new(result.reading_count).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Flexible rate"),
        match result.current_flexible_rate {
            Some(rate) => Cell::new(rate).set_alignment(CellAlignment::Right),
            None => Cell::new("unknown").add_attribute(Attribute::Dim),
        },
    ]);
    table
}

pub fn build_timeline_table(timeline: &[TimelineSlot], time_zone: Tz) -> Table {
    let mean = if timeline.is_empty() {
        0.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        let len = timeline.len() as f64;
        timeline.iter().map(|slot| slot.value_inc_vat).sum::<f64>() / len
    };

    let mut table = new_table();
    table.set_header(vec!["Date", "Start", "End", "£/kWh"]);
    for slot in timeline {
        let start = slot.start.with_timezone(&time_zone);
        table.add_row(vec![
            Cell::new(start.format("%b %d")).add_attribute(Attribute::Dim),
            Cell::new(start.format("%H:%M")),
            Cell::new(slot.end.with_timezone(&time_zone).format("%H:%M"))
                .add_attribute(Attribute::Dim),
            Cell::new(format!("{:.4}", slot.value_inc_vat))
                .set_alignment(CellAlignment::Right)
                .fg(if slot.value_inc_vat > mean { Color::Red } else { Color::Green }),
        ]);
    }
    table
}

pub fn build_products_table(products: &[Product]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Code", "Direction", "Name"]);
    for product in products {
        table.add_row(vec![
            Cell::new(&product.code),
            Cell::new(format!("{:?}", product.direction)).add_attribute(Attribute::Dim),
            Cell::new(&product.display_name),
        ]);
    }
    table
}
