//! Plain-text and JSON renderings of a load plan.

use std::collections::BTreeMap;

use num_format::{Locale, ToFormattedString};

use loadforge_solver::LoadPlan;

/// Formats a quantity with thousands separators and two decimals.
///
/// # Examples
///
/// ```
/// use loadforge_console::format_amount;
///
/// assert_eq!(format_amount(1234567.891), "1,234,567.89");
/// assert_eq!(format_amount(-0.001), "0.00");
/// ```
pub fn format_amount(value: f64) -> String {
    let cents = (value * 100.0).round();
    if !cents.is_finite() || cents.abs() >= i64::MAX as f64 {
        return format!("{value:.2}");
    }
    let cents = cents as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!(
        "{sign}{}.{:02}",
        (cents / 100).to_formatted_string(&Locale::en),
        cents % 100
    )
}

/// Renders the loading report: the fleet, each vehicle's manifest and
/// leftover capacity, then fleet totals.
pub fn render_text(plan: &LoadPlan) -> String {
    let rule = "#".repeat(100);

    let mut fleet: BTreeMap<&str, usize> = BTreeMap::new();
    for manifest in &plan.slots {
        *fleet.entry(manifest.type_code.as_str()).or_default() += 1;
    }

    let mut lines: Vec<String> = vec![
        format!("Status: {}", plan.status),
        String::new(),
        format!("Total vehicles: {}", plan.slots.len()),
    ];
    lines.extend(fleet.iter().map(|(code, count)| format!("  {code:<10} x {count}")));
    lines.push(String::new());
    lines.push(format!("Total items: {}", plan.item_count));
    lines.push(String::new());

    for manifest in &plan.slots {
        lines.push(format!(
            "Vehicle {} [{}] - max weight: {} - max volume: {}",
            manifest.slot_id,
            manifest.type_code,
            format_amount(manifest.capacity.weight),
            format_amount(manifest.capacity.volume),
        ));
        lines.extend(manifest.items.iter().map(|item| {
            format!(
                "Item {} - weight: {} volume: {}",
                item.id,
                format_amount(item.weight),
                format_amount(item.volume),
            )
        }));
        lines.push(format!("Packed volume: {}", format_amount(manifest.packed.volume)));
        lines.push(format!("Packed weight: {}", format_amount(manifest.packed.weight)));
        lines.push(String::new());
        lines.push(format!("Left volume: {}", format_amount(manifest.leftover.volume)));
        lines.push(format!("Left weight: {}", format_amount(manifest.leftover.weight)));
        lines.push(String::new());
        lines.push(String::new());
    }

    lines.push(format!("Total packed weight: {}", format_amount(plan.total_packed.weight)));
    lines.push(format!("Total packed volume: {}", format_amount(plan.objective_value)));
    lines.push(format!(
        "Total items assigned: {}",
        plan.assigned_count.to_formatted_string(&Locale::en)
    ));
    if !plan.unassigned.is_empty() {
        let ids: Vec<String> = plan.unassigned.iter().map(|id| id.to_string()).collect();
        lines.push(format!("Items left behind: {}", ids.join(", ")));
    }
    lines.push(format!(
        "Fleet utilization: {:.1}% volume, {:.1}% weight",
        plan.volume_utilization * 100.0,
        plan.weight_utilization * 100.0,
    ));
    lines.push(String::new());
    lines.push(rule.clone());
    lines.push(format!("Total left volume: {}", format_amount(plan.total_leftover.volume)));
    lines.push(format!("Total left weight: {}", format_amount(plan.total_leftover.weight)));
    lines.push(rule);

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Renders the plan as pretty-printed JSON.
pub fn render_json(plan: &LoadPlan) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(plan)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use loadforge_config::LeftoverPolicy;
    use loadforge_core::{Solution, SolveStats, SolveStatus};
    use loadforge_solver::extract;
    use loadforge_test::scenario;

    use super::*;

    fn three_item_plan(policy: LeftoverPolicy) -> LoadPlan {
        let instance = scenario::three_items();
        let assignment = BTreeMap::from([(0, Some(0)), (1, Some(1)), (2, None)]);
        let solution = Solution::new(SolveStatus::Feasible, assignment, 30.0, SolveStats::default());
        extract(&solution, &instance.items, &instance.slots, policy).unwrap()
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(999.999), "1,000.00");
        assert_eq!(format_amount(2123456.12), "2,123,456.12");
        assert_eq!(format_amount(-1500.5), "-1,500.50");
        assert_eq!(format_amount(f64::NAN), "NaN");
    }

    #[test]
    fn test_text_report_sections() {
        let text = render_text(&three_item_plan(LeftoverPolicy::LoadedSlotsOnly));

        assert!(text.starts_with("Status: FEASIBLE\n"));
        assert!(text.contains("Total vehicles: 2"));
        assert!(text.contains("Total items: 3"));
        assert!(text.contains("Vehicle 1 [B] - max weight: 300.00 - max volume: 30.00"));
        assert!(text.contains("Item 1 - weight: 200.00 volume: 20.00"));
        assert!(text.contains("Total packed weight: 300.00"));
        assert!(text.contains("Total packed volume: 30.00"));
        assert!(text.contains("Total items assigned: 2"));
        assert!(text.contains("Items left behind: 2"));
        // A holds 100 kg / 10 cm³ of 150 / 15, B 200 / 20 of 300 / 30
        assert!(text.contains("Total left volume: 15.00"));
        assert!(text.contains("Total left weight: 150.00"));
        assert_eq!(text.matches(&"#".repeat(100)).count(), 2);
    }

    #[test]
    fn test_report_lists_items_per_vehicle() {
        let text = render_text(&three_item_plan(LeftoverPolicy::AllSlots));
        let a = text.find("Vehicle 0 [A]").unwrap();
        let b = text.find("Vehicle 1 [B]").unwrap();
        let item0 = text.find("Item 0 -").unwrap();
        let item1 = text.find("Item 1 -").unwrap();

        assert!(a < item0 && item0 < b);
        assert!(b < item1);
    }

    #[test]
    fn test_text_report_vehicle_block_layout() {
        let text = render_text(&three_item_plan(LeftoverPolicy::LoadedSlotsOnly));
        let lines: Vec<&str> = text.lines().collect();
        let start = lines
            .iter()
            .position(|l| l.starts_with("Vehicle 0 [A]"))
            .unwrap();

        assert_eq!(
            &lines[start..start + 9],
            &[
                "Vehicle 0 [A] - max weight: 150.00 - max volume: 15.00",
                "Item 0 - weight: 100.00 volume: 10.00",
                "Packed volume: 10.00",
                "Packed weight: 100.00",
                "",
                "Left volume: 5.00",
                "Left weight: 50.00",
                "",
                "",
            ]
        );
        assert!(text.ends_with(&format!("{}\n", "#".repeat(100))));
    }

    #[test]
    fn test_json_report() {
        let json = render_json(&three_item_plan(LeftoverPolicy::AllSlots)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["status"], "FEASIBLE");
        assert_eq!(value["assigned_count"], 2);
        assert_eq!(value["unassigned"], serde_json::json!([2]));
        assert_eq!(value["slots"][0]["items"][0]["id"], 0);
    }
}
