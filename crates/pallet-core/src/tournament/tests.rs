use super::*;
use crate::geometry::Rect;
use crate::postprocess::centering_offset;
use test_case::test_case;

fn item(
    rid: &str,
    width: f64,
    length: f64,
    required_quantity: Option<u32>,
    priority: bool,
) -> ItemType {
    ItemType {
        rid: rid.to_string(),
        width,
        length,
        required_quantity,
        priority,
    }
}

fn request(width: f64, length: f64, items: Vec<ItemType>) -> PackRequest {
    PackRequest::new(Bin { width, length }, items)
}

fn run(request: PackRequest) -> PackOutcome {
    Tournament::new(request).unwrap().run().unwrap()
}

fn packed(request: PackRequest) -> PackReport {
    match run(request) {
        PackOutcome::Packed(report) => report,
        PackOutcome::Infeasible(report) => panic!("unexpected infeasible: {report:?}"),
    }
}

fn rect(p: &Placement) -> Rect {
    Rect::new(p.x, p.y, p.width, p.height)
}

/// No overlap, containment and orientation validity.
fn assert_layout_valid(request: &PackRequest, report: &PackReport) {
    let bounds = Rect::new(0.0, 0.0, request.bin.width, request.bin.length);

    for (i, a) in report.placements.iter().enumerate() {
        assert!(bounds.contains(&rect(a)), "{a:?} leaves the bin");
        for b in &report.placements[i + 1..] {
            assert!(!rect(a).overlaps(&rect(b)), "{a:?} overlaps {b:?}");
        }

        let item = request.items.iter().find(|it| it.rid == a.rid).unwrap();
        if a.rotated {
            assert!(request.allow_rotation && !item.is_square());
            assert_eq!((a.width, a.height), (item.length, item.width));
        } else {
            assert_eq!((a.width, a.height), (item.width, item.length));
        }
    }
}

#[test]
fn test_standard_pallet_fits_six_boxes() {
    let req = request(1200.0, 800.0, vec![item("Box A", 320.0, 420.0, None, true)]);
    let report = packed(req.clone());

    assert!(report.total_placed >= 6);
    assert_eq!(report.total_placed, report.placements.len());
    assert_eq!(report.winning_combo.heuristic_name, "MaxRectsBlsf");
    assert_eq!(report.winning_combo.order_strategy_name, "Prioritized List");
    assert_eq!(report.winning_combo.to_string(), "MaxRectsBlsf / Prioritized List");
    assert_layout_valid(&req, &report);
}

#[test]
fn test_oversized_priority_item_is_infeasible() {
    let mut req = request(100.0, 100.0, vec![item("Box A", 150.0, 50.0, Some(1), true)]);
    req.allow_rotation = false;

    match run(req) {
        PackOutcome::Infeasible(report) => {
            assert_eq!(report.error, "Infeasible");
            assert_eq!(
                report.unmet_priority,
                vec![Shortfall {
                    rid: "Box A".into(),
                    required: 1,
                    placed: 0,
                }]
            );
        }
        PackOutcome::Packed(report) => panic!("expected infeasible, got {report:?}"),
    }
}

#[test]
fn test_duplicate_dimensions_are_reported() {
    let req = request(
        1000.0,
        1000.0,
        vec![
            item("first", 100.0, 100.0, None, false),
            item("second", 100.0, 100.0, None, false),
        ],
    );
    let report = packed(req);

    assert_eq!(
        report.duplicate_dimension_warning,
        Some(DuplicateDimensionWarning {
            rid_a: "first".into(),
            rid_b: "second".into(),
        })
    );
}

#[test]
fn test_item_filling_bin_is_placed_at_origin() {
    let req = request(500.0, 500.0, vec![item("A", 500.0, 500.0, Some(1), true)]);
    let report = packed(req);

    assert_eq!(report.total_placed, 1);
    assert_eq!(
        report.placements[0],
        Placement {
            rid: "A".into(),
            x: 0.0,
            y: 0.0,
            width: 500.0,
            height: 500.0,
            rotated: false,
        }
    );
    assert_eq!(centering_offset(&report.placements, &report.bin), (0.0, 0.0));
    assert_eq!(report.summary.waste_area, 0.0);
}

#[test]
fn test_rotated_units_keep_item_dimensions() {
    let req = request(250.0, 230.0, vec![item("Box A", 100.0, 50.0, None, false)]);
    let report = packed(req.clone());

    assert!(report.total_placed > 1);
    for p in &report.placements {
        assert!(
            (p.width, p.height) == (100.0, 50.0) || (p.width, p.height) == (50.0, 100.0),
            "unexpected size {} x {}",
            p.width,
            p.height
        );
    }
    assert!(report.placements.iter().any(|p| p.rotated));
    assert_layout_valid(&req, &report);

    let breakdown = &report.breakdown[0];
    assert_eq!(breakdown.total as usize, report.total_placed);
    assert_eq!(breakdown.standard + breakdown.rotated, breakdown.total);
    assert!(breakdown.rotated > 0);
}

#[test]
fn test_no_rotation_when_disallowed() {
    let mut req = request(250.0, 230.0, vec![item("Box A", 100.0, 50.0, None, false)]);
    req.allow_rotation = false;
    let report = packed(req.clone());

    assert!(report.placements.iter().all(|p| !p.rotated));
    assert_layout_valid(&req, &report);
}

#[test]
fn test_priority_shortage_is_infeasible() {
    let req = request(100.0, 100.0, vec![item("Box A", 60.0, 60.0, Some(2), true)]);

    match run(req) {
        PackOutcome::Infeasible(report) => {
            assert_eq!(report.unmet_priority.len(), 1);
            assert_eq!(report.unmet_priority[0].required, 2);
            assert_eq!(report.unmet_priority[0].placed, 1);
        }
        PackOutcome::Packed(report) => panic!("expected infeasible, got {report:?}"),
    }
}

#[test]
fn test_non_priority_shortage_is_a_soft_warning() {
    let req = request(
        200.0,
        100.0,
        vec![
            item("Box A", 100.0, 100.0, Some(1), true),
            item("Box B", 50.0, 100.0, Some(5), false),
        ],
    );
    let report = packed(req);

    assert_eq!(report.total_placed, 3);
    assert_eq!(
        report.soft_shortfalls,
        vec![Shortfall {
            rid: "Box B".into(),
            required: 5,
            placed: 2,
        }]
    );
    assert!(report.duplicate_dimension_warning.is_none());
}

#[test]
fn test_priority_quantities_hold_in_mixed_load() {
    let req = request(
        1200.0,
        1000.0,
        vec![
            item("filler", 150.0, 150.0, None, false),
            item("crate", 400.0, 300.0, Some(3), true),
            item("tube", 600.0, 100.0, Some(2), true),
        ],
    );
    let report = packed(req.clone());

    let count = |rid: &str| report.placements.iter().filter(|p| p.rid == rid).count();
    assert!(count("crate") >= 3);
    assert!(count("tube") >= 2);
    // required types are supplied exactly their quantity
    assert_eq!(count("crate"), 3);
    assert_eq!(count("tube"), 2);
    assert!(count("filler") <= DEFAULT_SUPPLY_CAP as usize);
    assert_layout_valid(&req, &report);

    // priority types are offered first
    assert_ne!(report.placements[0].rid, "filler");
}

#[test]
fn test_layout_is_centered() {
    let req = request(1000.0, 1000.0, vec![item("Box A", 300.0, 300.0, Some(2), true)]);
    let report = packed(req);

    assert_eq!(centering_offset(&report.placements, &report.bin), (0.0, 0.0));
    let min_x = report.placements.iter().map(|p| p.x).fold(f64::MAX, f64::min);
    let max_x = report.placements.iter().map(|p| p.x + p.width).fold(0.0, f64::max);
    assert_eq!(min_x, 1000.0 - max_x);
}

#[test_case(true; "parallel")]
#[test_case(false; "sequential")]
fn test_runs_are_deterministic(parallel: bool) {
    let mut req = request(
        1100.0,
        900.0,
        vec![
            item("a", 230.0, 170.0, None, false),
            item("b", 90.0, 310.0, Some(4), false),
            item("c", 55.0, 55.0, None, false),
        ],
    );
    req.parallel = parallel;

    let first = run(req.clone());
    let second = run(req.clone());
    assert_eq!(first, second);

    req.parallel = !parallel;
    assert_eq!(first, run(req));
}

#[test]
fn test_more_strategies_never_lose_units() {
    let items = vec![
        item("a", 230.0, 170.0, None, false),
        item("b", 90.0, 310.0, None, false),
    ];
    let mut narrow = request(1100.0, 900.0, items.clone());
    narrow.order_strategies = Some(vec![OrderStrategy::AsGiven]);
    let wide = request(1100.0, 900.0, items);

    let narrow = packed(narrow);
    let wide = packed(wide);
    assert!(wide.total_placed >= narrow.total_placed);
}

#[test]
fn test_combinations_follow_configured_order() {
    let req = request(100.0, 100.0, vec![item("a", 10.0, 20.0, None, false)]);
    let tournament = Tournament::new(req).unwrap();
    let combos = tournament.combinations();

    assert_eq!(combos.len(), 20);
    assert_eq!(combos[0], (PlacementHeuristic::BottomLeft, OrderStrategy::AsGiven));
    assert_eq!(combos[1], (PlacementHeuristic::BottomLeft, OrderStrategy::ByArea));
    assert_eq!(
        combos[19],
        (PlacementHeuristic::BestLongSideFit, OrderStrategy::ByPerimeter)
    );
}

#[test]
fn test_priority_items_run_prioritized_list_only() {
    let req = request(100.0, 100.0, vec![item("a", 10.0, 20.0, None, true)]);
    let tournament = Tournament::new(req).unwrap();

    assert_eq!(tournament.order_strategies(), &[OrderStrategy::AsGiven]);
    assert_eq!(tournament.combinations().len(), 4);
}

#[test]
fn test_first_combination_wins_ties() {
    // every heuristic fills the 2x2 grid
    let req = request(200.0, 200.0, vec![item("a", 100.0, 100.0, None, false)]);
    let report = packed(req);

    assert_eq!(report.total_placed, 4);
    assert_eq!(report.winning_combo.heuristic_name, "MaxRectsBl");
    assert_eq!(report.winning_combo.order_strategy_name, "Prioritized List");
}

#[test]
fn test_missing_labels_are_filled() {
    let req = request(
        300.0,
        300.0,
        vec![item("", 100.0, 100.0, Some(1), false), item(" ", 50.0, 100.0, Some(1), false)],
    );
    let tournament = Tournament::new(req).unwrap();

    let rids: Vec<&str> = tournament.request().items.iter().map(|i| i.rid.as_str()).collect();
    assert_eq!(rids, vec!["Box A", "Box B"]);
}

#[test]
fn test_default_label_sequence() {
    assert_eq!(default_label(0), "Box A");
    assert_eq!(default_label(25), "Box Z");
    assert_eq!(default_label(26), "Box AA");
    assert_eq!(default_label(27), "Box AB");
    assert_eq!(default_label(701), "Box ZZ");
    assert_eq!(default_label(702), "Box AAA");
}

#[test]
fn test_summary_accounts_for_placed_area() {
    let req = request(200.0, 100.0, vec![item("a", 50.0, 50.0, None, false)]);
    let report = packed(req);

    assert_eq!(report.total_placed, 8);
    assert_eq!(report.summary.bin_area, 20_000.0);
    assert_eq!(report.summary.used_area, 20_000.0);
    assert_eq!(report.summary.waste_percentage, 0.0);
}

#[test]
fn test_huge_required_quantity_reports_declared_shortfall() {
    let req = request(100.0, 100.0, vec![item("Box A", 100.0, 100.0, Some(u32::MAX), false)]);
    let report = packed(req);

    assert_eq!(report.total_placed, 1);
    assert_eq!(
        report.soft_shortfalls,
        vec![Shortfall {
            rid: "Box A".into(),
            required: u32::MAX,
            placed: 1,
        }]
    );
}

#[test]
fn test_area_bound_supply_cap() {
    let mut req = request(200.0, 100.0, vec![item("a", 50.0, 50.0, None, false)]);
    req.supply_cap = SupplyCap::AreaBound;
    let report = packed(req);

    assert_eq!(report.total_placed, 8);
}

#[test_case(vec![]; "no items")]
#[test_case(vec![item("a", 0.0, 10.0, None, false)]; "zero width")]
#[test_case(vec![item("a", 10.0, -1.0, None, false)]; "negative length")]
#[test_case(vec![item("a", f64::NAN, 10.0, None, false)]; "nan width")]
#[test_case(vec![item("a", 10.0, 10.0, Some(0), false)]; "zero quantity")]
#[test_case(vec![item("a", 10.0, 10.0, None, false), item("a", 20.0, 10.0, None, false)]; "duplicate label")]
#[test_case(vec![item("Box B", 10.0, 10.0, None, false), item("", 20.0, 10.0, None, false)]; "filled label collides")]
fn test_invalid_items_are_rejected(items: Vec<ItemType>) {
    let result = Tournament::new(request(100.0, 100.0, items));
    assert!(matches!(result, Err(PackError::InvalidInput(_))));
}

#[test_case(0.0, 100.0; "zero width")]
#[test_case(100.0, -5.0; "negative length")]
#[test_case(f64::INFINITY, 100.0; "infinite width")]
fn test_invalid_bin_is_rejected(width: f64, length: f64) {
    let result = Tournament::new(request(width, length, vec![item("a", 10.0, 10.0, None, false)]));
    assert!(matches!(result, Err(PackError::InvalidInput(_))));
}

#[test]
fn test_invalid_settings_are_rejected() {
    let mut req = request(100.0, 100.0, vec![item("a", 10.0, 10.0, None, false)]);
    req.heuristics.clear();
    assert!(matches!(Tournament::new(req), Err(PackError::InvalidInput(_))));

    let mut req = request(100.0, 100.0, vec![item("a", 10.0, 10.0, None, false)]);
    req.supply_cap = SupplyCap::Fixed(0);
    assert!(matches!(Tournament::new(req), Err(PackError::InvalidInput(_))));
}

#[test]
fn test_cancelled_run_returns_no_layout() {
    let req = request(100.0, 100.0, vec![item("a", 10.0, 10.0, None, false)]);
    let token = CancelToken::new();
    let tournament = Tournament::new(req).unwrap().with_cancel_token(token.clone());

    token.cancel();
    assert!(matches!(tournament.run(), Err(PackError::Cancelled)));
}

#[test]
fn test_expired_time_limit_cancels() {
    let mut req = request(100.0, 100.0, vec![item("a", 10.0, 10.0, None, false)]);
    req.time_limit_ms = Some(0);

    assert!(matches!(
        Tournament::new(req).unwrap().run(),
        Err(PackError::Cancelled)
    ));
}

#[test]
fn test_outcome_json_shapes() {
    let infeasible = run(request(100.0, 100.0, vec![item("Box A", 150.0, 150.0, Some(1), true)]));
    let json = serde_json::to_value(&infeasible).unwrap();
    assert_eq!(json["error"], "Infeasible");
    assert_eq!(json["unmet_priority"][0]["rid"], "Box A");
    assert!(json.get("placements").is_none());

    let packed = run(request(100.0, 100.0, vec![item("Box A", 50.0, 50.0, None, false)]));
    let json = serde_json::to_value(&packed).unwrap();
    assert_eq!(json["total_placed"], 4);
    assert!(json.get("error").is_none());
    assert!(json.get("duplicate_dimension_warning").is_none());

    let back: PackOutcome = serde_json::from_value(json).unwrap();
    assert_eq!(back, packed);
}
