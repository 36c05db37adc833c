use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use canvas_rs_layout::layout::{
    OracleError, OracleGraph, Placement, Placements, Rect, build_oracle_graph,
};
use canvas_rs_layout::{
    Canvas, DagreOracle, Direction, LayoutConfig, LayoutError, LayoutOracle, LayoutReport, Side,
    layout_canvas, layout_json, parse_canvas,
};

/// Returns fixed top-left positions, the way a deterministic engine would.
struct ScriptedOracle(HashMap<&'static str, (f64, f64)>);

impl LayoutOracle for ScriptedOracle {
    fn layout(&self, graph: &OracleGraph) -> Result<Placements, OracleError> {
        Ok(graph
            .nodes
            .iter()
            .filter_map(|node| {
                let (x, y) = self.0.get(node.id.as_str())?;
                Some((
                    node.id.clone(),
                    Placement {
                        x: *x,
                        y: *y,
                        width: node.width,
                        height: node.height,
                    },
                ))
            })
            .collect())
    }
}

/// Echoes the scripted positions for every node, plus placements for ids
/// the graph never contained.
struct LooseOracle {
    positions: HashMap<&'static str, (f64, f64)>,
    strays: Vec<(&'static str, f64, f64)>,
}

impl LayoutOracle for LooseOracle {
    fn layout(&self, graph: &OracleGraph) -> Result<Placements, OracleError> {
        let mut placements = ScriptedOracle(self.positions.clone()).layout(graph)?;
        for (id, x, y) in &self.strays {
            let stray = Placement {
                x: *x,
                y: *y,
                width: 10.0,
                height: 10.0,
            };
            placements.insert(id.to_string(), stray);
        }
        Ok(placements)
    }
}

fn load_fixture(name: &str) -> Canvas {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    parse_canvas(&input).expect("fixture parse failed")
}

fn rect(canvas: &Canvas, id: &str) -> Rect {
    let node = canvas.node(id).unwrap_or_else(|| panic!("missing node {id}"));
    Rect::new(node.x, node.y, node.width, node.height)
}

/// Component extents, sorted along the primary axis.
fn component_extents(canvas: &Canvas, report: &LayoutReport, horizontal: bool) -> Vec<Rect> {
    let mut extents: BTreeMap<usize, (f64, f64, f64, f64)> = BTreeMap::new();
    for node in &canvas.nodes {
        let component = report.components[&node.id];
        let r = rect(canvas, &node.id);
        let entry = extents
            .entry(component)
            .or_insert((r.x, r.y, r.right(), r.bottom()));
        entry.0 = entry.0.min(r.x);
        entry.1 = entry.1.min(r.y);
        entry.2 = entry.2.max(r.right());
        entry.3 = entry.3.max(r.bottom());
    }
    let mut rects: Vec<Rect> = extents
        .values()
        .map(|(x0, y0, x1, y1)| Rect::new(*x0, *y0, x1 - x0, y1 - y0))
        .collect();
    if horizontal {
        rects.sort_by(|a, b| a.x.total_cmp(&b.x));
    } else {
        rects.sort_by(|a, b| a.y.total_cmp(&b.y));
    }
    rects
}

fn assert_chained(extents: &[Rect], horizontal: bool, gap: f64) {
    for pair in extents.windows(2) {
        let distance = if horizontal {
            pair[1].x - pair[0].right()
        } else {
            pair[1].y - pair[0].bottom()
        };
        assert_eq!(distance, gap, "components {:?} and {:?}", pair[0], pair[1]);
    }
}

fn assert_sides(canvas: &Canvas, from: Side, to: Side) {
    for edge in &canvas.edges {
        assert_eq!(edge.from_side, Some(from), "edge {}", edge.id);
        assert_eq!(edge.to_side, Some(to), "edge {}", edge.id);
    }
}

#[test]
fn disconnected_pairs_are_packed_with_fixed_gap() {
    let mut canvas = load_fixture("disconnected.canvas");
    let oracle = ScriptedOracle(HashMap::from([
        ("a", (0.0, 0.0)),
        ("b", (240.0, 0.0)),
        ("c", (0.0, 155.0)),
        ("d", (260.0, 155.0)),
    ]));
    let config = LayoutConfig::default();
    let report = layout_canvas(&mut canvas, Direction::Right, &config, &oracle).unwrap();

    assert_eq!(report.component_count, 2);
    assert_ne!(report.components["a"], report.components["c"]);

    // rebased oracle output: a (100,100) b (340,100) c (100,255) d (360,255)
    assert_eq!(rect(&canvas, "a"), Rect::new(100.0, 100.0, 100.0, 50.0));
    assert_eq!(rect(&canvas, "b").x - rect(&canvas, "a").x, 240.0);
    assert_eq!(rect(&canvas, "d").x - rect(&canvas, "c").x, 260.0);
    assert_eq!(rect(&canvas, "c").y, 255.0);
    assert_eq!(rect(&canvas, "c").x - rect(&canvas, "b").right(), 180.0);

    let extents = component_extents(&canvas, &report, true);
    assert_chained(&extents, true, 180.0);
    assert_sides(&canvas, Side::Right, Side::Left);
}

#[test]
fn disconnected_pairs_with_dagre() {
    for (direction, horizontal) in [(Direction::Right, true), (Direction::Down, false)] {
        let mut canvas = load_fixture("disconnected.canvas");
        let config = LayoutConfig::default();
        let report = layout_canvas(&mut canvas, direction, &config, &DagreOracle).unwrap();
        assert!(report.missing.is_empty());
        assert_eq!(report.placed, 4);
        assert_eq!(report.component_count, 2);
        let extents = component_extents(&canvas, &report, horizontal);
        assert_chained(&extents, horizontal, 180.0);
        for node in &canvas.nodes {
            assert!(node.x >= 100.0 && node.y >= 100.0, "{} not rebased", node.id);
        }
    }
}

#[test]
fn sibling_groups_are_pushed_apart() {
    let mut canvas = load_fixture("sibling_groups.canvas");
    let config = LayoutConfig::default();
    let report = layout_canvas(&mut canvas, Direction::Right, &config, &DagreOracle).unwrap();

    assert_eq!(report.component_count, 1);
    assert_eq!(report.components["left"], report.components["right"]);
    let left = rect(&canvas, "left");
    let right = rect(&canvas, "right");
    assert!(!left.overlaps(&right, config.overlap.gap));
    assert!(left.x < right.x);
    assert!(report.overlap_shifts >= 1);
}

#[test]
fn nested_groups_keep_their_snapshot() {
    let mut canvas = load_fixture("nested_groups.canvas");
    let config = LayoutConfig::default();
    let report = layout_canvas(&mut canvas, Direction::Down, &config, &DagreOracle).unwrap();

    let snapshot = &report.snapshot;
    assert_eq!(snapshot.depth["outer"], 0);
    assert_eq!(snapshot.depth["inner"], 1);
    assert_eq!(snapshot.child_nodes["inner"], vec!["api", "db"]);
    assert_eq!(snapshot.child_nodes["outer"], vec!["api", "db", "cache"]);
    assert_eq!(snapshot.child_groups["outer"], vec!["inner"]);

    assert_eq!(report.component_count, 1);
    for id in ["outer", "inner"] {
        let group = rect(&canvas, id);
        assert!(group.width >= config.groups.min_width);
        assert!(group.height >= config.groups.min_height);
        assert_eq!(group.x.fract(), 0.0);
        assert_eq!(group.y.fract(), 0.0);
    }
    // edges touching groups get sides too
    assert_sides(&canvas, Side::Bottom, Side::Top);
}

#[test]
fn groups_wrap_members_before_separation() {
    // Upward layouts skip overlap resolution and packing, so the refitted
    // rectangles are what comes out.
    let mut canvas = load_fixture("nested_groups.canvas");
    let config = LayoutConfig::default();
    let report = layout_canvas(&mut canvas, Direction::Up, &config, &DagreOracle).unwrap();
    assert!(report.components.is_empty());

    for (group, members) in [
        ("inner", vec!["api", "db"]),
        ("outer", vec!["inner", "api", "db", "cache"]),
    ] {
        let outer = rect(&canvas, group);
        for member in members {
            assert!(outer.contains(&rect(&canvas, member)), "{group} must contain {member}");
        }
    }
    assert_sides(&canvas, Side::Top, Side::Bottom);
}

#[test]
fn edgeless_canvas_is_chained_and_floored() {
    let canvas = load_fixture("no_edges.canvas");
    let config = LayoutConfig::default();
    let graph = build_oracle_graph(&canvas, Direction::Right, &config.oracle);
    assert_eq!(graph.edges.len(), 2);
    assert_eq!(graph.nodes[1].width, 10.0);

    let mut canvas = canvas;
    let report = layout_canvas(&mut canvas, Direction::Right, &config, &DagreOracle).unwrap();
    // synthetic chain edges never reach the document
    assert!(canvas.edges.is_empty());
    assert_eq!(report.component_count, 3);
    assert_chained(&component_extents(&canvas, &report, true), true, 180.0);
    // the document keeps its own sizes
    assert_eq!(rect(&canvas, "n2").width, 0.0);
}

#[test]
fn json_round_trip_keeps_payload() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("nested_groups.canvas");
    let input = std::fs::read_to_string(path).unwrap();
    let output = layout_json(&input, Direction::Right, &LayoutConfig::default()).unwrap();
    let canvas = parse_canvas(&output).unwrap();

    assert_eq!(canvas.nodes.len(), 6);
    assert_eq!(canvas.edges.len(), 4);
    let client = canvas.node("client").unwrap();
    assert_eq!(
        client.extra.get("url").and_then(|v| v.as_str()),
        Some("https://example.com")
    );
    assert_eq!(canvas.node("outer").unwrap().label.as_deref(), Some("Service"));
    assert!(output.contains("\"fromSide\": \"right\""));
}

#[test]
fn empty_canvas_reports_error() {
    let input = r#"{"nodes": [], "edges": []}"#;
    let err = layout_json(input, Direction::Right, &LayoutConfig::default()).unwrap_err();
    assert_eq!(err.to_string(), "canvas is empty");
}

#[test]
fn non_finite_oracle_output_is_rejected() {
    let mut canvas = load_fixture("disconnected.canvas");
    let before = canvas.clone();
    let oracle = LooseOracle {
        positions: HashMap::from([
            ("a", (f64::NAN, 0.0)),
            ("b", (240.0, 0.0)),
            ("c", (0.0, 155.0)),
            ("d", (260.0, 155.0)),
        ]),
        strays: vec![("ghost", -500.0, -500.0)],
    };
    let config = LayoutConfig::default();
    let err = layout_canvas(&mut canvas, Direction::Right, &config, &oracle).unwrap_err();

    assert!(matches!(
        err,
        LayoutError::Oracle(OracleError::Malformed { ref id, .. }) if id == "a"
    ));
    assert_eq!(canvas, before);
}

#[test]
fn unrequested_placements_do_not_shift_the_origin() {
    let mut canvas = load_fixture("disconnected.canvas");
    let oracle = LooseOracle {
        positions: HashMap::from([
            ("a", (0.0, 0.0)),
            ("b", (240.0, 0.0)),
            ("c", (0.0, 155.0)),
            ("d", (260.0, 155.0)),
        ]),
        strays: vec![("ghost", -500.0, -500.0), ("outer", -80.0, 40.0)],
    };
    let config = LayoutConfig::default();
    let report = layout_canvas(&mut canvas, Direction::Right, &config, &oracle).unwrap();

    assert_eq!(report.placed, 4);
    assert!(report.missing.is_empty());
    assert_eq!(rect(&canvas, "a"), Rect::new(100.0, 100.0, 100.0, 50.0));
    let min_y = canvas.nodes.iter().map(|n| n.y).fold(f64::INFINITY, f64::min);
    assert_eq!(min_y, 100.0);
}
