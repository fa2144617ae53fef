//! End-to-end topology tests: preset construction, stream-port insertion,
//! directive dedup, and the exported artifact layout.

use weft_arch::{
    presets, write_architecture, Aggregate, ArchError, Directive, PortSides, ProcessingElement,
    RfDestination, StreamPort,
};

fn render(agg: &Aggregate) -> String {
    let mut buf = Vec::new();
    write_architecture(agg, &mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn edges_require_registered_endpoints() {
    let mut agg = Aggregate::new();
    let a = agg.add_element(ProcessingElement::new(), 0, 0).unwrap();
    let b = agg.add_element(ProcessingElement::new(), 1, 0).unwrap();
    agg.add_interconnect(a, b, 1, false, false).unwrap();

    agg.remove_element_by_id(b);
    let err = agg.add_interconnect(a, b, 1, false, false).unwrap_err();
    assert!(matches!(err, ArchError::UnknownElement(_)));
    // The cascade also dropped the existing edge into b.
    assert_eq!(agg.interconnect_count(), 0);
}

#[test]
fn exported_grid_dimensions_track_placement_extents() {
    let mut agg = Aggregate::new();
    agg.add_element(ProcessingElement::new(), 0, 0).unwrap();
    agg.add_element(ProcessingElement::new(), 4, 2).unwrap();
    // 1 + max row = 3 rows, 1 + max col = 5 columns.
    assert!(render(&agg).starts_with("3 5 "));

    agg.remove_element(4, 2);
    assert!(render(&agg).starts_with("1 1 "));
}

#[test]
fn repeated_generators_never_duplicate_directives() {
    let mut agg = presets::standard_grid(2, 2, 1, false, None).unwrap();
    agg.connect_grid_standard(1, false);
    agg.connect_grid_standard(1, false);
    let rendered: Vec<String> = agg.directives().iter().map(Directive::render).collect();
    assert_eq!(rendered, vec!["LEFT_TO_RIGHT 1", "UP_TO_DOWN 1"]);

    // A different latency is a distinct entry, not a duplicate.
    agg.connect_grid_standard(2, false);
    assert_eq!(agg.directives().len(), 4);
}

#[test]
fn left_insertion_shifts_grid_one_column_right() {
    let mut agg = Aggregate::new();
    let mut ids = Vec::new();
    for row in 0..2 {
        for col in 0..3 {
            ids.push(agg.add_element(ProcessingElement::new(), col, row).unwrap());
        }
    }
    let before: Vec<(i32, i32)> = ids.iter().map(|&id| agg.position(id).unwrap()).collect();

    agg.add_stream_ports(PortSides::LEFT, 1, true, false, false).unwrap();

    for (&id, &(col, row)) in ids.iter().zip(&before) {
        assert_eq!(agg.position(id), Some((col + 1, row)));
    }
    let ports: Vec<_> = (0..2)
        .filter_map(|row| agg.element_at(0, row))
        .filter(|&id| agg.element(id).unwrap().is_stream())
        .collect();
    assert_eq!(ports.len(), 2);
    assert_eq!(agg.size(), 8);
}

#[test]
fn bidirectional_standard_grid_logs_four_directions() {
    // Directions interleave per axis: each forward flag is followed by its
    // reverse, regardless of grid size.
    for (rows, cols) in [(2, 2), (3, 5)] {
        let agg = presets::standard_cgra(rows, cols, 1, false, None, false).unwrap();
        let rendered: Vec<String> = agg.directives().iter().map(Directive::render).collect();
        assert_eq!(
            rendered,
            vec!["LEFT_TO_RIGHT 1", "RIGHT_TO_LEFT 1", "UP_TO_DOWN 1", "DOWN_TO_UP 1"]
        );
    }
}

#[test]
fn ringed_cgra_exports_expected_artifact() {
    let mut agg = presets::standard_cgra(2, 3, 1, false, Some(PortSides::ALL), false).unwrap();
    for op in ["ADD", "SUB", "MUL", "ASHR"] {
        agg.add_operation_to_all_pes(op);
    }
    agg.set_all_register_file_sizes(4);
    agg.set_all_output_registers(1);
    agg.add_rf_read_ports_to_all_pes(RfDestination::FunctionalUnit, 1);
    agg.add_rf_read_ports_to_all_pes(RfDestination::OutputRegisters, 1);

    let text = render(&agg);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "4 5 128 128 4");
    // Top border: input ports over the PE columns, pruned corners empty.
    assert_eq!(lines[1], "-1 -2 -2 -2 -1 ");
    // Interior rows: left input column, PEs, right output column.
    assert_eq!(lines[2], "-2 4 4 4 -3 ");
    assert_eq!(lines[3], "-2 4 4 4 -3 ");
    // Bottom border: output ports, pruned corners empty.
    assert_eq!(lines[4], "-1 -3 -3 -3 -1 ");

    assert!(text.contains("1 1 1 4 1 1 0 1\n"));
    assert!(text.contains("2 3 1 4 1 1 0 1\n"));
    assert!(text.contains("1 2 ASHR\n"));
    assert!(text.ends_with(
        "LEFT_TO_RIGHT 1\nRIGHT_TO_LEFT 1\nUP_TO_DOWN 1\nDOWN_TO_UP 1\nSTREAM_CONN 0\n"
    ));
}

#[test]
fn explicit_edits_survive_alongside_presets() {
    let mut agg = presets::standard_grid(2, 2, 1, false, None).unwrap();
    agg.add_element(StreamPort::merged(), 3, 0).unwrap();
    agg.add_interconnect((3, 0), (1, 0), 2, false, true).unwrap();
    agg.remove_interconnect((0, 0), (1, 0), false, true).unwrap();

    let rendered: Vec<String> = agg.directives().iter().map(Directive::render).collect();
    assert_eq!(
        rendered,
        vec![
            "LEFT_TO_RIGHT 1",
            "UP_TO_DOWN 1",
            "CONN 0 3 0 1 2",
            "CONN 0 0 0 1 -1"
        ]
    );
}
