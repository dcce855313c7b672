use crate::ingest::NodeId;
use crate::render::{DIAGONAL_MARK, render_grid};
use pretty_assertions::assert_eq;

#[test]
fn diagonal_is_marked_and_cells_are_padded() {
    let nodes = [NodeId(1), NodeId(2)];
    let grid = render_grid(&nodes, 10, |s, t| format!("{s}>{t}"));

    let expected = "\
From\\To   Node 1    Node 2    
Node 1    ---       1>2       
Node 2    2>1       ---       
";
    assert_eq!(grid, expected);
}

#[test]
fn cell_callback_never_sees_diagonal() {
    let nodes = [NodeId(1), NodeId(2), NodeId(3)];
    let mut asked = Vec::new();

    let grid = render_grid(&nodes, 8, |s, t| {
        asked.push((s, t));
        String::new()
    });

    assert_eq!(asked.len(), 6);
    assert!(asked.iter().all(|(s, t)| s != t));
    assert_eq!(grid.matches(DIAGONAL_MARK).count(), 3);
}

#[test]
fn empty_node_list_renders_header_only() {
    let grid = render_grid(&[], 10, |_, _| unreachable!());
    assert_eq!(grid, "From\\To   \n");
}
