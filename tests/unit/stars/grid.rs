use super::*;

#[test]
fn single_star_on_small_grid() {
    let grid = StarGrid::new(3, 2);
    let lines = grid.render(&[Star::new(1, 1, "✦")]);
    assert_eq!(lines, vec!["· ✦ ·".to_owned(), "· · ·".to_owned()]);
}

#[test]
fn top_left_origin_prints_row_zero_first() {
    let grid = StarGrid {
        origin: GridOrigin::TopLeft,
        ..StarGrid::new(3, 2)
    };
    let lines = grid.render(&[Star::new(1, 1, "✦")]);
    assert_eq!(lines, vec!["· · ·".to_owned(), "· ✦ ·".to_owned()]);
}

#[test]
fn out_of_bounds_stars_are_dropped() {
    let grid = StarGrid::new(2, 2);
    let stars = [
        Star::new(-1, 0, "x"),
        Star::new(0, -1, "x"),
        Star::new(2, 0, "x"),
        Star::new(0, 2, "x"),
        Star::new(i64::MAX, i64::MIN, "x"),
    ];
    assert_eq!(grid.render(&stars), vec!["· ·", "· ·"]);
}

#[test]
fn later_star_wins_on_shared_cell() {
    let grid = StarGrid::new(1, 1);
    let stars = [Star::new(0, 0, "a"), Star::new(0, 0, "b")];
    assert_eq!(grid.render(&stars), vec!["b"]);
}

#[test]
fn default_grid_shape_and_fill() {
    let grid = StarGrid::default();
    let lines = grid.render(&[]);
    assert_eq!(lines.len(), 12);
    for line in &lines {
        assert_eq!(line.chars().filter(|&c| c == '·').count(), 36);
        assert_eq!(line.chars().count(), 36 * 2 - 1);
    }
}

#[test]
fn constellation_fits_default_grid_and_reads_upright() {
    let grid = StarGrid::default();
    let stars = pg_constellation();
    assert_eq!(stars.len(), 33);
    assert!(stars.iter().all(|s| grid.cell_of(s).is_some()));

    let lines = grid.render(&stars);
    // the P's top bar sits above its bowl, one line below the top edge
    assert!(lines[0].chars().all(|c| c == '·' || c == ' '));
    assert!(lines[1].starts_with("· ✦ ✦ ✦ ·"), "{}", lines[1]);
    assert!(lines[2].starts_with("· ✦ · · ✦ ·"), "{}", lines[2]);
    let lit: Vec<usize> = (0..lines.len())
        .filter(|&i| lines[i].contains('✦'))
        .collect();
    assert_eq!(lit, vec![1, 2, 3, 4]);
}
