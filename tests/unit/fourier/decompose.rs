use super::*;

fn ring(n: usize, radius: f64, turns: f64, phase: f64, center: Point) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let a = TAU * turns * i as f64 / n as f64 + phase;
            Point::new(center.x + radius * a.cos(), center.y + radius * a.sin())
        })
        .collect()
}

#[test]
fn fold_bin_matches_signed_frequency_layout() {
    let even: Vec<i64> = (0..4).map(|k| fold_bin(k, 4)).collect();
    assert_eq!(even, vec![0, 1, -2, -1]);
    let odd: Vec<i64> = (0..5).map(|k| fold_bin(k, 5)).collect();
    assert_eq!(odd, vec![0, 1, 2, -2, -1]);
}

#[test]
fn dc_bin_is_omitted() {
    let pts = ring(16, 10.0, 1.0, 0.3, Point::new(400.0, 300.0));
    let comps = decompose_points(&pts);
    assert_eq!(comps.len(), 15);
    assert!(comps.iter().all(|c| c.frequency != 0.0));
}

#[test]
fn amplitudes_non_negative_and_phases_in_range() {
    let pts: Vec<Point> = (0..37)
        .map(|i| Point::new((i * i % 17) as f64, (i * 7 % 11) as f64 - 3.0))
        .collect();
    for c in decompose_points(&pts) {
        assert!(c.amplitude >= 0.0);
        assert!(c.phase > -PI && c.phase <= PI, "phase {}", c.phase);
        assert!(c.frequency.is_finite());
    }
}

#[test]
fn single_counter_clockwise_turn_is_one_component() {
    let n = 32;
    let pts = ring(n, 25.0, 1.0, 0.5, Point::new(100.0, 100.0));
    let comps = decompose_points(&pts);

    let top = comps[0];
    assert!((top.amplitude - 25.0).abs() < 1e-9);
    assert!((top.frequency - TAU / n as f64).abs() < 1e-12);
    assert!((top.phase - 0.5).abs() < 1e-9);
    assert!(comps[1..].iter().all(|c| c.amplitude < 1e-9));
}

#[test]
fn clockwise_turn_has_negative_frequency() {
    let n = 20;
    let pts = ring(n, 5.0, -2.0, 0.0, Point::ZERO);
    let top = decompose_points(&pts)[0];
    assert!((top.frequency + 2.0 * TAU / n as f64).abs() < 1e-12);
}

#[test]
fn components_sorted_by_descending_amplitude() {
    let a = ring(24, 30.0, 1.0, 0.0, Point::ZERO);
    let b = ring(24, 5.0, 3.0, 1.0, Point::ZERO);
    let pts: Vec<Point> = a
        .iter()
        .zip(&b)
        .map(|(p, q)| Point::new(p.x + q.x, p.y + q.y))
        .collect();
    let comps = decompose_points(&pts);
    assert!(comps.windows(2).all(|w| w[0].amplitude >= w[1].amplitude));
    assert!((comps[0].amplitude - 30.0).abs() < 1e-9);
    assert!((comps[1].amplitude - 5.0).abs() < 1e-9);
}

#[test]
fn components_resynthesize_centered_samples() {
    let pts: Vec<Point> = (0..15)
        .map(|i| Point::new((i as f64 * 1.7).sin() * 40.0 + 90.0, (i % 4) as f64 * 13.0))
        .collect();
    let mean = pts.iter().fold(Point::ZERO, |acc, p| acc + p.to_vec2() / pts.len() as f64);
    let comps = decompose_points(&pts);

    for (k, p) in pts.iter().enumerate() {
        let t = k as f64;
        let (mut x, mut y) = (mean.x, mean.y);
        for c in &comps {
            let a = c.frequency * t + c.phase;
            x += c.amplitude * a.cos();
            y += c.amplitude * a.sin();
        }
        assert!((x - p.x).abs() < 1e-9 && (y - p.y).abs() < 1e-9, "sample {k}");
    }
}

#[test]
fn tiny_inputs() {
    assert!(decompose_points(&[]).is_empty());
    assert!(decompose_points(&[Point::new(1.0, 2.0)]).is_empty());
}

#[test]
fn truncate_keeps_largest() {
    let pts = ring(8, 3.0, 1.0, 0.0, Point::ZERO);
    let comps = truncate_components(decompose_points(&pts), 2);
    assert_eq!(comps.len(), 2);
    assert!((comps[0].amplitude - 3.0).abs() < 1e-9);
    assert_eq!(truncate_components(comps.clone(), 10).len(), 2);
}
