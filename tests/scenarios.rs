use terrainpan::gradient::GradientField;
use terrainpan::grid::GridSize;
use terrainpan::mesh::SurfaceMesh;
use terrainpan::terrain::{BipartiteTerrain, SimpleTerrain, Terrain};

/// Stand-alone evaluation of the documented hash and noise formulas.
mod reference {
    fn mix(mut v: u64) -> u64 {
        for _ in 0..2 {
            v = ((v >> 16) ^ v).wrapping_mul(0x45d9f3b);
        }
        (v >> 16) ^ v
    }

    pub fn angle(seed: i32, x: i32, y: i32) -> f64 {
        let xu = mix((x.wrapping_mul(seed)) as i64 as u64);
        let yu = mix((y.wrapping_mul(seed)) as i64 as u64);
        (31u64.wrapping_mul(31u64.wrapping_add(xu)).wrapping_add(yu) % 360) as f64
    }

    fn fade(t: f64) -> f64 {
        6.0 * t.powi(5) - 15.0 * t.powi(4) + 10.0 * t.powi(3)
    }

    pub fn noise(seed: i32, x: f64, y: f64) -> f64 {
        let (x0, y0) = (x.floor(), y.floor());
        let (sx, sy) = (x - x0, y - y0);
        let dot = |cx: f64, cy: f64, dx: f64, dy: f64| {
            let a = angle(seed, cx as i32, cy as i32).to_radians();
            a.cos() * dx + a.sin() * dy
        };
        let n00 = dot(x0, y0, sx, sy);
        let n10 = dot(x0 + 1.0, y0, sx - 1.0, sy);
        let n01 = dot(x0, y0 + 1.0, sx, sy - 1.0);
        let n11 = dot(x0 + 1.0, y0 + 1.0, sx - 1.0, sy - 1.0);
        let fu = fade(sx);
        let bottom = n00 * (1.0 - fu) + n10 * fu;
        let top = n01 * (1.0 - fu) + n11 * fu;
        let fv = fade(sy);
        bottom * (1.0 - fv) + top * fv
    }
}

fn assert_mesh_invariants(mesh: &SurfaceMesh) {
    let w = mesh.size.w;
    let n = mesh.size.len() as u32;
    assert_eq!(mesh.vertex_count(), mesh.size.len());
    assert_eq!(mesh.position_buffer().len(), 3 * mesh.vertex_count());
    for t in mesh.triangles() {
        assert!(t.iter().all(|&v| v < n), "{t:?} out of range");
        assert!(t[0] != t[1] && t[1] != t[2] && t[0] != t[2], "{t:?} degenerate");
        for a in t {
            for b in t {
                let (ca, cb) = (a % w, b % w);
                assert!(ca.abs_diff(cb) <= 1, "{t:?} wraps a row boundary");
            }
        }
    }
}

#[test]
fn single_field_five_by_five() {
    // field bounds [-3, 3] x [-3, 3]
    let field = GradientField::new(43, 7, 7);
    assert_eq!((field.x_bounds.lower, field.x_bounds.upper), (-3, 3));
    let t = SimpleTerrain::new(field, GridSize::new(5, 5), 1.0, 0.0).unwrap();
    let mesh = t.mesh();

    let expected = reference::noise(43, -3.0, -3.0);
    assert!((mesh.height(0, 0) as f64 - expected).abs() < 1e-6);

    // step is 1.5 world units; check off-lattice vertices too
    for (i, j) in [(1, 0), (1, 1), (3, 2), (4, 4)] {
        let x = -3.0 + 1.5 * i as f64;
        let y = -3.0 + 1.5 * j as f64;
        let expected = reference::noise(43, x, y);
        assert!(
            (mesh.height(i, j) as f64 - expected).abs() < 1e-6,
            "vertex ({i}, {j}): {} vs {expected}",
            mesh.height(i, j)
        );
        assert_eq!(mesh.positions()[j * 5 + i][..2], [x as f32, y as f32]);
    }
    assert_mesh_invariants(mesh);
}

#[test]
fn reference_agrees_with_known_vectors() {
    assert_eq!(reference::angle(43, 0, 0), 241.0);
    assert!((reference::noise(43, -1.5, -3.0) - 0.226_131_464_412_279_24).abs() < 1e-9);
}

#[test]
fn bipartite_127_grid_counts() {
    let t = BipartiteTerrain::new(
        GradientField::new(43, 5, 5),
        GradientField::new(97, 27, 27),
        GridSize::new(127, 127),
        1.0,
        0.89,
        0.0,
    )
    .unwrap();
    let mesh = t.mesh();
    assert_eq!(mesh.vertex_count(), 127 * 127);
    assert_eq!(mesh.triangle_count(), 2 * 126 * 126);
    assert_eq!(mesh.index_buffer().len(), 3 * 2 * 126 * 126);
    assert_mesh_invariants(mesh);
}

#[test]
fn bipartite_height_is_weighted_blend() {
    let grid = GridSize::new(9, 9);
    let t = BipartiteTerrain::new(
        GradientField::new(43, 5, 5),
        GradientField::new(97, 27, 27),
        grid,
        2.5,
        0.89,
        0.0,
    )
    .unwrap();
    for (i, j) in [(1, 2), (5, 7), (8, 3)] {
        let macro_xy = (-2.0 + 0.5 * i as f64, -2.0 + 0.5 * j as f64);
        let micro_xy = (-13.0 + 3.25 * i as f64, -13.0 + 3.25 * j as f64);
        let expected = 2.5
            * (reference::noise(43, macro_xy.0, macro_xy.1) * 0.89
                + reference::noise(97, micro_xy.0, micro_xy.1) * (1.0 - 0.89));
        assert!((t.mesh().height(i, j) as f64 - expected).abs() < 1e-5);
    }
}

#[test]
fn normals_point_up() {
    let t = SimpleTerrain::new(GradientField::new(1, 9, 9), GridSize::new(6, 4), 1.0, 0.0)
        .unwrap();
    assert!(t.mesh().normal_buffer().chunks(3).all(|n| n == [0.0, 0.0, 1.0]));
}
