use std::f64::consts::PI;
use std::fs;

use sdiskgds::{GdsElement, GdsLibrary};

use crate::utils::{ErrorContext, SerializationFormat};
use crate::*;

/// Check two floats are within `tol`
fn close_to(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}
fn pts_close(a: &[Point], b: &[Point], tol: f64) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b.iter())
            .all(|(p, q)| close_to(p.x, q.x, tol) && close_to(p.y, q.y, tol))
}
fn circular() -> CircularParams {
    CircularParams::default()
}
fn serpentine() -> SerpentineParams {
    SerpentineParams::default()
}

#[test]
fn it_makes_circles() {
    let c = circle(30.0);
    assert_eq!(c.points.len(), CIRCLE_POINTS);
    assert!(c.points.iter().all(|p| close_to(p.radius(), 30.0, 1e-9)));
    // First vertex on +y, then proceeding clockwise
    assert!(close_to(c.points[0].x, 0.0, 1e-12));
    assert!(close_to(c.points[0].y, 30.0, 1e-12));
    assert!(c.points[1].x > 0.0);
    assert!(close_to(c.points[90].x, 30.0, 1e-9));
}

#[test]
fn it_makes_donuts() -> DiskResult<()> {
    let scale = 1000.0;
    let ring = donut(150.0, 200.0, scale)?;
    let expected = PI * (200.0f64.powi(2) - 150.0f64.powi(2)) * scale * scale;
    assert!(close_to(ring.area() / expected, 1.0, 1e-3));
    assert!(!ring.is_empty());

    // One polygon, with one hole
    let polys = ring.polygons();
    assert_eq!(polys.len(), 1);
    assert_eq!(polys[0].interiors().len(), 1);
    assert!(close_to(ring.reach(1.0 / scale), 200.0, 1e-2));
    Ok(())
}

#[test]
fn donut_radii_errors() {
    for (inner, outer) in [(200.0, 150.0), (150.0, 150.0), (0.0, 150.0), (f64::NAN, 150.0)] {
        match donut(inner, outer, 1000.0) {
            Err(DiskError::Geometry { stack, .. }) => assert_eq!(stack, vec![ErrorContext::Ring]),
            other => panic!("Expected a geometry error, got {:?}", other),
        }
    }
    assert!(donut(150.0, 200.0, 0.0).is_err());
}

#[test]
fn circular_arm_defaults() {
    let arm = circular().arm();
    assert_eq!(arm.extent(), 150.0);
    assert_eq!(arm.width(), 5.0);
    let pts = arm.centerline();
    assert_eq!(pts[0], Point::new(0.0, 0.0));
    assert_eq!(pts[1], Point::new(0.0, 40.0));
    assert_eq!(*pts.last().unwrap(), Point::new(0.0, 150.0));
    // Inner lead, inner arc, nine windings, closing arc, outer lead
    let windings: usize = (1..=9).map(|i| (i + 2) * 4 - 1).sum();
    assert_eq!(pts.len(), 2 + 3 + windings + 16 + 1);
    // Every arc point lies on its ring
    for p in &pts[1..pts.len() - 1] {
        let r = p.radius();
        let ring = (r - 40.0) / 10.0;
        assert!(close_to(ring, ring.round(), 1e-9), "Off-ring radius {}", r);
    }
}

#[test]
fn zigzag_arm_defaults() {
    let arm = serpentine().arm();
    assert!(close_to(arm.thick, 30.0, 1e-9));
    assert!(close_to(arm.pitch, 30.0, 1e-9));
    assert!(close_to(arm.inner, 105.0, 1e-9));
    assert!(close_to(arm.extent(), 285.0, 1e-9));
    let pts = arm.centerline();
    assert_eq!(pts.len(), 3 + 2 * 4 + 3);
    assert!(close_to(pts.last().unwrap().y, 285.0, 1e-9));
    // Runs alternate direction
    assert!(pts[3].x < pts[4].x);
    assert!(pts[5].x > pts[6].x);
}

#[test]
fn arm_paths_rotate() {
    let arm: Arm = circular().arm().into();
    let tol = 1e-9;
    for (rot, end) in [
        (0.0, Point::new(0.0, 150.0)),
        (90.0, Point::new(-150.0, 0.0)),
        (180.0, Point::new(0.0, -150.0)),
        (270.0, Point::new(150.0, 0.0)),
    ] {
        let path = arm.path(rot);
        let last = path.points.last().unwrap();
        assert!(close_to(last.x, end.x, tol) && close_to(last.y, end.y, tol));
        assert_eq!(path.width, 5.0);
    }
    let base = arm.path(0.0);
    let back = arm.path(37.5).rotate(-37.5);
    assert!(pts_close(&base.points, &back.points, 1e-9));
}

#[test]
fn zero_windings() {
    let mut c = circular();
    c.n = 0;
    let mut s = serpentine();
    s.arm_n = 0;
    let arms: Vec<Arm> = vec![c.arm().into(), s.arm().into()];
    for arm in arms {
        let path = arm.path(0.0);
        assert!(path.points.len() >= 3);
        let radii: Vec<f64> = path.points.iter().map(Point::radius).collect();
        assert!(radii.windows(2).all(|w| w[1] >= w[0] - 1e-9), "{:?}", radii);
        assert!(close_to(*radii.last().unwrap(), arm.extent(), 1e-9));
        // No coincident neighbors after stroking
        assert!(path.points.windows(2).all(|w| w[0] != w[1]));
    }
    assert!(DiskLayout::build(&DiskParams::Circular(c)).is_ok());
    assert!(DiskLayout::build(&DiskParams::Serpentine(s)).is_ok());
}

#[test]
fn it_validates() {
    assert!(DiskParams::default_for(Style::Circular).validate().is_ok());
    assert!(DiskParams::default_for(Style::Serpentine).validate().is_ok());

    let mut c = circular();
    c.outer_r = 150.0;
    match DiskParams::Circular(c).validate() {
        Err(DiskError::Validation { message, stack }) => {
            assert!(message.contains("outer_r"));
            assert_eq!(stack, vec![ErrorContext::Params]);
        }
        other => panic!("Expected a validation error, got {:?}", other),
    }
    let mut c = circular();
    c.ped_inset = 40.0;
    assert!(c.validate().is_err());
    let mut c = circular();
    c.res = 0;
    assert!(c.validate().is_err());
    let mut c = circular();
    c.rotations.push(f64::INFINITY);
    assert!(c.validate().is_err());

    let mut s = serpentine();
    s.actual_disk_r = 250.0;
    assert!(s.validate().is_err());
    let mut s = serpentine();
    s.disk_r = -1.0;
    assert!(s.validate().is_err());
    let mut s = serpentine();
    s.arm_thick_frac = f64::NAN;
    assert!(s.validate().is_err());
    assert!(DiskLayout::build(&DiskParams::Serpentine(s)).is_err());
}

#[test]
fn params_derived_values() {
    let c = DiskParams::default_for(Style::Circular);
    assert_eq!(c.style(), Style::Circular);
    assert_eq!(c.rotations(), &[0.0, 90.0, 180.0, 270.0]);
    assert_eq!(c.pedestal_radius(), 30.0);
    assert_eq!(c.ring_radii(), (150.0, 200.0));

    let s = DiskParams::default_for(Style::Serpentine);
    assert_eq!(s.style(), Style::Serpentine);
    assert_eq!(s.rotations(), &[0.0, 90.0, 270.0]);
    assert!(close_to(s.pedestal_radius(), 75.0, 1e-9));
    let (inner, outer) = s.ring_radii();
    assert!(close_to(inner, 285.0, 1e-9));
    assert_eq!(outer, 300.0);
    assert_eq!(Style::Circular.prefix(), "csdisk");
    assert_eq!(Style::Serpentine.prefix(), "sdisk");
}

#[test]
fn missing_params_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("params.yaml");
    let err = DiskParams::try_load(&path, Style::Circular).unwrap_err();
    assert!(err.is_not_found());
    let params = DiskParams::load(&path, Style::Serpentine);
    assert_eq!(params, DiskParams::default_for(Style::Serpentine));
    Ok(())
}

#[test]
fn incomplete_params_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("params.yaml");
    // Missing `res` and `outer_r`
    fs::write(
        &path,
        "l_inner: 50.0\nl_outer: 10.0\nthick: 5.0\npitch: 10.0\nn: 3\ntheta: 60.0\n",
    )?;
    let err = DiskParams::try_load(&path, Style::Circular).unwrap_err();
    assert!(!err.is_not_found());
    // No partial merge: all fields fall back together
    let params = DiskParams::load(&path, Style::Circular);
    assert_eq!(params, DiskParams::default_for(Style::Circular));
    Ok(())
}

#[test]
fn params_file_formats() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let yaml = dir.path().join("params.yaml");
    fs::write(
        &yaml,
        "l_inner: 50.0\nl_outer: 10.0\nthick: 5.0\npitch: 10.0\nn: 3\ntheta: 60.0\nres: 2\nouter_r: 120.0\n",
    )?;
    let params = DiskParams::try_load(&yaml, Style::Circular)?;
    match &params {
        DiskParams::Circular(p) => {
            assert_eq!(p.n, 3);
            assert_eq!(p.rotations, vec![0.0, 90.0, 180.0, 270.0]);
            assert_eq!(p.ped_inset, 10.0);
        }
        _ => panic!("Expected circular parameters"),
    }
    for ext in ["json", "toml", "yml"] {
        let path = dir.path().join(format!("record.{}", ext));
        params.save(&path)?;
        assert_eq!(DiskParams::try_load(&path, Style::Circular)?, params);
    }
    let serp = DiskParams::default_for(Style::Serpentine);
    let path = dir.path().join("serp.json");
    serp.save(&path)?;
    assert_eq!(DiskParams::try_load(&path, Style::Serpentine)?, serp);
    Ok(())
}

#[test]
fn it_builds_layouts() -> DiskResult<()> {
    let layout = DiskLayout::build(&DiskParams::default_for(Style::Serpentine))?;
    assert_eq!(layout.name, "sdisk");
    assert_eq!(layout.layers, vec![LayerSpec::new(1, 0)]);
    assert_eq!(layout.cells.len(), 1);
    let cell = layout.cell(CELL_NAME).unwrap();
    assert_eq!(cell.elems.len(), 3 + 2);
    let layer = cell.elems[0].layer;
    assert_eq!(layout.layer_spec(layer), Some(&LayerSpec::new(1, 0)));
    let shapes: Vec<&Shape> = cell.shapes(layer).collect();
    let paths = shapes.iter().filter(|s| matches!(s, Shape::Path(_))).count();
    assert_eq!(paths, 3);
    match shapes[3] {
        Shape::Polygon(p) => assert!(close_to(p.reach(layout.dbu), 75.0, 1e-9)),
        other => panic!("Expected the pedestal polygon, got {:?}", other),
    }
    match shapes[4] {
        Shape::Region(r) => assert!(close_to(r.reach(layout.dbu), 300.0, 1e-2)),
        other => panic!("Expected the ring region, got {:?}", other),
    }
    Ok(())
}

#[test]
fn layout_layers() {
    let mut layout = Layout::new("lib");
    let a = layout.layer(1, 0);
    let b = layout.layer(2, 0);
    assert_eq!(layout.layer(1, 0), a);
    assert_ne!(a, b);
    assert_eq!(b.index(), 1);
    assert_eq!(layout.scale(), 1000.0);
    let cell = layout.create_cell("c");
    cell.insert(a, circle(1.0));
    let pts = vec![
        Point::new(0.0, 0.0),
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
    ];
    cell.insert(b, Path::new(pts, 0.1));
    assert_eq!(cell.shapes(a).count(), 1);
    match cell.shapes(b).next() {
        Some(Shape::Path(p)) => assert_eq!(p.num_points(), 2),
        other => panic!("Expected a path, got {:?}", other),
    };
}

#[test]
fn it_exports_gds() -> DiskResult<()> {
    let layout = DiskLayout::build(&DiskParams::default_for(Style::Circular))?;
    let lib = layout.to_gds()?;
    assert_eq!(lib.name, "csdisk");
    assert_eq!(lib.units.dbu(), 1e-3);
    assert!(close_to(lib.units.db_unit() / 1e-9, 1.0, 1e-12));
    sdiskgds::roundtrip(&lib)?;

    let stats = lib.stats();
    assert_eq!(stats.structs, 1);
    assert_eq!(stats.paths, 4);
    assert_eq!(stats.boundaries, 2);

    let strukt = &lib.structs[0];
    assert_eq!(strukt.name, "si");
    for elem in strukt.elems.iter() {
        match elem {
            GdsElement::GdsPath(p) => {
                assert_eq!((p.layer, p.datatype), (1, 0));
                assert_eq!(p.path_type, Some(0));
                assert_eq!(p.width, Some(5000));
                assert!(p.xy.windows(2).all(|w| w[0] != w[1]));
            }
            GdsElement::GdsBoundary(b) => {
                assert_eq!((b.layer, b.datatype), (1, 0));
                assert!(b.is_closed());
                assert!(b.xy.len() <= MAX_XY_POINTS);
            }
        }
    }
    // The pedestal: 360 vertices, closed
    match &strukt.elems[4] {
        GdsElement::GdsBoundary(b) => {
            assert_eq!(b.xy.len(), CIRCLE_POINTS + 1);
            assert_eq!(b.xy[0].y, 30_000);
        }
        other => panic!("Expected the pedestal boundary, got {:?}", other),
    }
    // The ring: a single keyhole boundary, covering both circles
    match &strukt.elems[5] {
        GdsElement::GdsBoundary(b) => {
            assert!(b.xy.len() > 2 * CIRCLE_POINTS);
            let reach = |r2: i64| b.xy.iter().any(|p| {
                let d = i64::from(p.x).pow(2) + i64::from(p.y).pow(2);
                (d - r2).abs() < r2 / 1000
            });
            assert!(reach(150_000i64.pow(2)));
            assert!(reach(200_000i64.pow(2)));
        }
        other => panic!("Expected the ring boundary, got {:?}", other),
    }
    Ok(())
}

#[test]
fn gds_point_limit() {
    let mut layout = Layout::new("big");
    let layer = layout.layer(1, 0);
    let points = (0..=MAX_XY_POINTS)
        .map(|i| Point::new(i as f64, 0.0))
        .collect();
    layout.create_cell("c").insert(layer, Path::new(points, 1.0));
    match layout.to_gds() {
        Err(DiskError::Export { stack, .. }) => {
            assert_eq!(stack, vec![ErrorContext::Cell("c".into())])
        }
        other => panic!("Expected an export error, got {:?}", other),
    }
}

#[test]
fn gds_range_limit() {
    assert!(unexportable().to_gds().is_err());
}

#[test]
fn sequential_exports() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let dir = OutputDir::create(tmp.path().join("layouts"))?;
    let params = DiskParams::default_for(Style::Circular);
    let layout = DiskLayout::build(&params)?;

    let first = export(&layout, Some(&params), &dir, "csdisk", Numbering::Next)?;
    assert_eq!(first.num, 0);
    assert_eq!(first.gds, dir.path.join("csdisk0.gds"));
    assert_eq!(first.record, Some(dir.path.join("csdisk0.yml")));
    let written = fs::read(&first.gds)?;

    let second = export(&layout, Some(&params), &dir, "csdisk", Numbering::Next)?;
    assert_eq!(second.num, 1);
    assert_eq!(fs::read(&first.gds)?, written);

    let lib = GdsLibrary::open(&second.gds)?;
    assert_eq!(lib.structs[0].elems.len(), 6);
    let record = DiskParams::try_load(second.record.unwrap(), Style::Circular)?;
    assert_eq!(record, params);
    Ok(())
}

/// Create a [Counter] from (prefix, next) pairs
fn counter(entries: &[(&str, u64)]) -> Counter {
    Counter {
        next: entries.iter().map(|(p, n)| (p.to_string(), *n)).collect(),
    }
}
/// Sorted file names in `dir`
fn file_names(dir: &OutputDir) -> std::io::Result<Vec<String>> {
    let mut names = fs::read_dir(&dir.path)?
        .map(|e| e.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<std::io::Result<Vec<_>>>()?;
    names.sort();
    Ok(names)
}
/// Layout whose GDSII conversion fails
fn unexportable() -> Layout {
    let mut layout = Layout::new("far");
    let layer = layout.layer(1, 0);
    layout.create_cell("c").insert(layer, circle(1e7));
    layout
}

#[test]
fn regenerate_latest() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let dir = OutputDir::create(tmp.path())?;
    let params = DiskParams::default_for(Style::Serpentine);
    let layout = DiskLayout::build(&params)?;

    export(&layout, None, &dir, "sdisk", Numbering::Next)?;
    export(&layout, None, &dir, "sdisk", Numbering::Next)?;
    let e = export(&layout, None, &dir, "sdisk", Numbering::Latest)?;
    assert_eq!(e.num, 1);
    assert_eq!(e.record, None);
    assert_eq!(dir.counter()?, counter(&[("sdisk", 2)]));
    let e = export(&layout, None, &dir, "sdisk", Numbering::Next)?;
    assert_eq!(e.num, 2);

    // Empty directories regenerate number zero
    let empty = OutputDir::create(tmp.path().join("empty"))?;
    let e = export(&layout, None, &empty, "sdisk", Numbering::Latest)?;
    assert_eq!(e.num, 0);
    assert!(empty.numbered("sdisk", 0, "gds").exists());
    Ok(())
}

#[test]
fn scan_existing_outputs() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let dir = OutputDir::create(tmp.path())?;
    assert_eq!(dir.scan("")?, None);
    for name in [
        "csdisk3.gds",
        "sdisk12.gds",
        "notes.txt",
        "draft.gds",
        "v7_final2.gds",
        "99.yml",
        ".sdisk-77.gds",
    ] {
        fs::write(dir.path.join(name), b"")?;
    }
    assert_eq!(dir.scan("")?, Some(12));
    assert_eq!(dir.scan("sdisk")?, Some(12));
    assert_eq!(dir.scan("csdisk")?, Some(3));
    assert_eq!(dir.scan("x")?, None);
    assert_eq!(dir.counter()?, Counter::default());
    assert_eq!(dir.next_number("sdisk")?, 13);
    assert_eq!(dir.next_number("csdisk")?, 4);

    // Once present, a prefix's counter entry takes precedence over the scan
    SerializationFormat::Json.save(&counter(&[("x", 5)]), dir.counter_path())?;
    let params = DiskParams::default_for(Style::Circular);
    let layout = DiskLayout::build(&params)?;
    let e = export(&layout, None, &dir, "x", Numbering::Next)?;
    assert_eq!(e.num, 5);
    let e = export(&layout, None, &dir, "csdisk", Numbering::Next)?;
    assert_eq!(e.num, 4);
    assert_eq!(dir.counter()?, counter(&[("csdisk", 5), ("x", 6)]));
    Ok(())
}

#[test]
fn prefixes_count_separately() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let dir = OutputDir::create(tmp.path())?;
    let params = DiskParams::default_for(Style::Circular);
    let layout = DiskLayout::build(&params)?;
    assert_eq!(export(&layout, None, &dir, "csdisk", Numbering::Next)?.num, 0);
    assert_eq!(export(&layout, None, &dir, "csdisk", Numbering::Next)?.num, 1);
    assert_eq!(export(&layout, None, &dir, "sdisk", Numbering::Next)?.num, 0);
    assert_eq!(dir.counter()?, counter(&[("csdisk", 2), ("sdisk", 1)]));
    Ok(())
}

#[test]
fn next_never_overwrites() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let dir = OutputDir::create(tmp.path())?;
    SerializationFormat::Json.save(&counter(&[("csdisk", 0)]), dir.counter_path())?;
    fs::write(dir.numbered("csdisk", 0, "gds"), b"keep")?;
    fs::write(dir.numbered("csdisk", 1, "yml"), b"notes")?;
    let params = DiskParams::default_for(Style::Circular);
    let layout = DiskLayout::build(&params)?;
    let e = export(&layout, Some(&params), &dir, "csdisk", Numbering::Next)?;
    assert_eq!(e.num, 2);
    assert_eq!(fs::read(dir.numbered("csdisk", 0, "gds"))?, b"keep");
    assert_eq!(fs::read(dir.numbered("csdisk", 1, "yml"))?, b"notes");
    assert!(!dir.numbered("csdisk", 1, "gds").exists());
    assert_eq!(dir.counter()?, counter(&[("csdisk", 3)]));
    Ok(())
}

#[test]
fn failed_exports_leave_no_files() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let dir = OutputDir::create(tmp.path())?;
    assert!(export(&unexportable(), None, &dir, "csdisk", Numbering::Next).is_err());
    assert!(file_names(&dir)?.is_empty());

    // Staged outputs are removed unless committed
    let params = DiskParams::default_for(Style::Circular);
    let lib = DiskLayout::build(&params)?.to_gds()?;
    let staged = dir.stage(&lib, Some(&params))?;
    assert_eq!(file_names(&dir)?.len(), 2);
    drop(staged);
    assert!(file_names(&dir)?.is_empty());
    assert_eq!(dir.next_number("csdisk")?, 0);
    Ok(())
}

#[test]
fn failed_regeneration_keeps_latest() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let dir = OutputDir::create(tmp.path())?;
    let params = DiskParams::default_for(Style::Circular);
    let layout = DiskLayout::build(&params)?;
    let e = export(&layout, Some(&params), &dir, "csdisk", Numbering::Next)?;
    let written = fs::read(&e.gds)?;
    assert!(export(&unexportable(), None, &dir, "csdisk", Numbering::Latest).is_err());
    assert_eq!(fs::read(&e.gds)?, written);
    assert_eq!(
        file_names(&dir)?,
        vec![COUNTER_FILE.to_string(), "csdisk0.gds".into(), "csdisk0.yml".into()]
    );
    Ok(())
}

#[test]
fn tiny_rings_are_rejected() {
    match donut(0.01, 200.0, 1000.0) {
        Err(DiskError::Geometry { stack, .. }) => assert_eq!(stack, vec![ErrorContext::Ring]),
        other => panic!("Expected a geometry error, got {:?}", other),
    }
    // Smallest resolvable inner radius on the nanometer grid is about 0.057 um
    assert!(donut(0.05, 1.0, 1000.0).is_err());
    assert!(donut(1.0, 2.0, 1000.0).is_ok());

    // Reachable from valid serpentine parameters with a tiny disk
    let tiny = SerpentineParams {
        disk_r: 0.05,
        actual_disk_r: 0.2,
        ..serpentine()
    };
    let params = DiskParams::Serpentine(tiny);
    assert!(params.validate().is_ok());
    assert!(matches!(
        DiskLayout::build(&params),
        Err(DiskError::Geometry { .. })
    ));
}

#[test]
fn gds_degenerate_polygon() {
    let mut layout = Layout::new("specks");
    let layer = layout.layer(1, 0);
    let speck = Polygon {
        points: vec![
            Point::new(0.0, 0.0),
            Point::new(1e-4, 0.0),
            Point::new(0.0, 1e-4),
        ],
    };
    layout.create_cell("c").insert(layer, speck);
    match layout.to_gds() {
        Err(DiskError::Export { stack, .. }) => {
            assert_eq!(stack, vec![ErrorContext::Cell("c".into())])
        }
        other => panic!("Expected an export error, got {:?}", other),
    }
}

#[test]
fn arm_point_counts() {
    for n in [0, 1, 2, 9] {
        for res in [1, 4] {
            let arm = CircularArm {
                n,
                res,
                ..circular().arm()
            };
            assert_eq!(arm.num_points(), arm.centerline().len(), "n={} res={}", n, res);
        }
    }
    for n in [0, 3, 4] {
        let arm = ZigzagArm {
            n,
            ..serpentine().arm()
        };
        assert_eq!(arm.num_points(), arm.centerline().len(), "n={}", n);
    }
    let huge = CircularArm {
        n: usize::MAX,
        ..circular().arm()
    };
    assert_eq!(huge.num_points(), usize::MAX);
}

#[test]
fn circular_theta_bounds() {
    for theta in [0.0, -10.0, 400.0] {
        let params = CircularParams {
            theta,
            ..circular()
        };
        match params.validate() {
            Err(DiskError::Validation { message, stack }) => {
                assert!(message.contains("theta"), "{}", message);
                assert_eq!(stack, vec![ErrorContext::Params]);
            }
            other => panic!("Expected a validation error, got {:?}", other),
        }
    }
    let full = CircularParams {
        theta: 360.0,
        ..circular()
    };
    assert!(full.validate().is_ok());
}

#[test]
fn arm_point_limits() {
    let dense = CircularParams {
        n: 200,
        ..circular()
    };
    match dense.validate() {
        Err(DiskError::Validation { message, .. }) => {
            assert!(message.contains("GDSII limit"), "{}", message)
        }
        other => panic!("Expected a validation error, got {:?}", other),
    }
    let dense = SerpentineParams {
        arm_n: 5000,
        ..serpentine()
    };
    match dense.validate() {
        Err(DiskError::Validation { message, .. }) => {
            assert!(message.contains("GDSII limit"), "{}", message)
        }
        other => panic!("Expected a validation error, got {:?}", other),
    }
}
