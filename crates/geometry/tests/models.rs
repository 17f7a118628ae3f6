//! Integration tests for the reference pin cell and assembly models

use pinlat_geometry::models::{
    assembly, pin_cell, AssemblyConfig, PinCellConfig, PinKind, COOLANT_CHANNEL, FUEL_PIN, H2O,
    UO2, ZIRCONIUM,
};
use pinlat_geometry::{
    Cell, CellId, Error, Fill, Geometry, GeometryBuilder, Lattice, LatticeId, Material,
    MaterialId, Point, RasterSpec, Universe, UniverseId,
};
use rstest::{fixture, rstest};

#[fixture]
fn pin() -> Geometry {
    pin_cell(&PinCellConfig::default()).unwrap()
}

#[fixture]
fn lattice_model() -> Geometry {
    assembly(&AssemblyConfig::default()).unwrap()
}

#[rstest]
#[case(0.0, 0.0, UO2)] // case 1
#[case(0.2, 0.3, UO2)] // case 2
#[case(-0.4, 0.0, UO2)] // case 3
#[case(0.45, 0.0, ZIRCONIUM)] // case 4
#[case(0.0, -0.46, ZIRCONIUM)] // case 5
#[case(0.6, 0.6, H2O)] // case 6
#[case(-0.62, 0.0, H2O)] // case 7
#[case(0.0, 0.5, H2O)] // case 8
fn pin_cell_materials(pin: Geometry, #[case] x: f64, #[case] y: f64, #[case] expected: MaterialId) {
    assert_eq!(pin.locate(&Point::from_xy(x, y)).unwrap(), expected);
}

#[rstest]
fn pin_cell_outside_box(pin: Geometry) {
    let p = Point::from_xy(0.7, 0.0);
    assert_eq!(
        pin.locate(&p),
        Err(Error::NoCellFound {
            universe: UniverseId(0),
            point: p
        })
    );
}

#[rstest]
fn pin_cell_radial_sweep(pin: Geometry) {
    // strictly inside, between, and outside the two radii along a diagonal
    for step in 0..60 {
        let r = 0.005 + step as f64 * 0.01;
        let p = Point::from_xy(r / 2f64.sqrt(), r / 2f64.sqrt());
        let expected = if r < 0.409 {
            UO2
        } else if r > 0.411 && r < 0.479 {
            ZIRCONIUM
        } else if r > 0.481 {
            H2O
        } else {
            continue;
        };
        assert_eq!(pin.locate(&p).unwrap(), expected, "r = {r}");
    }
}

#[rstest]
fn lattice_slot_centres_round_trip(lattice_model: Geometry) {
    let pitch = 1.26;
    let lower_left = -2.0 * pitch;

    for iy in 0..4 {
        for ix in 0..4 {
            let p = Point::from_xy(
                lower_left + (ix as f64 + 0.5) * pitch,
                lower_left + (iy as f64 + 0.5) * pitch,
            );
            let location = lattice_model.locate_path(&p).unwrap();
            assert_eq!(location.levels.len(), 2);

            let root = &location.levels[0];
            assert_eq!(root.cell, CellId(999));
            let slot = root.slot.unwrap();
            assert_eq!(slot.lattice, LatticeId(5));
            assert_eq!(slot.index, [ix, iy]);

            // second row from the top of the authored layout is the channel
            let expected = if (ix, iy) == (1, 2) {
                COOLANT_CHANNEL
            } else {
                FUEL_PIN
            };
            let pin = &location.levels[1];
            assert_eq!(pin.universe, expected);
            assert!(pin.point.x.abs() < 1e-12, "{}", pin.point);
            assert!(pin.point.y.abs() < 1e-12, "{}", pin.point);

            let material = if expected == COOLANT_CHANNEL { H2O } else { UO2 };
            assert_eq!(location.material, material);
        }
    }
}

#[rstest]
#[case(-2.6, 0.0)] // case 1
#[case(0.0, 2.52)] // case 2
#[case(10.0, 10.0)] // case 3
fn assembly_clipped_by_root_cell(lattice_model: Geometry, #[case] x: f64, #[case] y: f64) {
    let p = Point::from_xy(x, y);
    assert!(matches!(
        lattice_model.locate(&p),
        Err(Error::NoCellFound { universe: UniverseId(0), .. })
    ));
}

#[rstest]
#[case(-0.01, 0.5)] // case 1
#[case(0.5, 2.0)] // case 2
#[case(2.0, 2.0)] // case 3
fn unclipped_lattice_never_clamps(#[case] x: f64, #[case] y: f64) {
    let mut builder = GeometryBuilder::new();
    builder.add_material(Material::new(1, "m")).unwrap();
    builder
        .add_universe(Universe::new(1, [Cell::new(1, Fill::Material(MaterialId(1)))]))
        .unwrap();
    builder
        .add_lattice(Lattice::new(7, [0.0, 0.0], [1.0, 1.0], vec![vec![UniverseId(1); 2]; 2]).unwrap())
        .unwrap();
    builder
        .add_universe(Universe::new(0, [Cell::new(2, Fill::Lattice(LatticeId(7)))]))
        .unwrap();
    let geometry = builder.build(UniverseId(0)).unwrap();

    let p = Point::from_xy(x, y);
    assert!(matches!(
        geometry.locate(&p),
        Err(Error::OutOfLatticeBounds { lattice: LatticeId(7), .. })
    ));
    assert_eq!(geometry.locate(&Point::from_xy(1.5, 0.5)).unwrap(), MaterialId(1));
}

#[rstest]
fn pin_cell_raster_area_fractions(pin: Geometry) {
    let map = pin.raster(&RasterSpec::default()).unwrap();
    assert_eq!(map.pixels(), [300, 300]);

    let area = 1.26 * 1.26;
    let fuel = std::f64::consts::PI * 0.41 * 0.41 / area;
    let clad = std::f64::consts::PI * (0.48 * 0.48 - 0.41 * 0.41) / area;
    assert!((map.fraction(UO2) - fuel).abs() < 5e-3);
    assert!((map.fraction(ZIRCONIUM) - clad).abs() < 5e-3);
    assert!((map.fraction(H2O) - (1.0 - fuel - clad)).abs() < 5e-3);
    assert_eq!(map.counts().values().sum::<usize>(), 300 * 300);

    // corners are coolant, centre is fuel
    assert_eq!(map.get(0, 0), Some(H2O));
    assert_eq!(map.get(150, 150), Some(UO2));
    assert_eq!(map.get(300, 0), None);
}

#[rstest]
fn assembly_raster_shows_channel(lattice_model: Geometry) {
    let spec = RasterSpec {
        width: [4.0 * 1.26, 4.0 * 1.26],
        pixels: [40, 40],
        ..Default::default()
    };
    let map = lattice_model.raster(&spec).unwrap();
    // slot (1, 2) centre sits at pixel (15, 15), no fuel there
    assert_eq!(map.get(15, 15), Some(H2O));
    assert_eq!(map.get(5, 5), Some(UO2));
    assert_eq!(map.to_string().lines().count(), 40);
}

#[rstest]
fn non_square_assembly_raster() {
    use PinKind::{Channel as C, Fuel as F};
    let config = AssemblyConfig {
        layout: vec![vec![F, C, F], vec![F, F, F]],
        ..Default::default()
    };
    assert_eq!(config.shape(), [3, 2]);
    assert_eq!(config.width(), [3.0 * 1.26, 2.0 * 1.26]);

    let geometry = assembly(&config).unwrap();
    let spec = RasterSpec {
        width: config.width(),
        pixels: [30, 20],
        ..Default::default()
    };
    let map = geometry.raster(&spec).unwrap();
    assert_eq!(map.counts().values().sum::<usize>(), 600);
    // channel is the middle slot of the top row
    assert_eq!(map.get(15, 5), Some(H2O));
    assert_eq!(map.get(5, 5), Some(UO2));

    // a square view spills past the short side of the box
    let square = RasterSpec {
        width: [3.0 * 1.26, 3.0 * 1.26],
        pixels: [30, 30],
        ..Default::default()
    };
    assert!(matches!(
        geometry.raster(&square),
        Err(Error::NoCellFound { .. })
    ));
}

#[rstest]
fn models_pass_validation(pin: Geometry, lattice_model: Geometry) {
    let points: Vec<Point> = (0..50)
        .flat_map(|i| (0..50).map(move |j| (i, j)))
        .map(|(i, j)| Point::from_xy(-2.5 + i as f64 * 0.1, -2.5 + j as f64 * 0.1))
        .collect();

    assert!(lattice_model.check_acyclic().is_ok());
    assert!(lattice_model.check_overlaps(&points).is_ok());

    let inside: Vec<Point> = points
        .iter()
        .filter(|p| p.x.abs() < 0.63 && p.y.abs() < 0.63)
        .copied()
        .collect();
    assert!(pin.check_acyclic().is_ok());
    assert!(pin.check_overlaps(&inside).is_ok());
}

#[rstest]
fn parallel_queries_match_serial(lattice_model: Geometry) {
    let points: Vec<Point> = (0..400)
        .map(|i| Point::from_xy(-2.5 + (i % 20) as f64 * 0.25, -2.5 + (i / 20) as f64 * 0.25))
        .collect();

    let serial: Vec<_> = points.iter().map(|p| lattice_model.locate(p)).collect();
    assert_eq!(lattice_model.locate_many(&points), serial);

    // shared read-only access from plain threads
    std::thread::scope(|scope| {
        for chunk in points.chunks(100) {
            let geometry = &lattice_model;
            scope.spawn(move || {
                for p in chunk {
                    assert!(geometry.locate(p).is_ok());
                }
            });
        }
    });
}
