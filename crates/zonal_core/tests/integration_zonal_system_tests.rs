mod support;

use std::fs;

use zonal_core::test_helpers::square_around;
use zonal_core::{
    LinkId, Network, ZonalError, ZonalSystem, ZonalSystemParams, ZoneId, ZoneSource,
};

use support::{as_dyn, city_network};

fn resolve_every_link(system: &ZonalSystem) -> Vec<(LinkId, Option<ZoneId>)> {
    let network = system.network().clone();
    let assignments = network
        .link_ids()
        .map(|link| {
            let zone = system.zone_for_link(link).expect("link belongs to the network");
            (link.clone(), zone)
        })
        .collect();
    assignments
}

#[test]
fn grid_zones_with_out_of_bounds_centroids_are_never_assigned() {
    let network = city_network();
    // 250 m cells over x 0..400, y 0..300 snap to a 2 x 2 grid spanning 0..500.
    // Centroids at y = 375 lie above the network and are left out.
    let params = ZonalSystemParams::default().with_cell_size(250.0);
    let system = ZonalSystem::build(as_dyn(&network), &params).unwrap();

    assert_eq!(system.zones().len(), 4);
    assert_eq!(system.index().len(), 2);
    assert_eq!(system.index().excluded(), 2);

    let assignments = resolve_every_link(&system);
    assert_eq!(assignments.len(), 62);
    for (_, zone) in &assignments {
        let zone = zone.as_ref().expect("two zones are reachable");
        assert!(zone.as_str() == "1" || zone.as_str() == "3");
    }

    let zone_of = |id: &str| {
        assignments
            .iter()
            .find(|(link, _)| link.as_str() == id)
            .and_then(|(_, zone)| zone.clone())
            .map(|zone| zone.to_string())
    };
    // Inside zone "2" geometrically, but "2" is not indexed.
    assert_eq!(zone_of("n0_3-n1_3").as_deref(), Some("1"));
    assert_eq!(zone_of("n3_0-n4_0").as_deref(), Some("3"));
    // Midpoint x = 250 is equidistant from both centroids: first zone wins.
    assert_eq!(zone_of("n2_0-n3_0").as_deref(), Some("1"));

    // Excluded zones keep their geometry.
    assert!(system.zone(&ZoneId::from("2")).is_some());
    assert!(system.zone(&ZoneId::from("99")).is_none());
}

#[test]
fn exported_mapping_lists_links_in_resolution_order() {
    let network = city_network();
    let system = ZonalSystem::build(
        as_dyn(&network),
        &ZonalSystemParams::default().with_cell_size(250.0),
    )
    .unwrap();

    let first = LinkId::from("n3_0-n4_0");
    let second = LinkId::from("n0_0-n1_0");
    system.zone_for_link(&first).unwrap();
    system.zone_for_link(&second).unwrap();
    system.zone_for_link(&first).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(&ZonalSystemParams::default().mapping_file_name);
    let summary = system.write_link_to_zone(&path).unwrap();

    assert!(summary.is_complete());
    assert_eq!(summary.rows_written, 2);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "link_id;zone\nn3_0-n4_0;3\nn0_0-n1_0;1\n"
    );
}

#[test]
fn repeated_runs_produce_identical_mappings() {
    let export = || {
        let network = city_network();
        let system = ZonalSystem::build(
            as_dyn(&network),
            &ZonalSystemParams::default().with_cell_size(150.0),
        )
        .unwrap();
        resolve_every_link(&system);
        let mut buffer = Vec::new();
        zonal_core::write_link_zone_mapping(&system.resolver().cache(), &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    };

    let first = export();
    assert_eq!(first.lines().count(), 63);
    assert_eq!(first, export());
}

#[test]
fn explicit_zones_resolve_to_nearest_centroid() {
    let network = city_network();
    let system = ZonalSystem::from_source(
        as_dyn(&network),
        ZoneSource::Polygons(vec![
            (ZoneId::from("Z_A"), square_around(0.0, 0.0, 10.0)),
            (ZoneId::from("Z_B"), square_around(400.0, 300.0, 10.0)),
        ]),
    )
    .unwrap();

    assert_eq!(
        system.zone_for_link(&LinkId::from("n0_0-n1_0")).unwrap(),
        Some(ZoneId::from("Z_A"))
    );
    assert_eq!(
        system.zone_for_link(&LinkId::from("n4_2-n4_3")).unwrap(),
        Some(ZoneId::from("Z_B"))
    );
}

#[test]
fn zones_outside_the_network_leave_links_unresolved() {
    let network = city_network();
    let system = ZonalSystem::from_source(
        as_dyn(&network),
        ZoneSource::Polygons(vec![(ZoneId::from("far"), square_around(5_000.0, 5_000.0, 10.0))]),
    )
    .unwrap();
    assert!(system.index().is_empty());

    let link = LinkId::from("n1_1-n2_1");
    assert_eq!(system.zone_for_link(&link).unwrap(), None);
    assert_eq!(system.zone_for_link(&link).unwrap(), None);

    let mut buffer = Vec::new();
    zonal_core::write_link_zone_mapping(&system.resolver().cache(), &mut buffer).unwrap();
    assert_eq!(String::from_utf8(buffer).unwrap(), "link_id;zone\nn1_1-n2_1;\n");
}

#[test]
fn every_cached_zone_exists_in_the_zone_store() {
    let network = city_network();
    let sources = [
        ZoneSource::Grid { cell_size: 150.0 },
        ZoneSource::Polygons(vec![
            (ZoneId::from("Z_A"), square_around(0.0, 0.0, 10.0)),
            (ZoneId::from("far"), square_around(5_000.0, 5_000.0, 10.0)),
        ]),
    ];
    for source in sources {
        let system = ZonalSystem::from_source(as_dyn(&network), source).unwrap();
        resolve_every_link(&system);

        let cache = system.resolver().cache();
        assert_eq!(cache.len(), 62);
        for (link, zone) in cache.iter() {
            let zone = zone.unwrap_or_else(|| panic!("{link} has a reachable zone"));
            assert!(system.zones().contains(zone), "{zone} missing from store");
        }
    }
}

#[test]
fn missing_cell_size_is_a_configuration_error() {
    let network = city_network();
    let result = ZonalSystem::build(as_dyn(&network), &ZonalSystemParams::default());
    assert!(matches!(result, Err(ZonalError::MissingCellSize)));
}

#[test]
fn parquet_export_matches_cache_size() {
    let network = city_network();
    let system = ZonalSystem::build(
        as_dyn(&network),
        &ZonalSystemParams::default().with_cell_size(250.0),
    )
    .unwrap();
    resolve_every_link(&system);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("link2zone.parquet");
    let summary = system.write_link_to_zone_parquet(&path).unwrap();

    assert_eq!(summary.rows_written, 62);
    assert!(summary.is_complete());
    assert!(fs::metadata(&path).unwrap().len() > 0);
}
